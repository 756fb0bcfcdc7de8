//! Runtime configuration for the demo.
//!
//! Everything here has a sensible default; [`SceneConfig::from_env`] only
//! overrides the asset root so the binary can run from any working directory.

use std::path::{Path, PathBuf};

use instant::Duration;

/// Environment variable that overrides [`SceneConfig::asset_root`].
pub const ASSETS_ENV: &str = "PIPELINE_SCENE_ASSETS";

/// How far the scene clock advances on every update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Timestep {
    /// Advance by a constant number of seconds per frame, independent of
    /// wall-clock time.
    Fixed(f64),
    /// Advance by the measured frame time passed to `Scene::update`.
    Elapsed,
}

impl Timestep {
    /// One sixtieth of a second.
    pub const SIXTIETH: Timestep = Timestep::Fixed(1.0 / 60.0);

    /// The step in seconds for a frame that took `dt`.
    pub fn step(&self, dt: Duration) -> f64 {
        match self {
            Timestep::Fixed(step) => *step,
            Timestep::Elapsed => dt.as_secs_f64(),
        }
    }
}

impl Default for Timestep {
    fn default() -> Self {
        Self::SIXTIETH
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Directory that holds every mesh and texture the scene loads.
    pub asset_root: PathBuf,
    pub window_title: String,
    pub timestep: Timestep,
    pub clear_colour: wgpu::Color,
    /// Columns and rows of the ASCII glyph grid in the font atlas.
    pub font_grid: (u32, u32),
    /// Static text shown next to the logo.
    pub banner: String,
    /// Close the window after this many rendered frames. `None` runs until
    /// the window is closed.
    pub frame_limit: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("./assets"),
            window_title: "pipeline-scene".to_string(),
            timestep: Timestep::default(),
            clear_colour: wgpu::Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
            font_grid: (16, 16),
            banner: "NikoRIT".to_string(),
            frame_limit: None,
        }
    }
}

impl SceneConfig {
    /// Default configuration with the asset root taken from
    /// [`ASSETS_ENV`] when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = std::env::var(ASSETS_ENV) {
            log::info!("Using asset root {root} from {ASSETS_ENV}");
            config.asset_root = PathBuf::from(root);
        }
        config
    }

    pub fn asset_path(&self, file_name: &str) -> PathBuf {
        self.asset_root.join(file_name)
    }

    pub fn with_asset_root(mut self, root: impl AsRef<Path>) -> Self {
        self.asset_root = root.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timestep_is_exactly_one_sixtieth() {
        let step = Timestep::default().step(Duration::from_secs(3));
        assert_eq!(step, 1.0 / 60.0);
    }

    #[test]
    fn elapsed_timestep_follows_frame_time() {
        let step = Timestep::Elapsed.step(Duration::from_millis(250));
        assert!((step - 0.25).abs() < 1e-6);
    }

    #[test]
    fn asset_paths_are_joined_to_the_root() {
        let config = SceneConfig::default().with_asset_root("/data/scene");
        assert_eq!(
            config.asset_path("dog.obj"),
            PathBuf::from("/data/scene/dog.obj")
        );
    }
}
