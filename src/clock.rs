use instant::Duration;

use crate::config::Timestep;

/// Elapsed scene time, advanced once per update.
///
/// Every animated value in the scene is a pure function of [`FrameClock::seconds`],
/// so two scenes advanced by the same sequence of steps end up in the same state.
/// With a fixed step the time is `frames * step`, so it never drifts.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    seconds: f64,
    frames: u64,
    timestep: Timestep,
}

impl FrameClock {
    pub fn new(timestep: Timestep) -> Self {
        Self {
            seconds: 0.0,
            frames: 0,
            timestep,
        }
    }

    /// Advance by one frame and return the new elapsed time in seconds.
    pub fn advance(&mut self, dt: Duration) -> f64 {
        self.frames += 1;
        self.seconds = match self.timestep {
            Timestep::Fixed(step) => self.frames as f64 * step,
            Timestep::Elapsed => self.seconds + self.timestep.step(dt),
        };
        self.seconds
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Timestep::default())
    }
}
