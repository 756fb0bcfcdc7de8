/// Renders a few frames of the real scene. Needs the assets, found through
/// `PIPELINE_SCENE_ASSETS` or `./assets`.
#[test]
#[cfg(feature = "integration-tests")]
fn should_render_and_close_after_the_frame_limit() {
    use pipeline_scene::SceneConfig;

    let config = SceneConfig {
        frame_limit: Some(5),
        ..SceneConfig::from_env()
    };
    if !config.asset_path("kitten.obj").exists() {
        println!("skipped: no assets in {}", config.asset_root.display());
        return;
    }

    if let Err(e) = pipeline_scene::flow::run(config) {
        panic!("{e:#}");
    }
}
