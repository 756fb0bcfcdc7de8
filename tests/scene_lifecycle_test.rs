use std::time::Duration;

use pipeline_scene::{
    Scene, SceneConfig, Timestep,
    backend::ClipSpace,
    cgmath::{InnerSpace, Matrix4, Vector3},
    scene::{PLACEHOLDER_LABEL, Role},
};

use crate::common::test_utils::{RecordingBackend, RecordingTarget};

mod common;

const FRAME: Duration = Duration::from_millis(16);

fn scene(backend: &mut RecordingBackend) -> Scene<RecordingBackend> {
    Scene::new(backend, &SceneConfig::default()).expect("every asset loads")
}

fn translation(backend: &RecordingBackend, entity: &str) -> Vector3<f32> {
    let model = backend.models[entity].model;
    Vector3::new(model[3][0], model[3][1], model[3][2])
}

/// Length of each basis column of the model matrix.
fn scale(model: &Matrix4<f32>) -> Vector3<f32> {
    Vector3::new(
        model.x.truncate().magnitude(),
        model.y.truncate().magnitude(),
        model.z.truncate().magnitude(),
    )
}

/// Cosine and sine of the rotation about Y, read from the rotated X axis.
fn yaw(model: &Matrix4<f32>) -> (f32, f32) {
    let x_axis = model.x.truncate().normalize();
    (x_axis.x, -x_axis.z)
}

fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!((actual - expected).abs() < 1e-4, "{what}: {actual} != {expected}");
}

#[test]
fn draws_every_pipeline_in_fixed_order() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);
    scene.update(&mut backend, FRAME);

    let expected = vec![
        "pipeline Flat",
        "draw logo",
        "draw banner",
        "draw clock",
        "pipeline Basic",
        "draw cat kitten.obj",
        "draw dog dog.obj",
        "pipeline Bumpy",
        "draw building building.obj",
        "pipeline Sky",
        "draw sky skybox.obj",
    ];
    for _ in 0..3 {
        let mut target = RecordingTarget::default();
        scene.draw(&mut target);
        assert_eq!(target.calls, expected);
    }
}

#[test]
fn drop_releases_entities_then_meshes_then_textures() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);
    scene.update(&mut backend, FRAME);
    let created = backend.events().len();
    drop(scene);

    let events = backend.events();
    let released: Vec<&str> = events[created..].iter().map(String::as_str).collect();
    assert_eq!(
        released,
        vec![
            "release binding cat",
            "release binding dog",
            "release binding building",
            "release binding sky",
            "release binding logo",
            "release binding banner",
            "release binding clock",
            "release mesh kitten.obj",
            "release mesh dog.obj",
            "release mesh building.obj",
            "release mesh skybox.obj",
            "release texture CatColor.png",
            "release texture DogColor.png",
            "release texture skybox.png",
            "release texture BrickColor.png",
            "release texture BrickNormal.png",
            "release texture Logo.png",
            "release texture font2.png",
        ]
    );
    // everything created is released exactly once
    let creates = events.iter().filter(|e| e.starts_with("create")).count();
    assert_eq!(creates, released.len());
}

#[test]
fn missing_asset_fails_construction_and_releases_what_was_loaded() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    backend.broken_file = Some("BrickNormal.png".to_string());

    let err = match Scene::new(&mut backend, &SceneConfig::default()) {
        Ok(_) => panic!("construction must fail"),
        Err(err) => err,
    };
    assert!(format!("{err:#}").contains("BrickNormal.png"), "{err:#}");

    let events = backend.events();
    let creates = events.iter().filter(|e| e.starts_with("create")).count();
    let releases = events.iter().filter(|e| e.starts_with("release")).count();
    assert_eq!(creates, 4 + 4);
    assert_eq!(creates, releases);
    assert!(!events.iter().any(|e| e.contains("binding")));
}

#[test]
fn clock_advances_by_a_sixtieth_regardless_of_frame_time() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);

    let mut previous = scene.clock().seconds();
    for dt in [0, 5, 16, 33, 250, 1000] {
        scene.update(&mut backend, Duration::from_millis(dt));
        let now = scene.clock().seconds();
        assert!(now > previous);
        assert!((now - previous - 1.0 / 60.0).abs() < 1e-6);
        previous = now;
    }
    assert_eq!(scene.clock().frames(), 6);
}

#[test]
fn elapsed_timestep_follows_the_measured_frame_time() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let config = SceneConfig {
        timestep: Timestep::Elapsed,
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(&mut backend, &config).expect("every asset loads");
    scene.update(&mut backend, Duration::from_millis(500));
    scene.update(&mut backend, Duration::from_millis(250));
    assert!((scene.clock().seconds() - 0.75).abs() < 1e-6);
}

#[test]
fn pets_orbit_mirrored_centres_at_unit_radius() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);
    let cat_centre = Vector3::new(-1.0, 0.0, 0.0);
    let dog_centre = Vector3::new(1.0, 0.0, 0.0);

    for _ in 0..240 {
        scene.update(&mut backend, FRAME);
        let cat = translation(&backend, "cat") - cat_centre;
        let dog = translation(&backend, "dog") - dog_centre;
        assert!((cat.magnitude() - 1.0).abs() < 1e-4, "{cat:?}");
        assert!((dog.magnitude() - 1.0).abs() < 1e-4, "{dog:?}");
        // opposite phase: same sideways offset, opposite depth
        assert!((cat.x - dog.x).abs() < 1e-4);
        assert!((cat.z + dog.z).abs() < 1e-4);
        assert_eq!(cat.y, 0.0);
    }
}

#[test]
fn sky_follows_the_camera() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);

    for _ in 0..120 {
        scene.update(&mut backend, FRAME);
        let eye = backend.last_camera().eye;
        let sky = translation(&backend, "sky");
        assert!((sky - Vector3::new(eye.x, eye.y, eye.z)).magnitude() < 1e-5);
        assert_eq!(scene.eye(), eye);
    }
}

#[test]
fn camera_circles_the_origin_from_behind() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);

    for _ in 0..60 {
        scene.update(&mut backend, FRAME);
        let t = scene.clock().seconds() as f32;
        let eye = backend.last_camera().eye;
        assert!((eye.x - 5.0 * (t / 2.0).sin()).abs() < 1e-5);
        assert_eq!(eye.y, 2.0);
        assert!((eye.z - (5.0 * (t / 2.0).cos() + 3.0)).abs() < 1e-5);
    }
}

#[test]
fn y_down_backends_get_a_flipped_projection_every_update() {
    let mut backend = RecordingBackend::new(ClipSpace::YDown);
    let mut scene = scene(&mut backend);

    for viewport in [(1280, 720), (800, 800), (640, 1024)] {
        backend.viewport = viewport;
        scene.update(&mut backend, FRAME);
        let projection = backend.last_camera().projection;
        assert!(projection[1][1] < 0.0, "{viewport:?}");
        assert!(projection[0][0] > 0.0);
    }
    assert_eq!(backend.cameras.len(), 3);
}

#[test]
fn y_up_backends_keep_the_projection_unflipped() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);
    scene.update(&mut backend, FRAME);
    assert!(backend.last_camera().projection[1][1] > 0.0);
}

#[test]
fn labels_are_placeholders_until_the_first_update() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let config = SceneConfig {
        banner: "Hello".to_string(),
        ..SceneConfig::default()
    };
    let mut scene = Scene::new(&mut backend, &config).expect("every asset loads");
    assert_eq!(scene.entity(Role::Banner).label.as_deref(), Some(PLACEHOLDER_LABEL));
    assert_eq!(scene.entity(Role::Clock).label.as_deref(), Some(PLACEHOLDER_LABEL));
    assert_eq!(scene.entity(Role::Logo).label, None);

    scene.update(&mut backend, FRAME);
    assert_eq!(scene.entity(Role::Banner).label.as_deref(), Some("Hello"));
    assert_eq!(scene.entity(Role::Clock).label.as_deref(), Some("Time0.016667"));
}

#[test]
fn overlays_upload_one_quad_per_glyph() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);
    scene.update(&mut backend, FRAME);

    assert_eq!(backend.quads["logo"].len(), 6);
    assert_eq!(backend.quads["banner"].len(), "NikoRIT".len() * 6);
    assert_eq!(backend.quads["clock"].len(), "Time0.016667".len() * 6);
    // the clock text starts at its screen position
    assert_eq!(backend.quads["clock"][0].position, [0.2, 0.6]);
    // 3D entities never receive quads and overlays never receive a model matrix
    assert!(!backend.quads.contains_key("cat"));
    assert!(!backend.models.contains_key("logo"));
}

#[test]
fn pets_spin_in_opposite_directions_at_their_own_scale() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);

    for _ in 0..120 {
        scene.update(&mut backend, FRAME);
        let t = scene.clock().seconds() as f32;

        let cat: Matrix4<f32> = backend.models["cat"].model.into();
        let s = scale(&cat);
        assert_close(s.x, 1.0, "cat scale x");
        assert_close(s.y, 1.0, "cat scale y");
        assert_close(s.z, 1.0, "cat scale z");
        let (cos, sin) = yaw(&cat);
        assert_close(cos, t.cos(), "cat yaw cos");
        assert_close(sin, t.sin(), "cat yaw sin");
        assert_close(cat.x.y, 0.0, "cat tilt");

        let dog: Matrix4<f32> = backend.models["dog"].model.into();
        let s = scale(&dog);
        assert_close(s.x, 0.8, "dog scale x");
        assert_close(s.y, 0.8, "dog scale y");
        assert_close(s.z, 0.8, "dog scale z");
        let (cos, sin) = yaw(&dog);
        assert_close(cos, (-t).cos(), "dog yaw cos");
        assert_close(sin, (-t).sin(), "dog yaw sin");
        assert_close(dog.x.y, 0.0, "dog tilt");
    }
}

#[test]
fn building_never_moves() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);
    let expected = Matrix4::from_translation(Vector3::new(0.0, 0.0, -1.0));

    for _ in 0..90 {
        scene.update(&mut backend, FRAME);
        let building: Matrix4<f32> = backend.models["building"].model.into();
        assert_eq!(building, expected);
    }
}

#[test]
fn logo_and_banner_sit_at_their_screen_positions() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);

    for _ in 0..3 {
        scene.update(&mut backend, FRAME);

        let logo = &backend.quads["logo"];
        let (sx, sy) = logo
            .iter()
            .fold((0.0, 0.0), |(x, y), v| (x + v.position[0], y + v.position[1]));
        assert_close(sx / logo.len() as f32, -0.7, "logo centre x");
        assert_close(sy / logo.len() as f32, 0.7, "logo centre y");
        let xs = logo.iter().map(|v| v.position[0]);
        let width = xs.clone().fold(f32::MIN, f32::max) - xs.fold(f32::MAX, f32::min);
        assert_close(width, 0.5, "logo width");

        let banner = &backend.quads["banner"];
        assert_eq!(banner[0].position, [-0.5, 0.6]);
        // glyphs advance by a fifth of the 0.5 scale
        assert_close(banner[6].position[0], -0.4, "second glyph x");
        assert_close(banner[6].position[1], 0.6, "second glyph y");
    }
}

#[test]
fn zero_sized_viewport_keeps_the_last_projection() {
    let mut backend = RecordingBackend::new(ClipSpace::YUp);
    let mut scene = scene(&mut backend);
    scene.update(&mut backend, FRAME);
    let aspect = scene.projection().aspect();

    for viewport in [(0, 720), (1280, 0), (0, 0)] {
        backend.viewport = viewport;
        scene.update(&mut backend, FRAME);
        assert_eq!(scene.projection().aspect(), aspect, "{viewport:?}");
        let projection = backend.last_camera().projection;
        assert!(projection[0][0].is_finite(), "{viewport:?}");
    }
}
