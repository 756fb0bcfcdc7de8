//! The demo scene: seven entities drawn by four pipelines.
//!
//! A [`Scene`] loads its meshes and textures once, creates one binding per
//! entity, then alternates [`update`](Scene::update) and [`draw`](Scene::draw)
//! until it is dropped. It is generic over the [`Backend`] so the same code
//! drives the wgpu [`Context`](crate::context::Context) and the recording
//! backends of the tests.

use std::f32::consts::PI;

use anyhow::Context as _;
use cgmath::{Deg, Euler, Point3, Rad, Vector3};
use instant::Duration;

use crate::{
    backend::{Backend, BindingLayout, DrawTarget, PipelineKind},
    camera::{OrbitCamera, Projection},
    clock::FrameClock,
    config::SceneConfig,
    data_structures::{
        entity::{Entity, MeshId, TextureId},
        text::GlyphGrid,
    },
};

/// Shown by the text entities until their first update.
pub const PLACEHOLDER_LABEL: &str = "_______";

pub const FOVY_DEGREES: f32 = 45.0;
pub const ZNEAR: f32 = 0.1;
pub const ZFAR: f32 = 100.0;

struct Asset {
    file: &'static str,
    /// Tangents for meshes, linear colour space for textures.
    flag: bool,
}

const MESHES: [Asset; 4] = [
    Asset { file: "kitten.obj", flag: false },
    Asset { file: "dog.obj", flag: false },
    Asset { file: "building.obj", flag: true },
    Asset { file: "skybox.obj", flag: false },
];

const KITTEN: MeshId = MeshId(0);
const DOG: MeshId = MeshId(1);
const BUILDING: MeshId = MeshId(2);
const SKYBOX: MeshId = MeshId(3);

const TEXTURES: [Asset; 7] = [
    Asset { file: "CatColor.png", flag: false },
    Asset { file: "DogColor.png", flag: false },
    Asset { file: "skybox.png", flag: false },
    Asset { file: "BrickColor.png", flag: false },
    Asset { file: "BrickNormal.png", flag: true },
    Asset { file: "Logo.png", flag: false },
    Asset { file: "font2.png", flag: false },
];

const CAT_COLOUR: TextureId = TextureId(0);
const DOG_COLOUR: TextureId = TextureId(1);
const SKY: TextureId = TextureId(2);
const BRICK_COLOUR: TextureId = TextureId(3);
const BRICK_NORMAL: TextureId = TextureId(4);
const LOGO: TextureId = TextureId(5);
const FONT: TextureId = TextureId(6);

/// The entities of the scene, in construction order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Cat,
    Dog,
    Building,
    Sky,
    Logo,
    Banner,
    Clock,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Cat,
        Role::Dog,
        Role::Building,
        Role::Sky,
        Role::Logo,
        Role::Banner,
        Role::Clock,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Cat => "cat",
            Role::Dog => "dog",
            Role::Building => "building",
            Role::Sky => "sky",
            Role::Logo => "logo",
            Role::Banner => "banner",
            Role::Clock => "clock",
        }
    }

    fn pipeline(&self) -> PipelineKind {
        match self {
            Role::Cat | Role::Dog => PipelineKind::Basic,
            Role::Building => PipelineKind::Bumpy,
            Role::Sky => PipelineKind::Sky,
            Role::Logo | Role::Banner | Role::Clock => PipelineKind::Flat,
        }
    }

    fn layout(&self) -> BindingLayout {
        match self {
            Role::Cat | Role::Dog | Role::Sky => BindingLayout::Basic,
            Role::Building => BindingLayout::Bumpy,
            Role::Logo | Role::Banner | Role::Clock => BindingLayout::Flat,
        }
    }

    fn mesh(&self) -> Option<MeshId> {
        match self {
            Role::Cat => Some(KITTEN),
            Role::Dog => Some(DOG),
            Role::Building => Some(BUILDING),
            Role::Sky => Some(SKYBOX),
            Role::Logo | Role::Banner | Role::Clock => None,
        }
    }

    fn textures(&self) -> &'static [TextureId] {
        match self {
            Role::Cat => &[CAT_COLOUR],
            Role::Dog => &[DOG_COLOUR],
            Role::Building => &[BRICK_COLOUR, BRICK_NORMAL],
            Role::Sky => &[SKY],
            Role::Logo => &[LOGO],
            Role::Banner | Role::Clock => &[FONT],
        }
    }

    fn has_label(&self) -> bool {
        matches!(self, Role::Banner | Role::Clock)
    }
}

pub struct Scene<B: Backend> {
    meshes: Vec<B::Mesh>,
    textures: Vec<B::Texture>,
    // indexed by `Role as usize`
    entities: Vec<Entity<B::Binding>>,
    clock: FrameClock,
    camera: OrbitCamera,
    projection: Projection,
    eye: Point3<f32>,
    grid: GlyphGrid,
    banner: String,
}

impl<B: Backend> Scene<B> {
    /// Load every asset and bind every entity. The first failing load or
    /// binding aborts construction; whatever was loaded so far is released.
    pub fn new(backend: &mut B, config: &SceneConfig) -> anyhow::Result<Self> {
        log::info!("Loading scene from {}", config.asset_root.display());

        let meshes = MESHES
            .iter()
            .map(|asset| {
                let path = config.asset_path(asset.file);
                log::debug!("Loading mesh {} (tangents: {})", path.display(), asset.flag);
                backend
                    .load_mesh(&path, asset.flag)
                    .with_context(|| format!("failed to load mesh {}", asset.file))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let textures = TEXTURES
            .iter()
            .map(|asset| {
                let path = config.asset_path(asset.file);
                log::debug!("Loading texture {} (normal map: {})", path.display(), asset.flag);
                backend
                    .load_texture(&path, asset.flag)
                    .with_context(|| format!("failed to load texture {}", asset.file))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut entities = Vec::with_capacity(Role::ALL.len());
        for role in Role::ALL {
            let name = role.name();
            let bound: Vec<&B::Texture> = role
                .textures()
                .iter()
                .map(|id| &textures[id.index()])
                .collect();
            let binding = backend
                .create_binding(name, role.layout(), &bound)
                .with_context(|| format!("failed to bind {name}"))?;
            log::debug!("Bound {name} for the {:?} pipeline", role.pipeline());

            let mut entity = Entity::new(
                name,
                role.pipeline(),
                role.layout(),
                role.mesh(),
                role.textures(),
                binding,
            )?;
            if role.has_label() {
                entity.label = Some(PLACEHOLDER_LABEL.to_string());
            }
            entities.push(entity);
        }

        let (width, height) = backend.viewport();
        let camera = OrbitCamera::default();
        let eye = camera.eye(0.0);
        log::info!(
            "Scene ready: {} meshes, {} textures, {} entities",
            meshes.len(),
            textures.len(),
            entities.len()
        );

        Ok(Self {
            meshes,
            textures,
            entities,
            clock: FrameClock::new(config.timestep),
            camera,
            projection: Projection::new(width, height, Deg(FOVY_DEGREES), ZNEAR, ZFAR),
            eye,
            grid: GlyphGrid::from(config.font_grid),
            banner: config.banner.clone(),
        })
    }

    /// Advance the clock, move the camera and every entity, and upload the
    /// new camera, model uniforms and overlay quads.
    pub fn update(&mut self, backend: &mut B, dt: Duration) {
        let seconds = self.clock.advance(dt);
        // animation runs in single precision, the clock label shows the exact time
        let t = seconds as f32;

        let (width, height) = backend.viewport();
        self.projection.resize(width, height);
        let projection = self.projection.calc_matrix(backend.clip_space());
        self.eye = self.camera.eye(t);
        let view = self.camera.view_matrix(self.eye);
        backend.set_camera(self.eye, view, projection);

        self.place_entities(t, seconds);

        let grid = self.grid;
        for entity in &mut self.entities {
            if entity.is_flat() {
                entity.update_2d(backend, grid);
            } else {
                entity.update_3d(backend);
            }
        }
    }

    fn place_entities(&mut self, t: f32, seconds: f64) {
        let eye = self.eye;
        let banner = self.banner.clone();

        let cat = &mut self.entities[Role::Cat as usize].transform;
        cat.position = Vector3::new(t.sin() - 1.0, 0.0, t.cos());
        cat.rotation = Euler::new(Rad(0.0), Rad(t), Rad(0.0));
        cat.set_uniform_scale(1.0);

        // mirrored orbit, half a turn ahead of the cat
        let dog = &mut self.entities[Role::Dog as usize].transform;
        dog.position = Vector3::new((PI - t).sin() + 1.0, 0.0, (PI - t).cos());
        dog.rotation = Euler::new(Rad(0.0), Rad(-t), Rad(0.0));
        dog.set_uniform_scale(0.8);

        let building = &mut self.entities[Role::Building as usize].transform;
        building.position = Vector3::new(0.0, 0.0, -1.0);
        building.set_uniform_scale(1.0);

        let sky = &mut self.entities[Role::Sky as usize].transform;
        sky.position = Vector3::new(eye.x, eye.y, eye.z);
        sky.set_uniform_scale(1.0);

        self.place_overlay(Role::Logo, -0.7, 0.7, None);
        self.place_overlay(Role::Banner, -0.5, 0.6, Some(banner));
        self.place_overlay(Role::Clock, 0.2, 0.6, Some(format!("Time{seconds:.6}")));
    }

    fn place_overlay(&mut self, role: Role, x: f32, y: f32, label: Option<String>) {
        let entity = &mut self.entities[role as usize];
        entity.transform.position = Vector3::new(x, y, 0.0);
        entity.transform.set_uniform_scale(0.5);
        if label.is_some() {
            entity.label = label;
        }
    }

    /// Bind each pipeline in turn and draw the entities assigned to it.
    pub fn draw<T>(&self, target: &mut T)
    where
        T: DrawTarget<B>,
    {
        for pipeline in PipelineKind::DRAW_ORDER {
            target.use_pipeline(pipeline);
            for entity in self.entities.iter().filter(|e| e.pipeline() == pipeline) {
                let mesh = entity.mesh().map(|id| &self.meshes[id.index()]);
                target.draw(mesh, entity.binding());
            }
        }
    }

    pub fn entity(&self, role: Role) -> &Entity<B::Binding> {
        &self.entities[role as usize]
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity<B::Binding>> {
        self.entities.iter()
    }

    /// Camera position of the last update.
    pub fn eye(&self) -> Point3<f32> {
        self.eye
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }
}

impl<B: Backend> Drop for Scene<B> {
    fn drop(&mut self) {
        log::info!(
            "Releasing {} entities, {} meshes and {} textures",
            self.entities.len(),
            self.meshes.len(),
            self.textures.len()
        );
        // bindings refer to the textures, release them first
        self.entities.clear();
        self.meshes.clear();
        self.textures.clear();
    }
}
