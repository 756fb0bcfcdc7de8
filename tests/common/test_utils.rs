use std::{cell::RefCell, collections::HashMap, path::Path, rc::Rc};

use pipeline_scene::{
    backend::{Backend, BindingLayout, ClipSpace, DrawTarget, PipelineKind},
    cgmath::{Matrix4, Point3},
    data_structures::{model::FlatVertex, transform::ModelUniform},
};

/// Shared event log. Every load, binding and release is appended in order.
pub type Events = Rc<RefCell<Vec<String>>>;

/// A resource that reports its own release.
#[derive(Debug)]
pub struct Tracked {
    pub kind: &'static str,
    pub name: String,
    events: Events,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.events
            .borrow_mut()
            .push(format!("release {} {}", self.kind, self.name));
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CameraWrite {
    pub eye: Point3<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

/// A backend without a GPU that records what the scene asks of it.
pub struct RecordingBackend {
    pub events: Events,
    pub clip: ClipSpace,
    pub viewport: (u32, u32),
    /// Loading a file with this name fails.
    pub broken_file: Option<String>,
    pub cameras: Vec<CameraWrite>,
    pub models: HashMap<String, ModelUniform>,
    pub quads: HashMap<String, Vec<FlatVertex>>,
}

impl RecordingBackend {
    pub fn new(clip: ClipSpace) -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            clip,
            viewport: (1280, 720),
            broken_file: None,
            cameras: Vec::new(),
            models: HashMap::new(),
            quads: HashMap::new(),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn last_camera(&self) -> CameraWrite {
        *self.cameras.last().expect("no camera written yet")
    }

    fn track(&self, kind: &'static str, name: String) -> Tracked {
        self.events.borrow_mut().push(format!("create {kind} {name}"));
        Tracked {
            kind,
            name,
            events: self.events.clone(),
        }
    }

    fn load(&self, kind: &'static str, path: &Path) -> anyhow::Result<Tracked> {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.broken_file.as_deref() == Some(file.as_str()) {
            anyhow::bail!("cannot read {}", path.display());
        }
        Ok(self.track(kind, file))
    }
}

impl Backend for RecordingBackend {
    type Mesh = Tracked;
    type Texture = Tracked;
    type Binding = Tracked;

    fn load_mesh(&mut self, path: &Path, _generate_tangents: bool) -> anyhow::Result<Tracked> {
        self.load("mesh", path)
    }

    fn load_texture(&mut self, path: &Path, _is_normal_map: bool) -> anyhow::Result<Tracked> {
        self.load("texture", path)
    }

    fn create_binding(
        &mut self,
        label: &str,
        layout: BindingLayout,
        textures: &[&Tracked],
    ) -> anyhow::Result<Tracked> {
        anyhow::ensure!(textures.len() == layout.texture_count());
        Ok(self.track("binding", label.to_string()))
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn clip_space(&self) -> ClipSpace {
        self.clip
    }

    fn set_camera(&mut self, eye: Point3<f32>, view: Matrix4<f32>, projection: Matrix4<f32>) {
        self.cameras.push(CameraWrite {
            eye,
            view,
            projection,
        });
    }

    fn write_model(&mut self, binding: &Tracked, uniform: &ModelUniform) {
        self.models.insert(binding.name.clone(), *uniform);
    }

    fn write_quads(&mut self, binding: &mut Tracked, vertices: &[FlatVertex]) {
        self.quads.insert(binding.name.clone(), vertices.to_vec());
    }
}

/// Records pipeline switches and draws as `pipeline <Kind>` / `draw <entity>`.
#[derive(Default)]
pub struct RecordingTarget {
    pub calls: Vec<String>,
}

impl DrawTarget<RecordingBackend> for RecordingTarget {
    fn use_pipeline(&mut self, pipeline: PipelineKind) {
        self.calls.push(format!("pipeline {pipeline:?}"));
    }

    fn draw(&mut self, mesh: Option<&Tracked>, binding: &Tracked) {
        match mesh {
            Some(mesh) => self.calls.push(format!("draw {} {}", binding.name, mesh.name)),
            None => self.calls.push(format!("draw {}", binding.name)),
        }
    }
}
