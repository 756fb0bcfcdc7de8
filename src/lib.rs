//! pipeline-scene
//!
//! A single demo scene that loads a fixed set of meshes and textures, animates
//! seven entities and draws them through four fixed render pipelines: a 2D
//! overlay, a basic textured pipeline, a normal-mapped ("bumpy") pipeline and a
//! skybox pipeline that forces depth to the far plane.
//!
//! The scene only talks to the GPU through the [`backend::Backend`] and
//! [`backend::DrawTarget`] traits. [`context::Context`] implements both on top
//! of wgpu, which keeps the scene logic itself testable without a device.
//!
//! High-level modules
//! - `backend`: the seams between the scene and a renderer
//! - `camera`: projection and orbit camera math, camera uniform
//! - `clock`: the scene-owned time accumulator
//! - `config`: runtime configuration (asset root, timestep, overlay text)
//! - `context`: wgpu device/surface context implementing the backend traits
//! - `data_structures`: entities, transforms, vertices, textures, glyph layout
//! - `flow`: the winit application loop
//! - `pipelines`: the four render pipelines and their shaders
//! - `resources`: helpers to load meshes and textures from disk
//! - `scene`: the demo scene
//!

pub mod backend;
pub mod camera;
pub mod clock;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod resources;
pub mod scene;

pub use cgmath;
pub use config::{SceneConfig, Timestep};
pub use scene::Scene;
