//! Scene data: entities, transforms, vertex formats, textures and overlay text.
//!
//! - `entity` is a renderable unit that references scene-owned meshes/textures
//! - `transform` holds position, rotation and scale and the derived model uniform
//! - `model` contains vertex formats and GPU meshes
//! - `texture` wraps GPU textures, views and samplers
//! - `text` lays out screen-space quads and glyphs for 2D entities

pub mod entity;
pub mod model;
pub mod text;
pub mod texture;
pub mod transform;
