//! WebGPU rendering module
//!
//! The scene is built as colored triangles in surface pixels and mapped to
//! clip space on upload.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, pixel_to_ndc};
pub use shapes::scene;
pub use vertex::Vertex;
