//! WebGPU rendering module
//!
//! The scene is built as plain colored triangles in screen coordinates and
//! drawn through a single pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
