//! Rendering pipeline components
//!
//! This module contains the uniform layout, shader loading, primitive
//! assembly and the render pipeline that draws the superformula surface.

pub mod shader;
pub mod surface_pipeline;
pub mod topology;
pub mod types;

pub use shader::{compile_module, numbered_source, DEFAULT_SHADER};
pub use surface_pipeline::{SurfaceOptions, SurfacePipeline};
pub use topology::{assemble, assembled_len, topology_for, IndexSource, PrimitiveAssembly};
pub use types::{ShapeUniforms, UniformSlot};
