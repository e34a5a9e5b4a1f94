//! Scene construction utilities
//!
//! Builds everything the frame loop needs before a window exists: the
//! tessellated domain, the parameter model and the shared parameter block
//! the model keeps current.

mod scene_builder;

pub use scene_builder::{SceneBuilder, SceneError, SurfaceScene};
