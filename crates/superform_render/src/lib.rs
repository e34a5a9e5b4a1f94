//! Superformula Rendering Library
//!
//! This crate provides the wgpu-based frame pipeline that draws the
//! tessellated parameter domain through the superformula vertex program.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::OrbitCamera`] - Fixed-distance camera with auto-rotation state
//! - [`viewport::Viewport`] - Device-scaled drawable size and aspect ratio
//! - [`frame::FrameDriver`] - Per-frame matrix and uniform planning
//! - [`pipeline::SurfacePipeline`] - Buffer upload, topology binding and draw
//!
//! The per-frame logic in [`frame`] is pure CPU code so it can be tested
//! without a GPU.

pub mod camera;
pub mod context;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod viewport;

pub use camera::{OrbitCamera, RotationAxis};
pub use error::RenderError;
pub use frame::{FrameDriver, FramePlan, ParameterBlock, PipelineState, SharedParameters};
pub use viewport::Viewport;

// Re-export the model types the frame loop consumes
pub use superform_core::{DrawMode, ShapeSnapshot};
pub use superform_math::DomainMesh;
