//! Superform Mathematics Library
//!
//! This crate provides the small amount of linear algebra the renderer needs
//! and the tessellator for the spherical parameter domain.
//!
//! ## Core Types
//!
//! - [`Mat4`] - 4x4 column-major matrix with perspective/translate/rotate helpers
//! - [`DomainMesh`] - Vertex, index and UV buffers covering the (φ, θ) domain
//!
//! ## Tessellation
//!
//! - [`tessellate`] - Indexed grid over `[0, 2π] × [0, 2π]`
//! - [`point_cloud`] - Coarse, index-free sampling by angular step in degrees

pub mod mat4;
pub mod domain;

pub use mat4::Mat4;
pub use domain::{
    grid_index_count, tessellate, point_cloud, DomainCoordinates, DomainMesh, DomainVertex,
    TessellationError, TessellationOptions, MAX_BUFFER_BYTES, MAX_SEGMENTS,
};
