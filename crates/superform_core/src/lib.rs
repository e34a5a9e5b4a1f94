//! Core types for superform
//!
//! This crate owns the shape parameter model: the two superformula parameter
//! sets, the morph coefficients between them, and the rendering state that
//! the frame loop reads.
//!
//! ## Key Components
//!
//! - [`ShapeModel`] - Owned model with `set(path, value)` and change subscriptions
//! - [`ShapeSnapshot`] - Plain-data copy of everything the renderer needs
//! - [`FIELDS`] - The control field table with declared bounds
//! - [`DrawMode`] - The primitive topologies a frame can be drawn with

mod draw_mode;
mod error;
pub mod fields;
mod model;
mod params;

pub use draw_mode::DrawMode;
pub use error::ModelError;
pub use fields::{field, FieldKind, FieldSpec, FieldValue, FIELDS};
pub use model::{ShapeModel, SubscriptionId};
pub use params::{MorphCoefficients, RenderingState, ShapeParams, ShapeSnapshot};
