//! SceneBuilder - surface scene construction
//!
//! Provides a fluent API for tessellating the parameter domain and seeding
//! the shape model.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use superform_core::{ModelError, ShapeModel, ShapeSnapshot};
use superform_math::{
    point_cloud, tessellate, DomainMesh, TessellationError, TessellationOptions,
};
use superform_render::frame::parameter_listener;
use superform_render::{ParameterBlock, SharedParameters};

use crate::config::AppConfig;

/// Builder for the surface scene
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new()
///     .with_segments(128)
///     .with_initial(snapshot)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    segments: u32,
    options: TessellationOptions,
    point_cloud_step: Option<u32>,
    initial: ShapeSnapshot,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            segments: 256,
            options: TessellationOptions::default(),
            point_cloud_step: None,
            initial: ShapeSnapshot::default(),
        }
    }

    /// Builder seeded from the tessellation, rendering and shape sections
    pub fn from_config(config: &AppConfig) -> Self {
        let mut builder = Self::new()
            .with_segments(config.tessellation.segments)
            .with_options(config.tessellation.options())
            .with_initial(config.initial_snapshot());
        builder.point_cloud_step = config.tessellation.point_cloud_step;
        builder
    }

    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_options(mut self, options: TessellationOptions) -> Self {
        self.options = options;
        self
    }

    /// Sample an unindexed point cloud instead of the indexed grid
    pub fn with_point_cloud(mut self, step_degrees: u32) -> Self {
        self.point_cloud_step = Some(step_degrees);
        self
    }

    pub fn with_initial(mut self, initial: ShapeSnapshot) -> Self {
        self.initial = initial;
        self
    }

    /// Tessellate and build the model.
    ///
    /// The parameter block is subscribed to the model, so it already holds
    /// the initial values when this returns.
    pub fn build(self) -> Result<SurfaceScene, SceneError> {
        let mesh = match self.point_cloud_step {
            Some(step) => point_cloud(step)?,
            None => tessellate(self.segments, self.options)?,
        };
        log::info!(
            "Tessellated domain: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        let parameters: SharedParameters = Rc::new(RefCell::new(ParameterBlock::from_snapshot(
            &ShapeSnapshot::default(),
            mesh.domain_scale(),
        )));
        let model = ShapeModel::with_listener(&self.initial, parameter_listener(&parameters))?;

        Ok(SurfaceScene {
            mesh,
            model,
            parameters,
        })
    }
}

/// Domain mesh plus the model feeding the renderer
pub struct SurfaceScene {
    pub mesh: DomainMesh,
    pub model: ShapeModel,
    /// Kept current by a model subscription
    pub parameters: SharedParameters,
}

/// Scene construction error
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    Tessellation(TessellationError),
    Model(ModelError),
}

impl From<TessellationError> for SceneError {
    fn from(e: TessellationError) -> Self {
        SceneError::Tessellation(e)
    }
}

impl From<ModelError> for SceneError {
    fn from(e: ModelError) -> Self {
        SceneError::Model(e)
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Tessellation(e) => write!(f, "Tessellation failed: {}", e),
            SceneError::Model(e) => write!(f, "Initial parameters rejected: {}", e),
        }
    }
}

impl std::error::Error for SceneError {}
