//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The superformula surface pipeline
//! - Frame planning and presentation

use std::path::Path;
use std::sync::Arc;
use winit::{dpi::PhysicalSize, window::Window};

use superform_math::DomainMesh;
use superform_render::{
    context::RenderContext,
    pipeline::{SurfaceOptions, SurfacePipeline, DEFAULT_SHADER},
    FrameDriver, RenderError, SharedParameters,
};

use crate::config::AppConfig;

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: SurfacePipeline,
    driver: FrameDriver,
    parameters: SharedParameters,
}

impl RenderSystem {
    /// Acquire the GPU, upload `mesh` and compile the program.
    ///
    /// The frame driver enters `Running` only once every step succeeded.
    pub fn new(
        window: Arc<Window>,
        mesh: &DomainMesh,
        parameters: SharedParameters,
        config: &AppConfig,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::new(window, config.window.vsync))?;

        let shader_source = load_shader(config.rendering.shader_path.as_deref())?;
        let pipeline = SurfacePipeline::new(
            &context.device,
            context.config.format,
            mesh,
            &shader_source,
            SurfaceOptions {
                cull_back_faces: config.rendering.cull_back_faces,
            },
        )?;

        let mut driver = FrameDriver::new(config.camera.to_camera())
            .with_clear_alpha(config.rendering.clear_alpha);
        driver.begin_running();

        Ok(Self {
            context,
            pipeline,
            driver,
            parameters,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.context.resize(size);
    }

    /// Handle a device pixel ratio change
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.context.set_scale_factor(scale_factor);
    }

    /// Render a single frame
    ///
    /// A lost or outdated surface is reconfigured and reported as
    /// [`RenderError::SurfaceLost`]; the caller skips the frame and carries on.
    /// Rotation advances only for frames that were presented.
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        if let Some(err) = self.context.take_device_error() {
            return Err(err);
        }

        let viewport = self.context.viewport();
        if viewport.is_empty() || !self.driver.is_running() {
            return Ok(());
        }

        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                return Ok(());
            }
        };

        let params = self.parameters.borrow();
        let Some(plan) = self.driver.plan(&params, viewport.aspect_ratio()) else {
            return Ok(());
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.pipeline.render(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            &view,
            &plan,
            viewport,
        )?;

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.driver.frame_presented(&params);

        Ok(())
    }
}

/// Read the configured program, or fall back to the built-in one
fn load_shader(path: Option<&Path>) -> Result<String, RenderError> {
    match path {
        None => Ok(DEFAULT_SHADER.to_string()),
        Some(path) => {
            log::info!("Loading shader from {}", path.display());
            std::fs::read_to_string(path).map_err(|e| {
                RenderError::InitializationFailure(format!(
                    "cannot read shader '{}': {}",
                    path.display(),
                    e
                ))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shader_when_unset() {
        assert_eq!(load_shader(None).unwrap(), DEFAULT_SHADER);
    }

    #[test]
    fn test_missing_shader_file() {
        let err = load_shader(Some(Path::new("does/not/exist.wgsl"))).unwrap_err();
        assert!(matches!(err, RenderError::InitializationFailure(_)));
        assert!(err.to_string().contains("exist.wgsl"));
    }
}
