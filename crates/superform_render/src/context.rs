//! WGPU context management
//!
//! Handles device, queue, and surface creation/configuration.

use std::sync::{Arc, Mutex};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{RenderError, Viewport};

/// Last uncaptured device error, shared with the wgpu error callback
type DeviceErrorSlot = Arc<Mutex<Option<String>>>;

/// Core WGPU context holding device, queue, and surface
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    scale_factor: f64,
    device_error: DeviceErrorSlot,
}

impl RenderContext {
    /// Create a context for `window`.
    ///
    /// # Errors
    /// [`RenderError::InitializationFailure`] when no surface, adapter or
    /// device can be acquired.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::InitializationFailure(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| {
                RenderError::InitializationFailure("no compatible GPU adapter".to_string())
            })?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Superform Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::InitializationFailure(e.to_string()))?;

        // Record instead of panicking; the frame loop polls and halts
        let device_error: DeviceErrorSlot = Arc::new(Mutex::new(None));
        let slot = device_error.clone();
        device.on_uncaptured_error(Box::new(move |err| {
            log::error!("Uncaptured device error: {}", err);
            if let Ok(mut guard) = slot.lock() {
                if guard.is_none() {
                    *guard = Some(err.to_string());
                }
            }
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = choose_surface_format(&surface_caps.formats).ok_or_else(|| {
            RenderError::InitializationFailure("surface reports no formats".to_string())
        })?;
        log::debug!("Surface format: {:?}", surface_format);

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            scale_factor,
            device_error,
        })
    }

    /// Track the new size and reconfigure the surface.
    ///
    /// A zero-sized window (minimized) keeps the old surface configuration;
    /// [`RenderContext::viewport`] reports empty until it is restored.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure at the current size, used after a lost surface
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Get the aspect ratio of the surface
    pub fn aspect_ratio(&self) -> f32 {
        self.viewport().aspect_ratio()
    }

    /// Drawable area in device pixels
    pub fn viewport(&self) -> Viewport {
        Viewport::from_physical(self.size, self.scale_factor)
    }

    /// Take the first uncaptured device error, if one was reported
    pub fn take_device_error(&self) -> Option<RenderError> {
        self.device_error
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())
            .map(RenderError::DeviceLost)
    }
}

/// Prefer a non-sRGB format so 0-255 colors are written to the screen unconverted
fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn test_prefers_linear_format() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn test_falls_back_to_srgb() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&[]), None);
    }
}
