//! Superform - superformula surface viewer
//!
//! Renders two superformula parameter sets as a spinning 3D surface and
//! lets the keyboard edit every parameter live.

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use superform::config::AppConfig;
use superform::scene::{SceneBuilder, SceneError, SurfaceScene};
use superform::systems::{RenderSystem, WindowSystem};
use superform_input::{ControlPanel, InputAction, InputMapper, PanelEvent};
use superform_render::RenderError;

/// Main application state
struct App {
    config: AppConfig,
    scene: SurfaceScene,
    panel: ControlPanel,
    window_system: Option<WindowSystem>,
    render_system: Option<RenderSystem>,
}

impl App {
    fn new(config: AppConfig) -> Result<Self, SceneError> {
        let scene = SceneBuilder::from_config(&config).build()?;
        Ok(Self {
            config,
            scene,
            panel: ControlPanel::new(),
            window_system: None,
            render_system: None,
        })
    }

    fn refresh_title(&self) {
        if let Some(window_system) = &self.window_system {
            window_system.update_title(&self.panel.status(&self.scene.model));
        }
    }

    /// Log a fatal render error and stop the event loop
    fn halt(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        log::error!("{}", err);
        self.render_system = None;
        event_loop.exit();
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => {
                if let Some(window_system) = &self.window_system {
                    window_system.toggle_fullscreen();
                }
            }
            _ => match self.panel.apply(action, &mut self.scene.model) {
                Ok(Some(PanelEvent::Edited { path, value })) => {
                    log::info!("{} set to {}", path, value);
                    self.refresh_title();
                }
                Ok(_) => self.refresh_title(),
                Err(e) => log::warn!("Edit rejected: {}", e),
            },
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_system.is_some() {
            return;
        }

        let window_system = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window_system) => window_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        match RenderSystem::new(
            window_system.window().clone(),
            &self.scene.mesh,
            self.scene.parameters.clone(),
            &self.config,
        ) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        window_system.request_redraw();
        self.window_system = Some(window_system);
        self.refresh_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(physical_size);
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // The new physical size follows as a Resized event
                if let Some(render_system) = &mut self.render_system {
                    render_system.set_scale_factor(scale_factor);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(event_loop, action);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(render_system) = &mut self.render_system else {
                    return;
                };

                match render_system.render_frame() {
                    Ok(()) => {}
                    Err(RenderError::SurfaceLost) => log::warn!("Surface lost, reconfigured"),
                    Err(e) => {
                        self.halt(event_loop, e);
                        return;
                    }
                }

                // Request next frame
                if let Some(window_system) = &self.window_system {
                    window_system.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() {
    let loaded = AppConfig::load();

    // Initialize logging; RUST_LOG wins over the configured level
    let log_level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting Superform");

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    event_loop.run_app(&mut app).expect("Event loop error");
}
