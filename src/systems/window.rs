//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Show the control panel status in the title bar
    pub fn update_title(&self, status: &str) {
        self.window.set_title(&format_title(&self.base_title, status));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn format_title(base: &str, status: &str) -> String {
    format!("{} - {} [Up/Down select, Left/Right adjust]", base, status)
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_formatting() {
        // Can't test the actual window without an event loop
        let title = format_title("Superform", "A: n1: 5.00");
        assert!(title.starts_with("Superform - A: n1: 5.00"));
        assert!(title.contains("Left/Right"));
    }

    #[test]
    fn test_window_error_display() {
        let err = WindowError::CreationFailed("no display".to_string());
        assert_eq!(err.to_string(), "Window creation failed: no display");
    }
}
