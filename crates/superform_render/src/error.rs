//! Render error types

use std::fmt;

/// Errors raised while starting or running the render pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// No compatible adapter, device or surface could be acquired
    InitializationFailure(String),
    /// The shader program failed to compile or link
    ShaderCompileFailure {
        /// Which stage failed (module label or "link")
        label: String,
        /// Compiler message followed by the line-numbered source
        diagnostic: String,
    },
    /// Surface was lost and could not be recovered
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// The device reported an uncaptured error while running
    DeviceLost(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InitializationFailure(msg) => {
                write!(f, "Rendering context unavailable: {}", msg)
            }
            RenderError::ShaderCompileFailure { label, diagnostic } => {
                write!(f, "Shader compile failure in '{}':\n{}", label, diagnostic)
            }
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::DeviceLost(msg) => write!(f, "Device error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl RenderError {
    /// Whether the frame loop must stop after this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RenderError::SurfaceLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_failure_display_keeps_diagnostic() {
        let err = RenderError::ShaderCompileFailure {
            label: "superformula".to_string(),
            diagnostic: "error: expected ';'\n12:\tlet x = 1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("superformula"));
        assert!(msg.contains("12:\tlet x = 1"));
    }

    #[test]
    fn test_initialization_failure_display() {
        let err = RenderError::InitializationFailure("no adapter".to_string());
        assert!(err.to_string().contains("no adapter"));
    }

    #[test]
    fn test_fatality() {
        assert!(!RenderError::SurfaceLost.is_fatal());
        assert!(RenderError::OutOfMemory.is_fatal());
        assert!(RenderError::DeviceLost("lost".to_string()).is_fatal());
    }
}
