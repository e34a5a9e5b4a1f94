//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SF_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use superform_core::{MorphCoefficients, RenderingState, ShapeParams, ShapeSnapshot};
use superform_math::{DomainCoordinates, TessellationOptions};
use superform_render::{OrbitCamera, RotationAxis};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Parameter domain tessellation
    #[serde(default)]
    pub tessellation: TessellationConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Initial parameters of shape A
    #[serde(default = "default_shape_a")]
    pub shape_a: ShapeParams,
    /// Initial parameters of shape B
    #[serde(default = "default_shape_b")]
    pub shape_b: ShapeParams,
    /// Initial morph coefficients
    #[serde(default)]
    pub morph: MorphCoefficients,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            tessellation: TessellationConfig::default(),
            rendering: RenderingConfig::default(),
            shape_a: default_shape_a(),
            shape_b: default_shape_b(),
            morph: MorphCoefficients::default(),
            debug: DebugConfig::default(),
        }
    }
}

fn default_shape_a() -> ShapeParams {
    ShapeParams::DEFAULT_A
}

fn default_shape_b() -> ShapeParams {
    ShapeParams::DEFAULT_B
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SF_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SF_TESSELLATION__SEGMENTS=64 -> tessellation.segments = 64
        figment = figment.merge(Env::prefixed("SF_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Initial model contents; the model clamps these on load
    pub fn initial_snapshot(&self) -> ShapeSnapshot {
        ShapeSnapshot {
            rendering: self.rendering.initial,
            shape_a: self.shape_a,
            shape_b: self.shape_b,
            morph: self.morph,
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Superform".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Eye distance from the model origin
    pub distance: f32,
    /// Axis the model spins about
    pub rotation_axis: RotationAxis,
    /// Radians added per frame while auto-rotating
    pub rotation_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            distance: 2.0,
            rotation_axis: RotationAxis::Vertical,
            rotation_step: 0.005,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> OrbitCamera {
        OrbitCamera::new()
            .with_projection(self.fov, self.near, self.far)
            .with_distance(self.distance)
            .with_axis(self.rotation_axis)
            .with_rotation_step(self.rotation_step)
    }
}

/// Tessellation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    /// Cells per side of the parameter grid
    pub segments: u32,
    /// Coordinates carried by vertex positions
    pub coordinates: DomainCoordinates,
    /// Generate a UV buffer
    pub uvs: bool,
    /// Replace the grid with an unindexed point cloud at this angular step (degrees)
    pub point_cloud_step: Option<u32>,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            segments: 256,
            coordinates: DomainCoordinates::Angles,
            uvs: false,
            point_cloud_step: None,
        }
    }
}

impl TessellationConfig {
    pub fn options(&self) -> TessellationOptions {
        TessellationOptions {
            coordinates: self.coordinates,
            with_uvs: self.uvs,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Starting rendering state (auto-rotate, draw mode, colors, sizes)
    #[serde(flatten)]
    pub initial: RenderingState,
    /// WGSL program to load instead of the built-in one
    pub shader_path: Option<PathBuf>,
    /// Cull back faces in triangle modes
    pub cull_back_faces: bool,
    /// Alpha of the clear color
    pub clear_alpha: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            initial: RenderingState::default(),
            shader_path: None,
            cull_back_faces: false,
            clear_alpha: 1.0,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level used when `RUST_LOG` is unset (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use superform_core::DrawMode;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.tessellation.segments, 256);
        assert_eq!(config.camera.rotation_step, 0.005);
        assert_eq!(config.rendering.initial.draw_mode, DrawMode::Points);
    }

    #[test]
    fn test_shape_defaults_differ() {
        let config = AppConfig::default();
        assert_eq!(config.shape_a, ShapeParams::DEFAULT_A);
        assert_eq!(config.shape_b, ShapeParams::DEFAULT_B);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("segments"));
        assert!(toml.contains("draw_mode = \"points\""));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [rendering]
            draw_mode = "triangle_fan"
            opacity = 0.25

            [shape_b]
            n1 = 4.0

            [morph]
            type = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.rendering.initial.draw_mode, DrawMode::TriangleFan);
        assert_eq!(config.rendering.initial.opacity, 0.25);
        assert!(config.rendering.initial.auto_rotate);
        assert_eq!(config.shape_b.n1, 4.0);
        assert_eq!(config.shape_b.m, 6.0);
        assert_eq!(config.morph.shape_type, 0.5);
        assert_eq!(config.tessellation.segments, 256);
    }

    #[test]
    fn test_camera_from_config() {
        let config = CameraConfig {
            distance: 3.5,
            rotation_axis: RotationAxis::Diagonal,
            ..CameraConfig::default()
        };
        let camera = config.to_camera();
        assert_eq!(camera.distance, 3.5);
        assert_eq!(camera.axis(), RotationAxis::Diagonal);
    }

    #[test]
    fn test_initial_snapshot() {
        let mut config = AppConfig::default();
        config.morph.shape = 0.4;
        let snapshot = config.initial_snapshot();
        assert_eq!(snapshot.morph.shape, 0.4);
        assert_eq!(snapshot.shape_b, ShapeParams::DEFAULT_B);
    }
}
