//! Orbit camera with auto-rotation
//!
//! The camera sits at a fixed distance from the surface and spins the
//! model about a fixed axis. Matrices are rebuilt from scratch every frame.
//!
//! Rotation advances by a constant step per frame, so spin speed follows
//! the display refresh rate rather than wall-clock time.

use serde::{Deserialize, Serialize};
use superform_math::mat4::{self, Mat4};

/// Axis the model spins about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationAxis {
    /// +Y
    #[default]
    Vertical,
    /// (1, 1, 1)
    Diagonal,
}

impl RotationAxis {
    pub fn vector(self) -> [f32; 3] {
        match self {
            RotationAxis::Vertical => [0.0, 1.0, 0.0],
            RotationAxis::Diagonal => [1.0, 1.0, 1.0],
        }
    }
}

/// Default spin per frame in radians
pub const DEFAULT_ROTATION_STEP: f32 = 0.005;

/// Camera state owned by the frame loop
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Accumulated spin; f64 so long sessions keep per-frame precision
    rotation_angle: f64,
    rotation_step: f32,
    axis: RotationAxis,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from eye to the model origin along -Z
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            rotation_angle: 0.0,
            rotation_step: DEFAULT_ROTATION_STEP,
            axis: RotationAxis::Vertical,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            distance: 2.0,
        }
    }

    pub fn with_axis(mut self, axis: RotationAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Negative steps are treated as zero so the angle never decreases
    pub fn with_rotation_step(mut self, step: f32) -> Self {
        self.rotation_step = step.max(0.0);
        self
    }

    pub fn with_projection(mut self, fov: f32, near: f32, far: f32) -> Self {
        self.fov = fov;
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    #[inline]
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle as f32
    }

    #[inline]
    pub fn rotation_step(&self) -> f32 {
        self.rotation_step
    }

    #[inline]
    pub fn axis(&self) -> RotationAxis {
        self.axis
    }

    /// Advance one frame. The angle only moves while `auto_rotate` is set.
    pub fn advance(&mut self, auto_rotate: bool) {
        if auto_rotate {
            self.rotation_angle += self.rotation_step as f64;
        }
    }

    /// Perspective projection for the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        mat4::perspective(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// identity → translate (0, 0, -distance) → rotate about the axis
    pub fn model_view_matrix(&self) -> Mat4 {
        let m = mat4::translate(mat4::IDENTITY, [0.0, 0.0, -self.distance]);
        mat4::rotate(m, self.rotation_angle(), self.axis.vector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let cam = OrbitCamera::new();
        assert_eq!(cam.rotation_angle(), 0.0);
        assert_eq!(cam.rotation_step(), 0.005);
        assert_eq!(cam.fov, 45.0);
        assert_eq!(cam.distance, 2.0);
    }

    #[test]
    fn test_advance_respects_auto_rotate() {
        let mut cam = OrbitCamera::new();
        cam.advance(false);
        assert_eq!(cam.rotation_angle(), 0.0);
        cam.advance(true);
        assert_eq!(cam.rotation_angle(), 0.005);
    }

    #[test]
    fn test_negative_step_is_clamped() {
        let mut cam = OrbitCamera::new().with_rotation_step(-1.0);
        cam.advance(true);
        assert_eq!(cam.rotation_angle(), 0.0);
    }

    #[test]
    fn test_model_view_places_origin_in_front() {
        let cam = OrbitCamera::new().with_axis(RotationAxis::Diagonal);
        let origin = mat4::transform_point(cam.model_view_matrix(), [0.0, 0.0, 0.0]);
        assert_eq!(origin, [0.0, 0.0, -2.0, 1.0]);
    }
}
