//! 4x4 matrix utilities for the camera transforms
//!
//! Matrices are column-major (`m[column][row]`), matching the WGSL
//! `mat4x4<f32>` layout so they can be uploaded without transposing.

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Right-handed perspective projection mapping depth to wgpu's `[0, 1]` range.
///
/// # Arguments
/// * `fov_y` - Vertical field of view in radians
/// * `aspect` - Viewport width divided by height
/// * `near`, `far` - Clip plane distances (both positive)
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, far * near * nf, 0.0],
    ]
}

/// Post-multiply `m` by a translation: `m * T(v)`
pub fn translate(m: Mat4, v: [f32; 3]) -> Mat4 {
    let mut out = m;
    for row in 0..4 {
        out[3][row] = m[0][row] * v[0] + m[1][row] * v[1] + m[2][row] * v[2] + m[3][row];
    }
    out
}

/// Rotation matrix of `angle` radians about `axis` (normalized internally).
///
/// A zero-length axis yields the identity.
pub fn axis_rotation(angle: f32, axis: [f32; 3]) -> Mat4 {
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if len <= f32::EPSILON {
        return IDENTITY;
    }
    let (x, y, z) = (axis[0] / len, axis[1] / len, axis[2] / len);
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    [
        [x * x * t + c, y * x * t + z * s, z * x * t - y * s, 0.0],
        [x * y * t - z * s, y * y * t + c, z * y * t + x * s, 0.0],
        [x * z * t + y * s, y * z * t - x * s, z * z * t + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Post-multiply `m` by a rotation: `m * R(angle, axis)`
pub fn rotate(m: Mat4, angle: f32, axis: [f32; 3]) -> Mat4 {
    mul(m, axis_rotation(angle, axis))
}

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a point (w = 1) by a matrix, returning homogeneous coordinates
pub fn transform_point(m: Mat4, p: [f32; 3]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn mat_approx_eq(a: Mat4, b: Mat4) -> bool {
        (0..4).all(|i| (0..4).all(|j| approx_eq(a[i][j], b[i][j])))
    }

    #[test]
    fn test_translate_moves_origin() {
        let m = translate(IDENTITY, [0.0, 0.0, -2.0]);
        let p = transform_point(m, [0.0, 0.0, 0.0]);
        assert!(approx_eq(p[2], -2.0));
        assert!(approx_eq(p[3], 1.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // X goes to -Z under a right-handed quarter turn about +Y
        let m = rotate(IDENTITY, FRAC_PI_2, [0.0, 1.0, 0.0]);
        let p = transform_point(m, [1.0, 0.0, 0.0]);
        assert!(approx_eq(p[0], 0.0) && approx_eq(p[2], -1.0), "got {:?}", p);
    }

    #[test]
    fn test_rotate_axis_is_normalized() {
        let a = axis_rotation(0.7, [1.0, 1.0, 1.0]);
        let b = axis_rotation(0.7, [3.0, 3.0, 3.0]);
        assert!(mat_approx_eq(a, b));
    }

    #[test]
    fn test_rotation_about_diagonal_cycles_axes() {
        // A third of a turn about (1,1,1) permutes X -> Y -> Z
        let m = axis_rotation(2.0 * std::f32::consts::PI / 3.0, [1.0, 1.0, 1.0]);
        let p = transform_point(m, [1.0, 0.0, 0.0]);
        assert!(approx_eq(p[1], 1.0), "got {:?}", p);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        assert!(mat_approx_eq(axis_rotation(1.0, [0.0, 0.0, 0.0]), IDENTITY));
    }

    #[test]
    fn test_translate_then_rotate_keeps_translation() {
        let m = rotate(translate(IDENTITY, [0.0, 0.0, -2.0]), 1.3, [0.0, 1.0, 0.0]);
        let origin = transform_point(m, [0.0, 0.0, 0.0]);
        assert!(approx_eq(origin[0], 0.0));
        assert!(approx_eq(origin[2], -2.0));
    }

    #[test]
    fn test_perspective_depth_range() {
        let proj = perspective(45f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);

        let near = transform_point(proj, [0.0, 0.0, -0.1]);
        assert!(approx_eq(near[2] / near[3], 0.0));

        let far = transform_point(proj, [0.0, 0.0, -100.0]);
        assert!(approx_eq(far[2] / far[3], 1.0));
    }

    #[test]
    fn test_perspective_aspect() {
        let proj = perspective(45f32.to_radians(), 2.0, 0.1, 100.0);
        assert!(approx_eq(proj[1][1] / proj[0][0], 2.0));
    }

    #[test]
    fn test_mul_identity() {
        let a = axis_rotation(0.5, [0.0, 1.0, 0.0]);
        assert!(mat_approx_eq(mul(IDENTITY, a), a));
        assert!(mat_approx_eq(mul(a, IDENTITY), a));
    }
}
