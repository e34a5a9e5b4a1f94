//! Tessellation of the spherical parameter domain
//!
//! The superformula surface is evaluated on the GPU over a 2D angular domain.
//! This module turns that domain into a static vertex/index mesh:
//!
//! - A `(segments + 1)²` vertex grid covering `[0, 2π] × [0, 2π]`. The last
//!   row and column repeat the seam at `2π` so the wrap boundary closes.
//! - Two triangles per cell, `6 · segments²` indices in total.
//! - Optional UVs `(1 - x/segments, 1 - y/segments)`.
//!
//! Cell `(x, y)` has corners
//! `v1 = y·(segments+1) + x`, `v2 = v1 + segments + 1`, `v3 = v1 + 1`, `v4 = v2 + 1`,
//! emitted as triangles `(v1, v2, v3)` and `(v2, v4, v3)`. Measured in the
//! (φ, θ) plane with θ growing downward (image orientation, the same way
//! the V texture axis runs), every triangle is counter-clockwise.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;

/// Largest accepted grid resolution.
///
/// A triangle fan over the full index stream expands to about
/// `72 · segments²` bytes of `u32` indices; at this resolution that still
/// fits [`MAX_BUFFER_BYTES`].
pub const MAX_SEGMENTS: u32 = 1920;

/// Buffer size every device is guaranteed to support (256 MiB)
pub const MAX_BUFFER_BYTES: u64 = 256 << 20;

/// Index count of a grid with `segments` cells per side
#[inline]
pub fn grid_index_count(segments: u32) -> u64 {
    6 * segments as u64 * segments as u64
}

/// Which coordinates the vertex `position` attribute carries.
///
/// The vertex program must agree with this choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainCoordinates {
    /// Raw grid indices `(x, y)`; the GPU scales them into angles
    Grid,
    /// Pre-mapped angles `(φ, θ)` in radians
    #[default]
    Angles,
}

/// Tessellation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TessellationOptions {
    /// Coordinate convention for vertex positions
    pub coordinates: DomainCoordinates,
    /// Also produce a UV buffer
    pub with_uvs: bool,
}

/// A single vertex of the parameter domain
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DomainVertex {
    /// `(φ, θ)` in radians, or `(x, y)` grid indices
    pub position: [f32; 2],
}

impl DomainVertex {
    #[inline]
    pub fn new(a: f32, b: f32) -> Self {
        Self { position: [a, b] }
    }
}

/// Tessellated parameter domain - immutable once built
#[derive(Debug, Clone)]
pub struct DomainMesh {
    vertices: Vec<DomainVertex>,
    indices: Vec<u32>,
    uvs: Option<Vec<[f32; 2]>>,
    coordinates: DomainCoordinates,
    /// Multiplier taking a vertex position to radians
    domain_scale: f32,
}

impl DomainMesh {
    /// Vertex buffer contents
    #[inline]
    pub fn vertices(&self) -> &[DomainVertex] {
        &self.vertices
    }

    /// Triangle-list index buffer contents (empty for point clouds)
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// UV buffer contents, when requested
    #[inline]
    pub fn uvs(&self) -> Option<&[[f32; 2]]> {
        self.uvs.as_deref()
    }

    #[inline]
    pub fn coordinates(&self) -> DomainCoordinates {
        self.coordinates
    }

    /// Factor the vertex program multiplies positions by to obtain radians.
    ///
    /// `2π / segments` for grid coordinates, `1.0` for pre-mapped angles.
    #[inline]
    pub fn domain_scale(&self) -> f32 {
        self.domain_scale
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh carries an index buffer
    #[inline]
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Vertex position expressed in radians regardless of the coordinate convention
    pub fn angles_of(&self, index: u32) -> Option<[f32; 2]> {
        self.vertices.get(index as usize).map(|v| {
            [v.position[0] * self.domain_scale, v.position[1] * self.domain_scale]
        })
    }
}

/// Tessellation error types
#[derive(Debug, Clone, PartialEq)]
pub enum TessellationError {
    /// Resolution outside the accepted range
    InvalidArgument(String),
}

impl fmt::Display for TessellationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TessellationError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for TessellationError {}

/// Tessellate the `[0, 2π] × [0, 2π]` domain into an indexed grid.
///
/// # Errors
/// `InvalidArgument` when `segments` is zero or above [`MAX_SEGMENTS`].
pub fn tessellate(
    segments: u32,
    options: TessellationOptions,
) -> Result<DomainMesh, TessellationError> {
    if segments == 0 || segments > MAX_SEGMENTS {
        return Err(TessellationError::InvalidArgument(format!(
            "segments must be in 1..={}, got {}",
            MAX_SEGMENTS, segments
        )));
    }

    let side = segments + 1;
    let n = segments as f32;
    let step = TAU / n;

    let mut vertices = Vec::with_capacity((side * side) as usize);
    let mut uvs = options
        .with_uvs
        .then(|| Vec::with_capacity((side * side) as usize));

    for y in 0..side {
        for x in 0..side {
            let vertex = match options.coordinates {
                DomainCoordinates::Grid => DomainVertex::new(x as f32, y as f32),
                DomainCoordinates::Angles => DomainVertex::new(x as f32 * step, y as f32 * step),
            };
            vertices.push(vertex);

            if let Some(uvs) = uvs.as_mut() {
                uvs.push([1.0 - x as f32 / n, 1.0 - y as f32 / n]);
            }
        }
    }

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for y in 0..segments {
        for x in 0..segments {
            let v1 = y * side + x;
            let v2 = v1 + side;
            let v3 = v1 + 1;
            let v4 = v2 + 1;
            indices.extend_from_slice(&[v1, v2, v3, v2, v4, v3]);
        }
    }

    let domain_scale = match options.coordinates {
        DomainCoordinates::Grid => step,
        DomainCoordinates::Angles => 1.0,
    };

    Ok(DomainMesh {
        vertices,
        indices,
        uvs,
        coordinates: options.coordinates,
        domain_scale,
    })
}

/// Sample the domain as an unindexed point cloud at a fixed angular step.
///
/// Angles run over `[0°, 360°)` with no closing seam. Outer loop is θ, inner
/// is φ; vertices are stored as `(φ, θ)` in radians.
///
/// # Errors
/// `InvalidArgument` when `step_degrees` is not in `1..=360`.
pub fn point_cloud(step_degrees: u32) -> Result<DomainMesh, TessellationError> {
    if step_degrees == 0 || step_degrees > 360 {
        return Err(TessellationError::InvalidArgument(format!(
            "angular step must be in 1..=360 degrees, got {}",
            step_degrees
        )));
    }

    let samples = (0..360).step_by(step_degrees as usize);
    let per_axis = samples.len();
    let mut vertices = Vec::with_capacity(per_axis * per_axis);

    for i in (0..360u32).step_by(step_degrees as usize) {
        let theta = (i as f32).to_radians();
        for j in (0..360u32).step_by(step_degrees as usize) {
            let phi = (j as f32).to_radians();
            vertices.push(DomainVertex::new(phi, theta));
        }
    }

    Ok(DomainMesh {
        vertices,
        indices: Vec::new(),
        uvs: None,
        coordinates: DomainCoordinates::Angles,
        domain_scale: 1.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_zero_segments_rejected() {
        let err = tessellate(0, TessellationOptions::default()).unwrap_err();
        assert!(matches!(err, TessellationError::InvalidArgument(_)));
        assert!(err.to_string().contains("segments"));
    }

    #[test]
    fn test_oversized_segments_rejected() {
        assert!(tessellate(MAX_SEGMENTS + 1, TessellationOptions::default()).is_err());
    }

    #[test]
    fn test_grid_index_count_matches_mesh() {
        for segments in [1, 3, 16] {
            let mesh = tessellate(segments, TessellationOptions::default()).unwrap();
            assert_eq!(mesh.indices().len() as u64, grid_index_count(segments));
        }
    }

    #[test]
    fn test_largest_grid_fits_buffer_limit() {
        let index_bytes = grid_index_count(MAX_SEGMENTS) * 4;
        assert!(index_bytes <= MAX_BUFFER_BYTES);
        // Fan expansion of the same stream
        assert!((index_bytes / 4 - 2) * 3 * 4 <= MAX_BUFFER_BYTES);
    }

    #[test]
    fn test_single_cell() {
        let mesh = tessellate(1, TessellationOptions::default()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 2, 1, 2, 3, 1]);
    }

    #[test]
    fn test_angles_cover_closed_domain() {
        let mesh = tessellate(4, TessellationOptions::default()).unwrap();
        let first = mesh.vertices()[0].position;
        let last = mesh.vertices()[mesh.vertex_count() - 1].position;
        assert_eq!(first, [0.0, 0.0]);
        assert!(approx_eq(last[0], TAU) && approx_eq(last[1], TAU));
    }

    #[test]
    fn test_grid_coordinates_scale_to_angles() {
        let options = TessellationOptions {
            coordinates: DomainCoordinates::Grid,
            with_uvs: false,
        };
        let mesh = tessellate(8, options).unwrap();
        assert_eq!(mesh.vertices()[10].position, [1.0, 1.0]);
        assert!(approx_eq(mesh.domain_scale(), TAU / 8.0));

        let angles = mesh.angles_of(10).unwrap();
        assert!(approx_eq(angles[0], TAU / 8.0));
    }

    #[test]
    fn test_uvs_only_when_requested() {
        let plain = tessellate(3, TessellationOptions::default()).unwrap();
        assert!(plain.uvs().is_none());

        let options = TessellationOptions {
            with_uvs: true,
            ..Default::default()
        };
        let textured = tessellate(2, options).unwrap();
        let uvs = textured.uvs().unwrap();
        assert_eq!(uvs.len(), 9);
        assert_eq!(uvs[0], [1.0, 1.0]);
        assert_eq!(uvs[8], [0.0, 0.0]);
        assert_eq!(uvs[1], [0.5, 1.0]);
    }

    #[test]
    fn test_point_cloud_matches_step() {
        let cloud = point_cloud(90).unwrap();
        assert_eq!(cloud.vertex_count(), 16);
        assert!(!cloud.is_indexed());
        // Second vertex advances φ, keeps θ
        let v = cloud.vertices()[1].position;
        assert!(approx_eq(v[0], std::f32::consts::FRAC_PI_2));
        assert_eq!(v[1], 0.0);
    }

    #[test]
    fn test_point_cloud_uneven_step() {
        // 0, 7, ..., 357 -> 52 samples per axis
        let cloud = point_cloud(7).unwrap();
        assert_eq!(cloud.vertex_count(), 52 * 52);
    }

    #[test]
    fn test_point_cloud_invalid_step() {
        assert!(point_cloud(0).is_err());
        assert!(point_cloud(361).is_err());
    }
}
