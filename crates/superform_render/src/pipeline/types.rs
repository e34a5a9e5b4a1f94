//! GPU-compatible data types for the superformula program
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use std::mem::{offset_of, size_of};

use superform_math::mat4::{Mat4, IDENTITY};

/// Uniform block for the superformula program
/// Layout: 224 bytes total (must match superformula.wgsl Uniforms)
///
/// Per-shape values are packed as `[shape A, shape B]` pairs.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeUniforms {
    /// Projection matrix (64 bytes)
    pub projection_matrix: Mat4,
    /// Model-view matrix (64 bytes)
    pub model_view_matrix: Mat4,
    /// Surface color, RGBA (16 bytes)
    pub color: [f32; 4],
    /// Superformula parameter pairs (7 × 8 bytes)
    pub m: [f32; 2],
    pub n1: [f32; 2],
    pub n2: [f32; 2],
    pub n3: [f32; 2],
    pub a: [f32; 2],
    pub b: [f32; 2],
    pub scale: [f32; 2],
    /// Scalars (24 bytes)
    pub point_size: f32,
    pub shape_a_morph: f32,
    pub shape_b_morph: f32,
    pub shape_morph: f32,
    pub type_morph: f32,
    /// Multiplier taking vertex positions to radians
    pub domain_scale: f32,
}

impl Default for ShapeUniforms {
    fn default() -> Self {
        Self {
            projection_matrix: IDENTITY,
            model_view_matrix: IDENTITY,
            color: [1.0, 1.0, 1.0, 0.5],
            m: [3.0, 6.0],
            n1: [5.0, 1.0],
            n2: [18.0, 1.0],
            n3: [18.0, 6.0],
            a: [1.0, 1.0],
            b: [1.0, 1.0],
            scale: [1.0, 1.0],
            point_size: 0.75,
            shape_a_morph: 0.0,
            shape_b_morph: 0.0,
            shape_morph: 0.0,
            type_morph: 0.0,
            domain_scale: 1.0,
        }
    }
}

/// Named uniform slots exposed to the GPU program
///
/// Each slot maps a program-side name to a byte range inside
/// [`ShapeUniforms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    ProjectionMatrix,
    ModelViewMatrix,
    Color,
    M,
    N1,
    N2,
    N3,
    A,
    B,
    Scale,
    PointSize,
    ShapeAMorph,
    ShapeBMorph,
    ShapeMorph,
    TypeMorph,
    DomainScale,
}

impl UniformSlot {
    pub const ALL: [UniformSlot; 16] = [
        UniformSlot::ProjectionMatrix,
        UniformSlot::ModelViewMatrix,
        UniformSlot::Color,
        UniformSlot::M,
        UniformSlot::N1,
        UniformSlot::N2,
        UniformSlot::N3,
        UniformSlot::A,
        UniformSlot::B,
        UniformSlot::Scale,
        UniformSlot::PointSize,
        UniformSlot::ShapeAMorph,
        UniformSlot::ShapeBMorph,
        UniformSlot::ShapeMorph,
        UniformSlot::TypeMorph,
        UniformSlot::DomainScale,
    ];

    /// Program-side uniform name
    pub fn name(self) -> &'static str {
        match self {
            UniformSlot::ProjectionMatrix => "projectionMatrix",
            UniformSlot::ModelViewMatrix => "modelViewMatrix",
            UniformSlot::Color => "color",
            UniformSlot::M => "m",
            UniformSlot::N1 => "n1",
            UniformSlot::N2 => "n2",
            UniformSlot::N3 => "n3",
            UniformSlot::A => "a",
            UniformSlot::B => "b",
            UniformSlot::Scale => "scale",
            UniformSlot::PointSize => "pointSize",
            UniformSlot::ShapeAMorph => "shapeAMorph",
            UniformSlot::ShapeBMorph => "shapeBMorph",
            UniformSlot::ShapeMorph => "shapeMorph",
            UniformSlot::TypeMorph => "typeMorph",
            UniformSlot::DomainScale => "domainScale",
        }
    }

    /// Member name in the WGSL `Uniforms` struct (`shapeAMorph` -> `shape_a_morph`)
    pub fn member(self) -> String {
        let mut member = String::new();
        for c in self.name().chars() {
            if c.is_ascii_uppercase() {
                member.push('_');
                member.push(c.to_ascii_lowercase());
            } else {
                member.push(c);
            }
        }
        member
    }

    pub fn from_name(name: &str) -> Option<UniformSlot> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    /// Byte offset inside [`ShapeUniforms`]
    pub fn offset(self) -> usize {
        match self {
            UniformSlot::ProjectionMatrix => offset_of!(ShapeUniforms, projection_matrix),
            UniformSlot::ModelViewMatrix => offset_of!(ShapeUniforms, model_view_matrix),
            UniformSlot::Color => offset_of!(ShapeUniforms, color),
            UniformSlot::M => offset_of!(ShapeUniforms, m),
            UniformSlot::N1 => offset_of!(ShapeUniforms, n1),
            UniformSlot::N2 => offset_of!(ShapeUniforms, n2),
            UniformSlot::N3 => offset_of!(ShapeUniforms, n3),
            UniformSlot::A => offset_of!(ShapeUniforms, a),
            UniformSlot::B => offset_of!(ShapeUniforms, b),
            UniformSlot::Scale => offset_of!(ShapeUniforms, scale),
            UniformSlot::PointSize => offset_of!(ShapeUniforms, point_size),
            UniformSlot::ShapeAMorph => offset_of!(ShapeUniforms, shape_a_morph),
            UniformSlot::ShapeBMorph => offset_of!(ShapeUniforms, shape_b_morph),
            UniformSlot::ShapeMorph => offset_of!(ShapeUniforms, shape_morph),
            UniformSlot::TypeMorph => offset_of!(ShapeUniforms, type_morph),
            UniformSlot::DomainScale => offset_of!(ShapeUniforms, domain_scale),
        }
    }

    /// Number of f32 components
    pub fn components(self) -> usize {
        match self {
            UniformSlot::ProjectionMatrix | UniformSlot::ModelViewMatrix => 16,
            UniformSlot::Color => 4,
            UniformSlot::M
            | UniformSlot::N1
            | UniformSlot::N2
            | UniformSlot::N3
            | UniformSlot::A
            | UniformSlot::B
            | UniformSlot::Scale => 2,
            _ => 1,
        }
    }

    /// Size in bytes
    pub fn size(self) -> usize {
        self.components() * size_of::<f32>()
    }
}

impl ShapeUniforms {
    /// Read a slot's components
    pub fn slot(&self, slot: UniformSlot) -> &[f32] {
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(self));
        let start = slot.offset() / size_of::<f32>();
        &floats[start..start + slot.components()]
    }

    /// Overwrite a slot. `values` must hold exactly the slot's component count.
    pub fn set_slot(&mut self, slot: UniformSlot, values: &[f32]) -> bool {
        if values.len() != slot.components() {
            return false;
        }
        let floats: &mut [f32] = bytemuck::cast_slice_mut(bytemuck::bytes_of_mut(self));
        let start = slot.offset() / size_of::<f32>();
        floats[start..start + values.len()].copy_from_slice(values);
        true
    }
}
