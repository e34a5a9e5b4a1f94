//! Parameter sets, morph coefficients and rendering state
//!
//! These are plain data. Validation and clamping live in the model and the
//! field table; a snapshot handed to the renderer is always in range.

use serde::{Deserialize, Serialize};

use crate::{DrawMode, FieldValue};

/// One superformula parameter set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    /// Rotational symmetry
    pub m: f32,
    /// Overall exponent
    pub n1: f32,
    /// Cosine term exponent
    pub n2: f32,
    /// Sine term exponent
    pub n3: f32,
    /// Cosine term divisor
    pub a: f32,
    /// Sine term divisor
    pub b: f32,
    /// Radius multiplier
    pub scale: f32,
}

impl ShapeParams {
    /// Starting parameters of shape A
    pub const DEFAULT_A: ShapeParams = ShapeParams {
        m: 3.0,
        n1: 5.0,
        n2: 18.0,
        n3: 18.0,
        a: 1.0,
        b: 1.0,
        scale: 1.0,
    };

    /// Starting parameters of shape B
    pub const DEFAULT_B: ShapeParams = ShapeParams {
        m: 6.0,
        n1: 1.0,
        n2: 1.0,
        n3: 6.0,
        a: 1.0,
        b: 1.0,
        scale: 1.0,
    };

    fn field_mut(&mut self, name: &str) -> Option<&mut f32> {
        match name {
            "m" => Some(&mut self.m),
            "n1" => Some(&mut self.n1),
            "n2" => Some(&mut self.n2),
            "n3" => Some(&mut self.n3),
            "a" => Some(&mut self.a),
            "b" => Some(&mut self.b),
            "scale" => Some(&mut self.scale),
            _ => None,
        }
    }
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self::DEFAULT_A
    }
}

/// Blend factors consumed by the vertex program, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphCoefficients {
    /// Shape A toward the unit sphere
    pub shape_a: f32,
    /// Shape B toward the unit sphere
    pub shape_b: f32,
    /// Swap which set drives longitude and latitude
    pub shape: f32,
    /// Spherical product toward toroidal product
    #[serde(rename = "type")]
    pub shape_type: f32,
}

/// Global rendering settings edited from the control panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingState {
    pub auto_rotate: bool,
    pub draw_mode: DrawMode,
    /// Clear color, RGB in `0..=255`
    pub background: [f32; 3],
    /// Surface color, RGB in `0..=255`
    pub color: [f32; 3],
    pub opacity: f32,
    pub point_size: f32,
}

impl Default for RenderingState {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            draw_mode: DrawMode::Points,
            background: [0.0, 0.0, 0.0],
            color: [255.0, 255.0, 255.0],
            opacity: 0.5,
            point_size: 0.75,
        }
    }
}

impl RenderingState {
    /// Surface color as normalized RGBA, opacity in alpha
    pub fn color_rgba(&self) -> [f32; 4] {
        [
            self.color[0] / 255.0,
            self.color[1] / 255.0,
            self.color[2] / 255.0,
            self.opacity,
        ]
    }

    /// Background as normalized RGB
    pub fn background_rgb(&self) -> [f32; 3] {
        [
            self.background[0] / 255.0,
            self.background[1] / 255.0,
            self.background[2] / 255.0,
        ]
    }
}

/// Everything the renderer reads from the model in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSnapshot {
    pub rendering: RenderingState,
    pub shape_a: ShapeParams,
    pub shape_b: ShapeParams,
    pub morph: MorphCoefficients,
}

impl Default for ShapeSnapshot {
    fn default() -> Self {
        Self {
            rendering: RenderingState::default(),
            shape_a: ShapeParams::DEFAULT_A,
            shape_b: ShapeParams::DEFAULT_B,
            morph: MorphCoefficients::default(),
        }
    }
}

/// Mutable handle to one addressable field of a snapshot
pub(crate) enum FieldSlot<'a> {
    Bool(&'a mut bool),
    Number(&'a mut f32),
    Color(&'a mut [f32; 3]),
    Mode(&'a mut DrawMode),
}

impl FieldSlot<'_> {
    pub(crate) fn value(&self) -> FieldValue {
        match self {
            FieldSlot::Bool(v) => FieldValue::Bool(**v),
            FieldSlot::Number(v) => FieldValue::Number(**v),
            FieldSlot::Color(v) => FieldValue::Color(**v),
            FieldSlot::Mode(v) => FieldValue::Choice(v.name().to_string()),
        }
    }
}

impl ShapeSnapshot {
    /// Resolve a dotted path such as `shape_b.n3` to its storage
    pub(crate) fn slot(&mut self, path: &str) -> Option<FieldSlot<'_>> {
        let (group, name) = path.split_once('.')?;
        match (group, name) {
            ("rendering", "auto_rotate") => Some(FieldSlot::Bool(&mut self.rendering.auto_rotate)),
            ("rendering", "draw_mode") => Some(FieldSlot::Mode(&mut self.rendering.draw_mode)),
            ("rendering", "background") => Some(FieldSlot::Color(&mut self.rendering.background)),
            ("rendering", "color") => Some(FieldSlot::Color(&mut self.rendering.color)),
            ("rendering", "opacity") => Some(FieldSlot::Number(&mut self.rendering.opacity)),
            ("rendering", "point_size") => Some(FieldSlot::Number(&mut self.rendering.point_size)),
            ("shape_a", name) => self.shape_a.field_mut(name).map(FieldSlot::Number),
            ("shape_b", name) => self.shape_b.field_mut(name).map(FieldSlot::Number),
            ("morph", "shape_a") => Some(FieldSlot::Number(&mut self.morph.shape_a)),
            ("morph", "shape_b") => Some(FieldSlot::Number(&mut self.morph.shape_b)),
            ("morph", "shape") => Some(FieldSlot::Number(&mut self.morph.shape)),
            ("morph", "type") => Some(FieldSlot::Number(&mut self.morph.shape_type)),
            _ => None,
        }
    }

    /// Read a field by dotted path
    pub fn get(&self, path: &str) -> Option<FieldValue> {
        let mut copy = *self;
        copy.slot(path).map(|slot| slot.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shapes_differ() {
        let snapshot = ShapeSnapshot::default();
        assert_eq!(snapshot.shape_a.m, 3.0);
        assert_eq!(snapshot.shape_b.m, 6.0);
        assert_eq!(snapshot.shape_b.n3, 6.0);
    }

    #[test]
    fn test_color_rgba_normalizes() {
        let state = RenderingState {
            color: [255.0, 0.0, 51.0],
            opacity: 0.25,
            ..Default::default()
        };
        let rgba = state.color_rgba();
        assert_eq!(rgba[0], 1.0);
        assert_eq!(rgba[1], 0.0);
        assert!((rgba[2] - 0.2).abs() < 1e-6);
        assert_eq!(rgba[3], 0.25);
    }

    #[test]
    fn test_get_by_path() {
        let snapshot = ShapeSnapshot::default();
        assert_eq!(snapshot.get("shape_a.n1"), Some(FieldValue::Number(5.0)));
        assert_eq!(snapshot.get("rendering.auto_rotate"), Some(FieldValue::Bool(true)));
        assert_eq!(
            snapshot.get("rendering.draw_mode"),
            Some(FieldValue::Choice("points".to_string()))
        );
        assert_eq!(snapshot.get("morph.type"), Some(FieldValue::Number(0.0)));
    }

    #[test]
    fn test_unknown_paths() {
        let snapshot = ShapeSnapshot::default();
        assert!(snapshot.get("shape_a.q").is_none());
        assert!(snapshot.get("rendering").is_none());
        assert!(snapshot.get("camera.fov").is_none());
    }
}
