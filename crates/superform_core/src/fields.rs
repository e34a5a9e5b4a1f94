//! Control field table
//!
//! Every editable field of the model is listed here with its declared bounds.
//! The model clamps against this table and the control panel walks it, so
//! the two can never disagree about ranges.

use std::fmt;

use crate::DrawMode;

/// Kind and bounds of an editable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Boolean switch
    Toggle,
    /// One of [`DrawMode::ALL`]
    Choice,
    /// RGB triple, each channel in `0..=255`
    Color,
    /// Real value in `[min, max]`; `step` is the panel increment
    Number { min: f32, max: f32, step: f32 },
    /// Integer-valued real in `[min, max]`
    Integer { min: f32, max: f32 },
}

impl FieldKind {
    /// Clamp a numeric input into this field's domain.
    ///
    /// Integer fields round after clamping. Colors clamp per channel via
    /// [`FieldKind::clamp_color`]; other kinds pass the value through.
    pub fn clamp(&self, value: f32) -> f32 {
        match *self {
            FieldKind::Number { min, max, .. } => value.clamp(min, max),
            FieldKind::Integer { min, max } => value.clamp(min, max).round(),
            FieldKind::Color => value.clamp(0.0, 255.0),
            FieldKind::Toggle | FieldKind::Choice => value,
        }
    }

    pub fn clamp_color(&self, rgb: [f32; 3]) -> [f32; 3] {
        rgb.map(|c| c.clamp(0.0, 255.0))
    }

    /// Increment used by stepping controls
    pub fn step(&self) -> f32 {
        match *self {
            FieldKind::Number { step, .. } => step,
            FieldKind::Integer { .. } => 1.0,
            FieldKind::Color => 15.0,
            FieldKind::Toggle | FieldKind::Choice => 1.0,
        }
    }

    /// Description used in type-mismatch errors
    pub(crate) fn expected(&self) -> &'static str {
        match self {
            FieldKind::Toggle => "a boolean",
            FieldKind::Choice => "a draw mode name",
            FieldKind::Color => "an RGB color",
            FieldKind::Number { .. } | FieldKind::Integer { .. } => "a number",
        }
    }
}

/// Declaration of one editable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Dotted path, e.g. `shape_a.n1`
    pub path: &'static str,
    /// Label shown by the control panel
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(path: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { path, label, kind }
    }

    /// Group the field belongs to (`rendering`, `shape_a`, `shape_b` or `morph`)
    pub fn group(&self) -> &'static str {
        self.path.split_once('.').map_or(self.path, |(group, _)| group)
    }
}

const EXPONENT: FieldKind = FieldKind::Number {
    min: 1.0,
    max: 50.0,
    step: 1.0,
};
const DIVISOR: FieldKind = FieldKind::Number {
    min: 0.1,
    max: 5.0,
    step: 0.05,
};
const SCALE: FieldKind = FieldKind::Number {
    min: 0.0,
    max: 2.0,
    step: 0.05,
};
const SYMMETRY: FieldKind = FieldKind::Integer { min: 1.0, max: 50.0 };
const BLEND: FieldKind = FieldKind::Number {
    min: 0.0,
    max: 1.0,
    step: 0.05,
};

/// All editable fields, in control-panel order
pub static FIELDS: &[FieldSpec] = &[
    FieldSpec::new("rendering.auto_rotate", "Auto-rotate", FieldKind::Toggle),
    FieldSpec::new("rendering.draw_mode", "Draw mode", FieldKind::Choice),
    FieldSpec::new("rendering.background", "Background", FieldKind::Color),
    FieldSpec::new("rendering.color", "Color", FieldKind::Color),
    FieldSpec::new(
        "rendering.opacity",
        "Opacity",
        FieldKind::Number { min: 0.0, max: 1.0, step: 0.05 },
    ),
    FieldSpec::new(
        "rendering.point_size",
        "Point size",
        FieldKind::Number { min: 0.0, max: 4.0, step: 0.25 },
    ),
    FieldSpec::new("shape_a.m", "A: m", SYMMETRY),
    FieldSpec::new("shape_a.n1", "A: n1", EXPONENT),
    FieldSpec::new("shape_a.n2", "A: n2", EXPONENT),
    FieldSpec::new("shape_a.n3", "A: n3", EXPONENT),
    FieldSpec::new("shape_a.a", "A: a", DIVISOR),
    FieldSpec::new("shape_a.b", "A: b", DIVISOR),
    FieldSpec::new("shape_a.scale", "A: Scale", SCALE),
    FieldSpec::new("shape_b.m", "B: m", SYMMETRY),
    FieldSpec::new("shape_b.n1", "B: n1", EXPONENT),
    FieldSpec::new("shape_b.n2", "B: n2", EXPONENT),
    FieldSpec::new("shape_b.n3", "B: n3", EXPONENT),
    FieldSpec::new("shape_b.a", "B: a", DIVISOR),
    FieldSpec::new("shape_b.b", "B: b", DIVISOR),
    FieldSpec::new("shape_b.scale", "B: Scale", SCALE),
    FieldSpec::new("morph.shape_a", "Shape A morph", BLEND),
    FieldSpec::new("morph.shape_b", "Shape B morph", BLEND),
    FieldSpec::new("morph.shape", "Shape morph", BLEND),
    FieldSpec::new("morph.type", "Type morph", BLEND),
];

/// Look up a field declaration by path
pub fn field(path: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.path == path)
}

/// A value read from or written to a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Number(f32),
    Color([f32; 3]),
    /// Draw mode by name or label
    Choice(String),
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Number(v)
    }
}

impl From<[f32; 3]> for FieldValue {
    fn from(v: [f32; 3]) -> Self {
        FieldValue::Color(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Choice(v.to_string())
    }
}

impl From<DrawMode> for FieldValue {
    fn from(mode: DrawMode) -> Self {
        FieldValue::Choice(mode.name().to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{}", if *v { "on" } else { "off" }),
            FieldValue::Number(v) => write!(f, "{:.2}", v),
            FieldValue::Color([r, g, b]) => write!(f, "rgb({:.0}, {:.0}, {:.0})", r, g, b),
            FieldValue::Choice(name) => match name.parse::<DrawMode>() {
                Ok(mode) => write!(f, "{}", mode.label()),
                Err(_) => write!(f, "{}", name),
            },
        }
    }
}
