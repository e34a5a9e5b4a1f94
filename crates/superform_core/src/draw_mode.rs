//! Primitive topologies selectable from the control panel

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// How the index (or vertex) stream is assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    #[default]
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    /// Every mode, in control-panel order
    pub const ALL: [DrawMode; 7] = [
        DrawMode::Points,
        DrawMode::Lines,
        DrawMode::LineLoop,
        DrawMode::LineStrip,
        DrawMode::Triangles,
        DrawMode::TriangleStrip,
        DrawMode::TriangleFan,
    ];

    /// Machine name used in config files and `set` paths
    pub fn name(self) -> &'static str {
        match self {
            DrawMode::Points => "points",
            DrawMode::Lines => "lines",
            DrawMode::LineLoop => "line_loop",
            DrawMode::LineStrip => "line_strip",
            DrawMode::Triangles => "triangles",
            DrawMode::TriangleStrip => "triangle_strip",
            DrawMode::TriangleFan => "triangle_fan",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            DrawMode::Points => "Points",
            DrawMode::Lines => "Lines",
            DrawMode::LineLoop => "Line loop",
            DrawMode::LineStrip => "Line strip",
            DrawMode::Triangles => "Triangles",
            DrawMode::TriangleStrip => "Triangle strip",
            DrawMode::TriangleFan => "Triangle fan",
        }
    }

    /// Next mode, wrapping around (`step` may be negative)
    pub fn cycle(self, step: i32) -> DrawMode {
        let len = Self::ALL.len() as i32;
        let current = Self::ALL.iter().position(|&m| m == self).unwrap_or(0) as i32;
        Self::ALL[(current + step).rem_euclid(len) as usize]
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DrawMode {
    type Err = ModelError;

    /// Accepts machine names and labels, case-insensitively, with `_`, `-`
    /// or space as separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        DrawMode::ALL
            .into_iter()
            .find(|mode| mode.name() == normalized)
            .ok_or_else(|| ModelError::UnknownDrawMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_labels() {
        assert_eq!("line_loop".parse::<DrawMode>().unwrap(), DrawMode::LineLoop);
        assert_eq!("Triangle fan".parse::<DrawMode>().unwrap(), DrawMode::TriangleFan);
        assert_eq!("TRIANGLE-STRIP".parse::<DrawMode>().unwrap(), DrawMode::TriangleStrip);
    }

    #[test]
    fn test_parse_unknown_mode() {
        let err = "quads".parse::<DrawMode>().unwrap_err();
        assert_eq!(err, ModelError::UnknownDrawMode("quads".to_string()));
    }

    #[test]
    fn test_names_round_trip() {
        for mode in DrawMode::ALL {
            assert_eq!(mode.name().parse::<DrawMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(DrawMode::TriangleFan.cycle(1), DrawMode::Points);
        assert_eq!(DrawMode::Points.cycle(-1), DrawMode::TriangleFan);
        assert_eq!(DrawMode::Lines.cycle(2), DrawMode::LineStrip);
    }
}
