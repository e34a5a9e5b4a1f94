//! Keyboard control panel over the model's field table
//!
//! Controls:
//! - Up/Down: select a field
//! - Left/Right: step the selected field (toggles flip, draw modes cycle,
//!   colors move all channels by 15)
//! - Space: toggle auto-rotation
//! - 1-7: pick a draw mode
//!
//! All edits go through `ShapeModel::set`, so clamping and change
//! notification are the model's job.

use superform_core::{DrawMode, FieldKind, FieldSpec, FieldValue, ModelError, ShapeModel, FIELDS};

use crate::InputAction;

/// What a handled action changed
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The selection moved to another field
    Selected(&'static str),
    /// A field was written; carries the value actually stored
    Edited {
        path: &'static str,
        value: FieldValue,
    },
}

/// Cursor over [`FIELDS`]
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    selected: usize,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected field
    pub fn selected(&self) -> &'static FieldSpec {
        &FIELDS[self.selected]
    }

    /// Select a field by path. Returns `false` for unknown paths.
    pub fn select(&mut self, path: &str) -> bool {
        match FIELDS.iter().position(|spec| spec.path == path) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Apply a panel action.
    ///
    /// Returns `Ok(None)` for actions the panel does not own (fullscreen,
    /// exit).
    pub fn apply(
        &mut self,
        action: InputAction,
        model: &mut ShapeModel,
    ) -> Result<Option<PanelEvent>, ModelError> {
        let event = match action {
            InputAction::SelectPrevious => Some(self.move_selection(-1)),
            InputAction::SelectNext => Some(self.move_selection(1)),
            InputAction::Decrease => Some(self.nudge(model, -1)?),
            InputAction::Increase => Some(self.nudge(model, 1)?),
            InputAction::ToggleAutoRotate => {
                let value = model.set("rendering.auto_rotate", !model.auto_rotate())?;
                Some(PanelEvent::Edited {
                    path: "rendering.auto_rotate",
                    value,
                })
            }
            InputAction::SetDrawMode(mode) => {
                let value = model.set("rendering.draw_mode", mode)?;
                Some(PanelEvent::Edited {
                    path: "rendering.draw_mode",
                    value,
                })
            }
            InputAction::ToggleFullscreen | InputAction::Exit => None,
        };
        Ok(event)
    }

    /// `label: value` for the selected field, shown in the window title
    pub fn status(&self, model: &ShapeModel) -> String {
        let spec = self.selected();
        match model.get(spec.path) {
            Ok(value) => format!("{}: {}", spec.label, value),
            Err(_) => spec.label.to_string(),
        }
    }

    fn move_selection(&mut self, step: isize) -> PanelEvent {
        let len = FIELDS.len() as isize;
        self.selected = (self.selected as isize + step).rem_euclid(len) as usize;
        let spec = self.selected();
        log::debug!("Selected {}", spec.path);
        PanelEvent::Selected(spec.path)
    }

    /// Step the selected field one increment in `direction` (-1 or 1)
    fn nudge(&self, model: &mut ShapeModel, direction: i32) -> Result<PanelEvent, ModelError> {
        let spec = self.selected();
        let current = model.get(spec.path)?;

        let next = match (spec.kind, current) {
            (FieldKind::Toggle, FieldValue::Bool(v)) => FieldValue::Bool(!v),
            (FieldKind::Choice, FieldValue::Choice(name)) => {
                let mode: DrawMode = name.parse()?;
                FieldValue::from(mode.cycle(direction))
            }
            (FieldKind::Color, FieldValue::Color(rgb)) => {
                let delta = spec.kind.step() * direction as f32;
                FieldValue::Color(rgb.map(|c| c + delta))
            }
            (kind, FieldValue::Number(v)) => FieldValue::Number(step_on_grid(v, kind.step(), direction)),
            (_, other) => other,
        };

        let value = model.set(spec.path, next)?;
        Ok(PanelEvent::Edited {
            path: spec.path,
            value,
        })
    }
}

/// Step to the neighbouring multiple of `step` so repeated presses never drift
fn step_on_grid(value: f32, step: f32, direction: i32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    let index = (value / step).round() + direction as f32;
    index * step
}
