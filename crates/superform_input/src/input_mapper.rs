//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to high-level actions: panel navigation and edits,
//! draw-mode shortcuts, fullscreen and exit.

use superform_core::DrawMode;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Select the previous panel field (Up)
    SelectPrevious,
    /// Select the next panel field (Down)
    SelectNext,
    /// Step the selected field down (Left)
    Decrease,
    /// Step the selected field up (Right)
    Increase,
    /// Flip auto-rotation (Space)
    ToggleAutoRotate,
    /// Jump straight to a draw mode (1-7)
    SetDrawMode(DrawMode),
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Exit application (Escape)
    Exit,
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Only presses (including key repeat) produce actions.
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::ArrowUp => Some(InputAction::SelectPrevious),
            KeyCode::ArrowDown => Some(InputAction::SelectNext),
            KeyCode::ArrowLeft => Some(InputAction::Decrease),
            KeyCode::ArrowRight => Some(InputAction::Increase),
            KeyCode::Space => Some(InputAction::ToggleAutoRotate),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::Escape => Some(InputAction::Exit),
            _ => Self::draw_mode_shortcut(key).map(InputAction::SetDrawMode),
        }
    }

    /// Digits 1-7 select draw modes in panel order
    fn draw_mode_shortcut(key: KeyCode) -> Option<DrawMode> {
        let slot = match key {
            KeyCode::Digit1 | KeyCode::Numpad1 => 0,
            KeyCode::Digit2 | KeyCode::Numpad2 => 1,
            KeyCode::Digit3 | KeyCode::Numpad3 => 2,
            KeyCode::Digit4 | KeyCode::Numpad4 => 3,
            KeyCode::Digit5 | KeyCode::Numpad5 => 4,
            KeyCode::Digit6 | KeyCode::Numpad6 => 5,
            KeyCode::Digit7 | KeyCode::Numpad7 => 6,
            _ => return None,
        };
        DrawMode::ALL.get(slot).copied()
    }
}
