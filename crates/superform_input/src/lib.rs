//! Keyboard input for the superform viewer
//!
//! Raw key events are mapped to semantic actions by [`InputMapper`]; the
//! [`ControlPanel`] applies panel actions to a `ShapeModel` through its
//! public `set` operation.

mod control_panel;
mod input_mapper;

pub use control_panel::{ControlPanel, PanelEvent};
pub use input_mapper::{InputAction, InputMapper};
