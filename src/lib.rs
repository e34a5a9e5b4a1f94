//! Superform - superformula surface viewer
//!
//! Library half of the application: configuration, scene construction and
//! the window/render systems driven by the winit event loop in `main.rs`.

pub mod config;
pub mod scene;
pub mod systems;
