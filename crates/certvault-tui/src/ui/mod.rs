//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame layout, status bar, and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `screens`: Login, upload, and file list forms

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
