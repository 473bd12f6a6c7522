//! Terminal input module.
//!
//! The device has a five-way joystick and two buttons. On a terminal the
//! joystick is the arrow keys (or `hjkl`) plus Enter/Space for a press, and
//! the buttons are `a`/`x` and `b`/`p`/Esc. [`map`] turns `crossterm` key
//! events into [`crate::types::InputEvent`]s.

pub mod map;

pub use blocktris_types as types;

pub use map::{handle_key_event, should_quit};
