//! Terminal host collaborators.
//!
//! A small, game-oriented stand-in for the device's display and timer:
//! the engine draws into a character framebuffer through [`TerminalRenderer`],
//! which flushes only changed cells to the terminal, and [`IntervalClock`]
//! turns the engine's start/stop requests into polled ticks.

pub mod clock;
pub mod fb;
pub mod renderer;

pub use blocktris_engine as engine;

pub use clock::IntervalClock;
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer, TERM_COLS, TERM_ROWS};
