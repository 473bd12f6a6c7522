//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the game rules and the in-memory game model.
//! It has **no dependencies** on rendering, input devices, timers or storage, making it:
//!
//! - **Deterministic**: Same seed produces identical piece sequences
//! - **Testable**: Every rule is a plain function or method call
//! - **Portable**: Runs on the device, in a terminal, or headless
//!
//! # Module Structure
//!
//! - [`board`]: 10x21 board with collision test, merge and line clearing
//! - [`pieces`]: Tetromino shape tables, positions and quarter-turn rotation
//! - [`scoring`]: Line clear points, level and speed formulas
//! - [`rng`]: Uniform random piece generation
//! - [`session`]: One running game: movement, ticks, spawning and game over
//! - [`snapshot`]: Plain-data copy of a session, used for saving
//! - [`highscores`]: Top five final scores
//!
//! # Example
//!
//! ```
//! use blocktris_core::{GameSession, TickOutcome};
//! use blocktris_core::types::Direction;
//!
//! let mut game = GameSession::new(1, 12345);
//! game.move_piece(Direction::Left);
//! game.rotate_active();
//!
//! // The first tick after spawning always has room to fall
//! assert_eq!(game.tick(), TickOutcome::Moved);
//! assert_eq!(game.speed_ms(), 500);
//! ```

pub mod board;
pub mod highscores;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use blocktris_types as types;

// Re-export commonly used types for convenience
pub use board::{clear_full_lines, Board, BOARD_SIZE};
pub use highscores::HighScoreTable;
pub use pieces::{get_shape, Piece, PieceShape, Position, SPAWN_POSITION};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{calculate_level, calculate_line_score, get_speed_ms};
pub use session::{GameSession, LockResult, TickOutcome};
pub use snapshot::SessionSnapshot;
