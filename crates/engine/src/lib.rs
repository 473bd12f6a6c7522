//! Application layer: the state machine that sits between the input source,
//! the game session, the save slots and the display.
//!
//! Everything outside the process (display, tick timer, storage medium) is
//! reached through a trait, so the whole engine runs headless in tests:
//!
//! ```
//! use blocktris_engine::{EngineConfig, GameEngine, ManualClock, RecordingRenderer};
//! use blocktris_engine::types::{GameState, InputEvent};
//! use blocktris_storage::MemoryStore;
//!
//! let mut engine = GameEngine::new(MemoryStore::new(), ManualClock::new(), EngineConfig::default());
//! engine.handle_input(InputEvent::Center);
//! assert_eq!(engine.state_kind(), GameState::InGame);
//! assert!(engine.clock().is_running());
//!
//! let mut screen = RecordingRenderer::new();
//! engine.draw(&mut screen);
//! assert!(screen.has_text("Score"));
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod menu;
pub mod render;
pub mod view;

pub use blocktris_core as core;
pub use blocktris_storage as storage;
pub use blocktris_types as types;

pub use clock::{Clock, ClockCall, ManualClock};
pub use config::EngineConfig;
pub use engine::{AppState, GameEngine, GameOverSummary};
pub use menu::{MainMenu, MenuItem};
pub use render::{DrawCommand, RecordingRenderer, Renderer, SCREEN_HEIGHT, SCREEN_WIDTH};
