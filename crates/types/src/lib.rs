//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the pure game logic, the persistence codec and the host frontends alike.
//!
//! # Board Dimensions
//!
//! The playfield of the target display:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 21 rows (indexed 0-20, row 0 at the top)
//! - **Spawn position**: (4, 0); pieces may extend above row 0 while spawning
//!
//! # Game Speed
//!
//! The periodic tick interval depends on the level:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 500ms |
//! | 2 | 450ms |
//! | 5 | 300ms |
//! | 10+ | 50ms floor |
//!
//! # Examples
//!
//! ```
//! use blocktris_types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::O.color_id(), 2);
//! assert_eq!(PieceKind::from_color_id(7), Some(PieceKind::Z));
//! assert_eq!(Cell::from_byte(3), Some(Cell::Filled(PieceKind::T)));
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 21);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (21 rows)
pub const BOARD_HEIGHT: u8 = 21;

/// Number of persistent save slots
pub const NUM_SLOTS: usize = 5;

/// Number of entries kept in the high-score table
pub const HIGH_SCORE_CAPACITY: usize = 5;

/// Tick interval at level 1
pub const BASE_SPEED_MS: u32 = 500;

/// Tick interval reduction per level
pub const SPEED_STEP_MS: u32 = 50;

/// Fastest tick interval
pub const MIN_SPEED_MS: u32 = 50;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Selectable starting levels in the main menu
pub const MIN_START_LEVEL: u32 = 1;
pub const MAX_START_LEVEL: u32 = 10;

/// Line clear scoring table, multiplied by the current level.
///
/// Index is the number of rows cleared by one placement.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// The seven tetromino piece kinds
///
/// Each kind owns one color id, in the order the shape table lists them:
/// I=1, O=2, T=3, L=4, J=5, S=6, Z=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in color id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Color id in 1..=7
    pub fn color_id(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::L => 4,
            PieceKind::J => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::color_id`]
    pub fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Only the O piece looks the same after a quarter turn.
    pub fn is_rotation_invariant(self) -> bool {
        self == PieceKind::O
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }
}

/// A cell on the game board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Storage byte: 0 for empty, otherwise the color id
    pub fn to_byte(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.color_id(),
        }
    }

    /// Returns None for bytes that are neither 0 nor a valid color id.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Cell::Empty),
            id => PieceKind::from_color_id(id).map(Cell::Filled),
        }
    }
}

/// Horizontal move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn dx(self) -> i16 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Discrete input events: joystick directions, joystick press and the two buttons.
///
/// `ButtonA` is the action button (save in game, delete on the slot screen).
/// `ButtonB` is the start/back button (pause, resume, back, restart).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    Center,
    ButtonA,
    ButtonB,
}

/// Top-level application state tag.
///
/// Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    MainMenu,
    InGame,
    Paused,
    GameOver,
    SlotSelection,
    Scoreboard,
}

impl GameState {
    pub fn as_str(self) -> &'static str {
        match self {
            GameState::MainMenu => "main_menu",
            GameState::InGame => "in_game",
            GameState::Paused => "paused",
            GameState::GameOver => "game_over",
            GameState::SlotSelection => "slot_selection",
            GameState::Scoreboard => "scoreboard",
        }
    }
}
