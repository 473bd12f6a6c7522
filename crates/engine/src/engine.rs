//! Application state machine.
//!
//! [`GameEngine`] owns everything that lives for the whole program: the
//! current [`AppState`], the save slots, the high-score table and the tick
//! clock. Input, ticks and drawing all dispatch on the current state, and
//! each state variant carries only the data it needs.

use log::{debug, info, warn};

use blocktris_core::{GameSession, HighScoreTable, TickOutcome};
use blocktris_storage::{KeyValueStore, SaveManager};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::menu::{MainMenu, MenuItem};
use crate::render::Renderer;
use crate::types::{Direction, GameState, InputEvent, MIN_START_LEVEL, NUM_SLOTS};

/// Final numbers of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    /// 0-based position in the high-score table, if the score made it in.
    pub rank: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum AppState {
    MainMenu(MainMenu),
    InGame(GameSession),
    Paused(GameSession),
    GameOver(GameOverSummary),
    SlotSelection { highlighted: usize },
    Scoreboard,
}

impl AppState {
    pub fn kind(&self) -> GameState {
        match self {
            AppState::MainMenu(_) => GameState::MainMenu,
            AppState::InGame(_) => GameState::InGame,
            AppState::Paused(_) => GameState::Paused,
            AppState::GameOver(_) => GameState::GameOver,
            AppState::SlotSelection { .. } => GameState::SlotSelection,
            AppState::Scoreboard => GameState::Scoreboard,
        }
    }
}

/// Short-lived status line, e.g. the result of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Message {
    text: String,
    remaining_ms: u32,
}

pub struct GameEngine<S, C> {
    state: AppState,
    saves: SaveManager<S>,
    clock: C,
    high_scores: HighScoreTable,
    /// Start level chosen in the main menu, kept across menu visits
    start_level: u32,
    config: EngineConfig,
    message: Option<Message>,
    games_started: u32,
}

impl<S: KeyValueStore, C: Clock> GameEngine<S, C> {
    /// Load slot metadata and high scores from `store` and open the main menu.
    pub fn new(store: S, clock: C, config: EngineConfig) -> Self {
        let saves = SaveManager::open(store);
        let high_scores = saves.load_high_scores();
        let state = AppState::MainMenu(MainMenu::new(saves.has_any_save(), MIN_START_LEVEL));
        info!("engine ready, {} high scores", high_scores.len());
        Self {
            state,
            saves,
            clock,
            high_scores,
            start_level: MIN_START_LEVEL,
            config,
            message: None,
            games_started: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_kind(&self) -> GameState {
        self.state.kind()
    }

    /// The running or paused game, if any
    pub fn session(&self) -> Option<&GameSession> {
        match &self.state {
            AppState::InGame(session) | AppState::Paused(session) => Some(session),
            _ => None,
        }
    }

    pub fn saves(&self) -> &SaveManager<S> {
        &self.saves
    }

    pub fn saves_mut(&mut self) -> &mut SaveManager<S> {
        &mut self.saves
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    pub fn start_level(&self) -> u32 {
        self.start_level
    }

    /// Transient message currently on screen
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    /// Route one input event to the current state.
    ///
    /// Returns false when the event means nothing in this state.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let handled = match self.state.kind() {
            GameState::MainMenu => self.main_menu_input(event),
            GameState::InGame => self.in_game_input(event),
            GameState::Paused => match event {
                InputEvent::ButtonB => {
                    self.resume();
                    true
                }
                _ => false,
            },
            GameState::GameOver | GameState::Scoreboard => match event {
                InputEvent::ButtonB => {
                    self.enter_main_menu();
                    true
                }
                _ => false,
            },
            GameState::SlotSelection => self.slot_selection_input(event),
        };
        if !handled {
            debug!("{:?} ignored in {}", event, self.state.kind().as_str());
        }
        handled
    }

    /// Periodic clock fired. Only a running game advances; stale ticks in
    /// any other state are ignored.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        let AppState::InGame(session) = &mut self.state else {
            return None;
        };
        let outcome = session.tick();
        self.after_step(outcome);
        Some(outcome)
    }

    /// Let wall-clock time pass for transient messages.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if let Some(message) = &mut self.message {
            message.remaining_ms = message.remaining_ms.saturating_sub(elapsed_ms);
            if message.remaining_ms == 0 {
                self.message = None;
            }
        }
    }

    /// Draw one full frame of the current state.
    pub fn draw<R: Renderer>(&self, renderer: &mut R) {
        crate::view::draw(self, renderer);
    }

    /// Idle-time housekeeping: compacts the store when it asks for it.
    pub fn process_background(&mut self) -> bool {
        self.saves.maintain()
    }

    fn main_menu_input(&mut self, event: InputEvent) -> bool {
        let AppState::MainMenu(menu) = &mut self.state else {
            return false;
        };
        match event {
            InputEvent::Up => menu.cursor_up(),
            InputEvent::Down => menu.cursor_down(),
            InputEvent::Left | InputEvent::Right => {
                let direction = if event == InputEvent::Left {
                    Direction::Left
                } else {
                    Direction::Right
                };
                if !menu.adjust_level(direction) {
                    return false;
                }
                self.start_level = menu.start_level();
            }
            InputEvent::Center => match menu.selected() {
                MenuItem::StartGame => {
                    let level = menu.start_level();
                    self.start_game(level);
                }
                MenuItem::LoadGame => {
                    self.state = AppState::SlotSelection { highlighted: 0 };
                    info!("slot selection");
                }
                MenuItem::Scoreboard => {
                    self.state = AppState::Scoreboard;
                    info!("scoreboard");
                }
                MenuItem::AdjustLevel => return false,
            },
            InputEvent::ButtonA | InputEvent::ButtonB => return false,
        }
        true
    }

    fn in_game_input(&mut self, event: InputEvent) -> bool {
        let AppState::InGame(session) = &mut self.state else {
            return false;
        };
        match event {
            InputEvent::Left => {
                session.move_piece(Direction::Left);
            }
            InputEvent::Right => {
                session.move_piece(Direction::Right);
            }
            InputEvent::Up => {
                session.rotate_active();
            }
            InputEvent::Down => {
                let outcome = session.soft_drop();
                self.after_step(outcome);
            }
            InputEvent::ButtonA => self.save_game(),
            InputEvent::ButtonB => self.pause(),
            InputEvent::Center => return false,
        }
        true
    }

    fn slot_selection_input(&mut self, event: InputEvent) -> bool {
        let AppState::SlotSelection { highlighted } = &mut self.state else {
            return false;
        };
        match event {
            InputEvent::Down => *highlighted = (*highlighted + 1) % NUM_SLOTS,
            InputEvent::Up => *highlighted = (*highlighted + NUM_SLOTS - 1) % NUM_SLOTS,
            InputEvent::Center => {
                let slot = *highlighted;
                self.load_game(slot);
            }
            InputEvent::ButtonA => {
                let slot = *highlighted;
                self.delete_slot(slot);
            }
            InputEvent::ButtonB => self.enter_main_menu(),
            InputEvent::Left | InputEvent::Right => return false,
        }
        true
    }

    /// React to a tick or soft drop of the running game.
    fn after_step(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::GameOver => self.enter_game_over(),
            TickOutcome::Locked(result) if result.level_changed => {
                if let Some(session) = self.session() {
                    let speed = session.speed_ms();
                    info!("level {} reached", session.level());
                    self.clock.start_periodic(speed);
                }
            }
            TickOutcome::Locked(_) | TickOutcome::Moved => {}
        }
    }

    fn start_game(&mut self, level: u32) {
        let session = GameSession::new(level, self.next_seed());
        info!("new game at level {}", session.level());
        self.clock.start_periodic(session.speed_ms());
        self.message = None;
        self.state = AppState::InGame(session);
    }

    fn pause(&mut self) {
        let AppState::InGame(session) = &self.state else {
            return;
        };
        let session = session.clone();
        self.clock.stop();
        info!("paused");
        self.state = AppState::Paused(session);
    }

    fn resume(&mut self) {
        let AppState::Paused(session) = &self.state else {
            return;
        };
        let session = session.clone();
        self.clock.start_periodic(session.speed_ms());
        info!("resumed");
        self.state = AppState::InGame(session);
    }

    fn enter_game_over(&mut self) {
        let Some(session) = self.session() else {
            return;
        };
        let (score, lines, level) = (session.score(), session.lines(), session.level());

        self.clock.stop();
        let rank = self.high_scores.insert(score);
        if rank.is_some() {
            if let Err(e) = self.saves.store_high_scores(&self.high_scores) {
                warn!("high scores not saved: {}", e);
            }
        }
        info!("game over: score {} lines {} level {}", score, lines, level);
        self.state = AppState::GameOver(GameOverSummary {
            score,
            lines,
            level,
            rank,
        });
    }

    fn enter_main_menu(&mut self) {
        self.state = AppState::MainMenu(MainMenu::new(self.saves.has_any_save(), self.start_level));
        info!("main menu");
    }

    fn save_game(&mut self) {
        let AppState::InGame(session) = &self.state else {
            return;
        };
        let snapshot = session.snapshot();
        match self.saves.save(&snapshot) {
            Ok(slot) => self.show_message(format!("Saved: Slot {}", slot + 1)),
            Err(e) => {
                warn!("save failed: {}", e);
                self.show_message("Save failed");
            }
        }
    }

    fn load_game(&mut self, slot: usize) {
        match self.saves.load(slot) {
            Ok(snapshot) => {
                let session = GameSession::restore(snapshot, self.next_seed());
                self.clock.start_periodic(session.speed_ms());
                self.message = None;
                self.state = AppState::InGame(session);
            }
            Err(e) => {
                warn!("load of slot {} failed: {}", slot, e);
                self.show_message("Load failed");
            }
        }
    }

    fn delete_slot(&mut self, slot: usize) {
        match self.saves.delete(slot) {
            Ok(()) => self.show_message(format!("Slot {} deleted", slot + 1)),
            Err(e) => {
                warn!("delete of slot {} failed: {}", slot, e);
                self.show_message("Delete failed");
            }
        }
    }

    fn show_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            remaining_ms: self.config.message_ms,
        });
    }

    fn next_seed(&mut self) -> u32 {
        self.games_started = self.games_started.wrapping_add(1);
        self.config
            .seed
            .wrapping_add(self.games_started.wrapping_mul(0x9E37_79B9))
    }
}
