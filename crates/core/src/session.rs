//! Game session - one running game
//!
//! Ties the board, the active and queued pieces, and the score counters
//! together. The session never runs a timer itself: whoever owns it calls
//! [`GameSession::tick`] at [`GameSession::speed_ms`] intervals and reacts to
//! the returned [`TickOutcome`].

use log::debug;

use crate::board::Board;
use crate::pieces::{Piece, Position, SPAWN_POSITION};
use crate::rng::PieceQueue;
use crate::scoring::{calculate_level, calculate_line_score, get_speed_ms};
use crate::snapshot::SessionSnapshot;
use crate::types::{Direction, MIN_START_LEVEL};

/// What one downward step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The active piece moved down one row.
    Moved,
    /// The active piece was merged and a new one spawned.
    Locked(LockResult),
    /// The freshly spawned piece collided at its spawn position.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockResult {
    pub lines_cleared: u32,
    pub score_gained: u32,
    /// Level (and therefore speed) went up with this clear.
    pub level_changed: bool,
}

/// Complete state of one game
///
/// Outside of a finished game, the active piece at its position never leaves
/// the side walls or the floor and never overlaps a filled cell.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: Piece,
    position: Position,
    next: Piece,
    queue: PieceQueue,
    level: u32,
    lines: u32,
    score: u32,
    speed_ms: u32,
    game_over: bool,
}

impl GameSession {
    /// Start a new game at `starting_level` (levels below 1 are raised to 1).
    pub fn new(starting_level: u32, seed: u32) -> Self {
        let mut queue = PieceQueue::new(seed);
        let active = Piece::new(queue.draw());
        let next = Piece::new(queue.draw());
        let level = starting_level.max(MIN_START_LEVEL);
        Self {
            board: Board::new(),
            active,
            position: SPAWN_POSITION,
            next,
            queue,
            level,
            lines: 0,
            score: 0,
            speed_ms: get_speed_ms(level),
            game_over: false,
        }
    }

    /// Reset everything and start over, reusing this session's piece queue.
    pub fn start_new_game(&mut self, starting_level: u32) {
        self.board.clear();
        self.lines = 0;
        self.score = 0;
        self.level = starting_level.max(MIN_START_LEVEL);
        self.speed_ms = get_speed_ms(self.level);
        self.game_over = false;
        self.next = Piece::new(self.queue.draw());
        self.spawn_next();
    }

    /// Rebuild a session from saved state. Speed is derived from the level.
    ///
    /// A snapshot whose active piece collides with the board at its position
    /// restores as a finished game.
    pub fn restore(snapshot: SessionSnapshot, seed: u32) -> Self {
        let level = snapshot.level.max(MIN_START_LEVEL);
        let game_over = snapshot.board.collides(snapshot.position, &snapshot.active);
        if game_over {
            debug!(
                "restored piece collides at ({}, {})",
                snapshot.position.x, snapshot.position.y
            );
        }
        Self {
            board: snapshot.board,
            active: snapshot.active,
            position: snapshot.position,
            next: snapshot.next,
            queue: PieceQueue::new(seed),
            level,
            lines: snapshot.lines,
            score: snapshot.score,
            speed_ms: get_speed_ms(level),
            game_over,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            active: self.active,
            position: self.position,
            next: self.next,
            level: self.level,
            lines: self.lines,
            score: self.score,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Tick interval for the current level
    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Absolute cells of the active piece
    pub fn active_cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.active.cells_at(self.position)
    }

    /// Advance one row. A blocked piece is merged, full lines are cleared and
    /// the queued piece spawns; if that piece collides immediately the game is over.
    pub fn tick(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::GameOver;
        }

        let below = self.position.offset(0, 1);
        if !self.board.collides(below, &self.active) {
            self.position = below;
            return TickOutcome::Moved;
        }

        self.board.merge(self.position, &self.active);
        let result = self.clear_lines();
        self.spawn_next();

        if self.board.collides(self.position, &self.active) {
            debug!("spawn blocked at score {}", self.score);
            self.game_over = true;
            return TickOutcome::GameOver;
        }
        TickOutcome::Locked(result)
    }

    /// Manual "move down" input: exactly one tick without waiting for the timer.
    pub fn soft_drop(&mut self) -> TickOutcome {
        self.tick()
    }

    /// Shift one column; returns false (and changes nothing) if blocked.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if self.game_over {
            return false;
        }
        let target = self.position.offset(direction.dx(), 0);
        if self.board.collides(target, &self.active) {
            return false;
        }
        self.position = target;
        true
    }

    /// Quarter turn in place; returns false if blocked or if the piece is an O.
    pub fn rotate_active(&mut self) -> bool {
        if self.game_over || self.active.kind.is_rotation_invariant() {
            return false;
        }
        let rotated = self.active.rotated();
        if self.board.collides(self.position, &rotated) {
            return false;
        }
        self.active = rotated;
        true
    }

    fn spawn_next(&mut self) {
        self.active = self.next;
        self.next = Piece::new(self.queue.draw());
        self.position = SPAWN_POSITION;
    }

    fn clear_lines(&mut self) -> LockResult {
        let cleared = self.board.clear_full_lines();
        if cleared == 0 {
            return LockResult::default();
        }

        // Points use the level in force before this clear
        let gained = calculate_line_score(cleared, self.level);
        self.score = self.score.saturating_add(gained);
        self.lines = self.lines.saturating_add(cleared as u32);

        let new_level = calculate_level(self.lines);
        let level_changed = new_level > self.level;
        if level_changed {
            self.level = new_level;
            self.speed_ms = get_speed_ms(new_level);
            debug!("level {} ({}ms)", self.level, self.speed_ms);
        }

        LockResult {
            lines_cleared: cleared as u32,
            score_gained: gained,
            level_changed,
        }
    }

    /// Replace the board (for testing)
    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

    fn session_with(active: PieceKind, next: PieceKind) -> GameSession {
        GameSession::restore(
            SessionSnapshot {
                board: Board::new(),
                active: Piece::new(active),
                position: SPAWN_POSITION,
                next: Piece::new(next),
                level: 1,
                lines: 0,
                score: 0,
            },
            7,
        )
    }

    #[test]
    fn test_new_game_defaults() {
        let s = GameSession::new(3, 12345);
        assert_eq!(s.level(), 3);
        assert_eq!(s.score(), 0);
        assert_eq!(s.lines(), 0);
        assert_eq!(s.speed_ms(), 400);
        assert_eq!(s.position(), SPAWN_POSITION);
        assert!(!s.is_game_over());
        assert!(s.board().cells().iter().all(|c| !c.is_filled()));
    }

    #[test]
    fn test_start_level_zero_is_raised() {
        assert_eq!(GameSession::new(0, 1).level(), 1);
    }

    #[test]
    fn test_start_new_game_resets() {
        let mut s = session_with(PieceKind::O, PieceKind::T);
        s.board_mut().set(0, 20, Cell::Filled(PieceKind::I));
        s.score = 900;
        s.start_new_game(2);
        assert_eq!(s.score(), 0);
        assert_eq!(s.level(), 2);
        assert_eq!(s.speed_ms(), 450);
        assert!(!s.board().is_occupied(0, 20));
        assert_eq!(s.position(), SPAWN_POSITION);
    }

    #[test]
    fn test_move_blocked_by_wall_is_ignored() {
        let mut s = session_with(PieceKind::O, PieceKind::O);
        // O at x=4 covers columns 4 and 5
        for _ in 0..4 {
            assert!(s.move_piece(Direction::Left));
        }
        assert_eq!(s.position().x, 0);
        assert!(!s.move_piece(Direction::Left));
        assert_eq!(s.position().x, 0);

        for _ in 0..8 {
            assert!(s.move_piece(Direction::Right));
        }
        assert!(!s.move_piece(Direction::Right));
        assert_eq!(s.position().x, BOARD_WIDTH as i16 - 2);
    }

    #[test]
    fn test_rotate_o_is_noop() {
        let mut s = session_with(PieceKind::O, PieceKind::O);
        let before = *s.active();
        assert!(!s.rotate_active());
        assert_eq!(*s.active(), before);
    }

    #[test]
    fn test_rotate_blocked_by_floor_is_ignored() {
        let mut s = session_with(PieceKind::I, PieceKind::O);
        s.position = Position::new(4, BOARD_HEIGHT as i16 - 1);
        let before = *s.active();
        // Vertical I would reach two rows below the floor
        assert!(!s.rotate_active());
        assert_eq!(*s.active(), before);
    }

    #[test]
    fn test_rotate_blocked_by_stack_is_ignored() {
        let mut s = session_with(PieceKind::T, PieceKind::O);
        s.position = Position::new(4, 5);
        // Rotated T reaches (4, 6); fill it
        s.board_mut().set(4, 6, Cell::Filled(PieceKind::I));
        assert!(s.board().collides(s.position(), &s.active().rotated()));
        assert!(!s.rotate_active());
        assert_eq!(s.active().kind, PieceKind::T);
    }

    #[test]
    fn test_tick_moves_then_locks() {
        let mut s = session_with(PieceKind::O, PieceKind::T);
        // O occupies rows y and y+1; lands when y+1 == 20
        for expected_y in 1..=19 {
            assert_eq!(s.tick(), TickOutcome::Moved);
            assert_eq!(s.position().y, expected_y);
        }
        assert_eq!(s.tick(), TickOutcome::Locked(LockResult::default()));
        assert!(s.board().is_occupied(4, 20));
        assert!(s.board().is_occupied(5, 19));
        assert_eq!(s.active().kind, PieceKind::T);
        assert_eq!(s.position(), SPAWN_POSITION);
    }

    #[test]
    fn test_soft_drop_is_one_tick() {
        let mut s = session_with(PieceKind::T, PieceKind::T);
        assert_eq!(s.soft_drop(), TickOutcome::Moved);
        assert_eq!(s.position().y, 1);
    }

    #[test]
    fn test_single_line_clear_scores_by_level() {
        let mut s = session_with(PieceKind::I, PieceKind::O);
        s.level = 3;
        // Bottom row full except columns 3..=6, where the I piece lands
        for x in (0..3).chain(7..10) {
            s.board_mut().set(x, 20, Cell::Filled(PieceKind::Z));
        }
        s.position = Position::new(4, 20);

        let outcome = s.tick();
        assert_eq!(
            outcome,
            TickOutcome::Locked(LockResult {
                lines_cleared: 1,
                score_gained: 300,
                level_changed: false,
            })
        );
        assert_eq!(s.score(), 300);
        assert_eq!(s.lines(), 1);
        assert!(s.board().cells().iter().all(|c| !c.is_filled()));
    }

    #[test]
    fn test_level_up_changes_speed() {
        let mut s = session_with(PieceKind::I, PieceKind::O);
        s.lines = 9;
        for x in (0..3).chain(7..10) {
            s.board_mut().set(x, 20, Cell::Filled(PieceKind::Z));
        }
        s.position = Position::new(4, 20);

        match s.tick() {
            TickOutcome::Locked(result) => {
                assert!(result.level_changed);
                // Scored at the old level
                assert_eq!(result.score_gained, 100);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(s.level(), 2);
        assert_eq!(s.speed_ms(), 450);
    }

    #[test]
    fn test_high_start_level_is_kept() {
        let mut s = session_with(PieceKind::I, PieceKind::O);
        s.level = 5;
        for x in (0..3).chain(7..10) {
            s.board_mut().set(x, 20, Cell::Filled(PieceKind::Z));
        }
        s.position = Position::new(4, 20);
        s.tick();
        assert_eq!(s.level(), 5);
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut s = session_with(PieceKind::O, PieceKind::T);
        // The T spawns over (3..=5, 0) and (4, 1)
        s.board_mut().set(4, 1, Cell::Filled(PieceKind::L));
        s.position = Position::new(0, 19);

        assert_eq!(s.tick(), TickOutcome::GameOver);
        assert!(s.is_game_over());
        assert!(s.board().is_occupied(0, 20));
        assert_eq!(s.tick(), TickOutcome::GameOver);
        assert!(!s.move_piece(Direction::Left));
        assert!(!s.rotate_active());
    }

    #[test]
    fn test_restore_colliding_snapshot_is_finished() {
        let mut board = Board::new();
        board.set(4, 5, Cell::Filled(PieceKind::J));
        for position in [
            Position::new(4, 5),
            Position::new(100, 5),
            Position::new(4, i16::MAX),
            Position::new(i16::MIN, i16::MIN),
        ] {
            let mut s = GameSession::restore(
                SessionSnapshot {
                    board: board.clone(),
                    active: Piece::new(PieceKind::T),
                    position,
                    next: Piece::new(PieceKind::O),
                    level: 1,
                    lines: 0,
                    score: 0,
                },
                7,
            );
            assert!(s.is_game_over(), "{:?}", position);
            assert_eq!(s.tick(), TickOutcome::GameOver);
            assert_eq!(s.board(), &board);
        }
    }

    #[test]
    fn test_line_count_saturates() {
        let mut s = session_with(PieceKind::I, PieceKind::O);
        s.lines = u32::MAX;
        s.level = calculate_level(u32::MAX);
        for x in (0..3).chain(7..10) {
            s.board_mut().set(x, 20, Cell::Filled(PieceKind::Z));
        }
        s.position = Position::new(4, 20);
        assert!(matches!(s.tick(), TickOutcome::Locked(_)));
        assert_eq!(s.lines(), u32::MAX);
    }
}
