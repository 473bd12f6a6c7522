//! Per-state drawing.
//!
//! Pure: reads the engine and issues [`Renderer`] calls, one full frame per
//! [`draw`]. Layout targets a 128x128 display with 6-pixel blocks.

use blocktris_core::{GameSession, HighScoreTable, Position};
use blocktris_storage::KeyValueStore;

use crate::clock::Clock;
use crate::engine::{AppState, GameEngine, GameOverSummary};
use crate::menu::{MainMenu, MenuItem};
use crate::render::{centered_x, Renderer, GLYPH_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, NUM_SLOTS};

/// Side of one board cell in pixels
pub const BLOCK_SIZE: i16 = 6;

const TITLE: &str = "BLOCKTRIS";
const PANEL_X: i16 = BOARD_WIDTH as i16 * BLOCK_SIZE + 10;
const ROW_SPACING: i16 = 15;

/// Draw one complete frame for the current state.
pub fn draw<S: KeyValueStore, C: Clock, R: Renderer>(engine: &GameEngine<S, C>, r: &mut R) {
    r.clear();
    match engine.state() {
        AppState::MainMenu(menu) => draw_main_menu(menu, r),
        AppState::InGame(session) => draw_game(session, r),
        AppState::Paused(session) => {
            draw_game(session, r);
            draw_centered("PAUSED", SCREEN_HEIGHT / 2 - 4, r);
        }
        AppState::GameOver(summary) => draw_game_over(summary, r),
        AppState::SlotSelection { highlighted } => {
            let names = (0..NUM_SLOTS).map(move |i| engine.saves().slot_display_name(i));
            draw_slot_menu(names, *highlighted, r);
        }
        AppState::Scoreboard => draw_scoreboard(engine.high_scores(), r),
    }
    if let Some(text) = engine.message() {
        draw_centered(text, SCREEN_HEIGHT / 2 + 6, r);
    }
    r.present();
}

fn draw_centered<R: Renderer>(text: &str, y: i16, r: &mut R) {
    r.draw_text(text, centered_x(text), y);
}

fn draw_main_menu<R: Renderer>(menu: &MainMenu, r: &mut R) {
    draw_centered(TITLE, 20, r);
    r.draw_rect(10, 55, SCREEN_WIDTH - 10, SCREEN_HEIGHT - 3, false);

    for (i, item) in menu.items().iter().enumerate() {
        let y = 60 + i as i16 * ROW_SPACING;
        let label = item.label();
        let x = centered_x(label);
        if i == menu.cursor() {
            r.draw_text(">", x - 10, y);
        }
        r.draw_text(label, x, y);
        if *item == MenuItem::AdjustLevel {
            let level = format!("<{}>", menu.start_level());
            r.draw_text(&level, x + label.len() as i16 * GLYPH_WIDTH + GLYPH_WIDTH, y);
        }
    }
}

fn draw_block<R: Renderer>(x: i16, y: i16, r: &mut R) {
    r.draw_rect(x, y, x + BLOCK_SIZE - 1, y + BLOCK_SIZE - 1, true);
}

fn draw_game<R: Renderer>(session: &GameSession, r: &mut R) {
    // Frame, one pixel outside the cells
    r.draw_rect(
        0,
        0,
        BOARD_WIDTH as i16 * BLOCK_SIZE + 1,
        BOARD_HEIGHT as i16 * BLOCK_SIZE + 1,
        false,
    );

    for (y, row) in session.board().rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if cell.is_filled() {
                draw_block(x as i16 * BLOCK_SIZE + 1, y as i16 * BLOCK_SIZE + 1, r);
            }
        }
    }
    for (x, y) in session.active_cells().filter(|&(_, y)| y >= 0) {
        draw_block(x * BLOCK_SIZE + 1, y * BLOCK_SIZE + 1, r);
    }

    let stats = [
        ("Score", session.score(), 10),
        ("Lines", session.lines(), 40),
        ("Level", session.level(), 70),
    ];
    for (label, value, y) in stats {
        r.draw_text(label, PANEL_X, y);
        r.draw_text(&value.to_string(), PANEL_X, y + 10);
    }

    r.draw_text("Next", PANEL_X, 100);
    for (x, y) in session.next().cells_at(Position::new(0, 0)) {
        draw_block(PANEL_X + 10 + x * BLOCK_SIZE, 110 + y * BLOCK_SIZE, r);
    }
}

fn draw_game_over<R: Renderer>(summary: &GameOverSummary, r: &mut R) {
    draw_centered("GAME OVER", 40, r);
    draw_centered(&format!("Score: {}", summary.score), 60, r);
    if let Some(rank) = summary.rank {
        draw_centered(&format!("New high #{}", rank + 1), 70, r);
    }
    draw_centered("Press B", 80, r);
}

fn draw_slot_menu<'a, R: Renderer>(
    names: impl Iterator<Item = &'a str>,
    highlighted: usize,
    r: &mut R,
) {
    draw_centered("Load Game", 10, r);
    for (i, name) in names.enumerate() {
        let y = 30 + i as i16 * ROW_SPACING;
        if i == highlighted {
            r.draw_text(">", 10, y);
        }
        r.draw_text(name, 20, y);
    }
    draw_centered("B:BACK A:DEL", 120, r);
}

fn draw_scoreboard<R: Renderer>(scores: &HighScoreTable, r: &mut R) {
    draw_centered("Scoreboard", 10, r);
    for (i, score) in scores.padded().iter().enumerate() {
        let y = 30 + i as i16 * ROW_SPACING;
        r.draw_text(&format!("{}. {}", i + 1, score), 20, y);
    }
    draw_centered("B: BACK", 110, r);
}
