//! Drawing surface the engine renders into.
//!
//! Coordinates are pixels on a 128x128 display, origin top-left. The engine
//! only says what to draw; how it shows up is up to the implementation.

/// Display width in pixels
pub const SCREEN_WIDTH: i16 = 128;
/// Display height in pixels
pub const SCREEN_HEIGHT: i16 = 128;
/// Width of one glyph of the display font
pub const GLYPH_WIDTH: i16 = 6;
/// Height of one glyph of the display font
pub const GLYPH_HEIGHT: i16 = 8;

pub trait Renderer {
    /// Blank the whole surface.
    fn clear(&mut self);

    /// Rectangle with inclusive corners; outline only unless `filled`.
    fn draw_rect(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, filled: bool);

    /// Text with its top-left corner at (x, y).
    fn draw_text(&mut self, text: &str, x: i16, y: i16);

    /// Show the finished frame.
    fn present(&mut self);
}

/// One call made on a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear,
    Rect {
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        filled: bool,
    },
    Text {
        text: String,
        x: i16,
        y: i16,
    },
    Present,
}

/// Renderer that records every call, for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Commands of the most recent frame, starting at its `Clear`.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::Clear)
            .unwrap_or(0);
        &self.commands[start..]
    }

    /// Every string drawn in the most recent frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// Number of filled rectangles in the most recent frame.
    pub fn filled_rects(&self) -> usize {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { filled: true, .. }))
            .count()
    }

    pub fn frames_presented(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| **c == DrawCommand::Present)
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_rect(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, filled: bool) {
        self.commands.push(DrawCommand::Rect {
            x0,
            y0,
            x1,
            y1,
            filled,
        });
    }

    fn draw_text(&mut self, text: &str, x: i16, y: i16) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}

/// X coordinate that centres `text` on the display.
pub fn centered_x(text: &str) -> i16 {
    let width = text.chars().count() as i16 * GLYPH_WIDTH;
    ((SCREEN_WIDTH - width) / 2).max(0)
}
