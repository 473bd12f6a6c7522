//! TerminalRenderer: the 128x128 pixel display on a real terminal.
//!
//! Draw calls land in a [`FrameBuffer`] at one terminal column per 3 pixels
//! and one row per 6 pixels, so a 6-pixel block becomes two columns by one
//! row. Outlines sit one cell outside the pixels they enclose because a
//! terminal cannot draw a 1-pixel border. [`Renderer::present`] only marks the
//! frame as finished; [`TerminalRenderer::flush`] writes the cells that changed.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use blocktris_engine::{Renderer, SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Pixels per terminal column
const PX_PER_COL: i32 = 3;
/// Pixels per terminal row
const PX_PER_ROW: i32 = 6;
/// Empty cells around the display, room for outlines at the screen edge
const MARGIN: i32 = 1;

pub const TERM_COLS: u16 = (SCREEN_WIDTH as i32 / PX_PER_COL + 2 * MARGIN) as u16;
pub const TERM_ROWS: u16 = (SCREEN_HEIGHT as i32 / PX_PER_ROW + 2 * MARGIN) as u16;

const BLOCK_STYLE: CellStyle = CellStyle {
    fg: Rgb::new(120, 230, 120),
    bg: Rgb::new(10, 14, 10),
    bold: false,
};
const TEXT_STYLE: CellStyle = CellStyle {
    fg: Rgb::new(230, 240, 230),
    bg: Rgb::new(10, 14, 10),
    bold: true,
};
const LINE_STYLE: CellStyle = CellStyle {
    fg: Rgb::new(150, 160, 150),
    bg: Rgb::new(10, 14, 10),
    bold: false,
};

fn col(px: i16) -> i32 {
    (px as i32).div_euclid(PX_PER_COL) + MARGIN
}

fn row(px: i16) -> i32 {
    (px as i32).div_euclid(PX_PER_ROW) + MARGIN
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    frame: FrameBuffer,
    /// What the terminal currently shows; None forces a full redraw
    shown: Option<FrameBuffer>,
    presented: bool,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            frame: FrameBuffer::new(TERM_COLS, TERM_ROWS),
            shown: None,
            presented: false,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.write_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.write_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next flush to redraw everything, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// The frame being drawn
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Write the last presented frame to the terminal. Does nothing if no
    /// frame was presented since the previous flush.
    pub fn flush(&mut self) -> Result<()> {
        if !std::mem::take(&mut self.presented) {
            return Ok(());
        }
        self.buf.clear();
        match &self.shown {
            Some(prev) => encode_diff_into(prev, &self.frame, &mut self.buf)?,
            None => encode_full_into(&self.frame, &mut self.buf)?,
        }
        self.write_buf()?;
        self.shown = Some(self.frame.clone());
        Ok(())
    }

    fn write_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn draw_rect(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, filled: bool) {
        if filled {
            // Cells whose left/top pixel lies inside the rectangle
            let (c0, r0) = (col(x0), row(y0));
            let c1 = (col(x1.saturating_add(1)) - 1).max(c0);
            let r1 = (row(y1.saturating_add(1)) - 1).max(r0);
            self.frame.fill_rect(c0, r0, c1, r1, '█', BLOCK_STYLE);
        } else {
            let (c0, r0) = (col(x0.saturating_sub(1)), row(y0.saturating_sub(1)));
            let (c1, r1) = (col(x1.saturating_add(1)), row(y1.saturating_add(1)));
            self.frame.outline_rect(c0, r0, c1, r1, LINE_STYLE);
        }
    }

    fn draw_text(&mut self, text: &str, x: i16, y: i16) {
        self.frame.put_str(col(x), row(y), text, TEXT_STYLE);
    }

    fn present(&mut self) {
        self.presented = true;
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut current_style = None;
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the runs of cells that differ between `prev` and `next`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }
    let mut current_style = None;
    for (x, y, len) in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(x + dx, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(if style.bold {
        Attribute::Bold
    } else {
        Attribute::NormalIntensity
    }))?;
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Horizontal runs `(x, y, len)` of changed cells, row by row. Both buffers
/// must have the same size.
fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<(u16, u16, u16)> {
    let width = next.width() as usize;
    let mut runs = Vec::new();
    if width == 0 {
        return runs;
    }
    for (y, (a, b)) in prev
        .cells()
        .chunks_exact(width)
        .zip(next.cells().chunks_exact(width))
        .enumerate()
    {
        let mut x = 0;
        while x < width {
            if a[x] == b[x] {
                x += 1;
                continue;
            }
            let start = x;
            while x < width && a[x] != b[x] {
                x += 1;
            }
            runs.push((start as u16, y as u16, (x - start) as u16));
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch_at(r: &TerminalRenderer, x: u16, y: u16) -> char {
        r.frame().get(x, y).map_or('?', |c| c.ch)
    }

    #[test]
    fn test_block_maps_to_two_columns() {
        let mut r = TerminalRenderer::new();
        r.clear();
        // Board cell (0, 0) and (1, 0)
        r.draw_rect(1, 1, 6, 6, true);
        r.draw_rect(7, 1, 12, 6, true);
        assert_eq!(ch_at(&r, 1, 1), '█');
        assert_eq!(ch_at(&r, 4, 1), '█');
        assert_eq!(ch_at(&r, 5, 1), ' ');
        assert_eq!(ch_at(&r, 1, 2), ' ');
    }

    #[test]
    fn test_board_frame_surrounds_blocks() {
        let mut r = TerminalRenderer::new();
        r.clear();
        r.draw_rect(0, 0, 61, 127, false);
        r.draw_rect(1, 1, 6, 6, true);
        r.draw_rect(55, 121, 60, 126, true);
        assert_eq!(ch_at(&r, 0, 0), '┌');
        assert_eq!(ch_at(&r, 1, 1), '█');
        // Last column and row of the board stay inside the frame
        assert_eq!(ch_at(&r, 20, 21), '█');
        assert_eq!(ch_at(&r, 21, 21), '│');
        assert_eq!(ch_at(&r, 21, 22), '┘');
    }

    #[test]
    fn test_text_position() {
        let mut r = TerminalRenderer::new();
        r.clear();
        r.draw_text("Score", 70, 10);
        assert_eq!(ch_at(&r, 24, 2), 'S');
        assert_eq!(ch_at(&r, 28, 2), 'e');
    }

    #[test]
    fn test_changed_runs_coalesce_adjacent_cells() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(5, 2);
        let mut b = FrameBuffer::new(5, 2);
        b.put_str(1, 0, "XYZ", style);
        b.put_char(4, 1, 'Q', style);
        assert_eq!(changed_runs(&a, &b), vec![(1, 0, 3), (4, 1, 1)]);
    }

    #[test]
    fn test_flush_needs_present() {
        let mut r = TerminalRenderer::new();
        r.clear();
        assert!(!r.presented);
        r.present();
        assert!(r.presented);
    }
}
