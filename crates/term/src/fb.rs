//! Framebuffer and style types for terminal rendering.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Minimal per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(200, 220, 200),
            bg: Rgb::new(10, 14, 10),
            bold: false,
        }
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D framebuffer of styled character cells.
///
/// Drawing takes signed coordinates and silently clips anything off-screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x as i32, y as i32).map(|i| self.cells[i])
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn put_char(&mut self, x: i32, y: i32, ch: char, style: CellStyle) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = Cell { ch, style };
        }
    }

    pub fn put_str(&mut self, x: i32, y: i32, s: &str, style: CellStyle) {
        for (i, ch) in s.chars().enumerate() {
            self.put_char(x + i as i32, y, ch, style);
        }
    }

    /// Fill the inclusive cell range with `ch`.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, ch: char, style: CellStyle) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put_char(x, y, ch, style);
            }
        }
    }

    /// Box-drawing outline along the inclusive cell range.
    pub fn outline_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, style: CellStyle) {
        if x1 <= x0 || y1 <= y0 {
            self.fill_rect(x0, y0, x1, y1, '█', style);
            return;
        }
        for x in x0 + 1..x1 {
            self.put_char(x, y0, '─', style);
            self.put_char(x, y1, '─', style);
        }
        for y in y0 + 1..y1 {
            self.put_char(x0, y, '│', style);
            self.put_char(x1, y, '│', style);
        }
        self.put_char(x0, y0, '┌', style);
        self.put_char(x1, y0, '┐', style);
        self.put_char(x0, y1, '└', style);
        self.put_char(x1, y1, '┘', style);
    }
}
