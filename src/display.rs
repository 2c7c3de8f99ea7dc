//! Terminal renderer. All terminal output lives here.
//!
//! The game draws in logical pixels (1200×800 by default).  This backend
//! scales that space onto the current terminal grid, composes the frame in
//! a cell buffer, and writes the buffer out row by row on `present`.

use std::io::Write;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{self, Color, Colors, Print},
    terminal, QueueableCommand,
};

use alien_invasion::geometry::Rect;
use alien_invasion::render::{Align, Renderer};
use alien_invasion::settings::Rgb;

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    logical_width: i32,
    logical_height: i32,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    pointer_visible: Option<bool>,
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, logical_width: i32, logical_height: i32) -> Self {
        Self {
            out,
            logical_width: logical_width.max(1),
            logical_height: logical_height.max(1),
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            pointer_visible: None,
        }
    }

    /// Terminal cell → logical point at the centre of that cell.
    pub fn to_logical(&self, column: u16, row: u16) -> (f32, f32) {
        let cols = self.cols.max(1) as f32;
        let rows = self.rows.max(1) as f32;
        (
            (column as f32 + 0.5) * self.logical_width as f32 / cols,
            (row as f32 + 0.5) * self.logical_height as f32 / rows,
        )
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    fn col_of(&self, x: i32) -> i64 {
        x as i64 * self.cols as i64 / self.logical_width as i64
    }

    fn row_of(&self, y: i32) -> i64 {
        y as i64 * self.rows as i64 / self.logical_height as i64
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(index)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear(&mut self, color: Rgb) -> std::io::Result<()> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows;
        let blank = Cell {
            ch: ' ',
            fg: color,
            bg: color,
        };
        self.cells.clear();
        self.cells.resize(cols as usize * rows as usize, blank);
        Ok(())
    }

    /// Paint every cell the rect touches.  Rects thinner than a cell still
    /// get one cell so bullets stay visible.
    fn draw_rect(&mut self, color: Rgb, rect: Rect) -> std::io::Result<()> {
        if rect.width <= 0 || rect.height <= 0 {
            return Ok(());
        }
        let c0 = self.col_of(rect.left());
        let c1 = self.col_of(rect.right() - 1).max(c0);
        let r0 = self.row_of(rect.top());
        let r1 = self.row_of(rect.bottom() - 1).max(r0);
        for row in r0..=r1 {
            for col in c0..=c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = ' ';
                    cell.bg = color;
                }
            }
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        align: Align,
        color: Rgb,
    ) -> std::io::Result<()> {
        let len = text.chars().count() as i64;
        let anchor = self.col_of(x);
        let start = match align {
            Align::Left => anchor,
            Align::Center => anchor - len / 2,
            Align::Right => anchor - len,
        };
        let row = self.row_of(y);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(start + i as i64, row) {
                cell.ch = ch;
                cell.fg = color;
            }
        }
        Ok(())
    }

    /// The terminal has no pointer of its own: showing it means capturing
    /// the mouse so the play button can be clicked, hiding it hands the
    /// mouse back to the terminal.
    fn set_pointer_visible(&mut self, visible: bool) -> std::io::Result<()> {
        if self.pointer_visible == Some(visible) {
            return Ok(());
        }
        if visible {
            self.out.queue(EnableMouseCapture)?;
        } else {
            self.out.queue(DisableMouseCapture)?;
        }
        self.pointer_visible = Some(visible);
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        let cols = self.cols as usize;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * cols;
            let mut current: Option<(Rgb, Rgb)> = None;
            let mut run = String::with_capacity(cols);
            for cell in &self.cells[start..start + cols] {
                if current != Some((cell.fg, cell.bg)) {
                    if !run.is_empty() {
                        self.out.queue(Print(&run))?;
                        run.clear();
                    }
                    self.out
                        .queue(style::SetColors(Colors::new(to_color(cell.fg), to_color(cell.bg))))?;
                    current = Some((cell.fg, cell.bg));
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                self.out.queue(Print(&run))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}
