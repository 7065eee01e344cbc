use std::io::{self, Stdout, Write};

use crossterm::cursor::{self, MoveTo};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::debug;

use crate::error::{Error, Result};

pub trait Surface {
    fn size(&self) -> (u16, u16);
    fn clear(&mut self);
    /// Coordinates outside the surface are ignored.
    fn draw_cell(&mut self, x: i32, y: i32, symbol: char);
    fn flush(&mut self) -> Result<()>;
}

#[derive(Debug, Clone)]
struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl CellBuffer {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn set(&mut self, x: i32, y: i32, symbol: char) {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return;
        }
        let idx = y as usize * usize::from(self.width) + x as usize;
        self.cells[idx] = symbol;
    }

    #[cfg(test)]
    fn get(&self, x: u16, y: u16) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(usize::from(y) * usize::from(self.width) + usize::from(x))
            .copied()
    }

    fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(usize::from(self.width.max(1)))
            .map(|row| row.iter().collect())
    }
}

/// Raw mode on the alternate screen, restored by [`Terminal::close`] or on drop.
pub struct Terminal {
    out: Stdout,
    buffer: CellBuffer,
    active: bool,
}

impl Terminal {
    pub fn init() -> Result<Terminal> {
        let (width, height) = terminal::size().map_err(Error::TerminalInit)?;
        terminal::enable_raw_mode().map_err(Error::TerminalInit)?;

        let mut out = io::stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(Error::TerminalInit(err));
        }

        debug!(width, height, "terminal initialized");
        Ok(Terminal {
            out,
            buffer: CellBuffer::new(width, height),
            active: true,
        })
    }

    pub fn close(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, cursor::Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        debug!("terminal restored");
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl Surface for Terminal {
    fn size(&self) -> (u16, u16) {
        (self.buffer.width, self.buffer.height)
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn draw_cell(&mut self, x: i32, y: i32, symbol: char) {
        self.buffer.set(x, y, symbol);
    }

    fn flush(&mut self) -> Result<()> {
        for (y, row) in self.buffer.rows().enumerate() {
            // blank tails go through the line clear; writing the bottom-right cell scrolls
            queue!(
                self.out,
                MoveTo(0, y as u16),
                Clear(ClearType::UntilNewLine),
                Print(row.trim_end())
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Records every flushed frame instead of presenting it.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct MemorySurface {
    buffer: CellBuffer,
    frames: Vec<Vec<String>>,
}

#[cfg(test)]
impl MemorySurface {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: CellBuffer::new(width, height),
            frames: Vec::new(),
        }
    }

    pub(crate) fn cell(&self, x: u16, y: u16) -> char {
        self.buffer.get(x, y).unwrap_or(' ')
    }

    pub(crate) fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    pub(crate) fn last_frame(&self) -> Option<&[String]> {
        self.frames.last().map(Vec::as_slice)
    }
}

#[cfg(test)]
impl Surface for MemorySurface {
    fn size(&self) -> (u16, u16) {
        (self.buffer.width, self.buffer.height)
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn draw_cell(&mut self, x: i32, y: i32, symbol: char) {
        self.buffer.set(x, y, symbol);
    }

    fn flush(&mut self) -> Result<()> {
        self.frames.push(self.buffer.rows().collect());
        Ok(())
    }
}
