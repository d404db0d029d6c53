use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use super::tile::{Tile, compose};
use crate::{maze::Coord, stepping::Stepper};

/// Draws boards and status lines onto the alternate screen.
pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Whether the last frame was the "terminal too small" notice
    showing_notice: bool,
}

impl Renderer {
    /// Rows above the boards: status line and per-board headers
    pub const HEADER_ROWS: u16 = 2;
    /// Rows below the boards: controls help
    pub const FOOTER_ROWS: u16 = 1;
    /// Columns between two boards in a race
    pub const BOARD_GAP: u16 = 2;

    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            showing_notice: false,
        }
    }

    /// Screen size needed to show `boards` grids of side `size` next to each other.
    /// Saturates at `u16::MAX`, which no terminal can satisfy.
    pub fn required_size(size: u16, boards: u16) -> (u16, u16) {
        let board_width = Renderer::board_width(size);
        let width = boards
            .saturating_mul(board_width)
            .saturating_add(boards.saturating_sub(1).saturating_mul(Renderer::BOARD_GAP));
        let height = Renderer::HEADER_ROWS
            .saturating_add(size)
            .saturating_add(Renderer::FOOTER_ROWS);
        (width, height)
    }

    pub fn board_width(size: u16) -> u16 {
        size.saturating_mul(Tile::CELL_WIDTH)
    }

    pub fn board_origin(size: u16, index: u16) -> (u16, u16) {
        let stride = Renderer::board_width(size).saturating_add(Renderer::BOARD_GAP);
        (index.saturating_mul(stride), Renderer::HEADER_ROWS)
    }

    pub fn clear(&mut self) -> std::io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        self.showing_notice = false;
        Ok(())
    }

    /// Check if terminal size is sufficient for the given board layout.
    /// If not, display a message instead and return Ok(false).
    pub fn check_size(&mut self, size: u16, boards: u16) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let (width, height) = Renderer::required_size(size, boards);
        if term_width >= width && term_height >= height {
            if self.showing_notice {
                self.clear()?;
            }
            return Ok(true);
        }

        let msg = format!(
            "Terminal size is too small ({}x{}) to display {} board(s) of {}x{} (needs {}x{}). Please resize the terminal.\r\n",
            term_width, term_height, boards, size, size, width, height
        );
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            style::PrintStyledContent(
                "Press Esc to exit...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            )
        )?;
        self.stdout.flush()?;
        self.showing_notice = true;
        Ok(false)
    }

    /// Draws one state with its overlays, top-left corner at `origin`.
    pub fn draw_board<S: Stepper>(
        &mut self,
        state: &S,
        origin: (u16, u16),
        endpoints: Option<(Coord, Coord)>,
    ) -> std::io::Result<()> {
        let size = state.grid().size();
        let tiles = compose(state, endpoints);
        for (y, row) in tiles.chunks(size as usize).enumerate() {
            self.stdout
                .queue(cursor::MoveTo(origin.0, origin.1 + y as u16))?;
            for tile in row {
                self.stdout.queue(style::Print(tile))?;
            }
        }
        Ok(())
    }

    /// Prints `text` at `(col, row)`, cut to `width` columns and padded to clear leftovers.
    pub fn draw_text(
        &mut self,
        (col, row): (u16, u16),
        width: u16,
        text: &str,
        color: Color,
    ) -> std::io::Result<()> {
        let (fitted, used) = text.unicode_truncate(width as usize);
        let padding = " ".repeat(width as usize - used);
        queue!(
            self.stdout,
            cursor::MoveTo(col, row),
            style::PrintStyledContent(fitted.with(color).attribute(Attribute::Bold)),
            style::Print(padding)
        )?;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.stdout.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
