use std::iter;

use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, SessionSnapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::{BlockDisplay, CellBlock};

/// Draws the board grid with the falling piece on top of it.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    snapshot: &'a SessionSnapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(snapshot: &'a SessionSnapshot) -> Self {
        Self {
            snapshot,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        20 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn cells(&self) -> [[CellBlock; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut cells = self.snapshot.grid.map(|row| {
            row.map(|occupied| {
                if occupied {
                    CellBlock::Locked
                } else {
                    CellBlock::Empty
                }
            })
        });
        // Cells above the top row are not drawn.
        for (x, y) in self.snapshot.active_cells {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < BOARD_WIDTH
                && y < BOARD_HEIGHT
            {
                cells[y][x] = CellBlock::Active(self.snapshot.active_color);
            }
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ BOARD_HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ BOARD_WIDTH }>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.cells()) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                BlockDisplay::from_cell(cell, true).render(grid_cell, buf);
            }
        }
    }
}
