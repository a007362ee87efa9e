use blockfall_engine::PieceColor;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::style;

/// What a single board cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellBlock {
    Empty,
    Locked,
    Active(PieceColor),
}

#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: CellBlock, show_dots: bool) -> Self {
        match cell {
            CellBlock::Empty if show_dots => Self::new(style::EMPTY_DOT, "."),
            CellBlock::Empty => Self::new(style::EMPTY, ""),
            CellBlock::Locked => Self::new(style::LOCKED, ""),
            CellBlock::Active(color) => Self::new(style::piece(color), ""),
        }
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
