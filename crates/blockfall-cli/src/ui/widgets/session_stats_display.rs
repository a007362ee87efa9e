use std::iter;

use blockfall_engine::GameStats;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct SessionStatsDisplay<'a> {
    stats: &'a GameStats,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(stats: &'a GameStats) -> Self {
        Self { stats, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        ROWS_HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(fn(&GameStats) -> usize),
    LabelValue(&'static str, fn(&GameStats) -> usize),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(GameStats::score),
    Row::Empty,
    Row::LabelValue("LINES:", GameStats::lines),
    Row::LabelValue("CLEARED:", GameStats::total_cleared_lines),
    Row::LabelValue("PIECES:", GameStats::completed_pieces),
    Row::Empty,
    Row::LabelValue("SINGLES:", |stats| stats.line_cleared_counter()[1]),
    Row::LabelValue("DOUBLES:", |stats| stats.line_cleared_counter()[2]),
    Row::LabelValue("TRIPLES:", |stats| stats.line_cleared_counter()[3]),
    Row::LabelValue("QUADS:", |stats| stats.line_cleared_counter()[4]),
];

#[expect(clippy::cast_possible_truncation)]
const ROWS_HEIGHT: u16 = ROWS.len() as u16;

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.stats).to_string(), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.stats).to_string(), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
