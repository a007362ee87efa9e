use blockfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, SessionStatsDisplay, color, style};

/// Board, stats panel and the pause / game-over popups for one session.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let snapshot = self.session.snapshot();
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.session_state() {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };

        let game_board = BoardDisplay::new(&snapshot).block(
            Block::bordered()
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let session_stats = SessionStatsDisplay::new(self.session.stats()).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [stats_column, board_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(stats_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(board_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);

        let popup = match self.session.session_state() {
            SessionState::Playing => None,
            SessionState::Paused => Some(("PAUSED", style::PAUSED_POPUP)),
            SessionState::GameOver => Some(("GAME OVER!!", style::GAME_OVER_POPUP)),
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Command, PieceSeed};

    use super::*;

    fn render(session: &GameSession) -> Buffer {
        let area = Rect::new(0, 0, 60, 23);
        let mut buf = Buffer::empty(area);
        SessionDisplay::new(session).render(area, &mut buf);
        buf
    }

    fn contains_text(buf: &Buffer, needle: &str) -> bool {
        (0..buf.area.height).any(|y| {
            let line: String = (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect();
            line.contains(needle)
        })
    }

    #[test]
    fn test_popup_follows_state() {
        let mut session = GameSession::new(PieceSeed::from(6));
        let buf = render(&session);
        assert!(contains_text(&buf, "STATS"));
        assert!(!contains_text(&buf, "PAUSED"));

        session.apply(Command::TogglePause);
        assert!(contains_text(&render(&session), "PAUSED"));

        session.apply(Command::TogglePause);
        while !session.session_state().is_game_over() {
            session.tick();
        }
        let buf = render(&session);
        assert!(contains_text(&buf, "GAME OVER!!"));
        assert!(!contains_text(&buf, "PAUSED"));
    }
}
