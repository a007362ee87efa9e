use std::{thread, time::Duration};

use anyhow::Context as _;
use blockfall_engine::{Command, GameSummary, PieceSeed, SessionEvent, SessionState};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    record::{RecordingSession, SessionHistory},
    ui::widgets::SessionDisplay,
};

#[derive(Debug)]
pub struct PlayApp {
    session: RecordingSession,
    tick: Duration,
    game_over_drawn: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(seed: PieceSeed, history_size: usize, tick: Duration) -> Self {
        Self {
            session: RecordingSession::new(seed, history_size),
            tick,
            game_over_drawn: false,
            is_exiting: false,
        }
    }

    pub fn summary(&self) -> GameSummary {
        self.session.summary()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.session_state().is_game_over()
    }

    pub fn into_history(self) -> SessionHistory {
        self.session.into_history()
    }

    /// Runs the game loop until the player quits or dismisses the game-over popup.
    ///
    /// Each iteration drains pending input, applies one gravity step, draws
    /// the frame and sleeps for one tick.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        self.render(terminal)?;

        while !self.is_exiting {
            while event::poll(Duration::ZERO).context("Failed to poll terminal events")? {
                let event = event::read().context("Failed to read terminal event")?;
                self.handle_event(&event);
            }
            if self.is_exiting {
                break;
            }
            self.session.tick();

            self.render(terminal)?;
            thread::sleep(self.tick);
        }
        Ok(())
    }

    fn render(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        terminal
            .draw(|frame| self.draw(frame))
            .context("Failed to draw frame")?;
        self.game_over_drawn = self.is_game_over();
        Ok(())
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let session_display = SessionDisplay::new(&self.session);
        let help = Text::from(help_text(self.session.session_state()))
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(23), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.is_game_over() {
            // Keys queued before the popup was drawn must not dismiss it.
            self.is_exiting = self.game_over_drawn;
            return;
        }
        if let Some(command) = command_for_key(key.code)
            && let Some(SessionEvent::QuitRequested) = self.session.apply(command)
        {
            self.is_exiting = true;
        }
    }
}

fn help_text(state: &SessionState) -> &'static str {
    match state {
        SessionState::Playing => {
            "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Pause) | Q (Quit)"
        }
        SessionState::Paused => {
            "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Space (Resume) | Q (Quit)"
        }
        SessionState::GameOver => "Press any key to exit",
    }
}

fn command_for_key(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Up => Command::Rotate,
        KeyCode::Char(' ') => Command::TogglePause,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}
