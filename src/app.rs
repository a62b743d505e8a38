use crate::calendar::{Calendar, Clock, WeekStrip};
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};

#[derive(Debug)]
pub(crate) struct App<C> {
    strip: WeekStrip,
    clock: C,
    state: AppState,
}

impl<C: Clock> App<C> {
    pub(crate) fn new(strip: WeekStrip, clock: C) -> App<C> {
        App {
            strip,
            clock,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                tracing::trace!(?code, ?modifiers, "rejected key");
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('j') | KeyCode::Down => self.strip.one_week_forwards().is_ok(),
                KeyCode::Char('k') | KeyCode::Up => self.strip.one_week_backwards().is_ok(),
                KeyCode::Char('z') | KeyCode::PageDown => self.strip.one_page_forwards().is_ok(),
                KeyCode::Char('w') | KeyCode::PageUp => self.strip.one_page_backwards().is_ok(),
                KeyCode::Char('h') | KeyCode::Left => self.strip.move_selection(-1).is_ok(),
                KeyCode::Char('l') | KeyCode::Right => self.strip.move_selection(1).is_ok(),
                KeyCode::Char('H') => self.strip.move_selection(-7).is_ok(),
                KeyCode::Char('L') => self.strip.move_selection(7).is_ok(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.strip.jump_to_date(self.clock.today()).is_ok()
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                let input = match key {
                    KeyCode::Char('-') => JumpToInput::Negative,
                    KeyCode::Char('+') => JumpToInput::Positive,
                    KeyCode::Char(c) => match c.to_digit(10).and_then(|d| u8::try_from(d).ok()) {
                        Some(d) => JumpToInput::Digit(d),
                        None => return false,
                    },
                    KeyCode::Backspace | KeyCode::Delete => JumpToInput::Backspace,
                    KeyCode::Enter => JumpToInput::Enter,
                    _ => return false,
                };
                match state.handle_input(input) {
                    JumpToOutput::Ok => true,
                    JumpToOutput::Invalid => false,
                    JumpToOutput::Jump(date) => {
                        self.state = AppState::Calendar;
                        tracing::debug!(%date, "jumping to date");
                        self.strip.jump_to_date(date).is_ok()
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl<C: Clock> Widget for &mut App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        Calendar::new(self.clock.today()).render(area, buf, &mut self.strip);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}
