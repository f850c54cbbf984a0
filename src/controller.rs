use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};
use sv::domain::{ViewConfig, ViewError};
use sv::record::Field;

use crate::model::Model;

/// Messages produced by the controller and consumed by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    SortBy(Field),
    CycleSeverity,
    EditNameFilter,
    ClearNameFilter,
    Reset,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
q quit | / filter name | Esc clear name | s cycle severity | \
1 name 2 modified 3 created 4 severity (sort) | r reset";

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &ViewConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, ViewError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    return Ok(self.handle_key(key, model.raw_keyevents()));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width as usize, height as usize)));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn handle_key(&self, key: KeyEvent, raw: bool) -> Option<Message> {
        let message = if raw {
            Some(Message::RawKey(key))
        } else {
            match key.code {
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Char('j') | KeyCode::Down => Some(Message::MoveDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::MoveUp),
                KeyCode::PageDown => Some(Message::MovePageDown),
                KeyCode::PageUp => Some(Message::MovePageUp),
                KeyCode::Char('g') | KeyCode::Home => Some(Message::MoveBeginning),
                KeyCode::Char('G') | KeyCode::End => Some(Message::MoveEnd),
                KeyCode::Char('/') => Some(Message::EditNameFilter),
                KeyCode::Esc => Some(Message::ClearNameFilter),
                KeyCode::Char('s') => Some(Message::CycleSeverity),
                KeyCode::Char('r') => Some(Message::Reset),
                KeyCode::Char('1') => Some(Message::SortBy(Field::Name)),
                KeyCode::Char('2') => Some(Message::SortBy(Field::Modified)),
                KeyCode::Char('3') => Some(Message::SortBy(Field::Created)),
                KeyCode::Char('4') => Some(Message::SortBy(Field::CountryCheckSeverity)),
                _ => None,
            }
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
