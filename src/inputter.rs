use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};
use tracing::trace;

/// Single line text input used for the name filter.
#[derive(Default)]
pub struct Inputter {
    current_input: String,
    curser_pos: usize, // in chars, not bytes
    finished: bool,
    canceled: bool,
}

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub canceled: bool,
    /// The text differs from before the key was read.
    pub changed: bool,
    pub curser_pos: usize,
}

impl Inputter {
    pub fn read(&mut self, key: event::KeyEvent) -> InputResult {
        let before = self.current_input.clone();
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.finished = true,
            (KeyCode::Esc, _) => {
                self.clear();
                self.canceled = true;
                self.finished = true;
            }
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.curser_pos = self.curser_pos.saturating_sub(1),
            (KeyCode::Right, _) => self.curser_pos = (self.curser_pos + 1).min(self.char_len()),
            (KeyCode::Home, _) => self.curser_pos = 0,
            (KeyCode::End, _) => self.curser_pos = self.char_len(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.current_input.clear();
                self.curser_pos = 0;
            }
            (KeyCode::Char(chr), m) if !m.contains(KeyModifiers::CONTROL) => self.insert(chr),
            _ => {}
        }
        let mut result = self.get();
        result.changed = result.input != before;
        trace!("Input {:?} => {:?}", key.code, result);
        result
    }

    /// Starts editing from `s` with the cursor at its end.
    pub fn set(&mut self, s: &str) {
        self.clear();
        self.current_input = s.to_string();
        self.curser_pos = self.char_len();
    }

    pub fn get(&self) -> InputResult {
        InputResult {
            canceled: self.canceled,
            finished: self.finished,
            input: self.current_input.clone(),
            changed: false,
            curser_pos: self.curser_pos,
        }
    }

    pub fn clear(&mut self) {
        self.canceled = false;
        self.finished = false;
        self.current_input.clear();
        self.curser_pos = 0;
    }

    fn insert(&mut self, chr: char) {
        let pos = self.bytepos(self.curser_pos);
        self.current_input.insert(pos, chr);
        self.curser_pos += 1;
    }

    fn backspace(&mut self) {
        if self.curser_pos > 0 {
            self.curser_pos -= 1;
            let pos = self.bytepos(self.curser_pos);
            self.current_input.remove(pos);
        }
    }

    fn delete(&mut self) {
        if self.curser_pos < self.char_len() {
            let pos = self.bytepos(self.curser_pos);
            self.current_input.remove(pos);
        }
    }

    fn char_len(&self) -> usize {
        self.current_input.chars().count()
    }

    fn bytepos(&self, char_pos: usize) -> usize {
        self.current_input
            .char_indices()
            .nth(char_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}
