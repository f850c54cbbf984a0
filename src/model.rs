use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, trace};

use sv::domain::{ViewConfig, ViewError};
use sv::filter::{NAME_FILTER, SEVERITY_FILTER};
use sv::record::{Field, Record};
use sv::sort::SortDirection;
use sv::state::ViewState;

use crate::controller::{HELP_TEXT, Message};
use crate::inputter::{InputResult, Inputter};
use crate::ui::{CMDLINE_HEIGHT, STATUSLINE_HEIGHT, TABLE_HEADER_HEIGHT};

/// Values the severity filter cycles through, starting from "no filter".
pub const SEVERITY_OPTIONS: [&str; 5] = [
    SEVERITY_FILTER.default(),
    "30-UNKNOWN",
    "60-OK",
    "70-WARNING",
    "90-CRITICAL",
];

#[derive(Debug, PartialEq)]
pub enum Status {
    EMPTY,
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    NAMEINPUT,
}

/// Everything the ui needs to draw one frame.
pub struct UIData<'a> {
    pub rows: &'a [Record],
    pub total: usize,
    pub selected_row: usize,
    pub sort_field: Option<Field>,
    pub sort_direction: SortDirection,
    pub name_filter: &'a str,
    pub severity_filter: &'a str,
    pub cmdinput: &'a InputResult,
    pub active_cmdinput: bool,
    pub status_message: &'a str,
}

pub struct Model {
    pub status: Status,
    modus: Modus,
    view: ViewState,
    rows: Vec<Record>, // Last display snapshot
    curser_row: usize,
    table_height: usize,
    input: Inputter,
    last_input: InputResult,
    status_message: String,
}

impl Model {
    pub fn init(config: &ViewConfig, ui_width: usize, ui_height: usize) -> Self {
        trace!("Init model {ui_width}x{ui_height} with {config:?}");
        Self {
            status: Status::EMPTY,
            modus: Modus::TABLE,
            view: ViewState::new(),
            rows: Vec::new(),
            curser_row: 0,
            table_height: Self::table_height(ui_height),
            input: Inputter::default(),
            last_input: InputResult::default(),
            status_message: HELP_TEXT.to_string(),
        }
    }

    pub fn set_data(&mut self, records: Vec<Record>) -> Result<(), ViewError> {
        self.view.set_data(records);
        self.status = Status::READY;
        self.refresh()
    }

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::NAMEINPUT
    }

    pub fn get_uidata(&self) -> UIData<'_> {
        let filters = self.view.filter_criteria();
        let sorting = self.view.sort_criteria();
        UIData {
            rows: &self.rows,
            total: self.view.data().map_or(0, |d| d.len()),
            selected_row: self.curser_row,
            sort_field: sorting.field(),
            sort_direction: sorting.direction,
            name_filter: filters.get(&NAME_FILTER),
            severity_filter: filters.get(&SEVERITY_FILTER),
            cmdinput: &self.last_input,
            active_cmdinput: self.raw_keyevents(),
            status_message: &self.status_message,
        }
    }

    pub fn update(&mut self, message: Message) -> Result<(), ViewError> {
        trace!("Update: Modus {:?}, Message {:?}", self.modus, message);
        match self.modus {
            Modus::TABLE => match message {
                Message::Quit => self.status = Status::QUITTING,
                Message::MoveUp => self.move_selection_up(1),
                Message::MoveDown => self.move_selection_down(1),
                Message::MovePageUp => self.move_selection_up(self.table_height),
                Message::MovePageDown => self.move_selection_down(self.table_height),
                Message::MoveBeginning => self.curser_row = 0,
                Message::MoveEnd => self.curser_row = self.rows.len().saturating_sub(1),
                Message::SortBy(field) => self.sort_by(field)?,
                Message::CycleSeverity => self.cycle_severity()?,
                Message::EditNameFilter => self.enter_name_input(),
                Message::ClearNameFilter => {
                    self.view.set_name_filter(None);
                    self.refresh()?;
                }
                Message::Reset => {
                    self.view.reset_state();
                    self.input.clear();
                    self.last_input = self.input.get();
                    self.set_status_message("Filters and sorting reset");
                    self.refresh()?;
                }
                Message::Resize(_, height) => self.table_height = Self::table_height(height),
                Message::RawKey(_) => {}
            },
            Modus::NAMEINPUT => match message {
                Message::RawKey(key) => self.raw_input(key)?,
                Message::Resize(_, height) => self.table_height = Self::table_height(height),
                _ => {}
            },
        }
        Ok(())
    }

    // Rebuilds the visible rows, engine errors end the session
    fn refresh(&mut self) -> Result<(), ViewError> {
        self.rows = self.view.display_data()?;
        self.curser_row = self.curser_row.min(self.rows.len().saturating_sub(1));
        debug!("Showing {} rows", self.rows.len());
        Ok(())
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn table_height(ui_height: usize) -> usize {
        ui_height
            .saturating_sub(CMDLINE_HEIGHT + STATUSLINE_HEIGHT + TABLE_HEADER_HEIGHT)
            .max(1)
    }

    // A header press flips the direction before selecting the column
    fn sort_by(&mut self, field: Field) -> Result<(), ViewError> {
        self.view.toggle_sort_direction()?;
        self.view.set_sorting(field, None);
        let direction = self.view.sort_criteria().direction;
        self.set_status_message(format!("Sorted by {field} {direction}"));
        self.refresh()
    }

    fn cycle_severity(&mut self) -> Result<(), ViewError> {
        let current = self.view.filter_criteria().get(&SEVERITY_FILTER);
        let idx = SEVERITY_OPTIONS
            .iter()
            .position(|&s| s == current)
            .map_or(0, |i| (i + 1) % SEVERITY_OPTIONS.len());
        self.view.set_severity_filter(Some(SEVERITY_OPTIONS[idx]));
        self.set_status_message(format!("Severity: {}", SEVERITY_OPTIONS[idx]));
        self.refresh()
    }

    fn enter_name_input(&mut self) {
        trace!("Editing name filter ...");
        self.modus = Modus::NAMEINPUT;
        let current = self.view.filter_criteria().get(&NAME_FILTER).to_string();
        self.input.set(&current);
        self.last_input = self.input.get();
    }

    // The filter follows every keystroke
    fn raw_input(&mut self, key: KeyEvent) -> Result<(), ViewError> {
        self.last_input = self.input.read(key);
        if self.last_input.changed {
            let value = self.last_input.input.clone();
            self.view.set_name_filter(Some(&value));
            self.refresh()?;
        }
        if self.last_input.finished {
            self.modus = Modus::TABLE;
            let total = self.view.data().map_or(0, |d| d.len());
            let message = format!("{} of {} rows", self.rows.len(), total);
            self.set_status_message(message);
        }
        Ok(())
    }

    fn move_selection_up(&mut self, size: usize) {
        self.curser_row = self.curser_row.saturating_sub(size);
    }

    fn move_selection_down(&mut self, size: usize) {
        let last = self.rows.len().saturating_sub(1);
        self.curser_row = (self.curser_row + size).min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use std::path::PathBuf;

    fn model() -> Model {
        let mut model = Model::init(&ViewConfig::default(), 120, 30);
        let records = sv::loader::load_records(PathBuf::from("tests/fixtures/screenings.json")).unwrap();
        model.set_data(records).unwrap();
        model
    }

    fn key(c: char) -> Message {
        Message::RawKey(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn loads_all_rows() {
        let model = model();
        assert_eq!(model.status, Status::READY);
        assert_eq!(model.get_uidata().rows.len(), 21);
    }

    #[test]
    fn name_filter_is_live() {
        let mut model = model();
        model.update(Message::EditNameFilter).unwrap();
        assert!(model.raw_keyevents());
        model.update(key('a')).unwrap();
        model.update(key('r')).unwrap();
        assert_eq!(model.get_uidata().rows.len(), 5);
        assert_eq!(model.get_uidata().name_filter, "ar");

        model
            .update(Message::RawKey(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
        assert!(!model.raw_keyevents());
        assert_eq!(model.get_uidata().rows.len(), 5);

        model.update(Message::ClearNameFilter).unwrap();
        assert_eq!(model.get_uidata().rows.len(), 21);
    }

    #[test]
    fn severity_cycles_back_to_all() {
        let mut model = model();
        let mut counts = Vec::new();
        for _ in 0..SEVERITY_OPTIONS.len() {
            model.update(Message::CycleSeverity).unwrap();
            counts.push(model.get_uidata().rows.len());
        }
        assert_eq!(counts, [6, 7, 2, 6, 21]);
        assert_eq!(model.get_uidata().severity_filter, "all");
    }

    #[test]
    fn header_press_toggles_direction() {
        let mut model = model();
        model.update(Message::SortBy(Field::Name)).unwrap();
        assert_eq!(model.get_uidata().sort_direction, SortDirection::Descending);
        model.update(Message::SortBy(Field::Created)).unwrap();
        let ui = model.get_uidata();
        assert_eq!(ui.sort_field, Some(Field::Created));
        assert_eq!(ui.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn reset_restores_everything() {
        let mut model = model();
        model.update(Message::CycleSeverity).unwrap();
        model.update(Message::SortBy(Field::Modified)).unwrap();
        model.update(Message::Reset).unwrap();
        let ui = model.get_uidata();
        assert_eq!(ui.rows.len(), 21);
        assert_eq!(ui.sort_field, Some(Field::Name));
        assert_eq!(ui.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn cursor_stays_inside_rows() {
        let mut model = model();
        model.update(Message::MoveEnd).unwrap();
        assert_eq!(model.get_uidata().selected_row, 20);
        model.update(Message::CycleSeverity).unwrap();
        assert_eq!(model.get_uidata().selected_row, 5);
        model.update(Message::MovePageDown).unwrap();
        assert_eq!(model.get_uidata().selected_row, 5);
        model.update(Message::MovePageUp).unwrap();
        assert_eq!(model.get_uidata().selected_row, 0);
    }

    #[test]
    fn quit() {
        let mut model = model();
        model.update(Message::Quit).unwrap();
        assert_eq!(model.status, Status::QUITTING);
    }
}
