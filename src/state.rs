use tracing::{debug, trace};

use crate::domain::ViewError;
use crate::filter::{self, FilterCriteria, NAME_FILTER, SEVERITY_FILTER};
use crate::record::{Field, Record};
use crate::sort::{self, SortCriteria, SortDirection};

/// Single owner of the loaded records and the current filter/sort selections.
///
/// Every mutation goes through this type. [`ViewState::display_data`] rebuilds
/// the visible rows from scratch on each call and hands out an owned snapshot.
#[derive(Debug, Clone)]
pub struct ViewState {
    data: Option<Vec<Record>>,
    filters: FilterCriteria,
    sorting: SortCriteria,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        let mut state = Self {
            data: None,
            filters: FilterCriteria::default(),
            sorting: SortCriteria::default(),
        };
        state.reset_state();
        state
    }

    /// Replaces all records.
    pub fn set_data(&mut self, records: Vec<Record>) {
        debug!("Loaded {} records into view state", records.len());
        self.data = Some(records);
    }

    pub fn data(&self) -> Option<&[Record]> {
        self.data.as_deref()
    }

    pub fn set_name_filter(&mut self, value: Option<&str>) {
        self.filters.set(&NAME_FILTER, value);
        trace!("Name filter set to {:?}", self.filters.get(&NAME_FILTER));
    }

    pub fn set_severity_filter(&mut self, value: Option<&str>) {
        self.filters.set(&SEVERITY_FILTER, value);
        trace!("Severity filter set to {:?}", self.filters.get(&SEVERITY_FILTER));
    }

    pub fn filter_criteria(&self) -> &FilterCriteria {
        &self.filters
    }

    /// Selects the sort field; the direction is only changed when given.
    pub fn set_sorting(&mut self, field: Field, direction: Option<SortDirection>) {
        self.sorting.select(field);
        if let Some(direction) = direction {
            self.sorting.direction = direction;
        }
        trace!("Sorting by {} {}", field, self.sorting.direction);
    }

    pub fn toggle_sort_direction(&mut self) -> Result<(), ViewError> {
        if self.sorting.field().is_none() {
            return Err(ViewError::MissingArgument("sort field"));
        }
        self.sorting.direction = self.sorting.direction.toggled();
        trace!("Sort direction toggled to {}", self.sorting.direction);
        Ok(())
    }

    pub fn sort_criteria(&self) -> &SortCriteria {
        &self.sorting
    }

    /// All filters back to their defaults, sort by name ascending.
    pub fn reset_state(&mut self) {
        self.filters.reset();
        self.set_sorting(Field::Name, Some(SortDirection::Ascending));
    }

    /// Filters then sorts the loaded records.
    pub fn display_data(&self) -> Result<Vec<Record>, ViewError> {
        let data = self.data.as_deref().ok_or(ViewError::MissingArgument("records"))?;
        let (field, comparator) = self
            .sorting
            .field()
            .zip(self.sorting.comparator())
            .ok_or(ViewError::MissingArgument("sort field"))?;

        let filtered = filter::filter_by_criteria(data, &self.filters);
        sort::sort_with(&filtered, field, comparator, self.sorting.direction)
    }
}
