use tracing::trace;

use crate::record::{Field, Record};

/// How a filter value is compared against a record attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Strict equality.
    Exact,
    /// Case insensitive containment.
    Substring,
}

/// Static metadata for a filterable field.
///
/// Only the constants below exist, so every `FilterField` names a filterable
/// record field and owns one slot in [`FilterCriteria`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    idx: usize,
    field: Field,
    default: &'static str,
    mode: MatchMode,
}

impl FilterField {
    pub const fn field(&self) -> Field {
        self.field
    }

    /// Value meaning "no filter". A field holding it is never applied.
    pub const fn default(&self) -> &'static str {
        self.default
    }

    pub const fn mode(&self) -> MatchMode {
        self.mode
    }
}

pub const NAME_FILTER: FilterField = FilterField {
    idx: 0,
    field: Field::Name,
    default: "",
    mode: MatchMode::Substring,
};

pub const SEVERITY_FILTER: FilterField = FilterField {
    idx: 1,
    field: Field::CountryCheckSeverity,
    default: "all",
    mode: MatchMode::Exact,
};

/// Filter fields in the order they are applied.
pub const FILTER_FIELDS: [FilterField; 2] = [NAME_FILTER, SEVERITY_FILTER];

/// Current value per filter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    values: [String; FILTER_FIELDS.len()],
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            values: FILTER_FIELDS.map(|f| f.default.to_string()),
        }
    }
}

impl FilterCriteria {
    pub fn get(&self, field: &FilterField) -> &str {
        &self.values[field.idx]
    }

    /// Sets a field; `None` or an empty value restores the field's default.
    pub fn set(&mut self, field: &FilterField, value: Option<&str>) {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => field.default,
        };
        self.values[field.idx] = value.to_string();
    }

    /// Field/value pairs in application order.
    pub fn values(&self) -> Vec<(Field, &str)> {
        FILTER_FIELDS
            .iter()
            .map(|f| (f.field, self.get(f)))
            .collect()
    }

    /// True if at least one field differs from its default.
    pub fn is_active(&self) -> bool {
        FILTER_FIELDS.iter().any(|f| self.get(f) != f.default)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn matches(attr: &str, value: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Exact => attr == value,
        MatchMode::Substring => attr.to_lowercase().contains(&value.to_lowercase()),
    }
}

/// Returns the records whose `field` matches `value`, keeping input order.
pub fn filter_by(records: &[Record], field: Field, value: &str, mode: MatchMode) -> Vec<Record> {
    records
        .iter()
        .filter(|r| matches(r.get(field), value, mode))
        .cloned()
        .collect()
}

/// Applies every non-default field of `criteria` in turn (logical AND).
pub fn filter_by_criteria(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    let mut result = records.to_vec();
    for f in FILTER_FIELDS.iter() {
        let value = criteria.get(f);
        if value == f.default {
            continue;
        }
        result = filter_by(&result, f.field, value, f.mode);
        trace!("Filter {}={:?} kept {} rows", f.field, value, result.len());
    }
    result
}
