use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::trace;

use crate::domain::ViewError;
use crate::record::{Field, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Anything other than "desc" (any case) sorts ascending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value handed to a comparator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    Date(DateTime<Utc>),
}

/// Comparison rule of a sortable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    String,
    Number,
    Date,
}

impl Comparator {
    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Name | Field::CountryCheckSeverity => Comparator::String,
            Field::Created | Field::Modified => Comparator::Date,
        }
    }

    fn invalid(&self, value: &SortValue) -> ViewError {
        match value {
            SortValue::Text("") => {
                ViewError::InvalidArgument(format!("{self:?} comparator got an empty value"))
            }
            v => ViewError::InvalidArgument(format!("{self:?} comparator cannot compare {v:?}")),
        }
    }

    // Lowercased text, only for the string comparator
    fn text_key(&self, value: &SortValue) -> Result<String, ViewError> {
        match (self, value) {
            (Comparator::String, SortValue::Text(s)) if !s.is_empty() => Ok(s.to_lowercase()),
            (_, v) => Err(self.invalid(v)),
        }
    }

    // Finite number; dates become epoch milliseconds
    fn number_key(&self, value: &SortValue) -> Result<f64, ViewError> {
        let n = match (self, value) {
            (Comparator::Number, SortValue::Number(n)) => *n,
            (Comparator::Date, SortValue::Date(d)) => d.timestamp_millis() as f64,
            (Comparator::Date, SortValue::Text(s)) if !s.is_empty() => {
                parse_date(s)?.timestamp_millis() as f64
            }
            (_, v) => return Err(self.invalid(v)),
        };
        if !n.is_finite() {
            return Err(ViewError::InvalidArgument(format!("non finite number {n}")));
        }
        Ok(n)
    }

    /// Orders `a` against `b`; descending reverses the result.
    pub fn compare(
        &self,
        a: &SortValue,
        b: &SortValue,
        direction: SortDirection,
    ) -> Result<Ordering, ViewError> {
        let ord = match self {
            Comparator::String => self.text_key(a)?.cmp(&self.text_key(b)?),
            Comparator::Number | Comparator::Date => {
                number_order(self.number_key(a)?, self.number_key(b)?)
            }
        };
        Ok(direction.apply(ord))
    }
}

// Keys are finite, so partial_cmp always answers
fn number_order(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Parses the ISO-8601 forms a browser `Date` accepts: full timestamps,
/// minute precision, `YYYY-MM-DD`, `YYYY-MM` and `YYYY`.
/// Values without an offset are taken as UTC.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, ViewError> {
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Ok(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%#z") {
        return Ok(d.with_timezone(&Utc));
    }
    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(d) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(d.and_utc());
        }
    }
    let padded = match s.len() {
        4 => format!("{s}-01-01"),
        7 => format!("{s}-01"),
        _ => s.to_string(),
    };
    if let Some(d) = NaiveDate::parse_from_str(&padded, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(d.and_utc());
    }
    Err(ViewError::InvalidArgument(format!("invalid date `{s}`")))
}

/// Active sort field and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortCriteria {
    selected: Option<(Field, Comparator)>,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn select(&mut self, field: Field) {
        self.selected = Some((field, Comparator::for_field(field)));
    }

    pub fn field(&self) -> Option<Field> {
        self.selected.map(|(f, _)| f)
    }

    pub fn comparator(&self) -> Option<Comparator> {
        self.selected.map(|(_, c)| c)
    }
}

/// Returns `records` ordered by `field`. The sort is stable.
pub fn sort(records: &[Record], field: Field, direction: SortDirection) -> Result<Vec<Record>, ViewError> {
    sort_with(records, field, Comparator::for_field(field), direction)
}

pub(crate) fn sort_with(
    records: &[Record],
    field: Field,
    comparator: Comparator,
    direction: SortDirection,
) -> Result<Vec<Record>, ViewError> {
    // Nothing is compared below two rows
    if records.len() < 2 {
        return Ok(records.to_vec());
    }
    let sorted = match comparator {
        Comparator::String => sort_keyed(
            records,
            |r| comparator.text_key(&SortValue::Text(r.get(field))),
            |a, b| a.cmp(b),
            direction,
        )?,
        Comparator::Number | Comparator::Date => sort_keyed(
            records,
            |r| comparator.number_key(&SortValue::Text(r.get(field))),
            |a, b| number_order(*a, *b),
            direction,
        )?,
    };
    trace!("Sorted {} rows by {} {}", sorted.len(), field, direction);
    Ok(sorted)
}

// Create (key, record) pairs once, any invalid value aborts the sort
fn sort_keyed<K>(
    records: &[Record],
    key: impl Fn(&Record) -> Result<K, ViewError>,
    order: impl Fn(&K, &K) -> Ordering,
    direction: SortDirection,
) -> Result<Vec<Record>, ViewError> {
    let mut keyed: Vec<(K, &Record)> = Vec::with_capacity(records.len());
    for r in records {
        keyed.push((key(r)?, r));
    }
    keyed.sort_by(|(a, _), (b, _)| direction.apply(order(a, b)));
    Ok(keyed.into_iter().map(|(_, r)| r.clone()).collect())
}
