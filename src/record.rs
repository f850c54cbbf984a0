use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ViewError;

/// One screening entry, displayed as a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub created: String,
    pub modified: String,
    pub country_check_severity: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        created: impl Into<String>,
        modified: impl Into<String>,
        country_check_severity: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            created: created.into(),
            modified: modified.into(),
            country_check_severity: country_check_severity.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Created => &self.created,
            Field::Modified => &self.modified,
            Field::CountryCheckSeverity => &self.country_check_severity,
        }
    }

    /// Numeric rank in front of the severity label, "90-CRITICAL" => 90.
    pub fn severity_rank(&self) -> Option<u8> {
        let (rank, _) = self.country_check_severity.split_once('-')?;
        rank.parse().ok()
    }

    /// Severity label without its rank, lowercased: "90-CRITICAL" => "critical".
    pub fn severity_label(&self) -> String {
        self.country_check_severity
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .trim_start_matches('-')
            .to_lowercase()
    }
}

/// Named attributes of a [`Record`] that can be filtered or sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Created,
    Modified,
    CountryCheckSeverity,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Name,
        Field::Created,
        Field::Modified,
        Field::CountryCheckSeverity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Created => "created",
            Field::Modified => "modified",
            Field::CountryCheckSeverity => "country_check_severity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ViewError::MissingArgument("field"));
        }
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ViewError::InvalidArgument(format!("unknown field `{s}`")))
    }
}

/// Envelope delivered by the screenings endpoint: `{"count": .., "results": [..]}`.
#[derive(Debug, Deserialize)]
pub struct Screenings {
    pub results: Vec<Record>,
}
