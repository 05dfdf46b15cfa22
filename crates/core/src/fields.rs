// ABOUTME: Semantic field keys and the RawRecord of values gathered from one page.
// ABOUTME: RawRecord is monotonic: a field is set at most once and never overwritten.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic field keys a site profile can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Company,
    Title,
    Salary,
    Description,
    WorkHours,
    WorkDays,
    Location,
    Requirements,
    Benefits,
    Transport,
    Station,
}

impl Field {
    /// Wire name of the field, matching the raw-record JSON keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Company => "company",
            Field::Title => "title",
            Field::Salary => "salary",
            Field::Description => "description",
            Field::WorkHours => "workHours",
            Field::WorkDays => "workDays",
            Field::Location => "location",
            Field::Requirements => "requirements",
            Field::Benefits => "benefits",
            Field::Transport => "transport",
            Field::Station => "station",
        }
    }

    /// Label used in diagnostic events, matching the source sites' own vocabulary.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Company => "企業名",
            Field::Title => "職種/店舗名",
            Field::Salary => "給与",
            Field::Description => "仕事内容",
            Field::WorkHours => "勤務時間",
            Field::WorkDays => "勤務日",
            Field::Location => "勤務地",
            Field::Requirements => "応募資格",
            Field::Benefits => "待遇・福利厚生",
            Field::Transport => "交通",
            Field::Station => "最寄駅",
        }
    }
}

/// Unnormalized field values gathered from one page.
///
/// Populated incrementally: first by selector resolution, then by
/// structured-data backfill. A field holding a value is never overwritten,
/// and empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<Field, String>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field if it has no value yet. Whitespace-only input is ignored.
    ///
    /// Returns true if the value was stored.
    pub fn set_if_absent(&mut self, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() || self.fields.contains_key(&field) {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    /// Returns the stored value for a field, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Returns true if the field holds a value.
    pub fn is_set(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Number of fields holding a value.
    pub fn extracted_count(&self) -> usize {
        self.fields.len()
    }
}
