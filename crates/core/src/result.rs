// ABOUTME: Canonical record schema and the success/failure response envelopes.
// ABOUTME: Mirrors the wire format consumed by downstream clients (camelCase keys).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::fields::RawRecord;

/// Absence representation for canonical fields left empty after
/// normalization.
///
/// Fixed per deployment (not per request) so downstream consumers see a
/// stable payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbsencePolicy {
    /// Keep empty strings and empty lists in the payload.
    #[default]
    KeepEmpty,
    /// Drop empty fields from the payload entirely.
    ElideEmpty,
}

/// The normalized output schema.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonicalRecord {
    pub source: String,
    pub company_name: String,
    pub store_name: Vec<String>,
    pub job_type: String,
    pub job_description: String,
    pub work_hours: String,
    pub work_days: String,
    pub salary: String,
    pub transportation: String,
    pub benefits: String,
    pub requirements: String,
    pub location: String,
    pub near_station: String,
    pub additional_info: String,
}

impl CanonicalRecord {
    /// Serializes the record, applying the deployment's absence policy.
    pub fn to_payload(&self, policy: AbsencePolicy) -> serde_json::Value {
        let mut value = serde_json::to_value(self).expect("canonical record serializes");
        if policy == AbsencePolicy::ElideEmpty {
            if let serde_json::Value::Object(ref mut map) = value {
                map.retain(|_, v| match v {
                    serde_json::Value::String(s) => !s.is_empty(),
                    serde_json::Value::Array(a) => !a.is_empty(),
                    _ => true,
                });
            }
        }
        value
    }
}

/// Outcome of a successful scrape before envelope assembly.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub source: String,
    pub record: CanonicalRecord,
    pub raw: RawRecord,
    pub extracted_count: usize,
}

/// Success envelope returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeSuccess {
    pub success: bool,
    pub source: String,
    pub data: serde_json::Value,
    pub raw_data: RawRecord,
    pub extracted_count: usize,
    pub timestamp: String,
}

/// Failure envelope: error message plus the original URL and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeFailure {
    pub success: bool,
    pub error: String,
    pub url: String,
    pub timestamp: String,
}

/// The response envelope, one of success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeEnvelope {
    Success(ScrapeSuccess),
    Failure(ScrapeFailure),
}

impl ScrapeEnvelope {
    /// Builds a success envelope from a scrape report.
    pub fn success(report: &ScrapeReport, policy: AbsencePolicy) -> Self {
        ScrapeEnvelope::Success(ScrapeSuccess {
            success: true,
            source: report.source.clone(),
            data: report.record.to_payload(policy),
            raw_data: report.raw.clone(),
            extracted_count: report.extracted_count,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Builds a failure envelope carrying the original URL.
    pub fn failure(error: impl Into<String>, url: impl Into<String>) -> Self {
        ScrapeEnvelope::Failure(ScrapeFailure {
            success: false,
            error: error.into(),
            url: url.into(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Returns true for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeEnvelope::Success(_))
    }
}
