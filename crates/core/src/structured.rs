// ABOUTME: Embedded JSON-LD JobPosting discovery and raw-record reconciliation.
// ABOUTME: Structured metadata only backfills fields the selector engine missed.

//! Structured-data reconciler.
//!
//! Job-listing pages frequently embed a schema.org `JobPosting` object in
//! `application/ld+json` blocks. That data is used strictly as a fallback
//! source: it augments the raw record but never overrides a field that
//! selector resolution already populated, which makes reconciliation
//! idempotent by construction.

use serde_json::Value;

use crate::fields::{Field, RawRecord};

/// Job-posting fields recovered from embedded structured data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPosting {
    pub organization: Option<String>,
    pub title: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub region: Option<String>,
    pub locality: Option<String>,
    pub description: Option<String>,
}

/// Scans raw `ld+json` blocks for the first JobPosting object.
///
/// Blocks that fail to parse are skipped; JobPosting objects nested in
/// `@graph` holders or arrays are found by recursion.
pub fn find_job_posting(blocks: &[String]) -> Option<JobPosting> {
    for block in blocks {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            if let Some(posting) = find_in_value(&value) {
                return Some(posting);
            }
        }
    }
    None
}

fn find_in_value(value: &Value) -> Option<JobPosting> {
    match value {
        Value::Object(map) => {
            if map
                .get("@type")
                .is_some_and(|t| matches_type(t, "JobPosting"))
            {
                return Some(parse_posting(map));
            }
            // Recurse into common graph holders first, then all values.
            for key in ["@graph", "graph", "mainEntity", "mainEntityOfPage", "itemListElement"] {
                if let Some(v) = map.get(key) {
                    if let Some(posting) = find_in_value(v) {
                        return Some(posting);
                    }
                }
            }
            map.values().find_map(find_in_value)
        }
        Value::Array(arr) => arr.iter().find_map(find_in_value),
        _ => None,
    }
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s.eq_ignore_ascii_case(expected),
        Value::Array(arr) => arr.iter().any(|v| matches_type(v, expected)),
        _ => false,
    }
}

fn str_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_posting(map: &serde_json::Map<String, Value>) -> JobPosting {
    let organization = map
        .get("hiringOrganization")
        .and_then(|org| org.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    // baseSalary is a MonetaryAmount whose range usually sits under `value`,
    // though some emitters put minValue/maxValue on the amount itself.
    let salary = map.get("baseSalary");
    let range = salary
        .and_then(|s| s.get("value"))
        .or(salary)
        .cloned()
        .unwrap_or(Value::Null);
    let salary_min = range.get("minValue").and_then(Value::as_f64);
    let salary_max = range.get("maxValue").and_then(Value::as_f64);

    // jobLocation may be a single place or an array of places.
    let address = map
        .get("jobLocation")
        .map(|loc| match loc {
            Value::Array(arr) => arr.first().cloned().unwrap_or(Value::Null),
            other => other.clone(),
        })
        .and_then(|loc| loc.get("address").cloned());
    let region = address
        .as_ref()
        .and_then(|a| a.get("addressRegion"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let locality = address
        .as_ref()
        .and_then(|a| a.get("addressLocality"))
        .and_then(Value::as_str)
        .map(str::to_string);

    JobPosting {
        organization,
        title: str_field(map, "title"),
        salary_min,
        salary_max,
        region,
        locality,
        description: str_field(map, "description"),
    }
}

/// Formats a salary range as "{min}〜{max}".
pub fn format_salary_range(min: f64, max: f64) -> String {
    format!("{}〜{}", format_amount(min), format_amount(max))
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Backfills raw-record fields from structured metadata.
///
/// Purely additive and idempotent: a field that already holds a value is
/// never touched, and applying it twice produces the same record as once.
pub fn reconcile(raw: &mut RawRecord, posting: &JobPosting) {
    if let Some(org) = &posting.organization {
        raw.set_if_absent(Field::Company, org.clone());
    }
    if let Some(title) = &posting.title {
        raw.set_if_absent(Field::Title, title.clone());
    }
    if let (Some(min), Some(max)) = (posting.salary_min, posting.salary_max) {
        raw.set_if_absent(Field::Salary, format_salary_range(min, max));
    }
    let location = format!(
        "{}{}",
        posting.region.as_deref().unwrap_or(""),
        posting.locality.as_deref().unwrap_or("")
    );
    if !location.is_empty() {
        raw.set_if_absent(Field::Location, location);
    }
    if let Some(description) = &posting.description {
        raw.set_if_absent(Field::Description, description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_posting_block() -> String {
        r#"{
            "@context": "https://schema.org",
            "@type": "JobPosting",
            "title": "ホールスタッフ",
            "description": "接客、配膳、レジ業務",
            "hiringOrganization": { "@type": "Organization", "name": "ワタミ株式会社" },
            "baseSalary": {
                "@type": "MonetaryAmount",
                "currency": "JPY",
                "value": { "@type": "QuantitativeValue", "minValue": 1200, "maxValue": 1500, "unitText": "HOUR" }
            },
            "jobLocation": {
                "@type": "Place",
                "address": { "addressRegion": "東京都", "addressLocality": "日野市" }
            }
        }"#
        .to_string()
    }

    #[test]
    fn test_find_job_posting_direct() {
        let posting = find_job_posting(&[sample_posting_block()]).unwrap();
        assert_eq!(posting.organization.as_deref(), Some("ワタミ株式会社"));
        assert_eq!(posting.title.as_deref(), Some("ホールスタッフ"));
        assert_eq!(posting.salary_min, Some(1200.0));
        assert_eq!(posting.salary_max, Some(1500.0));
        assert_eq!(posting.region.as_deref(), Some("東京都"));
        assert_eq!(posting.locality.as_deref(), Some("日野市"));
    }

    #[test]
    fn test_find_job_posting_inside_graph() {
        let block = format!(
            r#"{{"@context":"https://schema.org","@graph":[{{"@type":"WebSite"}},{}]}}"#,
            sample_posting_block()
        );
        let posting = find_job_posting(&[block]).unwrap();
        assert_eq!(posting.title.as_deref(), Some("ホールスタッフ"));
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let blocks = vec!["{not json".to_string(), sample_posting_block()];
        assert!(find_job_posting(&blocks).is_some());
        assert!(find_job_posting(&["{}".to_string()]).is_none());
    }

    #[test]
    fn test_reconcile_fills_empty_record() {
        let mut raw = RawRecord::new();
        let posting = find_job_posting(&[sample_posting_block()]).unwrap();
        reconcile(&mut raw, &posting);

        assert_eq!(raw.get(Field::Company), Some("ワタミ株式会社"));
        assert_eq!(raw.get(Field::Title), Some("ホールスタッフ"));
        assert_eq!(raw.get(Field::Salary), Some("1200〜1500"));
        assert_eq!(raw.get(Field::Location), Some("東京都日野市"));
        assert_eq!(raw.get(Field::Description), Some("接客、配膳、レジ業務"));
    }

    #[test]
    fn test_reconcile_never_overwrites() {
        let mut raw = RawRecord::new();
        raw.set_if_absent(Field::Company, "すかいらーく株式会社");
        let posting = find_job_posting(&[sample_posting_block()]).unwrap();
        reconcile(&mut raw, &posting);
        assert_eq!(raw.get(Field::Company), Some("すかいらーく株式会社"));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let posting = find_job_posting(&[sample_posting_block()]).unwrap();
        let mut once = RawRecord::new();
        reconcile(&mut once, &posting);
        let mut twice = once.clone();
        reconcile(&mut twice, &posting);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_salary_range() {
        assert_eq!(format_salary_range(1200.0, 1500.0), "1200〜1500");
        assert_eq!(format_salary_range(1087.5, 1359.4), "1087.5〜1359.4");
    }
}
