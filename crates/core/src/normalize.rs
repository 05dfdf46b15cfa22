// ABOUTME: Per-field and per-site cleanup producing the canonical output record.
// ABOUTME: Covers whitespace collapse, company canonicalization, store/jobType splitting.

//! Field normalizer.
//!
//! Key behaviors:
//! - Every string field gets whitespace collapsed (runs of spaces/newlines
//!   become a single space) and trimmed.
//! - Company names are canonicalized to the "株式会社{name}" form with no
//!   duplicate or trailing suffix; the transform is idempotent.
//! - Titles carrying a store marker are split into a store-name list and a
//!   role/recruitment phrase; the location field backfills the store name
//!   when the title yields none.
//! - Salary and workDays keep their source tokens untouched beyond the
//!   whitespace collapse; wage labels (時給/月給) pass through unchanged.
//! - Profile brand overrides run as a post-pass, after normal extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::{Field, RawRecord};
use crate::profiles::SiteProfile;
use crate::result::CanonicalRecord;

static STORE_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^/\|]+店)").unwrap());
static LOCATION_STORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^、]+店)").unwrap());
static ROLE_PHRASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:ホール|キッチン|スタッフ|募集).*").unwrap());

const COMPANY_SUFFIX: &str = "株式会社";
const STORE_MARKER: &str = "店";
const DEFAULT_JOB_TYPE: &str = "募集店舗";

/// Collapses runs of whitespace (including newlines) to single spaces and
/// trims both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalizes a company name to "株式会社{name}".
///
/// A leading or trailing corporate suffix is stripped, then re-prefixed at
/// the front unless the cleaned name still contains it. Idempotent.
pub fn canonicalize_company(name: &str) -> String {
    let trimmed = name.trim();
    let cleaned = trimmed.strip_prefix(COMPANY_SUFFIX).unwrap_or(trimmed);
    let cleaned = cleaned.strip_suffix(COMPANY_SUFFIX).unwrap_or(cleaned);
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return String::new();
    }
    if cleaned.contains(COMPANY_SUFFIX) {
        cleaned.to_string()
    } else {
        format!("{}{}", COMPANY_SUFFIX, cleaned)
    }
}

/// Splits a raw title into store names and the role/recruitment phrase.
///
/// A title counts as store-bearing when it contains the 店 marker or one of
/// the profile's brand tokens. Without a role phrase the jobType falls back
/// to the generic recruiting-store label.
fn split_title(title: &str, profile: &SiteProfile) -> (Vec<String>, String) {
    let has_marker = title.contains(STORE_MARKER)
        || profile
            .brand_overrides
            .iter()
            .any(|rule| title.contains(&rule.brand));
    if !has_marker {
        return (Vec::new(), title.to_string());
    }

    let stores = STORE_NAME_RE
        .captures(title)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| vec![s])
        .unwrap_or_default();

    let job_type = ROLE_PHRASE_RE
        .find(title)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string());

    (stores, job_type)
}

/// Derives a store name from the location field, if it carries one.
fn store_from_location(location: &str) -> Option<String> {
    LOCATION_STORE_RE
        .captures(location)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Builds the canonical record from raw extracted values.
pub fn normalize(raw: &RawRecord, profile: &SiteProfile) -> CanonicalRecord {
    let clean = |field: Field| {
        raw.get(field)
            .map(collapse_whitespace)
            .unwrap_or_default()
    };

    let mut record = CanonicalRecord {
        source: profile.source.clone(),
        company_name: canonicalize_company(&clean(Field::Company)),
        job_description: clean(Field::Description),
        work_hours: clean(Field::WorkHours),
        work_days: clean(Field::WorkDays),
        salary: clean(Field::Salary),
        transportation: clean(Field::Transport),
        benefits: clean(Field::Benefits),
        requirements: clean(Field::Requirements),
        location: clean(Field::Location),
        near_station: clean(Field::Station),
        ..Default::default()
    };

    let title = clean(Field::Title);
    if !title.is_empty() {
        let (stores, job_type) = split_title(&title, profile);
        record.store_name = stores;
        record.job_type = job_type;
    }

    if record.store_name.is_empty() {
        if let Some(store) = store_from_location(&record.location) {
            record.store_name = vec![store];
        }
    }

    // Brand post-pass: runs only after normal extraction has had its chance.
    for rule in &profile.brand_overrides {
        if title.contains(&rule.brand) && record.company_name != rule.company {
            record.company_name = rule.company.clone();
        }
    }

    record
}
