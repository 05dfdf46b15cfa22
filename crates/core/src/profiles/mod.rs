// ABOUTME: Declarative site profile data model and registry keyed by host suffix.
// ABOUTME: Profiles map semantic fields to ordered extraction strategy chains.

//! Site profile configuration.
//!
//! A profile is pure data: an ordered fallback chain of [`Strategy`] values
//! per semantic field, tried in declaration order by the resolution engine.
//! Profiles are loaded once at startup and shared read-only across requests;
//! supporting a new site means adding a catalog entry, not code.

mod loader;

pub use loader::load_builtin_registry;

use serde::{Deserialize, Serialize};

use crate::fields::Field;

/// One concrete way to locate a field's text on a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Strategy {
    /// Structural CSS query; the first matching element's text is read.
    Css(String),
    /// Named metadata property read from `meta[property=…]` / `meta[name=…]`.
    Meta { meta: String },
    /// Elements matching `base` are scanned in document order for one whose
    /// text contains `contains`. With `sibling`, the immediately following
    /// sibling element of that tag is read instead of the anchor itself.
    Anchored {
        base: String,
        contains: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sibling: Option<String>,
    },
}

/// Ordered fallback chain for a single field.
///
/// Invariant: contains at least one strategy. Strategies never mutate page
/// state, so a chain can be retried freely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ExtractionSpec {
    pub strategies: Vec<Strategy>,
}

/// Post-normalization company override keyed by a brand token.
///
/// Some storefront brands are subsidiaries whose pages expose the brand name
/// reliably but the legal company name unreliably. When the extracted title
/// carries the brand token, the company name is forced to the known parent
/// company. Applied only after normal extraction, never as a first resort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandOverride {
    pub brand: String,
    pub company: String,
}

/// Per-site extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SiteProfile {
    /// Host suffixes this profile matches (e.g. "townwork.net").
    pub hosts: Vec<String>,
    /// Human-readable source label used in the response envelope.
    pub source: String,
    #[serde(default)]
    pub company: Option<ExtractionSpec>,
    #[serde(default)]
    pub title: Option<ExtractionSpec>,
    #[serde(default)]
    pub salary: Option<ExtractionSpec>,
    #[serde(default)]
    pub description: Option<ExtractionSpec>,
    #[serde(default)]
    pub work_hours: Option<ExtractionSpec>,
    #[serde(default)]
    pub work_days: Option<ExtractionSpec>,
    #[serde(default)]
    pub location: Option<ExtractionSpec>,
    #[serde(default)]
    pub requirements: Option<ExtractionSpec>,
    #[serde(default)]
    pub benefits: Option<ExtractionSpec>,
    #[serde(default)]
    pub transport: Option<ExtractionSpec>,
    #[serde(default)]
    pub station: Option<ExtractionSpec>,
    #[serde(default)]
    pub brand_overrides: Vec<BrandOverride>,
}

impl SiteProfile {
    /// Returns true if `host` (lowercase) falls under one of the profile's
    /// host suffixes.
    pub fn matches(&self, host: &str) -> bool {
        self.hosts
            .iter()
            .any(|h| host == h || host.ends_with(&format!(".{}", h)))
    }

    /// Configured field specs in declaration order.
    ///
    /// Resolution order matters for interdependent normalization (the
    /// title-derived store name feeds the location fallback), so the order
    /// here is fixed rather than map-iteration order.
    pub fn field_specs(&self) -> Vec<(Field, &ExtractionSpec)> {
        [
            (Field::Company, self.company.as_ref()),
            (Field::Title, self.title.as_ref()),
            (Field::Salary, self.salary.as_ref()),
            (Field::Description, self.description.as_ref()),
            (Field::WorkHours, self.work_hours.as_ref()),
            (Field::WorkDays, self.work_days.as_ref()),
            (Field::Location, self.location.as_ref()),
            (Field::Requirements, self.requirements.as_ref()),
            (Field::Benefits, self.benefits.as_ref()),
            (Field::Transport, self.transport.as_ref()),
            (Field::Station, self.station.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, spec)| spec.map(|s| (field, s)))
        .collect()
    }
}

/// Immutable catalog mapping hostnames to site profiles.
///
/// Built once at process start and shared by reference into each request.
/// There is no generic fallback profile: a host with no matching entry is
/// an unsupported site, not a best-effort scrape.
#[derive(Debug, Default, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<SiteProfile>,
}

impl ProfileRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a profile.
    pub fn register(&mut self, profile: SiteProfile) {
        self.profiles.push(profile);
    }

    /// Looks up the profile for a hostname by suffix match.
    pub fn resolve(&self, host: &str) -> Option<&SiteProfile> {
        let host = host.to_lowercase();
        self.profiles.iter().find(|p| p.matches(&host))
    }

    /// Returns the number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns true if no profiles are registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
