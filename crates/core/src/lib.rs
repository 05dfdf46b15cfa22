// ABOUTME: Main library entry point for the joblens job-posting scraper.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, ScrapeError, profiles, renderer traits.

//! joblens - structured job-posting extraction from job-listing pages.
//!
//! This crate resolves a job-listing URL to a per-site extraction profile,
//! walks ordered fallback selector chains for each semantic field against a
//! rendered page, backfills missing fields from embedded JobPosting
//! structured data, and normalizes the result into a canonical record.
//!
//! # Example
//!
//! ```no_run
//! use joblens_core::{Client, ScrapeError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScrapeError> {
//!     let client = Client::builder().build();
//!     let report = client
//!         .scrape("https://townwork.net/detail/clc_0123456789/")
//!         .await?;
//!     println!("{} / {}", report.record.company_name, report.record.job_type);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod fields;
pub mod normalize;
pub mod profiles;
pub mod render;
pub mod resolve;
pub mod result;
pub mod structured;

pub use crate::client::{Client, ClientBuilder, Options};
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::fields::{Field, RawRecord};
pub use crate::profiles::{
    load_builtin_registry, BrandOverride, ExtractionSpec, ProfileRegistry, SiteProfile, Strategy,
};
pub use crate::render::{
    DomNode, FetchRenderer, Page, PageConfig, RenderError, Renderer, SnapshotPage, StaticRenderer,
    WaitCondition,
};
pub use crate::resolve::resolve_field;
pub use crate::result::{
    AbsencePolicy, CanonicalRecord, ScrapeEnvelope, ScrapeFailure, ScrapeReport, ScrapeSuccess,
};
pub use crate::structured::{find_job_posting, reconcile, JobPosting};
