// ABOUTME: Fallback-resolution engine walking a field's strategy chain in order.
// ABOUTME: First non-empty trimmed text wins; strategy failures are logged and skipped.

//! Selector resolution engine.
//!
//! Key behaviors:
//! - Strategies are tried in declaration order; the first non-empty trimmed
//!   text wins.
//! - A strategy that fails (invalid selector, collaborator error) is treated
//!   as not-found and resolution continues with the next strategy.
//! - Exhausting the chain yields `None`, never an error; a missing field is
//!   not a failure.
//! - Per-strategy diagnostics are emitted as tracing events. They are
//!   advisory only and never affect the extraction outcome.

use tracing::{debug, trace};

use crate::fields::Field;
use crate::profiles::{ExtractionSpec, Strategy};
use crate::render::{Page, RenderError};

/// Resolves one field against a page by walking its strategy chain.
pub async fn resolve_field(page: &dyn Page, field: Field, spec: &ExtractionSpec) -> Option<String> {
    for (idx, strategy) in spec.strategies.iter().enumerate() {
        match try_strategy(page, strategy).await {
            Ok(Some(text)) => {
                debug!(
                    field = field.as_str(),
                    label = field.label(),
                    strategy = idx + 1,
                    "field resolved"
                );
                return Some(text);
            }
            Ok(None) => {
                trace!(field = field.as_str(), strategy = idx + 1, "no match");
            }
            Err(err) => {
                debug!(
                    field = field.as_str(),
                    strategy = idx + 1,
                    error = %err,
                    "strategy failed; trying next"
                );
            }
        }
    }
    debug!(field = field.as_str(), label = field.label(), "field not found");
    None
}

/// Runs a single strategy. `Ok(None)` means the strategy matched nothing
/// usable; errors are recoverable by construction.
async fn try_strategy(
    page: &dyn Page,
    strategy: &Strategy,
) -> Result<Option<String>, RenderError> {
    match strategy {
        Strategy::Css(selector) => {
            let Some(node) = page.select_first(selector).await? else {
                return Ok(None);
            };
            let text = node.trimmed_text();
            Ok((!text.is_empty()).then(|| text.to_string()))
        }
        Strategy::Meta { meta } => {
            // Open-graph style properties live in `property`, plain names in
            // `name`; try both spellings.
            for selector in [
                format!("meta[property=\"{}\"]", meta),
                format!("meta[name=\"{}\"]", meta),
            ] {
                if let Some(value) = page.attr_first(&selector, "content").await? {
                    return Ok(Some(value));
                }
            }
            Ok(None)
        }
        Strategy::Anchored {
            base,
            contains,
            sibling,
        } => {
            // Document order; scanning continues past anchors whose sibling
            // is absent, mismatched, or empty.
            for node in page.select_all(base).await? {
                if !node.text.contains(contains.as_str()) {
                    continue;
                }
                match sibling {
                    None => {
                        let text = node.trimmed_text();
                        if !text.is_empty() {
                            return Ok(Some(text.to_string()));
                        }
                    }
                    Some(tag) => {
                        if let Some(sib) = node.next_sibling.as_deref() {
                            if sib.tag.eq_ignore_ascii_case(tag) {
                                let text = sib.trimmed_text();
                                if !text.is_empty() {
                                    return Ok(Some(text.to_string()));
                                }
                            }
                        }
                    }
                }
            }
            Ok(None)
        }
    }
}
