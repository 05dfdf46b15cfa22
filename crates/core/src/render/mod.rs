// ABOUTME: Rendering collaborator boundary: Renderer and Page traits plus DOM snapshots.
// ABOUTME: All operations are fallible; failures are recoverable and never fatal to the process.

//! Rendering collaborator interface.
//!
//! The extraction core never talks to a browser directly. It drives a
//! [`Page`] through this boundary, so a headless-browser adapter, the
//! bundled [`FetchRenderer`], or a preloaded [`SnapshotPage`] are
//! interchangeable.
//!
//! Key behaviors:
//! - Every operation returns `Result`; the caller treats all failures as
//!   recoverable (a failed strategy is skipped, a failed navigation becomes
//!   a request-level error).
//! - [`Page::close`] must be safe to call on every exit path, including
//!   after navigation or extraction failures.

mod fetch;

pub use fetch::{FetchRenderer, SnapshotPage, StaticRenderer};

use std::time::Duration;

use async_trait::async_trait;

/// Errors surfaced by a rendering collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("invalid selector: {0}")]
    Selector(String),
    #[error("page read failed: {0}")]
    Read(String),
    #[error("session error: {0}")]
    Session(String),
}

impl RenderError {
    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RenderError::Timeout(_))
    }
}

/// Navigation settle condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitCondition {
    DomContentLoaded,
    Load,
    #[default]
    NetworkIdle,
}

/// Per-session browser configuration.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub user_agent: String,
    pub viewport: (u32, u32),
    pub locale: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            viewport: (1920, 1080),
            locale: "ja-JP".to_string(),
        }
    }
}

/// Owned snapshot of a matched element.
///
/// Carries the immediately following sibling element (one level deep),
/// which is all the sibling-relation extraction step needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode {
    pub tag: String,
    pub text: String,
    pub next_sibling: Option<Box<DomNode>>,
}

impl DomNode {
    /// Element text with leading/trailing whitespace removed.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Factory for browsing sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Opens a fresh page owned by the calling request.
    async fn new_page(&self, config: &PageConfig) -> Result<Box<dyn Page>, RenderError>;
}

/// One rendered page, owned by a single request.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to `url` and wait for the page to settle.
    async fn goto(
        &self,
        url: &str,
        wait: WaitCondition,
        timeout: Duration,
    ) -> Result<(), RenderError>;

    /// Wait until `selector` is present, failing after `timeout`.
    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), RenderError>;

    /// First element matching `selector`, in document order.
    async fn select_first(&self, selector: &str) -> Result<Option<DomNode>, RenderError>;

    /// All elements matching `selector`, in document order.
    async fn select_all(&self, selector: &str) -> Result<Vec<DomNode>, RenderError>;

    /// First non-empty value of `attr` among elements matching `selector`.
    async fn attr_first(&self, selector: &str, attr: &str)
        -> Result<Option<String>, RenderError>;

    /// Full visible text of the document body.
    async fn body_text(&self) -> Result<String, RenderError>;

    /// Raw contents of every `application/ld+json` script block.
    async fn ld_json_blocks(&self) -> Result<Vec<String>, RenderError>;

    /// Release the browsing session.
    async fn close(&self) -> Result<(), RenderError>;
}
