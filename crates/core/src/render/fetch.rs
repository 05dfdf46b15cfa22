// ABOUTME: Bundled renderer implementations backed by reqwest and scraper.
// ABOUTME: FetchRenderer GETs a URL; StaticRenderer hands out preloaded HTML snapshots.

//! Non-JS renderer implementations.
//!
//! [`FetchRenderer`] performs a plain HTTP GET and parses the returned HTML,
//! which is sufficient for server-rendered listing pages; JS-heavy sites
//! plug a real headless-browser adapter into [`Renderer`] instead.
//! [`StaticRenderer`] hands out pages preloaded from a string and backs the
//! offline parsing path and the test suites.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tokio::sync::RwLock;

use crate::render::{DomNode, Page, PageConfig, RenderError, Renderer, WaitCondition};

/// Renderer that fetches pages over plain HTTP.
pub struct FetchRenderer {
    http: reqwest::Client,
}

impl FetchRenderer {
    /// Builds a renderer with its own HTTP client.
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .expect("failed to build HTTP client");
        Self { http }
    }
}

#[async_trait]
impl Renderer for FetchRenderer {
    async fn new_page(&self, _config: &PageConfig) -> Result<Box<dyn Page>, RenderError> {
        Ok(Box::new(SnapshotPage {
            html: RwLock::new(String::new()),
            http: Some(self.http.clone()),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Renderer that serves one preloaded HTML snapshot to every page.
pub struct StaticRenderer {
    html: String,
}

impl StaticRenderer {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn new_page(&self, _config: &PageConfig) -> Result<Box<dyn Page>, RenderError> {
        Ok(Box::new(SnapshotPage::from_html(self.html.clone())))
    }
}

/// A page backed by an HTML snapshot rather than a live browser.
///
/// The snapshot is either preloaded ([`SnapshotPage::from_html`]) or filled
/// by `goto` via HTTP GET. DOM reads parse the snapshot on demand, so the
/// page stays `Send + Sync` and never holds parser state across awaits.
pub struct SnapshotPage {
    html: RwLock<String>,
    http: Option<reqwest::Client>,
    closed: AtomicBool,
}

impl SnapshotPage {
    /// Creates a page over a pre-rendered HTML snapshot. `goto` is a no-op.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: RwLock::new(html.into()),
            http: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns true once the session has been released.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn snapshot(&self) -> String {
        self.html.read().await.clone()
    }
}

fn parse_selector(selector: &str) -> Result<Selector, RenderError> {
    Selector::parse(selector).map_err(|e| RenderError::Selector(e.to_string()))
}

fn node_snapshot(el: ElementRef<'_>) -> DomNode {
    let next_sibling = el
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()
        .map(|sib| {
            Box::new(DomNode {
                tag: sib.value().name().to_string(),
                text: sib.text().collect::<String>(),
                next_sibling: None,
            })
        });
    DomNode {
        tag: el.value().name().to_string(),
        text: el.text().collect::<String>(),
        next_sibling,
    }
}

#[async_trait]
impl Page for SnapshotPage {
    async fn goto(
        &self,
        url: &str,
        _wait: WaitCondition,
        timeout: Duration,
    ) -> Result<(), RenderError> {
        let Some(http) = self.http.as_ref() else {
            // Preloaded snapshot; nothing to navigate.
            return Ok(());
        };

        let request = async {
            let response = http.get(url).send().await.map_err(|e| {
                if e.is_timeout() {
                    RenderError::Timeout(format!("navigation to {} timed out", url))
                } else {
                    RenderError::Navigation(e.to_string())
                }
            })?;
            let response = response
                .error_for_status()
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            response
                .text()
                .await
                .map_err(|e| RenderError::Read(e.to_string()))
        };

        let body = tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| RenderError::Timeout(format!("navigation to {} timed out", url)))??;

        *self.html.write().await = body;
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<(), RenderError> {
        // The snapshot never changes, so presence is decided immediately.
        if self.select_first(selector).await?.is_some() {
            Ok(())
        } else {
            Err(RenderError::Timeout(format!(
                "selector {} did not appear",
                selector
            )))
        }
    }

    async fn select_first(&self, selector: &str) -> Result<Option<DomNode>, RenderError> {
        let sel = parse_selector(selector)?;
        let html = self.snapshot().await;
        let doc = Html::parse_document(&html);
        Ok(doc.select(&sel).next().map(node_snapshot))
    }

    async fn select_all(&self, selector: &str) -> Result<Vec<DomNode>, RenderError> {
        let sel = parse_selector(selector)?;
        let html = self.snapshot().await;
        let doc = Html::parse_document(&html);
        Ok(doc.select(&sel).map(node_snapshot).collect())
    }

    async fn attr_first(
        &self,
        selector: &str,
        attr: &str,
    ) -> Result<Option<String>, RenderError> {
        let sel = parse_selector(selector)?;
        let html = self.snapshot().await;
        let doc = Html::parse_document(&html);
        for el in doc.select(&sel) {
            if let Some(value) = el.value().attr(attr) {
                if !value.trim().is_empty() {
                    return Ok(Some(value.to_string()));
                }
            }
        }
        Ok(None)
    }

    async fn body_text(&self) -> Result<String, RenderError> {
        let sel = parse_selector("body")?;
        let html = self.snapshot().await;
        let doc = Html::parse_document(&html);
        Ok(doc
            .select(&sel)
            .next()
            .map(|body| body.text().collect::<String>())
            .unwrap_or_default())
    }

    async fn ld_json_blocks(&self) -> Result<Vec<String>, RenderError> {
        let sel = parse_selector("script[type='application/ld+json']")?;
        let html = self.snapshot().await;
        let doc = Html::parse_document(&html);
        Ok(doc
            .select(&sel)
            .map(|script| script.text().collect::<String>())
            .collect())
    }

    async fn close(&self) -> Result<(), RenderError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
