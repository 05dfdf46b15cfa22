// ABOUTME: Scrape orchestrator: URL classification, page lifecycle, field resolution, envelopes.
// ABOUTME: Client is builder-constructed and safely shared across concurrent requests.

//! Scrape orchestrator.
//!
//! One request is one sequential flow: classify the URL, resolve the site
//! profile, acquire a page from the renderer, resolve every field in
//! declaration order, backfill from structured metadata, normalize, and
//! assemble the response. Fields are resolved one at a time because later
//! normalization steps depend on earlier fields having settled, and the
//! rendering collaborator serializes DOM access anyway.
//!
//! The page session is released on every exit path, including timeouts and
//! extraction failures.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, warn};
use url::Url;

use crate::error::ScrapeError;
use crate::fields::{Field, RawRecord};
use crate::normalize::normalize;
use crate::profiles::{load_builtin_registry, ProfileRegistry, SiteProfile};
use crate::render::{
    FetchRenderer, Page, PageConfig, RenderError, Renderer, SnapshotPage, WaitCondition,
};
use crate::resolve::resolve_field;
use crate::result::{AbsencePolicy, ScrapeEnvelope, ScrapeReport};
use crate::structured::{find_job_posting, reconcile};

/// Configuration options for the joblens client.
#[derive(Clone)]
pub struct Options {
    /// Overall per-request budget, covering navigation and extraction.
    pub timeout: Duration,
    pub user_agent: String,
    pub locale: String,
    pub viewport: (u32, u32),
    pub absence_policy: AbsencePolicy,
    pub registry: Option<ProfileRegistry>,
    pub renderer: Option<Arc<dyn Renderer>>,
}

impl Default for Options {
    fn default() -> Self {
        let page = PageConfig::default();
        Self {
            timeout: Duration::from_secs(45),
            user_agent: page.user_agent,
            locale: page.locale,
            viewport: page.viewport,
            absence_policy: AbsencePolicy::KeepEmpty,
            registry: None,
            renderer: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("locale", &self.locale)
            .field("viewport", &self.viewport)
            .field("absence_policy", &self.absence_policy)
            .field("registry", &self.registry.as_ref().map(|r| r.len()))
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overall per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent presented to target sites.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the browser locale.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.opts.locale = locale.into();
        self
    }

    /// Set the viewport dimensions.
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.opts.viewport = (width, height);
        self
    }

    /// Set the deployment's absence policy for the formatted payload.
    pub fn absence_policy(mut self, policy: AbsencePolicy) -> Self {
        self.opts.absence_policy = policy;
        self
    }

    /// Use a custom profile registry instead of the builtin catalog.
    pub fn registry(mut self, registry: ProfileRegistry) -> Self {
        self.opts.registry = Some(registry);
        self
    }

    /// Use a custom rendering collaborator (e.g. a headless-browser adapter).
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.opts.renderer = Some(renderer);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

/// The main joblens client for scraping job-listing pages.
pub struct Client {
    opts: Options,
    renderer: Arc<dyn Renderer>,
    registry: ProfileRegistry,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let renderer = opts
            .renderer
            .clone()
            .unwrap_or_else(|| Arc::new(FetchRenderer::new(&opts.user_agent, opts.timeout)));
        let registry = opts.registry.clone().unwrap_or_else(load_builtin_registry);

        Self {
            opts,
            renderer,
            registry,
        }
    }

    /// The deployment's absence policy for formatted payloads.
    pub fn absence_policy(&self) -> AbsencePolicy {
        self.opts.absence_policy
    }

    fn page_config(&self) -> PageConfig {
        PageConfig {
            user_agent: self.opts.user_agent.clone(),
            viewport: self.opts.viewport,
            locale: self.opts.locale.clone(),
        }
    }

    /// Validates the URL and resolves its site profile.
    ///
    /// No browsing session is created for URLs that fail classification.
    fn classify(&self, url: &str) -> Result<&SiteProfile, ScrapeError> {
        if url.is_empty() {
            return Err(ScrapeError::invalid_url(url, "Scrape", None));
        }
        let parsed = Url::parse(url)
            .map_err(|e| ScrapeError::invalid_url(url, "Scrape", Some(anyhow!(e))))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| {
                ScrapeError::invalid_url(url, "Scrape", Some(anyhow!("URL has no host")))
            })?
            .to_string();

        let profile = self.registry.resolve(&host).ok_or_else(|| {
            ScrapeError::unsupported_site(
                url,
                "Scrape",
                Some(anyhow!("no profile matches host {}", host)),
            )
        })?;
        debug!(source = %profile.source, host = %host, "profile resolved");
        Ok(profile)
    }

    /// Scrape one job-listing URL into a canonical record.
    pub async fn scrape(&self, url: &str) -> Result<ScrapeReport, ScrapeError> {
        let profile = self.classify(url)?;

        let page = self
            .renderer
            .new_page(&self.page_config())
            .await
            .map_err(|e| render_to_scrape(e, url, "NewPage"))?;

        let outcome = tokio::time::timeout(
            self.opts.timeout,
            self.extract_on_page(page.as_ref(), profile, url),
        )
        .await;

        // Session release is unconditional on every exit path.
        if let Err(err) = page.close().await {
            warn!(error = %err, url, "failed to release page session");
        }

        match outcome {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::timeout(
                url,
                "Scrape",
                Some(anyhow!("request exceeded {:?}", self.opts.timeout)),
            )),
        }
    }

    /// Scrape a pre-rendered HTML snapshot (offline variant of [`Client::scrape`]).
    pub async fn scrape_html(&self, html: &str, url: &str) -> Result<ScrapeReport, ScrapeError> {
        let profile = self.classify(url)?;
        let page = SnapshotPage::from_html(html);
        self.extract_on_page(&page, profile, url).await
    }

    /// Infallible wrapper producing the wire envelope.
    pub async fn scrape_envelope(&self, url: &str) -> ScrapeEnvelope {
        match self.scrape(url).await {
            Ok(report) => ScrapeEnvelope::success(&report, self.opts.absence_policy),
            Err(err) => ScrapeEnvelope::failure(err.to_string(), url),
        }
    }

    async fn extract_on_page(
        &self,
        page: &dyn Page,
        profile: &SiteProfile,
        url: &str,
    ) -> Result<ScrapeReport, ScrapeError> {
        page.goto(url, WaitCondition::NetworkIdle, self.opts.timeout)
            .await
            .map_err(|e| render_to_scrape(e, url, "Goto"))?;

        let mut raw = RawRecord::new();
        for (field, spec) in profile.field_specs() {
            if let Some(text) = resolve_field(page, field, spec).await {
                raw.set_if_absent(field, text);
            }
        }

        // Structured metadata only backfills what the selectors missed; a
        // failed scan is a diagnostic, not an error.
        match page.ld_json_blocks().await {
            Ok(blocks) => {
                if let Some(posting) = find_job_posting(&blocks) {
                    reconcile(&mut raw, &posting);
                }
            }
            Err(err) => debug!(error = %err, url, "structured metadata scan failed"),
        }

        // Brand sites sometimes expose the legal company name only in
        // incidental page text. Last resort, after markup and metadata.
        if !raw.is_set(Field::Company) && !profile.brand_overrides.is_empty() {
            match page.body_text().await {
                Ok(text) => {
                    for rule in &profile.brand_overrides {
                        if text.contains(&rule.company) {
                            raw.set_if_absent(Field::Company, rule.company.clone());
                            break;
                        }
                    }
                }
                Err(err) => debug!(error = %err, url, "page text scan failed"),
            }
        }

        let record = normalize(&raw, profile);
        let extracted_count = raw.extracted_count();
        Ok(ScrapeReport {
            source: profile.source.clone(),
            record,
            raw,
            extracted_count,
        })
    }
}

fn render_to_scrape(err: RenderError, url: &str, op: &str) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::timeout(url, op, Some(err.into()))
    } else {
        ScrapeError::render(url, op, Some(err.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rejects_empty_and_malformed_urls() {
        let client = Client::builder().build();
        assert!(client.classify("").unwrap_err().is_invalid_url());
        assert!(client.classify("not a url").unwrap_err().is_invalid_url());
    }

    #[test]
    fn test_classify_rejects_unknown_hosts() {
        let client = Client::builder().build();
        let err = client
            .classify("https://random-blog.example/post/1")
            .unwrap_err();
        assert!(err.is_unsupported_site());
        assert!(err.to_string().contains("unsupported site"));
    }

    #[test]
    fn test_classify_resolves_builtin_sites() {
        let client = Client::builder().build();
        let profile = client
            .classify("https://townwork.net/detail/clc_0123456789/")
            .unwrap();
        assert_eq!(profile.source, "タウンワーク");

        let profile = client
            .classify("https://jp.indeed.com/viewjob?jk=abc123")
            .unwrap();
        assert_eq!(profile.source, "Indeed");
    }
}
