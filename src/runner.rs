//! Run loop: visits every start URL with one browser session.
//!
//! Pages are scraped one at a time. A page that fails, or cannot be loaded
//! and read within the per-page timeout, is logged and skipped; the run
//! goes on with the same session. Variant enumeration only gets what is
//! left of that timeout and keeps its partial list when it runs out. Records are pushed to the sink as one batch at the end.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::time::Duration;

use rustc_hash::FxHashSet;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::scrape::{ProductRecord, ProductScraper};
use crate::session::{BrowserSession, PageSession};
use crate::sink::OutputSink;

// ============================================================================
// RequestQueue
// ============================================================================

/// FIFO of pages to visit; a URL is only ever enqueued once.
#[derive(Debug, Default)]
pub struct RequestQueue {
    pending: VecDeque<Url>,
    seen: FxHashSet<String>,
    handled: usize,
}

impl RequestQueue {
    /// Creates an empty queue.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `url`. Returns `false` if it was already enqueued.
    pub fn add(&mut self, url: Url) -> bool {
        if !self.seen.insert(url.as_str().to_owned()) {
            return false;
        }
        self.pending.push_back(url);
        true
    }

    /// Takes the next URL to visit.
    #[inline]
    pub fn fetch_next(&mut self) -> Option<Url> {
        self.pending.pop_front()
    }

    /// Records that a fetched URL is done with, successfully or not.
    #[inline]
    pub fn mark_handled(&mut self, url: &Url) {
        self.handled += 1;
        debug!(%url, handled = self.handled, "Request handled");
    }

    /// URLs still waiting.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no URL is waiting.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// URLs marked handled so far.
    #[inline]
    #[must_use]
    pub fn handled(&self) -> usize {
        self.handled
    }
}

// ============================================================================
// RunSummary
// ============================================================================

/// Counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages turned into records.
    pub scraped: usize,
    /// Pages skipped after an error or timeout.
    pub failed: usize,
    /// Start URLs dropped as repeats.
    pub duplicates: usize,
}

// ============================================================================
// Runner
// ============================================================================

/// Drives a [`ProductScraper`] over a list of start URLs.
#[derive(Debug, Clone)]
pub struct Runner {
    scraper: ProductScraper,
    page_timeout: Duration,
}

impl Runner {
    /// Creates a runner from scraper configuration.
    #[must_use]
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            scraper: ProductScraper::new(config),
            page_timeout: config.timing.page_timeout(),
        }
    }

    /// Scrapes every URL with `session` and pushes the records to `sink`.
    ///
    /// With no URLs nothing is pushed.
    ///
    /// # Errors
    ///
    /// Only a sink failure is returned; page failures are logged and
    /// counted.
    pub async fn run<S, K>(
        &self,
        session: &S,
        urls: impl IntoIterator<Item = Url>,
        sink: &mut K,
    ) -> Result<RunSummary>
    where
        S: PageSession,
        K: OutputSink + ?Sized,
    {
        let mut summary = RunSummary::default();
        let mut queue = RequestQueue::new();

        for url in urls {
            if !queue.add(url) {
                summary.duplicates += 1;
            }
        }
        if summary.duplicates > 0 {
            debug!(duplicates = summary.duplicates, "Dropped duplicate start URLs");
        }

        if queue.is_empty() {
            info!("No start URLs, nothing to scrape");
            return Ok(summary);
        }

        info!(pages = queue.len(), "Scraping started");
        let mut records = Vec::with_capacity(queue.len());

        while let Some(url) = queue.fetch_next() {
            match self.scrape_page(session, &url).await {
                Ok(record) => {
                    info!(%url, variants = record.variants.len(), "Product scraped");
                    records.push(record);
                    summary.scraped += 1;
                }
                Err(e) => {
                    error!(%url, error = %e, "Failed to scrape page");
                    summary.failed += 1;
                }
            }
            queue.mark_handled(&url);
        }

        sink.push_batch(&records)?;
        info!(
            scraped = summary.scraped,
            failed = summary.failed,
            "Scraping finished"
        );

        Ok(summary)
    }

    /// Runs on the browser's page, then closes the browser whatever
    /// happened.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run). A failure to close is only logged.
    pub async fn run_session<B, K>(
        &self,
        browser: B,
        urls: impl IntoIterator<Item = Url>,
        sink: &mut K,
    ) -> Result<RunSummary>
    where
        B: BrowserSession,
        K: OutputSink + ?Sized,
    {
        let page = browser.page();
        let result = self.run(&page, urls, sink).await;

        if let Err(e) = browser.close().await {
            warn!(error = %e, "Failed to close browser");
        }

        result
    }

    async fn scrape_page<S: PageSession>(&self, session: &S, url: &Url) -> Result<ProductRecord> {
        self.scraper
            .scrape_within(session, url, self.page_timeout)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
