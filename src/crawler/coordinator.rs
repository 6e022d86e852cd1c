//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl from start to finish:
//! - Validating caller input before any network activity
//! - Probing the thread for its page count and title
//! - Fetching the planned pages in gated, fixed-size batches
//! - Restoring page order and collecting records
//! - Pausing between batches and reporting progress

use crate::config::{validate, validate_crawler_config, Config};
use crate::crawler::extractor::{RecordExtractor, SelectorExtractor};
use crate::crawler::fetcher::{fetch_page, HttpTransport, PageResult, Transport};
use crate::crawler::gate::RateGate;
use crate::crawler::prober::{probe, ThreadInfo};
use crate::crawler::scheduler::{batches, jittered_delay, page_sequence};
use crate::output::{CrawlOutcome, ProgressLog, ProgressSink};
use crate::state::{CrawlPhase, PhaseTracker};
use crate::url::{page_url, parse_base_url};
use crate::HarvestError;
use chrono::Utc;
use futures::future::join_all;
use std::time::Duration;

/// Main crawler coordinator structure
///
/// A coordinator owns its transport, extractor and rate gate, so separate
/// coordinators crawl with independent concurrency budgets. One coordinator
/// can run any number of crawls.
pub struct Coordinator<T, X> {
    config: Config,
    transport: T,
    extractor: X,
    gate: RateGate,
}

impl Coordinator<HttpTransport, SelectorExtractor> {
    /// Creates a coordinator using HTTP and the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration valid and client built
    /// * `Err(HarvestError)` - Invalid configuration or HTTP client failure
    pub fn from_config(config: Config) -> Result<Self, HarvestError> {
        validate(&config)?;
        let transport = HttpTransport::new(&config.http)?;
        let extractor = SelectorExtractor::new(&config.selectors)?;
        Ok(Self::new(config, transport, extractor))
    }
}

impl<T, X> Coordinator<T, X>
where
    T: Transport,
    X: RecordExtractor,
{
    /// Creates a coordinator from explicit collaborators
    pub fn new(config: Config, transport: T, extractor: X) -> Self {
        let gate = RateGate::new(
            config.crawler.concurrency_limit as usize,
            Duration::from_millis(config.crawler.timeout_ms),
        );

        Self {
            config,
            transport,
            extractor,
            gate,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Discovers the page count and title of a thread without crawling it
    pub async fn probe(&self, base_url: &str) -> Result<ThreadInfo, HarvestError> {
        let base_url = parse_base_url(base_url)?;
        Ok(probe(&self.transport, &self.extractor, &base_url).await.thread)
    }

    /// Runs a complete crawl of the thread at `base_url`
    ///
    /// Progress lines are collected in the outcome and, if `sink` is given,
    /// forwarded to it as they are produced.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The crawl ran to completion, even if pages failed
    /// * `Err(HarvestError)` - Invalid base URL or crawler settings; nothing was fetched
    pub async fn crawl(
        &self,
        base_url: &str,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<CrawlOutcome, HarvestError> {
        let base_url = parse_base_url(base_url)?;
        validate_crawler_config(&self.config.crawler)?;

        let settings = &self.config.crawler;
        let suffix = &self.config.selectors.page_suffix;
        let started_at = Utc::now();
        let mut phase = PhaseTracker::new();
        let mut log = ProgressLog::new(sink);

        phase.advance(CrawlPhase::Probing)?;
        let report = probe(&self.transport, &self.extractor, &base_url).await;
        let thread = report.thread;
        if report.page_count_assumed {
            log.log(format!(
                "Total pages not found, assuming {}",
                thread.total_pages
            ));
        } else {
            log.log(format!("Total pages: {}", thread.total_pages));
        }
        match &thread.title {
            Some(title) => log.log(format!("Thread title: {}", title)),
            None => log.log("Thread title not found"),
        }

        // The page count comes from remote markup; bound it before planning
        let plannable_pages = thread.total_pages.min(settings.max_total_pages);
        if plannable_pages < thread.total_pages {
            tracing::warn!(
                "Page count {} at {} exceeds max_total_pages {}",
                thread.total_pages,
                base_url,
                settings.max_total_pages
            );
            log.log(format!(
                "Page count {} exceeds the limit of {}; only pages up to {} are crawled",
                thread.total_pages, plannable_pages, plannable_pages
            ));
        }

        let pages = page_sequence(plannable_pages, settings.stride, settings.max_pages);
        let batch_size = self.gate.limit();
        let batch_count = pages.len().div_ceil(batch_size);
        tracing::info!(
            "Crawling {}: {} pages in {} batches of up to {}",
            base_url,
            pages.len(),
            batch_count,
            batch_size
        );

        let mut records = Vec::new();
        let mut failed_pages = Vec::new();

        for (index, batch) in batches(&pages, batch_size).enumerate() {
            phase.advance(CrawlPhase::BatchInFlight)?;

            for &page in batch {
                log.log(format!(
                    "Fetching page {}: {}",
                    page,
                    page_url(&base_url, page, suffix)
                ));
            }

            let mut results = join_all(
                batch
                    .iter()
                    .map(|&page| self.fetch_through_gate(&base_url, page)),
            )
            .await;
            results.sort_by_key(|result| result.page);

            for result in results {
                match &result.error {
                    Some(error) => {
                        log.log(format!("Error fetching page {}: {}", result.page, error));
                        failed_pages.push(result.page);
                    }
                    None => log.log(format!(
                        "Found {} records on page {}.",
                        result.records.len(),
                        result.page
                    )),
                }
                records.extend(result.records);
            }

            // No pause after the final batch; nothing is scheduled behind it
            if index + 1 < batch_count {
                phase.advance(CrawlPhase::InterBatchWait)?;
                let delay = jittered_delay(
                    settings.base_delay_ms,
                    settings.delay_variation,
                    &mut rand::thread_rng(),
                );
                log.log(format!(
                    "Waiting {} ms before the next batch...",
                    delay.as_millis()
                ));
                tokio::time::sleep(delay).await;
            }
        }

        phase.advance(CrawlPhase::Completed)?;
        let finished_at = Utc::now();

        tracing::info!(
            "Crawl completed: {} records from {} pages ({} failed) in {}ms",
            records.len(),
            pages.len(),
            failed_pages.len(),
            (finished_at - started_at).num_milliseconds()
        );

        Ok(CrawlOutcome {
            base_url,
            thread,
            records,
            log: log.into_lines(),
            pages_attempted: pages.len(),
            failed_pages,
            started_at,
            finished_at,
        })
    }

    /// Fetches one page through the rate gate, folding gate errors into the result
    async fn fetch_through_gate(&self, base_url: &str, page: u32) -> PageResult {
        let suffix = &self.config.selectors.page_suffix;
        let submitted = self
            .gate
            .submit(|| fetch_page(&self.transport, &self.extractor, base_url, page, suffix))
            .await;

        match submitted {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Page {} abandoned: {}", page, e);
                PageResult::failed(page, e.to_string())
            }
        }
    }
}
