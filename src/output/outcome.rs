use crate::crawler::{Record, ThreadInfo};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final result of one crawl
///
/// Records are in ascending page order, and in extraction order within a
/// page. The log holds every progress line in emission order.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    /// Thread URL the crawl started from
    pub base_url: String,

    /// Metadata discovered by the probe
    pub thread: ThreadInfo,

    pub records: Vec<Record>,
    pub log: Vec<String>,

    /// Number of pages the crawl tried to fetch
    pub pages_attempted: usize,

    /// Pages whose fetch failed, ascending
    pub failed_pages: Vec<u32>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlOutcome {
    /// All record bodies joined by a blank line
    pub fn full_text(&self) -> String {
        self.records
            .iter()
            .map(|record| record.body.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Returns true if every attempted page was fetched
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }

    /// Wall-clock time the crawl took
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Serializes the outcome, with its joined text, as compact JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&OutcomePayload::new(self))
    }

    /// Same payload as `to_json`, pretty-printed
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&OutcomePayload::new(self))
    }
}

/// Wire form of an outcome: every field plus `full_text`
#[derive(Serialize)]
struct OutcomePayload<'a> {
    #[serde(flatten)]
    outcome: &'a CrawlOutcome,
    full_text: String,
}

impl<'a> OutcomePayload<'a> {
    fn new(outcome: &'a CrawlOutcome) -> Self {
        Self {
            outcome,
            full_text: outcome.full_text(),
        }
    }
}
