//! Statistics derived from a finished crawl
//!
//! This module condenses a `CrawlOutcome` into headline numbers and prints
//! them for the command-line front end.

use crate::output::outcome::CrawlOutcome;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Total page count reported by the thread
    pub total_pages: u32,

    /// Pages the crawl tried to fetch
    pub pages_attempted: usize,

    /// Pages whose fetch failed
    pub pages_failed: usize,

    /// Records extracted across all pages
    pub total_records: usize,

    /// Records per successfully fetched page
    pub records_by_page: BTreeMap<u32, usize>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: i64,
}

impl CrawlStatistics {
    /// Computes statistics from an outcome
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let mut records_by_page = BTreeMap::new();
        for record in &outcome.records {
            *records_by_page.entry(record.page).or_insert(0) += 1;
        }

        Self {
            total_pages: outcome.thread.total_pages,
            pages_attempted: outcome.pages_attempted,
            pages_failed: outcome.failed_pages.len(),
            total_records: outcome.records.len(),
            records_by_page,
            duration_ms: outcome.duration().num_milliseconds(),
        }
    }

    /// Share of attempted pages fetched successfully, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_attempted == 0 {
            return 0.0;
        }
        let succeeded = self.pages_attempted - self.pages_failed;
        (succeeded as f64 / self.pages_attempted as f64) * 100.0
    }

    /// Mean records per successfully fetched page
    pub fn average_records_per_page(&self) -> f64 {
        let succeeded = self.pages_attempted.saturating_sub(self.pages_failed);
        if succeeded == 0 {
            return 0.0;
        }
        self.total_records as f64 / succeeded as f64
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(outcome: &CrawlOutcome) {
    let stats = CrawlStatistics::from_outcome(outcome);

    println!("=== Crawl Statistics ===\n");

    println!("Thread:");
    println!("  URL: {}", outcome.base_url);
    match &outcome.thread.title {
        Some(title) => println!("  Title: {}", title),
        None => println!("  Title: (not found)"),
    }
    println!("  Total pages: {}", stats.total_pages);
    println!();

    println!("Crawl:");
    println!("  Pages attempted: {}", stats.pages_attempted);
    println!("  Pages failed: {}", stats.pages_failed);
    println!("  Records extracted: {}", stats.total_records);
    println!(
        "  Average records per page: {:.1}",
        stats.average_records_per_page()
    );
    println!("  Duration: {:.1}s", stats.duration_ms as f64 / 1000.0);
    println!();

    if !outcome.failed_pages.is_empty() {
        println!("Failed Pages ({}):", outcome.failed_pages.len());
        for page in &outcome.failed_pages {
            println!("  - {}", page);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_attempted - stats.pages_failed,
        stats.pages_attempted
    );
}
