//! Output module for crawl progress and results
//!
//! This module handles:
//! - The progress log and its optional live subscriber
//! - The final `CrawlOutcome` and its JSON form
//! - Event-stream framing for relaying progress to a remote observer
//! - Printing crawl statistics

pub mod events;
mod log;
mod outcome;
pub mod stats;
mod traits;

pub use events::{
    progress_event, result_event, write_error_event, write_result_event, EventStreamSink,
};
pub use log::ProgressLog;
pub use outcome::CrawlOutcome;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::ProgressSink;

use crate::HarvestError;
use std::path::Path;

/// Writes the outcome as pretty-printed JSON to `path`
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(HarvestError)` - Serialization or IO failed
pub fn write_outcome_json(outcome: &CrawlOutcome, path: &Path) -> Result<(), HarvestError> {
    let json = outcome.to_json_pretty()?;
    std::fs::write(path, json)?;
    tracing::info!("Wrote {} records to {}", outcome.records.len(), path.display());
    Ok(())
}
