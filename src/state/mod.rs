//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the phase a crawl is in (probing, fetching a batch, waiting, done)
//! - `PhaseTracker`: enforces the legal order of phases for one crawl

mod crawl_phase;

// Re-export main types
pub use crawl_phase::{CrawlPhase, PhaseTracker};
