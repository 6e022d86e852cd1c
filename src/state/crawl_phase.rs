/// Crawl phase definitions for tracking one crawl from start to finish
///
/// A crawl moves `NotStarted → Probing → {BatchInFlight ⇄ InterBatchWait} → Completed`.
use crate::HarvestError;
use serde::Serialize;
use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlPhase {
    /// Input validated, nothing fetched yet
    NotStarted,

    /// Fetching page 1 to discover the page count and title
    Probing,

    /// A batch of page fetches is in flight
    BatchInFlight,

    /// Pausing between two batches
    InterBatchWait,

    /// All pages handled; the outcome is final
    Completed,
}

impl CrawlPhase {
    /// Returns true if the crawl has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// `Probing → Completed` covers a plan with no pages, and
    /// `BatchInFlight → Completed` skips the pause after the final batch.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (*self, next),
            (Self::NotStarted, Self::Probing)
                | (Self::Probing, Self::BatchInFlight)
                | (Self::Probing, Self::Completed)
                | (Self::BatchInFlight, Self::InterBatchWait)
                | (Self::BatchInFlight, Self::Completed)
                | (Self::InterBatchWait, Self::BatchInFlight)
        )
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Probing => "probing",
            Self::BatchInFlight => "batch_in_flight",
            Self::InterBatchWait => "inter_batch_wait",
            Self::Completed => "completed",
        }
    }

    /// Returns all crawl phases in lifecycle order
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::NotStarted,
            Self::Probing,
            Self::BatchInFlight,
            Self::InterBatchWait,
            Self::Completed,
        ]
    }
}

impl Default for CrawlPhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the phase of a single crawl and rejects illegal transitions
#[derive(Debug, Default)]
pub struct PhaseTracker {
    phase: CrawlPhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, failing with `InvalidTransition` if the move is illegal
    pub fn advance(&mut self, next: CrawlPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(CrawlPhase::Completed.is_terminal());

        assert!(!CrawlPhase::NotStarted.is_terminal());
        assert!(!CrawlPhase::Probing.is_terminal());
        assert!(!CrawlPhase::BatchInFlight.is_terminal());
        assert!(!CrawlPhase::InterBatchWait.is_terminal());
    }

    #[test]
    fn test_lifecycle_transitions() {
        assert!(CrawlPhase::NotStarted.can_transition_to(CrawlPhase::Probing));
        assert!(CrawlPhase::Probing.can_transition_to(CrawlPhase::BatchInFlight));
        assert!(CrawlPhase::BatchInFlight.can_transition_to(CrawlPhase::InterBatchWait));
        assert!(CrawlPhase::InterBatchWait.can_transition_to(CrawlPhase::BatchInFlight));
        assert!(CrawlPhase::BatchInFlight.can_transition_to(CrawlPhase::Completed));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!CrawlPhase::NotStarted.can_transition_to(CrawlPhase::BatchInFlight));
        assert!(!CrawlPhase::InterBatchWait.can_transition_to(CrawlPhase::Completed));
        assert!(!CrawlPhase::BatchInFlight.can_transition_to(CrawlPhase::Probing));
        assert!(!CrawlPhase::Probing.can_transition_to(CrawlPhase::Probing));
    }

    #[test]
    fn test_completed_has_no_exits() {
        for phase in CrawlPhase::all_phases() {
            assert!(
                !CrawlPhase::Completed.can_transition_to(phase),
                "Completed must not transition to {:?}",
                phase
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlPhase::NotStarted), "not_started");
        assert_eq!(format!("{}", CrawlPhase::BatchInFlight), "batch_in_flight");
        assert_eq!(format!("{}", CrawlPhase::Completed), "completed");
    }

    #[test]
    fn test_default_is_not_started() {
        assert_eq!(CrawlPhase::default(), CrawlPhase::NotStarted);
    }

    #[test]
    fn test_tracker_follows_lifecycle() {
        let mut tracker = PhaseTracker::new();
        assert_eq!(tracker.phase(), CrawlPhase::NotStarted);

        tracker.advance(CrawlPhase::Probing).unwrap();
        tracker.advance(CrawlPhase::BatchInFlight).unwrap();
        tracker.advance(CrawlPhase::InterBatchWait).unwrap();
        tracker.advance(CrawlPhase::BatchInFlight).unwrap();
        tracker.advance(CrawlPhase::Completed).unwrap();

        assert!(tracker.phase().is_terminal());
    }

    #[test]
    fn test_tracker_rejects_illegal_move() {
        let mut tracker = PhaseTracker::new();
        let err = tracker.advance(CrawlPhase::Completed).unwrap_err();

        assert!(matches!(
            err,
            HarvestError::InvalidTransition {
                from: CrawlPhase::NotStarted,
                to: CrawlPhase::Completed
            }
        ));
        // A rejected move leaves the phase unchanged
        assert_eq!(tracker.phase(), CrawlPhase::NotStarted);
    }
}
