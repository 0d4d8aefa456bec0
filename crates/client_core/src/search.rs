use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// A debounced search whose quiet period has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueSearch {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDecision {
    Scheduled { generation: u64 },
    /// Query too short; displayed results should be cleared now.
    Cleared,
}

/// Debounces query edits into at most one search per quiet period.
///
/// Every edit cancels the pending timer before anything else happens, and bumps a
/// generation counter. A timer that has already fired but whose [`DueSearch`] is still
/// queued is recognised as stale through [`SearchController::is_current`].
pub struct SearchController {
    quiet: Duration,
    min_chars: usize,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, DEFAULT_MIN_QUERY_CHARS)
    }
}

impl SearchController {
    pub fn new(quiet: Duration, min_chars: usize) -> Self {
        Self {
            quiet,
            min_chars,
            generation: 0,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn qualifies(&self, text: &str) -> bool {
        text.chars().count() >= self.min_chars
    }

    /// Must be called from within a tokio runtime; `on_due` runs on the timer task.
    pub fn on_query_changed<F>(&mut self, text: &str, on_due: F) -> QueryDecision
    where
        F: FnOnce(DueSearch) + Send + 'static,
    {
        self.cancel();
        if !self.qualifies(text) {
            return QueryDecision::Cleared;
        }

        let due = DueSearch {
            generation: self.generation,
            query: text.to_string(),
        };
        let quiet = self.quiet;
        debug!(generation = due.generation, query = %due.query, "search: scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            on_due(due);
        }));
        QueryDecision::Scheduled {
            generation: self.generation,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
