// View state domain model - what the dashboard has accumulated so far
use super::reading::{Prediction, Reading};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Latest history snapshot. Replaced wholesale on every successful poll.
    pub history: Vec<Reading>,
    /// Every prediction received so far, in arrival order.
    pub predictions: Vec<Prediction>,
    /// True until the first history fetch resolves, whatever its outcome.
    pub loading: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            predictions: Vec::new(),
            loading: true,
        }
    }
}

impl ViewState {
    /// Applies a successful history fetch. Always counts as a change.
    pub fn replace_history(&mut self, readings: Vec<Reading>) -> bool {
        self.history = readings;
        self.loading = false;
        true
    }

    /// Applies a failed history fetch: history stays, loading clears.
    /// Returns whether anything changed.
    pub fn history_failed(&mut self) -> bool {
        std::mem::replace(&mut self.loading, false)
    }

    /// Appends a successful prediction fetch, then trims the oldest entries
    /// down to `limit` when one is set.
    pub fn append_predictions(&mut self, predictions: Vec<Prediction>, limit: Option<usize>) -> bool {
        self.predictions.extend(predictions);
        if let Some(limit) = limit {
            let excess = self.predictions.len().saturating_sub(limit);
            if excess > 0 {
                self.predictions.drain(..excess);
            }
        }
        true
    }
}
