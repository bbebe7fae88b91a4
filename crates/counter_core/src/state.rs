use std::collections::HashSet;

use thiserror::Error;

use crate::{MessageId, MessageRequest, WordCounter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// First time this id was seen; `words` were added to the total.
    Accepted { words: u64, total: u64 },
    /// The id was already recorded; nothing changed.
    Duplicate { total: u64 },
}

impl Outcome {
    pub fn total(&self) -> u64 {
        match self {
            Outcome::Accepted { total, .. } | Outcome::Duplicate { total } => *total,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Outcome::Duplicate { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("word total overflow: {total} + {words}")]
    Overflow { total: u64, words: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterView {
    pub total: u64,
    pub distinct_ids: usize,
}

/// Seen identifiers plus the running word total.
///
/// Both only grow. `total` is always the sum of word counts over the first
/// accepted request of every id in `seen`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CounterState {
    seen: HashSet<MessageId>,
    total: u64,
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.seen.contains(id)
    }

    pub fn view(&self) -> CounterView {
        CounterView {
            total: self.total,
            distinct_ids: self.seen.len(),
        }
    }

    /// Records a validated request. Words are only counted for unseen ids.
    pub fn record(
        &mut self,
        request: &MessageRequest,
        counter: &dyn WordCounter,
    ) -> Result<Outcome, CounterError> {
        if self.seen.contains(&request.id) {
            return Ok(Outcome::Duplicate { total: self.total });
        }

        let words = counter.count(&request.message);
        // Compute before inserting so a failure leaves both fields untouched.
        let total = self
            .total
            .checked_add(words)
            .ok_or(CounterError::Overflow {
                total: self.total,
                words,
            })?;

        self.seen.insert(request.id.clone());
        self.total = total;
        Ok(Outcome::Accepted { words, total })
    }
}
