use std::sync::{Mutex, MutexGuard};

use counter_core::{
    parse_request, CounterState, CounterView, MessageRequest, Outcome, WhitespaceWordCounter,
    WordCounter,
};
use counter_logging::{counter_debug, counter_error, counter_info, counter_warn};

use crate::{CountResponse, ProcessError};

/// Process-lifetime counter shared by all request handlers.
///
/// The seen-id check, the id insertion and the total update run under a
/// single lock acquisition, so concurrent requests with the same id are
/// counted at most once.
pub struct MessageCounter {
    state: Mutex<CounterState>,
    words: Box<dyn WordCounter>,
}

impl Default for MessageCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCounter {
    pub fn new() -> Self {
        Self::with_word_counter(WhitespaceWordCounter)
    }

    pub fn with_word_counter(words: impl WordCounter + 'static) -> Self {
        Self {
            state: Mutex::new(CounterState::new()),
            words: Box::new(words),
        }
    }

    /// Parses, validates and records a raw JSON body.
    pub fn process_body(&self, body: &[u8]) -> Result<CountResponse, ProcessError> {
        let request = match parse_request(body) {
            Ok(request) => request,
            Err(err) => {
                counter_warn!("Rejected request body_len={}: {}", body.len(), err);
                return Err(err.into());
            }
        };
        let outcome = self.submit(request)?;
        Ok(CountResponse {
            count: outcome.total(),
        })
    }

    pub fn submit(&self, request: MessageRequest) -> Result<Outcome, ProcessError> {
        let outcome = {
            let mut state = self.lock()?;
            state.record(&request, self.words.as_ref())
        };

        match outcome {
            Ok(outcome @ Outcome::Accepted { words, total }) => {
                counter_info!("Accepted id={} words={} total={}", request.id, words, total);
                Ok(outcome)
            }
            Ok(outcome @ Outcome::Duplicate { total }) => {
                counter_debug!("Duplicate id={} total={}", request.id, total);
                Ok(outcome)
            }
            Err(err) => {
                counter_error!("Failed to record id={}: {}", request.id, err);
                Err(ProcessError::Internal(err.to_string()))
            }
        }
    }

    pub fn total(&self) -> Result<u64, ProcessError> {
        Ok(self.lock()?.total())
    }

    pub fn view(&self) -> Result<CounterView, ProcessError> {
        Ok(self.lock()?.view())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CounterState>, ProcessError> {
        self.state.lock().map_err(|_| {
            counter_error!("Counter state lock poisoned");
            ProcessError::Internal("counter state lock poisoned".to_string())
        })
    }
}
