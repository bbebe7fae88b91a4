//! Counter core: request validation and the dedupe/accumulate state machine.
mod request;
mod state;
mod words;

pub use request::{
    parse_request, validate_request, MessageId, MessageRequest, RequestError, SchemaError,
};
pub use state::{CounterError, CounterState, CounterView, Outcome};
pub use words::{WhitespaceWordCounter, WordCounter};
