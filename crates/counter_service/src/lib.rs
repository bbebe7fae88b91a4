//! Counter service: shared counter state and the HTTP surface around it.
mod counter;
mod error;
mod http;
mod server;
mod settings;
mod types;

pub use counter::MessageCounter;
pub use error::ProcessError;
pub use http::{is_json_content_type, router, MESSAGE_PATH};
pub use server::{bind, serve};
pub use settings::ServiceSettings;
pub use types::{CountResponse, ErrorBody};
