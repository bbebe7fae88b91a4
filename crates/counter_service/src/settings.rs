use std::net::{Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub bind_addr: SocketAddr,
    /// Larger bodies are refused with 413 before any parsing.
    pub max_body_bytes: usize,
    /// Reject requests whose content type is not JSON.
    pub require_json_content_type: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            max_body_bytes: 64 * 1024,
            require_json_content_type: true,
        }
    }
}
