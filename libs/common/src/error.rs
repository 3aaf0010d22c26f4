//! Unified error type for the airport service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure, timeout, or non-success status from the upstream.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Upstream body could not be turned into an `Airport`.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures caused by the network or the upstream service itself.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream(_))
    }
}
