//! Upstream retrieval seam.

use common::{Airport, Result};
use std::future::Future;

/// Retrieves one airport record from an upstream source.
///
/// Implementations perform a single attempt per call and return
/// `Error::Upstream` or `Error::Decode` on failure. They must not retry.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<Airport>> + Send;
}

