//! AVWX station API client.
//!
//! Fetches airport metadata from the AVWX `station` endpoint, one
//! identifier per request, and decodes it into the shared `Airport` type.

use airport_store::Fetcher;
use common::{Airport, Error, ServiceConfig};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "airport-service/0.1";
const MAX_ERROR_BODY: usize = 500;

/// AVWX API client with connection pooling and a per-request timeout.
#[derive(Debug, Clone)]
pub struct AvwxClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl AvwxClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build AVWX HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn from_config(cfg: &ServiceConfig) -> Result<Self, Error> {
        Self::new(
            cfg.avwx_base_url.clone(),
            cfg.avwx_token.clone(),
            Duration::from_secs(cfg.fetch.timeout_secs),
        )
    }

    fn station_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Fetch the station record for `id`.
    ///
    /// Single attempt. Transport failures, timeouts and non-2xx answers map
    /// to `Error::Upstream`; an unparseable body, or a record for some other
    /// station, maps to `Error::Decode`.
    pub async fn get_station(&self, id: &str) -> Result<Airport, Error> {
        let url = self.station_url(id);

        // Token stays out of the logs.
        debug!("Fetching AVWX station: {}", url);

        let resp = self
            .client
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Upstream(format!("request for {id} timed out"))
                } else {
                    Error::Upstream(format!("HTTP error for {id}: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "AVWX returned {} for {}: {}",
                status.as_u16(),
                id,
                truncate(&body, MAX_ERROR_BODY)
            )));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Upstream(format!("failed to read body for {id}: {e}")))?;

        let airport = decode_station(id, &body)?;

        debug!(
            "Got station {} ({}) with {} runways",
            airport.icao,
            airport.name,
            airport.runways.len()
        );

        Ok(airport)
    }
}

impl Fetcher for AvwxClient {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<Airport, Error>> + Send {
        self.get_station(id)
    }
}

/// Decode a station body. The record is keyed by the identifier that was
/// requested, so the caller can always look it up under that id.
fn decode_station(id: &str, body: &[u8]) -> Result<Airport, Error> {
    let mut airport: Airport = serde_json::from_slice(body)
        .map_err(|e| Error::Decode(format!("JSON parse error for {id}: {e}")))?;

    if !airport.icao.eq_ignore_ascii_case(id) {
        return Err(Error::Decode(format!(
            "requested {id} but upstream answered for {}",
            airport.icao
        )));
    }
    airport.icao = id.to_string();

    Ok(airport)
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
