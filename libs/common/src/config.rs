//! Service configuration types.

use serde::Deserialize;

/// Token used when none is configured; the upstream rejects it.
pub const PLACEHOLDER_TOKEN: &str = "NoValidTokenRetrieved";

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// AVWX access token, sent as the `token` query parameter.
    #[serde(default = "default_token")]
    pub avwx_token: String,

    /// Station lookup endpoint; the identifier is appended as a path segment.
    #[serde(default = "default_base_url")]
    pub avwx_base_url: String,

    /// Identifiers fetched into the store at startup.
    #[serde(default = "default_seed_ids")]
    pub seed_ids: Vec<String>,

    /// Address the HTTP surface listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Upstream fetch parameters.
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Upstream fetch limits.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Max upstream calls in flight during population.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl ServiceConfig {
    pub fn uses_placeholder_token(&self) -> bool {
        self.avwx_token.trim().is_empty() || self.avwx_token == PLACEHOLDER_TOKEN
    }
}

/// Normalise a list of identifiers: trim, upper-case, drop empties and
/// duplicates (first occurrence wins).
pub fn normalize_ids<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        let id = id.as_ref().trim().to_ascii_uppercase();
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_token() -> String {
    PLACEHOLDER_TOKEN.into()
}
fn default_base_url() -> String {
    "https://avwx.rest/api/station".into()
}
fn default_bind_addr() -> String {
    "0.0.0.0:8080".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_concurrent() -> usize {
    4
}

// Class B, C and D fields around KSTL.
fn default_seed_ids() -> Vec<String> {
    [
        "KSTL", "KSUS", "KCPS", "KALN", "KBLV", "KCOU", "KJEF", "KSPI", "KDEC", "KCMI", "KMDH",
        "KMWA", "KCGI", "KTBN",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            avwx_token: default_token(),
            avwx_base_url: default_base_url(),
            seed_ids: default_seed_ids(),
            bind_addr: default_bind_addr(),
            fetch: FetchConfig::default(),
        }
    }
}
