//! Service configuration: defaults, then config.toml, then .env and env vars.

use common::config::normalize_ids;
use common::{Error, ServiceConfig};
use std::net::SocketAddr;
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &ServiceConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.avwx_base_url.trim().is_empty() {
        issues.push("avwx_base_url must not be empty".into());
    }
    if config.bind_addr.parse::<SocketAddr>().is_err() {
        issues.push(format!(
            "bind_addr must be a socket address like 0.0.0.0:8080 (got {:?})",
            config.bind_addr
        ));
    }
    if config.fetch.timeout_secs == 0 {
        issues.push("fetch.timeout_secs must be > 0".into());
    }
    if config.fetch.max_concurrent == 0 {
        issues.push("fetch.max_concurrent must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Parse a TOML document into a config, keeping defaults for absent keys.
fn parse_config_toml(contents: &str) -> Result<ServiceConfig, Error> {
    toml::from_str(contents).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}

/// Apply environment overrides. `var` abstracts the process environment.
fn apply_env_overrides<F>(config: &mut ServiceConfig, var: F) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = var("AVWX_TOKEN") {
        config.avwx_token = token.trim().to_string();
    }
    if let Some(url) = var("AVWX_BASE_URL") {
        config.avwx_base_url = url.trim().to_string();
    }
    if let Some(ids) = var("AIRPORT_SEED_IDS") {
        config.seed_ids = ids.split(',').map(str::to_string).collect();
    }
    if let Some(addr) = var("AIRPORT_BIND_ADDR") {
        config.bind_addr = addr.trim().to_string();
    }
    if let Some(raw) = var("AVWX_TIMEOUT_SECS") {
        config.fetch.timeout_secs = parse_positive_u64(&raw, "AVWX_TIMEOUT_SECS")?;
    }
    if let Some(raw) = var("AVWX_MAX_CONCURRENT") {
        let parsed = parse_positive_u64(&raw, "AVWX_MAX_CONCURRENT")?;
        config.fetch.max_concurrent = usize::try_from(parsed)
            .map_err(|_| Error::Config("AVWX_MAX_CONCURRENT is too large".into()))?;
    }
    Ok(())
}

/// Load service configuration from environment and optional config file.
pub fn load_config(config_path: &Path) -> Result<ServiceConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults, then the config file if it exists.
    let mut config = if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        parse_config_toml(&contents)?
    } else {
        tracing::debug!("{} not found; using defaults", config_path.display());
        ServiceConfig::default()
    };

    // 3. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    config.seed_ids = normalize_ids(&config.seed_ids);

    validate_config(&config)?;

    Ok(config)
}
