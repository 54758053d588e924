use std::{fs, io, path::Path};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "console.toml";
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5058/api";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base: Url,
    pub request_timeout_secs: Option<u64>,
    pub log_filter: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base: Option<String>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then the config file (missing is fine), then the process
/// environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let file = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid settings (config file '{}')", path.display()))
}

pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let file_cfg = match file {
        Some(raw) => toml::from_str::<FileSettings>(raw).context("config file is not valid")?,
        None => FileSettings::default(),
    };

    let mut api_base = file_cfg.api_base;
    if let Some(v) = env("TIMEMANIA_API_BASE") {
        api_base = Some(v);
    }
    if let Some(v) = env("APP__API_BASE") {
        api_base = Some(v);
    }

    let mut request_timeout_secs = file_cfg.request_timeout_secs;
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        let parsed = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
        request_timeout_secs = Some(parsed);
    }

    let mut log_filter = file_cfg.log_filter;
    if let Some(v) = env("APP__LOG_FILTER") {
        log_filter = Some(v);
    }

    Ok(Settings {
        api_base: parse_api_base(api_base.as_deref().unwrap_or(DEFAULT_API_BASE))?,
        // Zero means no timeout, same as leaving it unset.
        request_timeout_secs: request_timeout_secs.filter(|secs| *secs > 0),
        log_filter: log_filter
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
    })
}

/// Accepts absolute http(s) URLs only; a trailing slash is dropped.
pub fn parse_api_base(raw: &str) -> anyhow::Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).with_context(|| format!("invalid api base url '{raw}'"))?;
    anyhow::ensure!(
        matches!(url.scheme(), "http" | "https"),
        "api base url must use http or https, got '{}'",
        url.scheme()
    );
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
