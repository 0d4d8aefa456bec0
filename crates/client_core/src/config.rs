use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "assistant.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub bearer_token: String,
    pub debounce_ms: u64,
    pub min_query_chars: usize,
    pub notice_ttl_ms: u64,
    pub subject_family: String,
    pub subject_given: Vec<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            bearer_token: "SIH2025_DUMMY_ABHA_TOKEN".into(),
            debounce_ms: 500,
            min_query_chars: 3,
            notice_ttl_ms: 3000,
            subject_family: "Kumar".into(),
            subject_given: vec!["Aditya".into()],
        }
    }
}

impl ClientSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid api_base_url '{}'", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api_base_url must use http or https, got '{}'", url.scheme());
        }
        if self.bearer_token.trim().is_empty() {
            bail!("bearer_token must not be empty");
        }
        if self.min_query_chars == 0 {
            bail!("min_query_chars must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    api_base_url: Option<String>,
    bearer_token: Option<String>,
    debounce_ms: Option<u64>,
    min_query_chars: Option<usize>,
    notice_ttl_ms: Option<u64>,
    subject_family: Option<String>,
    subject_given: Option<Vec<String>>,
}

/// Builds settings from defaults, then the TOML file, then environment variables.
///
/// An explicitly named file must exist; the default `assistant.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_SETTINGS_FILE) {
                apply_file(&mut settings, &raw).with_context(|| {
                    format!("failed to parse settings file '{DEFAULT_SETTINGS_FILE}'")
                })?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings.validate()?;
    Ok(settings)
}

pub(crate) fn apply_file(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file: SettingsFile = toml::from_str(raw)?;
    if let Some(v) = file.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file.bearer_token {
        settings.bearer_token = v;
    }
    if let Some(v) = file.debounce_ms {
        settings.debounce_ms = v;
    }
    if let Some(v) = file.min_query_chars {
        settings.min_query_chars = v;
    }
    if let Some(v) = file.notice_ttl_ms {
        settings.notice_ttl_ms = v;
    }
    if let Some(v) = file.subject_family {
        settings.subject_family = v;
    }
    if let Some(v) = file.subject_given {
        settings.subject_given = v;
    }
    Ok(())
}

pub(crate) fn apply_env(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("ASSISTANT_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("ASSISTANT_BEARER_TOKEN") {
        settings.bearer_token = v;
    }
    if let Some(v) = lookup("APP__BEARER_TOKEN") {
        settings.bearer_token = v;
    }

    if let Some(v) = lookup("APP__DEBOUNCE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.debounce_ms = parsed;
        }
    }
    if let Some(v) = lookup("APP__NOTICE_TTL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.notice_ttl_ms = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
