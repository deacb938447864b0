// src/config/settings.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const ENV_SETTINGS_PATH: &str = "TRACKER_CONFIG_PATH";
pub const DEFAULT_SETTINGS_TOML: &str = "config/tracker.toml";
pub const DEFAULT_SETTINGS_JSON: &str = "config/tracker.json";

const DAY_SECS: u64 = 24 * 3600;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS, port 465 unless overridden.
    Tls,
    /// STARTTLS upgrade, port 587 unless overridden.
    #[default]
    Starttls,
    /// No encryption, port 25 unless overridden. Local relays and tests only.
    Plain,
}

impl SmtpSecurity {
    pub fn default_port(self) -> u16 {
        match self {
            SmtpSecurity::Tls => 465,
            SmtpSecurity::Starttls => 587,
            SmtpSecurity::Plain => 25,
        }
    }
}

/// Non-secret tuning knobs. Secrets never live here; they come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub interval_secs: u64,
    pub fetch_timeout_secs: u64,
    pub ai_timeout_secs: u64,
    pub email_timeout_secs: u64,
    pub max_chars_per_source: usize,
    pub ai_endpoint: String,
    pub ai_model: String,
    pub smtp_host: String,
    /// Unset means the usual port for `smtp_security`.
    pub smtp_port: Option<u16>,
    pub smtp_security: SmtpSecurity,
    pub log_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_secs: DAY_SECS,
            fetch_timeout_secs: 30,
            ai_timeout_secs: 60,
            email_timeout_secs: 30,
            max_chars_per_source: 12_000,
            ai_endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            ai_model: "gemini-2.5-flash".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: None,
            smtp_security: SmtpSecurity::Starttls,
            log_path: PathBuf::from("logs/scholarship_tracker.log"),
        }
    }
}

impl Settings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    pub fn email_timeout(&self) -> Duration {
        Duration::from_secs(self.email_timeout_secs)
    }

    pub fn smtp_port(&self) -> u16 {
        self.smtp_port.unwrap_or_else(|| self.smtp_security.default_port())
    }

    /// Replace zero/blank values with defaults so a sparse file can't disable a timeout.
    fn sanitized(mut self) -> Self {
        let d = Settings::default();
        if self.interval_secs == 0 {
            self.interval_secs = d.interval_secs;
        }
        if self.fetch_timeout_secs == 0 {
            self.fetch_timeout_secs = d.fetch_timeout_secs;
        }
        if self.ai_timeout_secs == 0 {
            self.ai_timeout_secs = d.ai_timeout_secs;
        }
        if self.email_timeout_secs == 0 {
            self.email_timeout_secs = d.email_timeout_secs;
        }
        if self.max_chars_per_source == 0 {
            self.max_chars_per_source = d.max_chars_per_source;
        }
        if self.ai_endpoint.trim().is_empty() {
            self.ai_endpoint = d.ai_endpoint;
        }
        self.ai_endpoint = self.ai_endpoint.trim_end_matches('/').to_string();
        if self.ai_model.trim().is_empty() {
            self.ai_model = d.ai_model;
        }
        if self.smtp_host.trim().is_empty() {
            self.smtp_host = d.smtp_host;
        }
        if self.smtp_port == Some(0) {
            self.smtp_port = None;
        }
        if self.log_path.as_os_str().is_empty() {
            self.log_path = d.log_path;
        }
        self
    }
}

/// Load settings from an explicit path. Supports TOML or JSON formats.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let parsed: Settings = match ext.as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("parsing JSON settings {}", path.display()))?,
        _ => toml::from_str(&content)
            .with_context(|| format!("parsing TOML settings {}", path.display()))?,
    };
    Ok(parsed.sanitized())
}

/// Load settings using env var + fallbacks:
/// 1) $TRACKER_CONFIG_PATH
/// 2) config/tracker.toml
/// 3) config/tracker.json
/// 4) built-in defaults
pub fn load_settings_default() -> Result<Settings> {
    if let Ok(p) = std::env::var(ENV_SETTINGS_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_SETTINGS_PATH} points to non-existent path"));
        }
        return load_settings_from(&pb);
    }
    let toml_p = PathBuf::from(DEFAULT_SETTINGS_TOML);
    if toml_p.exists() {
        return load_settings_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_SETTINGS_JSON);
    if json_p.exists() {
        return load_settings_from(&json_p);
    }
    Ok(Settings::default())
}
