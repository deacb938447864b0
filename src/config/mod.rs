// src/config/mod.rs
//! Immutable runtime configuration, built once at startup and handed to each component.

pub mod settings;

use std::fmt;

use lettre::message::Mailbox;

use crate::error::{Result, TrackerError};
pub use settings::{load_settings_default, load_settings_from, Settings, SmtpSecurity};

pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_API_KEY_LEGACY: &str = "GOOGLE_API_KEY";
pub const ENV_EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const ENV_RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";
pub const ENV_DRY_RUN: &str = "DRY_RUN";

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub sender: Mailbox,
    pub email_password: String,
    pub recipient: Mailbox,
    /// Log emails instead of sending them.
    pub dry_run: bool,
    pub settings: Settings,
}

impl Config {
    /// Read secrets from the process environment and tuning from the settings file.
    pub fn from_env() -> Result<Self> {
        let settings = load_settings_default()
            .map_err(|e| TrackerError::Config(format!("{e:#}")))?;
        Self::from_lookup(|key| std::env::var(key).ok(), settings)
    }

    /// Build from any key/value lookup. Tests pass a closure over a map.
    pub fn from_lookup<F>(lookup: F, settings: Settings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| TrackerError::Config(format!("missing {key}")))
        };

        let api_key = get(ENV_API_KEY)
            .or_else(|| get(ENV_API_KEY_LEGACY))
            .ok_or_else(|| {
                TrackerError::Config(format!("missing {ENV_API_KEY} (or {ENV_API_KEY_LEGACY})"))
            })?;
        let sender = parse_mailbox(ENV_EMAIL_ADDRESS, &require(ENV_EMAIL_ADDRESS)?)?;
        let email_password = require(ENV_EMAIL_PASSWORD)?;
        let recipient = parse_mailbox(ENV_RECIPIENT_EMAIL, &require(ENV_RECIPIENT_EMAIL)?)?;
        let dry_run = get(ENV_DRY_RUN).is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        Ok(Self {
            api_key,
            sender,
            email_password,
            recipient,
            dry_run,
            settings,
        })
    }

    /// SMTP login name. Same as the sender address.
    pub fn smtp_user(&self) -> String {
        self.sender.email.to_string()
    }
}

fn parse_mailbox(key: &str, value: &str) -> Result<Mailbox> {
    value
        .parse()
        .map_err(|e| TrackerError::Config(format!("invalid {key} {value:?}: {e}")))
}

// Secrets stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key_len", &self.api_key.len())
            .field("sender", &self.sender.to_string())
            .field("email_password", &"<redacted>")
            .field("recipient", &self.recipient.to_string())
            .field("dry_run", &self.dry_run)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn build(pairs: &[(&str, &str)]) -> Result<Config> {
        let m = env_map(pairs);
        Config::from_lookup(|k| m.get(k).cloned(), Settings::default())
    }

    const FULL: &[(&str, &str)] = &[
        ("API_KEY", "k-123"),
        ("EMAIL_ADDRESS", "tracker@example.com"),
        ("EMAIL_PASSWORD", "hunter2"),
        ("RECIPIENT_EMAIL", "student@example.com"),
    ];

    #[test]
    fn complete_env_builds_config() {
        let cfg = build(FULL).unwrap();
        assert_eq!(cfg.api_key, "k-123");
        assert_eq!(cfg.smtp_user(), "tracker@example.com");
        assert_eq!(cfg.recipient.email.to_string(), "student@example.com");
        assert!(!cfg.dry_run);
    }

    #[test]
    fn missing_values_are_config_errors() {
        for skip in ["API_KEY", "EMAIL_ADDRESS", "EMAIL_PASSWORD", "RECIPIENT_EMAIL"] {
            let pairs: Vec<_> = FULL.iter().copied().filter(|(k, _)| *k != skip).collect();
            let err = build(&pairs).unwrap_err();
            assert!(matches!(err, TrackerError::Config(ref m) if m.contains(skip)), "{err}");
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut pairs = FULL.to_vec();
        pairs[2] = ("EMAIL_PASSWORD", "   ");
        assert!(matches!(build(&pairs), Err(TrackerError::Config(_))));
    }

    #[test]
    fn legacy_api_key_name_is_accepted() {
        let mut pairs: Vec<_> = FULL[1..].to_vec();
        pairs.push(("GOOGLE_API_KEY", "legacy"));
        assert_eq!(build(&pairs).unwrap().api_key, "legacy");
    }

    #[test]
    fn invalid_recipient_is_rejected() {
        let mut pairs = FULL.to_vec();
        pairs[3] = ("RECIPIENT_EMAIL", "not-an-address");
        let err = build(&pairs).unwrap_err();
        assert!(err.to_string().contains("RECIPIENT_EMAIL"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut pairs = FULL.to_vec();
        pairs.push(("DRY_RUN", "1"));
        let cfg = build(&pairs).unwrap();
        assert!(cfg.dry_run);
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(!dbg.contains("k-123"));
    }
}
