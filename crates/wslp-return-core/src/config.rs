use std::time::Duration;

use serde::{Deserialize, Serialize};
use wslp_address::SLP_PREFIX;
use wslp_types::NoticeMessages;

use crate::error::ConfigError;

const DEFAULT_BALANCE_POLL_MS: u64 = 20_000;
/// Longest delay a browser `setTimeout` honours.
pub const MAX_BALANCE_POLL_MS: u64 = i32::MAX as u64;
const DEFAULT_WALLET_NOT_CONNECTED: &str = "MetaMask wallet not connected";

pub const ENV_BALANCE_POLL_MS: &str = "WSLP_BALANCE_POLL_MS";
pub const ENV_DESTINATION_PREFIX: &str = "WSLP_DESTINATION_PREFIX";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReturnConfig {
    pub balance_poll_interval_ms: u64,
    pub destination_prefix: String,
    pub messages: NoticeMessages,
    pub wallet_not_connected: String,
}

impl Default for ReturnConfig {
    fn default() -> Self {
        Self {
            balance_poll_interval_ms: DEFAULT_BALANCE_POLL_MS,
            destination_prefix: SLP_PREFIX.to_owned(),
            messages: NoticeMessages::default(),
            wallet_not_connected: DEFAULT_WALLET_NOT_CONNECTED.to_owned(),
        }
    }
}

impl ReturnConfig {
    /// Defaults overridden by `WSLP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BALANCE_POLL_MS) {
            config.balance_poll_interval_ms =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber {
                        key: ENV_BALANCE_POLL_MS,
                        value: raw.clone(),
                    })?;
        }

        if let Some(prefix) = lookup(ENV_DESTINATION_PREFIX) {
            let prefix = prefix.trim();
            if !prefix.is_empty() {
                config.destination_prefix = prefix.to_owned();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.balance_poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.balance_poll_interval_ms > MAX_BALANCE_POLL_MS {
            return Err(ConfigError::PollIntervalTooLong {
                max: MAX_BALANCE_POLL_MS,
                value: self.balance_poll_interval_ms,
            });
        }
        if self.destination_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyDestinationPrefix);
        }

        let texts = [
            ("wallet_not_connected", &self.wallet_not_connected),
            ("messages.pending", &self.messages.pending),
            ("messages.success", &self.messages.success),
            ("messages.error_fallback", &self.messages.error_fallback),
        ];
        for (field, text) in texts {
            if text.trim().is_empty() {
                return Err(ConfigError::BlankMessage { field });
            }
        }
        Ok(())
    }

    pub fn balance_poll_interval(&self) -> Duration {
        Duration::from_millis(self.balance_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ReturnConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ReturnConfig::default());
        assert_eq!(config.balance_poll_interval(), Duration::from_secs(20));
        assert_eq!(config.destination_prefix, "simpleledger");
        assert_eq!(config.messages.error_fallback, "Unknown error occurred");
    }

    #[test]
    fn env_overrides() {
        let config = ReturnConfig::from_lookup(lookup_from(&[
            (ENV_BALANCE_POLL_MS, " 5000 "),
            (ENV_DESTINATION_PREFIX, "slptest"),
        ]))
        .unwrap();
        assert_eq!(config.balance_poll_interval(), Duration::from_secs(5));
        assert_eq!(config.destination_prefix, "slptest");
    }

    #[test]
    fn blank_prefix_keeps_default() {
        let config =
            ReturnConfig::from_lookup(lookup_from(&[(ENV_DESTINATION_PREFIX, "  ")])).unwrap();
        assert_eq!(config.destination_prefix, "simpleledger");
    }

    #[test]
    fn invalid_interval_is_rejected() {
        assert_eq!(
            ReturnConfig::from_lookup(lookup_from(&[(ENV_BALANCE_POLL_MS, "soon")])),
            Err(ConfigError::InvalidNumber {
                key: ENV_BALANCE_POLL_MS,
                value: "soon".to_owned(),
            })
        );
        assert_eq!(
            ReturnConfig::from_lookup(lookup_from(&[(ENV_BALANCE_POLL_MS, "0")])),
            Err(ConfigError::ZeroPollInterval)
        );
    }

    #[test]
    fn interval_beyond_timer_range_is_rejected() {
        let config = ReturnConfig {
            balance_poll_interval_ms: 5_000_000_000,
            ..ReturnConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PollIntervalTooLong {
                max: MAX_BALANCE_POLL_MS,
                value: 5_000_000_000,
            })
        );

        let longest = ReturnConfig {
            balance_poll_interval_ms: MAX_BALANCE_POLL_MS,
            ..ReturnConfig::default()
        };
        assert_eq!(longest.validate(), Ok(()));

        assert_eq!(
            ReturnConfig::from_lookup(lookup_from(&[(ENV_BALANCE_POLL_MS, "2147483648")])),
            Err(ConfigError::PollIntervalTooLong {
                max: MAX_BALANCE_POLL_MS,
                value: 2_147_483_648,
            })
        );
    }

    #[test]
    fn blank_wallet_message_is_rejected() {
        let config: ReturnConfig =
            serde_json::from_str(r#"{ "wallet_not_connected": "" }"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::BlankMessage {
                field: "wallet_not_connected"
            })
        );
    }

    #[test]
    fn blank_notice_messages_are_rejected() {
        let cases = [
            (r#"{ "messages": { "pending": " " } }"#, "messages.pending"),
            (r#"{ "messages": { "success": "" } }"#, "messages.success"),
            (
                r#"{ "messages": { "error_fallback": "" } }"#,
                "messages.error_fallback",
            ),
        ];
        for (json, field) in cases {
            let config: ReturnConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.validate(), Err(ConfigError::BlankMessage { field }), "{json}");
        }
    }

    #[test]
    fn partial_json_override() {
        let config: ReturnConfig = serde_json::from_str(
            r#"{ "balance_poll_interval_ms": 1000, "messages": { "pending": "Returning..." } }"#,
        )
        .unwrap();
        assert_eq!(config.balance_poll_interval_ms, 1000);
        assert_eq!(config.messages.pending, "Returning...");
        assert_eq!(config.messages.success, "Success! Wait for swap.");
        assert_eq!(config.wallet_not_connected, DEFAULT_WALLET_NOT_CONNECTED);
    }
}
