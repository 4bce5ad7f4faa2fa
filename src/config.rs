use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND: &str = "0.0.0.0:3147";
const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    /// Bearer token required on every chat call when set.
    pub api_key: Option<String>,
    pub max_sessions: usize,
    /// Seeds the reply pickers so canned replies repeat between runs.
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind = get("CINEFINDER_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse::<SocketAddr>()
            .context("CINEFINDER_BIND is not a valid socket address")?;

        let max_sessions = match get("MAX_SESSIONS") {
            Some(raw) => raw
                .parse::<usize>()
                .context("MAX_SESSIONS must be a positive integer")?,
            None => DEFAULT_MAX_SESSIONS,
        };
        if max_sessions == 0 {
            anyhow::bail!("MAX_SESSIONS must be a positive integer");
        }

        let seed = get("CINEFINDER_SEED")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .context("CINEFINDER_SEED must be an unsigned integer")?;

        Ok(Self {
            bind,
            api_key: get("CHAT_API_KEY"),
            max_sessions,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert!(config.api_key.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = config_from(&[("CHAT_API_KEY", "   ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("CINEFINDER_BIND", "127.0.0.1:8080"),
            ("CHAT_API_KEY", "secret"),
            ("MAX_SESSIONS", "5"),
            ("CINEFINDER_SEED", "42"),
        ])
        .unwrap();
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.max_sessions, 5);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("MAX_SESSIONS", "0")]).is_err());
        assert!(config_from(&[("MAX_SESSIONS", "many")]).is_err());
        assert!(config_from(&[("CINEFINDER_SEED", "-1")]).is_err());
        assert!(config_from(&[("CINEFINDER_BIND", "nowhere")]).is_err());
    }
}
