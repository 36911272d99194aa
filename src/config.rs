//! Server configuration from the environment.
//!
//! Environment Variables:
//!   PORT - HTTP port (default: 3001)
//!   QUOTE_CONFIG_PATH - TOML file with pricing tables (default: built-in tables)
//!   RATE_MODE - `fixed` or `jittered`, overrides the file
//!   RATE_SEED - Seed for the jittered rate, overrides the file

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::quote::{QuoteConfig, RateMode};

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub quote_config_path: Option<String>,
    pub rate_mode: Option<RateMode>,
    pub rate_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            quote_config_path: None,
            rate_mode: None,
            rate_seed: None,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment. The binary loads `.env` before calling this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let quote_config_path = lookup("QUOTE_CONFIG_PATH").filter(|p| !p.trim().is_empty());

        let rate_mode = match lookup("RATE_MODE").map(|m| m.trim().to_lowercase()) {
            None => None,
            Some(m) if m.is_empty() => None,
            Some(m) if m == "fixed" => Some(RateMode::Fixed),
            Some(m) if m == "jittered" => Some(RateMode::Jittered),
            Some(other) => bail!("RATE_MODE must be `fixed` or `jittered`, got `{}`", other),
        };

        let rate_seed = match lookup("RATE_SEED") {
            Some(s) if !s.trim().is_empty() => Some(
                s.trim()
                    .parse()
                    .with_context(|| format!("RATE_SEED is not an unsigned integer: {}", s))?,
            ),
            _ => None,
        };

        Ok(Self {
            port,
            quote_config_path,
            rate_mode,
            rate_seed,
        })
    }

    /// Pricing tables from `path` (or the built-in ones) with the env overrides applied.
    pub fn load_quote_config(&self, path: Option<&str>) -> Result<QuoteConfig> {
        let mut config = match path.or(self.quote_config_path.as_deref()) {
            Some(path) => {
                info!("Loading quote config from {}", path);
                QuoteConfig::from_toml_file(path)?
            }
            None => {
                info!("Using built-in quote tables");
                QuoteConfig::default()
            }
        };

        if let Some(mode) = self.rate_mode {
            config.rate.mode = mode;
        }
        if let Some(seed) = self.rate_seed {
            config.rate.seed = Some(seed);
        }

        config
            .validate()
            .context("Invalid quote configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn test_env_values() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("QUOTE_CONFIG_PATH", "/etc/remit/quote.toml"),
            ("RATE_MODE", "Jittered"),
            ("RATE_SEED", "42"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.quote_config_path.as_deref(), Some("/etc/remit/quote.toml"));
        assert_eq!(config.rate_mode, Some(RateMode::Jittered));
        assert_eq!(config.rate_seed, Some(42));
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_bad_rate_values_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("RATE_MODE", "live")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("RATE_SEED", "-1")])).is_err());
    }

    #[test]
    fn test_overrides_applied_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gas_usd = 0.75\n\n[rate]\nbase = 1400.0").unwrap();

        let server = ServerConfig {
            rate_mode: Some(RateMode::Jittered),
            rate_seed: Some(7),
            ..ServerConfig::default()
        };
        let config = server
            .load_quote_config(Some(file.path().to_str().unwrap()))
            .unwrap();

        assert_eq!(config.gas_usd, 0.75);
        assert_eq!(config.rate.base, 1400.0);
        assert_eq!(config.rate.mode, RateMode::Jittered);
        assert_eq!(config.rate.seed, Some(7));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let server = ServerConfig::default();
        assert!(server.load_quote_config(Some("/nonexistent/quote.toml")).is_err());
    }
}
