//! Configuration loaded from environment variables

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub model_path: PathBuf,
    pub addr: SocketAddr,
    pub currency_symbol: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup, unset keys fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = lookup("DASHBOARD_ADDR").unwrap_or_else(|| "127.0.0.1:3001".to_string());

        Ok(Config {
            data_path: lookup("DATA_PATH")
                .unwrap_or_else(|| "data/Data.csv".to_string())
                .into(),

            model_path: lookup("MODEL_PATH")
                .unwrap_or_else(|| "data/pipe.json".to_string())
                .into(),

            addr: addr
                .parse()
                .with_context(|| format!("DASHBOARD_ADDR must be a socket address, got {}", addr))?,

            currency_symbol: lookup("CURRENCY_SYMBOL").unwrap_or_else(|| "₹".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.data_path, PathBuf::from("data/Data.csv"));
        assert_eq!(config.model_path, PathBuf::from("data/pipe.json"));
        assert_eq!(config.addr, "127.0.0.1:3001".parse().unwrap());
        assert_eq!(config.currency_symbol, "₹");
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("MODEL_PATH", "/srv/models/pipe.json"),
            ("DASHBOARD_ADDR", "0.0.0.0:8080"),
            ("CURRENCY_SYMBOL", "$"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.model_path, PathBuf::from("/srv/models/pipe.json"));
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_bad_address() {
        let err = Config::from_lookup(|key| {
            (key == "DASHBOARD_ADDR").then(|| "localhost".to_string())
        })
        .unwrap_err();

        assert!(err.to_string().contains("DASHBOARD_ADDR"));
    }
}
