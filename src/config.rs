use std::{
    env,
    net::{AddrParseError, SocketAddr},
};

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub service_name: String,
    pub bind_addr: SocketAddr,
    pub seed_tasks: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TASKLIST_BIND_ADDR: {0}")]
    BindAddrParse(#[from] AddrParseError),
    #[error("invalid TASKLIST_SEED: {0} (expected true or false)")]
    SeedFlag(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("TASKLIST_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()?;
        let service_name =
            lookup("TASKLIST_SERVICE_NAME").unwrap_or_else(|| "tasklist".to_string());
        let seed_tasks = match lookup("TASKLIST_SEED") {
            None => true,
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::SeedFlag(raw))?,
        };
        Ok(Self {
            service_name,
            bind_addr,
            seed_tasks,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "tasklist".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            seed_tasks: true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
