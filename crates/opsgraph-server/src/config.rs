//! Server configuration read from environment variables:
//! - `OPSGRAPH_HOST`: listen address (default: "0.0.0.0")
//! - `OPSGRAPH_PORT`: listen port (default: "8000")
//! - `OPSGRAPH_SEED_DEMO`: start with the demo graph (default: "true")

use thiserror::Error;

pub const HOST_VAR: &str = "OPSGRAPH_HOST";
pub const PORT_VAR: &str = "OPSGRAPH_PORT";
pub const SEED_DEMO_VAR: &str = "OPSGRAPH_SEED_DEMO";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {var}: '{value}'")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub seed_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            seed_demo: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Unset variables
    /// take their defaults; set but unparsable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();
        if let Some(host) = lookup(HOST_VAR) {
            config.host = host;
        }
        if let Some(port) = lookup(PORT_VAR) {
            config.port = port.trim().parse().map_err(|_| ConfigError {
                var: PORT_VAR,
                value: port.clone(),
            })?;
        }
        if let Some(seed) = lookup(SEED_DEMO_VAR) {
            config.seed_demo = parse_flag(&seed).ok_or(ConfigError {
                var: SEED_DEMO_VAR,
                value: seed.clone(),
            })?;
        }
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
