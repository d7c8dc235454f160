//! Persisted resources for the two things the monitor owns:
//! `BinaryMonitorServer` (enabled flag) and `BinaryMonitorServerAddress`.

use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Default bind address, matching the documented VICE default.
pub const DEFAULT_ADDRESS: &str = "ip4://127.0.0.1:6502";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub address: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

impl MonitorConfig {
    fn path() -> PathBuf {
        BaseDirs::new()
            .map(|d| d.config_dir().join("retromon").join("monitor.json"))
            .unwrap_or_else(|| {
                PathBuf::from(std::env::var("HOME").unwrap_or_default())
                    .join(".config")
                    .join("retromon")
                    .join("monitor.json")
            })
    }

    /// Loads the persisted config, falling back to [`MonitorConfig::default`]
    /// (and logging a warning) on a missing or malformed file.
    pub fn load() -> Self {
        let path = Self::path();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read monitor config, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "monitor config is not valid JSON, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), MonitorError> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| MonitorError::Config {
                path: path.display().to_string(),
                source,
            })?;
        }
        let content = serde_json::to_string_pretty(self).expect("MonitorConfig always serializes");
        std::fs::write(&path, content).map_err(|source| MonitorError::Config {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Parsed form of `ip4://host:port` / `ip6://[host]:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl ServerAddress {
    pub fn parse(raw: &str) -> Result<Self, MonitorError> {
        let invalid = || MonitorError::InvalidAddress(raw.to_string());

        let rest = raw
            .strip_prefix("ip4://")
            .or_else(|| raw.strip_prefix("ip6://"))
            .ok_or_else(invalid)?;

        if let Some(body) = rest.strip_prefix('[') {
            // ip6 bracketed form: [host]:port
            let (host, after) = body.split_once(']').ok_or_else(invalid)?;
            let port_str = after.strip_prefix(':').ok_or_else(invalid)?;
            let port = port_str.parse().map_err(|_| invalid())?;
            return Ok(Self {
                host: host.to_string(),
                port,
            });
        }

        let (host, port_str) = rest.rsplit_once(':').ok_or_else(invalid)?;
        let port = port_str.parse().map_err(|_| invalid())?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn to_socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
