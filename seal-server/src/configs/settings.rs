use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::services::transport::{ConnectParams, Role};

/// Ports on which brokers conventionally expect MQTT over TLS.
const SECURED_PORTS: [u16; 3] = [8883, 8884, 443];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconnect {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for Reconnect {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub client_id: String,
    /// Forces TLS on or off; derived from the port when absent.
    pub tls: Option<bool>,
    pub connect_timeout_secs: u64,
    pub keep_alive_secs: u64,
    #[serde(default)]
    pub reconnect: Reconnect,
}

impl Broker {
    pub fn tls_required(&self) -> bool {
        self.tls.unwrap_or_else(|| SECURED_PORTS.contains(&self.port))
    }

    /// Session parameters for one role. Each role gets its own client id, a
    /// broker closes the older session when two share one.
    pub fn connect_params(&self, role: Role) -> ConnectParams {
        ConnectParams {
            client_id: format!("{}-{}", self.client_id, role.suffix()),
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            tls: self.tls_required(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            keep_alive: Duration::from_secs(self.keep_alive_secs),
            initial_backoff: Duration::from_millis(self.reconnect.initial_delay_ms),
            max_backoff: Duration::from_millis(self.reconnect.max_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topics {
    pub motion: String,
    pub time_range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub broker: Broker,
    pub topics: Topics,
    pub dashboard: Dashboard,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    /// Layered sources shared by every binary in the workspace:
    /// `configs/default`, then `configs/{RUN_MODE}`, then `SEAL__*` variables.
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Ok(Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("SEAL").prefix_separator("__").separator("__")))
    }
}
