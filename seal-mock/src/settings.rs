use serde::Deserialize;

use seal_server::configs::{Broker, Logger, Settings as BridgeSettings, Topics};

#[derive(Debug, Clone, Deserialize)]
pub struct Mock {
    pub client_id: String,
    pub publish_interval_secs: u64,
    pub motion_probability: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub broker: Broker,
    pub topics: Topics,
    pub mock: Mock,
}

impl Settings {
    pub fn new() -> anyhow::Result<Self> {
        let mut settings: Settings = BridgeSettings::builder()?.build()?.try_deserialize()?;
        settings.broker.client_id = settings.mock.client_id.clone();

        Ok(settings)
    }
}
