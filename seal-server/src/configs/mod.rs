pub mod settings;

pub use settings::{Broker, Dashboard, Logger, Reconnect, Server, Settings, Topics};
