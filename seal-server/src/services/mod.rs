mod command_service;
mod status_service;
pub mod transport;

pub use command_service::*;
pub use status_service::*;
