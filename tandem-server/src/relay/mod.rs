mod message_router;
mod relay_command;
mod relay_config;
mod relay_error;
mod relay_handle;
mod relay_service;

pub use message_router::*;
pub use relay_command::*;
pub use relay_config::*;
pub use relay_error::*;
pub use relay_handle::*;
pub use relay_service::*;
