mod app;
mod health_handler;
mod ws_handler;

pub use app::*;
pub use health_handler::*;
pub use ws_handler::*;
