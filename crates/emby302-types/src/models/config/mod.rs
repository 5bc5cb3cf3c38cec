//! Application configuration models.

mod app;
mod client_filter;
mod emby;
mod enums;

pub use app::{AppConfig, PortValue, ServerConfig};
pub use client_filter::ClientFilterConfig;
pub use emby::{EmbyConfig, StrmConfig};
pub use enums::ClientFilterMode;
