//! Typed error definitions for emby302.
//!
//! - [`ConfigError`] is fatal and only produced while loading the config at startup.
//! - [`ResolveError`] is produced per request by the media path resolver and is turned into a
//!   500 response by the dispatcher.

mod config;
mod resolve;

pub use config::ConfigError;
pub use resolve::ResolveError;
