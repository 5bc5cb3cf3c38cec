//! Config file models for emby302.
//!
//! These are the raw shapes read from YAML. The core crate turns them into the immutable
//! runtime settings (rule store, client filter, upstream connection).

mod config;

pub use config::{
    AppConfig, ClientFilterConfig, ClientFilterMode, EmbyConfig, PortValue, ServerConfig,
    StrmConfig,
};
