//! # emby302 Types
//!
//! Config models and error definitions shared by the emby302 crates.
//!
//! - **`error`** - Typed errors for configuration loading and media path resolution
//! - **`models`** - Serde shapes of the YAML config file
//!
//! ## Architecture Role
//!
//! `emby302-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!       emby302-types (this crate)
//!              │
//!              ▼
//!        emby302-core
//!              │
//!              ▼
//!       emby302-server
//! ```

pub mod error;
pub mod models;

pub use error::{ConfigError, ResolveError};
pub use models::{
    AppConfig, ClientFilterConfig, ClientFilterMode, EmbyConfig, PortValue, ServerConfig,
    StrmConfig,
};
