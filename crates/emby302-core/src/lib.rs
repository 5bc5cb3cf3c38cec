//! # emby302 Core
//!
//! Request pipeline for emby302, a front proxy for Emby that answers playback requests with a
//! 302 to the media's real location and passes everything else through.
//!
//! ```text
//! emby302-core/src/
//! ├── modules/config.rs   # YAML loading into immutable Settings
//! └── proxy/
//!     ├── client_filter.rs  # User-Agent firewall
//!     ├── download_gate.rs  # download-strategy "403"
//!     ├── credentials.rs    # api_key / X-Emby-Token / X-Emby-Authorization
//!     ├── rules.rs          # ordered path-map rules
//!     ├── upstream/         # PlaybackInfo resolver + transparent passthrough
//!     ├── handlers/         # the dispatcher
//!     └── server.rs         # AppState + router
//! ```

#![cfg_attr(test, allow(clippy::panic))]

pub mod error;
pub mod modules;
pub mod proxy;

pub use error::{AppError, AppResult};
pub use modules::config::{load_config, read_config, EmbyConnection, Settings};
