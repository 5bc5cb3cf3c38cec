//! Proxy module - Emby 302 redirect service
//!
//! Every inbound request runs through one linear pipeline:
//! - Client filter (User-Agent firewall)
//! - Download policy gate
//! - PlaybackInfo lookup for playback requests
//! - Path map rewrite and 302 redirect
//! - Transparent passthrough to Emby for everything else

pub mod client_filter;
pub mod common;
pub mod credentials;
pub mod download_gate;
pub mod handlers;
pub mod rules;
pub mod server;
pub mod upstream;

pub use client_filter::ClientFilter;
pub use download_gate::DownloadPolicy;
pub use rules::{PathMapRule, RuleStore};
pub use server::{build_proxy_router, AppState};
pub use upstream::{MediaPathResolver, Passthrough};
