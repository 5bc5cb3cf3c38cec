// Upstream module - everything that talks to the Emby server

pub mod passthrough;
pub mod playback_info;

pub use passthrough::Passthrough;
pub use playback_info::{MediaPathResolver, MediaSourceInfo};
