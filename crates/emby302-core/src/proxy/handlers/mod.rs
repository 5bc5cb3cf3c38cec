// Handlers module - the catch-all request handler

pub mod dispatch;

pub use dispatch::{decide, handle_request, Decision};
