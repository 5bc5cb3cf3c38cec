// Modules - startup-time concerns outside the request path

pub mod config;
