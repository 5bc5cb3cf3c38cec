// Common module - helpers shared by the pipeline stages

pub mod client_builder;
pub mod header_constants;
pub mod query;
