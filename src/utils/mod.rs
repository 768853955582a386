pub mod jwt;
pub mod tracing;
