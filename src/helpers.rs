pub mod periodic;
pub mod tracing;
