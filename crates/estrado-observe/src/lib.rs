//! Logging and trace export for Estrado.

pub mod tracing_setup;
