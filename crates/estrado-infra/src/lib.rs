//! Infrastructure layer for Estrado.
//!
//! Implements the `UpstreamApi` port from `estrado-core` over reqwest, loads
//! `estrado.toml`, and keeps the in-memory session store.

pub mod config;
pub mod http_client;
pub mod session;
