//! Upstream mediation contract and controller actions for Estrado.
//!
//! This crate defines the [`upstream::UpstreamApi`] port that the
//! infrastructure layer implements, the per-endpoint envelope and success
//! rules, form validation, and the controller actions themselves. Actions
//! return an [`outcome::Outcome`]; turning that into HTTP is the web
//! crate's job. Nothing here depends on `estrado-infra` or any IO crate.

pub mod endpoint;
pub mod form;
pub mod outcome;
pub mod payload;
pub mod service;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testing;
