//! Core types and trait definitions for the regnet interaction graph.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod entity;
pub mod error;
pub mod span;
pub mod store;

pub use error::{Error, Result};
