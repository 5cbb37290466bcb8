//! SQLite backend for the regnet graph store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. That single connection also serialises
//! every resolve-or-create closure, which is what upholds the
//! no-duplicate-race guarantee of [`regnet_core::store::GraphStore`].

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
