//! Read-only JSON query API for the regnet graph.
//!
//! Exposes an axum [`Router`] backed by any [`regnet_core::store::GraphStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(regnet_api::api_router(store.clone()))
//! ```

pub mod articles;
pub mod error;
pub mod evidences;
pub mod interactions;
pub mod neighbors;

use std::sync::Arc;

use axum::{Router, routing::get};

use regnet_core::store::GraphStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GraphStore + 'static,
{
  Router::new()
    // Interactions
    .route(
      "/interactions/{participant}",
      get(interactions::for_participant::<S>),
    )
    .route(
      "/interactions-in-article/{document_id}",
      get(interactions::in_article::<S>),
    )
    // Evidence
    .route(
      "/evidences/{interaction_id}",
      get(evidences::for_interaction::<S>),
    )
    .route(
      "/evidences/{controller}/{controlled}",
      get(evidences::for_pair::<S>),
    )
    .route(
      "/evidences/{controller}/{controlled}/{polarity}/{directed}",
      get(evidences::for_pair_filtered::<S>),
    )
    // Neighbors
    .route("/neighbors/{participant}", get(neighbors::for_participant::<S>))
    // Articles
    .route("/article_text/{document_id}", get(articles::text::<S>))
    .route(
      "/annotated_article_text/{document_id}",
      get(articles::annotated::<S>),
    )
    .with_state(store)
}
