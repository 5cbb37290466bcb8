//! Handler for the `/neighbors/:participant` endpoint.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};

use regnet_core::{
  entity::ParticipantKey,
  store::{GraphStore, NeighborSummary},
};

use crate::error::ApiError;

/// `GET /neighbors/:participant`
///
/// Deduplicated `(neighbor, polarity, direction)` triples for the given
/// `kb_name:kb_id` key. Unknown participants yield an empty list.
pub async fn for_participant<S>(
  State(store): State<Arc<S>>,
  Path(participant): Path<String>,
) -> Result<Json<Vec<NeighborSummary>>, ApiError>
where
  S: GraphStore,
{
  let key = ParticipantKey::parse(&participant)?;
  let neighbors = store
    .neighbors(&key)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(neighbors))
}
