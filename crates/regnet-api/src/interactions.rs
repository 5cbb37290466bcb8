//! Handlers for interaction lookup endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/interactions/:participant` | `participant` is `kb_name:kb_id` |
//! | `GET`  | `/interactions-in-article/:document_id` | id is normalised to `PMC...` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};

use regnet_core::{
  entity::{ParticipantKey, normalize_document_id},
  store::{GraphStore, InteractionSummary},
};

use crate::error::ApiError;

/// `GET /interactions/:participant`
///
/// Every interaction the participant appears in, on either side, with its
/// evidence count. Unknown participants yield an empty list.
pub async fn for_participant<S>(
  State(store): State<Arc<S>>,
  Path(participant): Path<String>,
) -> Result<Json<Vec<InteractionSummary>>, ApiError>
where
  S: GraphStore,
{
  let key = ParticipantKey::parse(&participant)?;
  let interactions = store
    .interactions_for_participant(&key)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(interactions))
}

/// `GET /interactions-in-article/:document_id`
pub async fn in_article<S>(
  State(store): State<Arc<S>>,
  Path(document_id): Path<String>,
) -> Result<Json<Vec<InteractionSummary>>, ApiError>
where
  S: GraphStore,
{
  let name = normalize_document_id(&document_id);
  let interactions = store
    .interactions_in_article(&name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(interactions))
}
