//! Handlers for evidence lookup endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/evidences/:interaction_id` | numeric interaction id |
//! | `GET`  | `/evidences/:controller/:controlled` | ordered pair of `kb:id` keys |
//! | `GET`  | `/evidences/:controller/:controlled/:polarity/:directed` | plus bool filters |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};

use regnet_core::{
  entity::ParticipantKey,
  store::{EvidenceSummary, GraphStore},
};

use crate::error::ApiError;

/// `GET /evidences/:interaction_id`
pub async fn for_interaction<S>(
  State(store): State<Arc<S>>,
  Path(interaction_id): Path<i64>,
) -> Result<Json<Vec<EvidenceSummary>>, ApiError>
where
  S: GraphStore,
{
  let evidences = store
    .evidence_for_interaction(interaction_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(evidences))
}

/// `GET /evidences/:controller/:controlled`
///
/// Combined evidence of every interaction between the ordered pair.
pub async fn for_pair<S>(
  State(store): State<Arc<S>>,
  Path((controller, controlled)): Path<(String, String)>,
) -> Result<Json<Vec<EvidenceSummary>>, ApiError>
where
  S: GraphStore,
{
  let controller = ParticipantKey::parse(&controller)?;
  let controlled = ParticipantKey::parse(&controlled)?;
  let evidences = store
    .evidence_for_pair(&controller, &controlled)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(evidences))
}

/// `GET /evidences/:controller/:controlled/:polarity/:directed`
pub async fn for_pair_filtered<S>(
  State(store): State<Arc<S>>,
  Path((controller, controlled, polarity, directed)): Path<(
    String,
    String,
    bool,
    bool,
  )>,
) -> Result<Json<Vec<EvidenceSummary>>, ApiError>
where
  S: GraphStore,
{
  let controller = ParticipantKey::parse(&controller)?;
  let controlled = ParticipantKey::parse(&controlled)?;
  let evidences = store
    .evidence_for_pair_filtered(&controller, &controlled, polarity, directed)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(evidences))
}
