//! Handlers for article text endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/article_text/:document_id` | raw stored text, 404 if unknown |
//! | `GET`  | `/annotated_article_text/:document_id` | text with mention spans stacked into tags |
//!
//! Document ids are normalised before lookup: upper-cased and `PMC`-prefixed,
//! so `8910733`, `pmc8910733` and `PMC8910733` all name the same article.
//! 404 is reserved for names with no article row; a known article whose
//! source document carried no text answers with an empty string.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};

use regnet_core::{entity::normalize_document_id, store::GraphStore};
use regnet_markup::annotate_document;

use crate::error::ApiError;

async fn stored_text<S>(store: &S, document_id: &str) -> Result<(String, String), ApiError>
where
  S: GraphStore,
{
  let name = normalize_document_id(document_id);
  let text = store
    .article_text(&name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::ArticleNotFound(name.clone()))?;
  Ok((name, text))
}

/// `GET /article_text/:document_id`
pub async fn text<S>(
  State(store): State<Arc<S>>,
  Path(document_id): Path<String>,
) -> Result<Json<String>, ApiError>
where
  S: GraphStore,
{
  let (_, text) = stored_text(store.as_ref(), &document_id).await?;
  Ok(Json(text))
}

/// `GET /annotated_article_text/:document_id`
///
/// The article's full text with every renderable evidence mention's spans
/// stacked into nested `<span>` tags.
pub async fn annotated<S>(
  State(store): State<Arc<S>>,
  Path(document_id): Path<String>,
) -> Result<Json<String>, ApiError>
where
  S: GraphStore,
{
  let (name, text) = stored_text(store.as_ref(), &document_id).await?;
  let mentions = store
    .mention_spans(&name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(annotate_document(&text, &mentions)))
}
