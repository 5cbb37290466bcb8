//! Error types for `regnet-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A participant key string did not contain a `kb_name:kb_id` separator.
  #[error("invalid participant key: {0:?}")]
  InvalidParticipantKey(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
