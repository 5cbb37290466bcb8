//! Batch importer: extractor mention files + article metadata → graph rows.
//!
//! One directory of per-document JSON mention files and one metadata file go
//! in; deduplicated participants, interactions, articles and evidence come
//! out through any [`regnet_core::store::GraphStore`]. Documents are imported
//! one at a time, mentions one at a time — resolution order is part of the
//! contract, since each resolve may create the row the next one links to.
//!
//! Failure handling is two-tier: anything scoped to a single record or
//! document (malformed JSON, missing metadata) is logged and skipped, while
//! store errors abort the run.

mod models;
mod pipeline;

pub mod error;

pub use error::{Error, Result};
pub use models::{
  ArticleIdentifiers, ArticleMetadata, DocumentFile, JournalMetadata,
  MentionRecord, MetadataMap,
};
pub use pipeline::{ImportReport, Importer, document_key, load_metadata};

#[cfg(test)]
mod tests;
