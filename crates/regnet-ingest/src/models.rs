//! Input file models — the extractor's mention JSON and the article metadata
//! sidecar.

use std::collections::HashMap;

use serde::Deserialize;

use regnet_core::span::{CharSpans, Span};

// ─── Document files ──────────────────────────────────────────────────────────

/// One per-document mention file. Two layouts exist in the wild: a newer
/// object carrying the article's full text alongside its mentions, and the
/// older bare array of mentions.
///
/// Mentions stay raw [`serde_json::Value`]s here and are decoded per record,
/// so one malformed record skips only itself instead of the whole file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DocumentFile {
  Wrapped {
    text:     Option<String>,
    mentions: Vec<serde_json::Value>,
  },
  Flat(Vec<serde_json::Value>),
}

impl DocumentFile {
  pub fn text(&self) -> Option<&str> {
    match self {
      Self::Wrapped { text, .. } => text.as_deref(),
      Self::Flat(_) => None,
    }
  }

  pub fn mentions(&self) -> &[serde_json::Value] {
    match self {
      Self::Wrapped { mentions, .. } => mentions,
      Self::Flat(mentions) => mentions,
    }
  }
}

/// One extracted interaction mention. Knowledge-base ids arrive as
/// `[kb_name, kb_id]` pairs; all `*_indices` are token-index `[start, end)`
/// pairs over `sentence_tokens`; the optional `*_char_span` pairs are
/// character offsets into the article's full text.
#[derive(Debug, Clone, Deserialize)]
pub struct MentionRecord {
  pub controller_id:      (String, String),
  pub controlled_id:      (String, String),
  /// Surface form of the controller in this sentence.
  pub controller:         String,
  /// Surface form of the controlled participant in this sentence.
  pub controlled:         String,
  pub polarity:           bool,
  pub label:              String,
  pub sentence_tokens:    Vec<String>,
  pub event_indices:      (usize, usize),
  pub controller_indices: (usize, usize),
  pub controlled_indices: (usize, usize),
  pub trigger_indices:    (usize, usize),
  #[serde(default)]
  pub sentence_char_span:   Option<(usize, usize)>,
  #[serde(default)]
  pub event_char_span:      Option<(usize, usize)>,
  #[serde(default)]
  pub trigger_char_span:    Option<(usize, usize)>,
  #[serde(default)]
  pub controller_char_span: Option<(usize, usize)>,
  #[serde(default)]
  pub controlled_char_span: Option<(usize, usize)>,
}

impl MentionRecord {
  /// The record's character spans as stored on its evidence row.
  pub fn char_spans(&self) -> CharSpans {
    CharSpans {
      sentence:   self.sentence_char_span.map(Span::from),
      event:      self.event_char_span.map(Span::from),
      trigger:    self.trigger_char_span.map(Span::from),
      controller: self.controller_char_span.map(Span::from),
      controlled: self.controlled_char_span.map(Span::from),
    }
  }
}

// ─── Metadata file ───────────────────────────────────────────────────────────

/// The metadata sidecar: bare document id (no `PMC` prefix) → per-article
/// journal and identifier fields.
pub type MetadataMap = HashMap<String, ArticleMetadata>;

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleMetadata {
  pub journal: JournalMetadata,
  pub article: ArticleIdentifiers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JournalMetadata {
  /// The journal's name; `journal_id` is the source's field name for it.
  #[serde(default)]
  pub journal_id:    Option<String>,
  #[serde(default)]
  pub impact_factor: Option<f64>,
  #[serde(default)]
  pub issn:          Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleIdentifiers {
  #[serde(default)]
  pub doi: Option<String>,
}
