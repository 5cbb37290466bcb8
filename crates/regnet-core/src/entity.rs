//! Graph entities — the persisted rows of the interaction graph.
//!
//! All ids are opaque surrogate integers assigned by the store on first
//! creation. Rows are append-only: created lazily during ingestion, never
//! updated, never deleted. Re-resolving an identical natural key must always
//! return the row created the first time (idempotent upsert), which is the
//! central correctness property of the whole ingestion pipeline.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, span::CharSpans};

// ─── Participant ─────────────────────────────────────────────────────────────

/// A reference into an external biological knowledge base, e.g.
/// `uniprot:P54829`. Unique per `(kb_name, kb_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
  pub id:      i64,
  pub kb_name: String,
  pub kb_id:   String,
}

/// The natural key of a [`Participant`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantKey {
  pub kb_name: String,
  pub kb_id:   String,
}

impl ParticipantKey {
  pub fn new(kb_name: impl Into<String>, kb_id: impl Into<String>) -> Self {
    Self {
      kb_name: kb_name.into(),
      kb_id:   kb_id.into(),
    }
  }

  /// Parse a `kb_name:kb_id` string, splitting on the first `:` so knowledge
  /// base ids may themselves contain colons.
  pub fn parse(s: &str) -> Result<Self> {
    let trimmed = s.trim();
    match trimmed.split_once(':') {
      Some((kb_name, kb_id)) if !kb_name.is_empty() => {
        Ok(Self::new(kb_name, kb_id))
      }
      _ => Err(Error::InvalidParticipantKey(s.to_string())),
    }
  }
}

impl std::fmt::Display for ParticipantKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.kb_name, self.kb_id)
  }
}

/// Input to `resolve_participant`.
#[derive(Debug, Clone)]
pub struct NewParticipant {
  pub kb_name: String,
  pub kb_id:   String,
}

// ─── ParticipantDescription ──────────────────────────────────────────────────

/// A free-text surface form under which a participant was mentioned.
/// A participant accumulates many descriptions; unique per
/// `(description, participant_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDescription {
  pub id:             i64,
  pub description:    String,
  pub participant_id: i64,
}

/// Input to `resolve_description`.
#[derive(Debug, Clone)]
pub struct NewDescription {
  pub description:    String,
  pub participant_id: i64,
}

// ─── Interaction ─────────────────────────────────────────────────────────────

/// A relation between two participants. `controller` and `controlled` are
/// both foreign keys into participants — two independent role-tagged fields,
/// no polymorphism. Unique per full tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
  pub id:         i64,
  pub controller: i64,
  pub controlled: i64,
  pub polarity:   bool,
  pub directed:   bool,
}

/// Input to `resolve_interaction`.
#[derive(Debug, Clone)]
pub struct NewInteraction {
  pub controller: i64,
  pub controlled: i64,
  pub polarity:   bool,
  pub directed:   bool,
}

/// Whether an extraction label denotes a directed regulation.
///
/// True when the last `_`-separated segment of the label is `regulation`:
/// `"Positive_regulation"` → true, `"Binding"` → false.
pub fn directed_from_label(label: &str) -> bool {
  label.rsplit('_').next() == Some("regulation")
}

// ─── Journal ─────────────────────────────────────────────────────────────────

/// Unique per full tuple. Impact-factor equality is bit-exact against the
/// stored float — no fuzzy matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
  pub id:            i64,
  pub name:          Option<String>,
  pub impact_factor: Option<f64>,
  pub issn:          Option<String>,
}

/// Input to `resolve_journal`.
#[derive(Debug, Clone)]
pub struct NewJournal {
  pub name:          Option<String>,
  pub impact_factor: Option<f64>,
  pub issn:          Option<String>,
}

// ─── Article ─────────────────────────────────────────────────────────────────

/// One source document. `name` is the canonical document id (`PMC########`).
/// Unique per full tuple, including the full text — revisions of the same
/// document are distinct rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
  pub id:           i64,
  pub doi:          Option<String>,
  pub url:          Option<String>,
  pub name:         String,
  pub publish_date: Option<String>,
  pub text:         Option<String>,
  pub journal_id:   i64,
}

/// Input to `resolve_article`.
#[derive(Debug, Clone)]
pub struct NewArticle {
  pub doi:          Option<String>,
  pub url:          Option<String>,
  pub name:         String,
  pub publish_date: Option<String>,
  pub text:         Option<String>,
  pub journal_id:   i64,
}

/// Normalise a user-supplied document id to canonical article-name form:
/// upper-cased, `PMC`-prefixed when the prefix is absent.
pub fn normalize_document_id(id: &str) -> String {
  let upper = id.trim().to_uppercase();
  if upper.starts_with("PMC") {
    upper
  } else {
    format!("PMC{upper}")
  }
}

// ─── Significance ────────────────────────────────────────────────────────────

/// Statistical annotation placeholder; one sentinel row per article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Significance {
  pub id:              i64,
  pub kind:            Option<String>,
  pub value:           Option<f64>,
  pub secondary_value: Option<f64>,
  pub article_id:      i64,
}

/// Input to `resolve_significance`.
#[derive(Debug, Clone)]
pub struct NewSignificance {
  pub kind:            Option<String>,
  pub value:           Option<f64>,
  pub secondary_value: Option<f64>,
  pub article_id:      i64,
}

impl NewSignificance {
  /// The sentinel null-equivalent row created for every article.
  pub fn sentinel(article_id: i64) -> Self {
    Self {
      kind: Some("None".to_string()),
      value: Some(0.0),
      secondary_value: Some(0.0),
      article_id,
    }
  }
}

// ─── Evidence ────────────────────────────────────────────────────────────────

/// One sentence-level mention supporting an interaction within an article.
/// Owned by exactly one article and one interaction. The dedup identity is
/// `(text, markup, article_id, interaction_id)`; the char spans ride along on
/// first insert and are NULL when the source provides none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
  pub id:             i64,
  pub text:           String,
  pub markup:         String,
  pub spans:          CharSpans,
  pub article_id:     i64,
  pub interaction_id: i64,
}

/// Input to `resolve_evidence`.
#[derive(Debug, Clone)]
pub struct NewEvidence {
  pub text:           String,
  pub markup:         String,
  pub spans:          CharSpans,
  pub article_id:     i64,
  pub interaction_id: i64,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn participant_key_splits_on_first_colon() {
    let key = ParticipantKey::parse("uniprot:P54829").unwrap();
    assert_eq!(key.kb_name, "uniprot");
    assert_eq!(key.kb_id, "P54829");

    let key = ParticipantKey::parse("go:GO:0006915").unwrap();
    assert_eq!(key.kb_name, "go");
    assert_eq!(key.kb_id, "GO:0006915");
  }

  #[test]
  fn participant_key_without_colon_is_invalid() {
    assert!(matches!(
      ParticipantKey::parse("uniprot"),
      Err(Error::InvalidParticipantKey(_))
    ));
    assert!(matches!(
      ParticipantKey::parse(":P54829"),
      Err(Error::InvalidParticipantKey(_))
    ));
  }

  #[test]
  fn directedness_derivation() {
    assert!(directed_from_label("Positive_regulation"));
    assert!(directed_from_label("Negative_regulation"));
    assert!(directed_from_label("regulation"));
    assert!(!directed_from_label("Binding"));
    assert!(!directed_from_label("Phosphorylation"));
    assert!(!directed_from_label("regulation_of"));
  }

  #[test]
  fn document_id_normalisation() {
    assert_eq!(normalize_document_id("8910733"), "PMC8910733");
    assert_eq!(normalize_document_id("pmc8910733"), "PMC8910733");
    assert_eq!(normalize_document_id("PMC8910733"), "PMC8910733");
    assert_eq!(normalize_document_id(" 42 "), "PMC42");
  }
}
