//! The `GraphStore` trait and the read-side summary types.
//!
//! The trait is implemented by storage backends (e.g. `regnet-store-sqlite`).
//! Higher layers (`regnet-api`, `regnet-ingest`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    Article, Evidence, Interaction, Journal, NewArticle, NewDescription,
    NewEvidence, NewInteraction, NewJournal, NewParticipant, NewSignificance,
    Participant, ParticipantDescription, ParticipantKey, Significance,
  },
  span::MentionSpans,
};

// ─── Summary types ────────────────────────────────────────────────────────────

/// One interaction as reported by the query surface, with its participants
/// rendered as `kb_name:kb_id` keys and the supporting evidence counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSummary {
  pub id:             i64,
  pub controller:     String,
  pub controlled:     String,
  pub polarity:       bool,
  pub directed:       bool,
  pub evidence_count: i64,
}

/// One evidence row as reported by the query surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceSummary {
  pub id:     i64,
  pub text:   String,
  pub markup: String,
}

/// Which side of a directed interaction the queried participant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
  /// Queried participant controls the neighbor.
  Out,
  /// Queried participant is controlled by the neighbor.
  In,
  /// The interaction is undirected.
  None,
}

/// One deduplicated `(neighbor, polarity, direction)` triple. The same
/// neighbor may appear more than once with a different polarity or direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighborSummary {
  pub kb_name:   String,
  pub kb_id:     String,
  pub polarity:  bool,
  pub direction: Direction,
}

/// Row count per entity kind. Logged after an import run and asserted on by
/// the idempotence tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
  pub participants:  u64,
  pub descriptions:  u64,
  pub interactions:  u64,
  pub journals:      u64,
  pub articles:      u64,
  pub significances: u64,
  pub evidences:     u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a regnet graph store backend.
///
/// The `resolve_*` family are idempotent upserts: look up the full
/// natural-key tuple, return the existing row if found, insert and return a
/// fresh row otherwise. Implementations must serialise each lookup-or-insert
/// against concurrent callers — a duplicate-row race here silently corrupts
/// the at-most-one-row-per-identity invariant, and an entity created for one
/// mention must be visible to the lookup for the next.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GraphStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Resolve-or-create ─────────────────────────────────────────────────

  fn resolve_participant(
    &self,
    input: NewParticipant,
  ) -> impl Future<Output = Result<Participant, Self::Error>> + Send + '_;

  fn resolve_description(
    &self,
    input: NewDescription,
  ) -> impl Future<Output = Result<ParticipantDescription, Self::Error>> + Send + '_;

  fn resolve_interaction(
    &self,
    input: NewInteraction,
  ) -> impl Future<Output = Result<Interaction, Self::Error>> + Send + '_;

  fn resolve_journal(
    &self,
    input: NewJournal,
  ) -> impl Future<Output = Result<Journal, Self::Error>> + Send + '_;

  fn resolve_article(
    &self,
    input: NewArticle,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  fn resolve_significance(
    &self,
    input: NewSignificance,
  ) -> impl Future<Output = Result<Significance, Self::Error>> + Send + '_;

  fn resolve_evidence(
    &self,
    input: NewEvidence,
  ) -> impl Future<Output = Result<Evidence, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Union of interactions where the participant is controller or
  /// controlled, each with its evidence count. Interactions with no evidence
  /// are not reported.
  fn interactions_for_participant<'a>(
    &'a self,
    key: &'a ParticipantKey,
  ) -> impl Future<Output = Result<Vec<InteractionSummary>, Self::Error>> + Send + 'a;

  /// Interactions with at least one evidence row in the named article.
  fn interactions_in_article<'a>(
    &'a self,
    article_name: &'a str,
  ) -> impl Future<Output = Result<Vec<InteractionSummary>, Self::Error>> + Send + 'a;

  fn evidence_for_interaction(
    &self,
    interaction_id: i64,
  ) -> impl Future<Output = Result<Vec<EvidenceSummary>, Self::Error>> + Send + '_;

  /// Combined evidence of every interaction between the ordered pair.
  fn evidence_for_pair<'a>(
    &'a self,
    controller: &'a ParticipantKey,
    controlled: &'a ParticipantKey,
  ) -> impl Future<Output = Result<Vec<EvidenceSummary>, Self::Error>> + Send + 'a;

  /// As [`GraphStore::evidence_for_pair`], restricted to interactions
  /// matching the given polarity and directedness.
  fn evidence_for_pair_filtered<'a>(
    &'a self,
    controller: &'a ParticipantKey,
    controlled: &'a ParticipantKey,
    polarity: bool,
    directed: bool,
  ) -> impl Future<Output = Result<Vec<EvidenceSummary>, Self::Error>> + Send + 'a;

  /// Deduplicated neighbor triples. Unknown participants yield an empty
  /// vector, not an error.
  fn neighbors<'a>(
    &'a self,
    key: &'a ParticipantKey,
  ) -> impl Future<Output = Result<Vec<NeighborSummary>, Self::Error>> + Send + 'a;

  /// Full text of the article with the given canonical name. `None` means
  /// no article carries the name; a known article with no stored text reads
  /// as an empty string.
  fn article_text<'a>(
    &'a self,
    article_name: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Role spans of every renderable evidence row in the named article,
  /// joined with the owning interaction's polarity.
  fn mention_spans<'a>(
    &'a self,
    article_name: &'a str,
  ) -> impl Future<Output = Result<Vec<MentionSpans>, Self::Error>> + Send + 'a;

  fn stats(
    &self,
  ) -> impl Future<Output = Result<GraphStats, Self::Error>> + Send + '_;
}
