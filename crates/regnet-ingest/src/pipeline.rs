//! The import pipeline — drives mention files through a [`GraphStore`].

use std::{collections::HashMap, fs, path::Path};

use serde::Serialize;
use tracing::{info, warn};

use regnet_core::{
  entity::{
    NewArticle, NewDescription, NewEvidence, NewInteraction, NewJournal,
    NewParticipant, NewSignificance, directed_from_label,
    normalize_document_id,
  },
  store::GraphStore,
};
use regnet_markup::{detokenize, render_sentence};

use crate::{
  Error, Result,
  models::{ArticleMetadata, DocumentFile, MentionRecord, MetadataMap},
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Bare document id from a mention file's name: the stem up to the first
/// `.`, with any leading `PMC` stripped. `PMC8910733.uaz.json` → `8910733`.
pub fn document_key(file_name: &str) -> String {
  let stem = file_name.split('.').next().unwrap_or("").trim();
  let bare = stem
    .strip_prefix("PMC")
    .or_else(|| stem.strip_prefix("pmc"))
    .unwrap_or(stem);
  bare.to_owned()
}

/// Read and parse the article metadata sidecar file.
pub fn load_metadata(path: &Path) -> Result<MetadataMap> {
  let raw = fs::read_to_string(path)?;
  Ok(serde_json::from_str(&raw)?)
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
  pub documents_imported: usize,
  pub documents_skipped:  usize,
  pub mentions_imported:  usize,
  pub mentions_skipped:   usize,
}

// ─── Importer ────────────────────────────────────────────────────────────────

/// Imports mention documents into a graph store, one mention at a time.
///
/// The importer memoises natural key → id for everything it has already
/// resolved this run (participants, descriptions and interactions batch-wide;
/// the journal/article/significance rows once per document). A cache miss
/// falls through to the store's own resolve-or-create, so re-running an
/// import over data the store has already seen creates no new rows.
pub struct Importer<'a, S> {
  store:        &'a S,
  metadata:     MetadataMap,
  participants: HashMap<(String, String), i64>,
  descriptions: HashMap<(i64, String), i64>,
  interactions: HashMap<(i64, i64, bool, bool), i64>,
}

impl<'a, S: GraphStore> Importer<'a, S> {
  pub fn new(store: &'a S, metadata: MetadataMap) -> Self {
    Self {
      store,
      metadata,
      participants: HashMap::new(),
      descriptions: HashMap::new(),
      interactions: HashMap::new(),
    }
  }

  /// Import every mention file in `dir`. Files are processed in name order;
  /// unreadable or non-JSON files are logged and skipped.
  pub async fn import_dir(&mut self, dir: &Path) -> Result<ImportReport> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
      .collect::<std::io::Result<Vec<_>>>()?
      .into_iter()
      .map(|entry| entry.path())
      .filter(|path| path.is_file())
      .collect();
    paths.sort();

    let mut report = ImportReport::default();
    for path in paths {
      let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        continue;
      };
      let doc: DocumentFile = match fs::read_to_string(&path)
        .map_err(Error::from)
        .and_then(|raw| Ok(serde_json::from_str(&raw)?))
      {
        Ok(doc) => doc,
        Err(err) => {
          warn!(file_name, %err, "skipping unreadable mention file");
          report.documents_skipped += 1;
          continue;
        }
      };
      let key = document_key(file_name);
      self.import_document(&key, &doc, &mut report).await?;
    }

    info!(
      documents_imported = report.documents_imported,
      documents_skipped = report.documents_skipped,
      mentions_imported = report.mentions_imported,
      mentions_skipped = report.mentions_skipped,
      "import run finished"
    );
    Ok(report)
  }

  /// Import one document's mentions. A document with no decodable mentions,
  /// or absent from the metadata, is skipped without creating any rows.
  pub async fn import_document(
    &mut self,
    doc_key: &str,
    doc: &DocumentFile,
    report: &mut ImportReport,
  ) -> Result<()> {
    let mentions = doc.mentions();
    if mentions.is_empty() {
      report.documents_skipped += 1;
      return Ok(());
    }
    let Some(meta) = self.metadata.get(doc_key).cloned() else {
      warn!(doc_key, "document absent from metadata, skipping");
      report.documents_skipped += 1;
      return Ok(());
    };

    // Article rows are created lazily on the first decodable mention, so a
    // document of nothing but malformed records leaves the store untouched.
    let mut article_id: Option<i64> = None;
    let mut imported = 0usize;

    for value in mentions {
      let record: MentionRecord = match serde_json::from_value(value.clone()) {
        Ok(record) => record,
        Err(err) => {
          warn!(doc_key, %err, "skipping malformed mention record");
          report.mentions_skipped += 1;
          continue;
        }
      };

      self
        .import_mention(record, doc_key, &meta, doc.text(), &mut article_id)
        .await?;
      imported += 1;
    }

    report.mentions_imported += imported;
    if imported > 0 {
      report.documents_imported += 1;
    } else {
      report.documents_skipped += 1;
    }
    Ok(())
  }

  /// Resolve the per-document journal, article and sentinel significance
  /// rows; returns the article id.
  async fn article_rows(
    &mut self,
    doc_key: &str,
    meta: &ArticleMetadata,
    text: Option<&str>,
  ) -> Result<i64> {
    let journal = self
      .store
      .resolve_journal(NewJournal {
        name:          meta.journal.journal_id.clone(),
        impact_factor: meta.journal.impact_factor,
        issn:          meta.journal.issn.clone(),
      })
      .await
      .map_err(Error::store)?;

    let article = self
      .store
      .resolve_article(NewArticle {
        doi:          meta.article.doi.clone(),
        url:          Some(format!(
          "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC{doc_key}/"
        )),
        name:         normalize_document_id(doc_key),
        publish_date: None,
        text:         text.map(str::to_owned),
        journal_id:   journal.id,
      })
      .await
      .map_err(Error::store)?;

    self
      .store
      .resolve_significance(NewSignificance::sentinel(article.id))
      .await
      .map_err(Error::store)?;

    Ok(article.id)
  }

  /// Resolve one mention's rows in dependency order: participants and their
  /// descriptions, the interaction, the per-document article rows, then the
  /// evidence.
  async fn import_mention(
    &mut self,
    record: MentionRecord,
    doc_key: &str,
    meta: &ArticleMetadata,
    doc_text: Option<&str>,
    article_memo: &mut Option<i64>,
  ) -> Result<()> {
    let controller = self.participant(record.controller_id.clone()).await?;
    self.description(controller, record.controller.clone()).await?;
    let controlled = self.participant(record.controlled_id.clone()).await?;
    self.description(controlled, record.controlled.clone()).await?;

    let directed = directed_from_label(&record.label);
    let interaction_id = self
      .interaction(controller, controlled, record.polarity, directed)
      .await?;

    let article_id = match *article_memo {
      Some(id) => id,
      None => {
        let id = self.article_rows(doc_key, meta, doc_text).await?;
        *article_memo = Some(id);
        id
      }
    };

    let text = detokenize(&record.sentence_tokens);
    let markup = render_sentence(
      &record.sentence_tokens,
      &record.label,
      record.event_indices.into(),
      record.controller_indices.into(),
      record.controlled_indices.into(),
      record.trigger_indices.into(),
    );

    self
      .store
      .resolve_evidence(NewEvidence {
        text,
        markup,
        spans: record.char_spans(),
        article_id,
        interaction_id,
      })
      .await
      .map_err(Error::store)?;
    Ok(())
  }

  async fn participant(&mut self, key: (String, String)) -> Result<i64> {
    if let Some(&id) = self.participants.get(&key) {
      return Ok(id);
    }
    let row = self
      .store
      .resolve_participant(NewParticipant {
        kb_name: key.0.clone(),
        kb_id:   key.1.clone(),
      })
      .await
      .map_err(Error::store)?;
    self.participants.insert(key, row.id);
    Ok(row.id)
  }

  async fn description(
    &mut self,
    participant_id: i64,
    description: String,
  ) -> Result<()> {
    let key = (participant_id, description);
    if self.descriptions.contains_key(&key) {
      return Ok(());
    }
    let row = self
      .store
      .resolve_description(NewDescription {
        description: key.1.clone(),
        participant_id,
      })
      .await
      .map_err(Error::store)?;
    self.descriptions.insert(key, row.id);
    Ok(())
  }

  async fn interaction(
    &mut self,
    controller: i64,
    controlled: i64,
    polarity: bool,
    directed: bool,
  ) -> Result<i64> {
    let key = (controller, controlled, polarity, directed);
    if let Some(&id) = self.interactions.get(&key) {
      return Ok(id);
    }
    let row = self
      .store
      .resolve_interaction(NewInteraction {
        controller,
        controlled,
        polarity,
        directed,
      })
      .await
      .map_err(Error::store)?;
    self.interactions.insert(key, row.id);
    Ok(row.id)
  }
}
