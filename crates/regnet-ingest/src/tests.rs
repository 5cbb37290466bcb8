use std::fs;

use serde_json::json;

use regnet_core::store::{GraphStats, GraphStore};
use regnet_store_sqlite::SqliteStore;

use crate::{
  DocumentFile, ImportReport, Importer, MetadataMap, document_key,
  load_metadata,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn metadata_value() -> serde_json::Value {
  json!({
    "8910733": {
      "journal": {
        "journal_id":    "Cell Reports",
        "impact_factor": 9.995,
        "issn":          "2211-1247"
      },
      "article": { "doi": "10.1016/j.celrep.2022.110499" }
    }
  })
}

fn metadata() -> MetadataMap {
  serde_json::from_value(metadata_value()).unwrap()
}

fn mention() -> serde_json::Value {
  json!({
    "controller_id":      ["uniprot", "P54829"],
    "controlled_id":      ["pfam", "PF02985"],
    "controller":         "PTPN5",
    "controlled":         "HEAT",
    "polarity":           true,
    "label":              "Positive_regulation",
    "sentence_tokens":    ["A", "binds", "B", "."],
    "event_indices":      [0, 3],
    "controller_indices": [0, 1],
    "controlled_indices": [2, 3],
    "trigger_indices":    [1, 2]
  })
}

fn document(mentions: Vec<serde_json::Value>) -> DocumentFile {
  serde_json::from_value(json!({
    "text":     "A binds B. More prose follows.",
    "mentions": mentions,
  }))
  .unwrap()
}

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.unwrap()
}

async fn run_import(store: &SqliteStore, doc: &DocumentFile) -> ImportReport {
  // A fresh importer per run, so idempotence is the store's doing and not
  // the in-memory caches'.
  let mut importer = Importer::new(store, metadata());
  let mut report = ImportReport::default();
  importer
    .import_document("8910733", doc, &mut report)
    .await
    .unwrap();
  report
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn document_key_strips_prefix_and_extensions() {
  assert_eq!(document_key("PMC8910733.uaz.json"), "8910733");
  assert_eq!(document_key("pmc8910733.json"), "8910733");
  assert_eq!(document_key("8910733.json"), "8910733");
}

#[tokio::test]
async fn full_document_ingest_populates_the_graph() {
  let store = store().await;
  let doc = document(vec![mention()]);
  let report = run_import(&store, &doc).await;

  assert_eq!(report.documents_imported, 1);
  assert_eq!(report.mentions_imported, 1);
  assert_eq!(report.mentions_skipped, 0);

  let stats = store.stats().await.unwrap();
  assert_eq!(stats, GraphStats {
    participants:  2,
    descriptions:  2,
    interactions:  1,
    journals:      1,
    articles:      1,
    significances: 1,
    evidences:     1,
  });

  // Wrapped documents carry the article's full text into the store.
  assert_eq!(
    store.article_text("PMC8910733").await.unwrap().as_deref(),
    Some("A binds B. More prose follows.")
  );

  let interactions =
    store.interactions_in_article("PMC8910733").await.unwrap();
  assert_eq!(interactions.len(), 1);
  assert_eq!(interactions[0].controller, "uniprot:P54829");
  assert_eq!(interactions[0].controlled, "pfam:PF02985");
  // "Positive_regulation" derives a directed interaction.
  assert!(interactions[0].directed);

  let evidences = store
    .evidence_for_interaction(interactions[0].id)
    .await
    .unwrap();
  assert_eq!(evidences.len(), 1);
  assert_eq!(evidences[0].text, "A binds B.");
  assert_eq!(
    evidences[0].markup,
    "<span class=\"event Positive_regulation\">\
     <span class=\"controller\">A</span>\
     <span class=\"trigger\">binds</span>\
     <span class=\"controlled\">B</span>\
     </span>."
  );
}

#[tokio::test]
async fn reingesting_the_same_document_adds_no_rows() {
  let store = store().await;
  let doc = document(vec![mention(), mention()]);

  run_import(&store, &doc).await;
  let first = store.stats().await.unwrap();
  run_import(&store, &doc).await;
  let second = store.stats().await.unwrap();

  assert_eq!(first, second);
  assert_eq!(first.evidences, 1);
}

#[tokio::test]
async fn malformed_mention_skips_only_itself() {
  let store = store().await;
  let doc = document(vec![json!({ "not": "a mention" }), mention()]);
  let report = run_import(&store, &doc).await;

  assert_eq!(report.mentions_skipped, 1);
  assert_eq!(report.mentions_imported, 1);
  assert_eq!(report.documents_imported, 1);
  assert_eq!(store.stats().await.unwrap().evidences, 1);
}

#[tokio::test]
async fn document_of_only_malformed_mentions_creates_nothing() {
  let store = store().await;
  let doc = document(vec![json!({ "not": "a mention" })]);
  let report = run_import(&store, &doc).await;

  assert_eq!(report.documents_imported, 0);
  assert_eq!(report.documents_skipped, 1);
  assert_eq!(store.stats().await.unwrap(), GraphStats::default());
}

#[tokio::test]
async fn empty_document_is_skipped() {
  let store = store().await;
  let doc: DocumentFile = serde_json::from_value(json!([])).unwrap();
  let report = run_import(&store, &doc).await;

  assert_eq!(report.documents_skipped, 1);
  assert_eq!(store.stats().await.unwrap(), GraphStats::default());
}

#[tokio::test]
async fn document_missing_from_metadata_is_skipped() {
  let store = store().await;
  let doc = document(vec![mention()]);

  let mut importer = Importer::new(&store, MetadataMap::new());
  let mut report = ImportReport::default();
  importer
    .import_document("8910733", &doc, &mut report)
    .await
    .unwrap();

  assert_eq!(report.documents_skipped, 1);
  assert_eq!(report.mentions_imported, 0);
  assert_eq!(store.stats().await.unwrap(), GraphStats::default());
}

#[tokio::test]
async fn unreadable_file_in_a_batch_skips_only_that_document() {
  let store = store().await;
  let dir = tempfile::tempdir().unwrap();

  let mentions_dir = dir.path().join("mentions");
  fs::create_dir(&mentions_dir).unwrap();
  fs::write(
    mentions_dir.join("PMC8910733.uaz.json"),
    json!({ "text": "A binds B.", "mentions": [mention()] }).to_string(),
  )
  .unwrap();
  fs::write(mentions_dir.join("README.txt"), "not a mention file").unwrap();

  let sidecar = dir.path().join("articles_metadata.json");
  fs::write(&sidecar, metadata_value().to_string()).unwrap();
  let metadata = load_metadata(&sidecar).unwrap();

  let mut importer = Importer::new(&store, metadata);
  let report = importer.import_dir(&mentions_dir).await.unwrap();

  assert_eq!(report.documents_imported, 1);
  assert_eq!(report.documents_skipped, 1);
  assert_eq!(report.mentions_imported, 1);
  assert_eq!(report.mentions_skipped, 0);
  assert_eq!(store.stats().await.unwrap().evidences, 1);
}

#[tokio::test]
async fn char_spans_flow_through_to_mention_spans() {
  let store = store().await;
  let mut with_spans = mention();
  with_spans["sentence_char_span"] = json!([0, 10]);
  with_spans["event_char_span"] = json!([0, 9]);
  with_spans["trigger_char_span"] = json!([2, 7]);
  with_spans["controller_char_span"] = json!([0, 1]);
  with_spans["controlled_char_span"] = json!([8, 9]);

  run_import(&store, &document(vec![with_spans])).await;

  let mentions = store.mention_spans("PMC8910733").await.unwrap();
  assert_eq!(mentions.len(), 1);
  assert_eq!(mentions[0].event.start, 0);
  assert_eq!(mentions[0].event.end, 9);
  assert!(mentions[0].polarity);
}
