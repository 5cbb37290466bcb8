use std::sync::Arc;

use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use regnet_api::api_router;
use regnet_core::{
  entity::{
    NewArticle, NewEvidence, NewInteraction, NewJournal, NewParticipant,
  },
  span::{CharSpans, Span},
  store::GraphStore,
};
use regnet_store_sqlite::SqliteStore;

// ─── Fixture ─────────────────────────────────────────────────────────────────

struct Seed {
  app:            Router,
  interaction_id: i64,
}

/// One article ("A binds B.") with one directed positive interaction between
/// uniprot:P54829 and pfam:PF02985, supported by one evidence row whose char
/// spans cover the whole sentence.
async fn seed() -> Seed {
  let store = SqliteStore::open_in_memory().await.unwrap();

  let controller = store
    .resolve_participant(NewParticipant {
      kb_name: "uniprot".into(),
      kb_id:   "P54829".into(),
    })
    .await
    .unwrap();
  let controlled = store
    .resolve_participant(NewParticipant {
      kb_name: "pfam".into(),
      kb_id:   "PF02985".into(),
    })
    .await
    .unwrap();
  let interaction = store
    .resolve_interaction(NewInteraction {
      controller: controller.id,
      controlled: controlled.id,
      polarity:   true,
      directed:   true,
    })
    .await
    .unwrap();
  let journal = store
    .resolve_journal(NewJournal {
      name:          Some("Cell Reports".into()),
      impact_factor: None,
      issn:          None,
    })
    .await
    .unwrap();
  let article = store
    .resolve_article(NewArticle {
      doi:          None,
      url:          None,
      name:         "PMC8910733".into(),
      publish_date: None,
      text:         Some("A binds B.".into()),
      journal_id:   journal.id,
    })
    .await
    .unwrap();
  store
    .resolve_evidence(NewEvidence {
      text:           "A binds B.".into(),
      markup:         "<span class=\"controller\">A</span> binds B.".into(),
      spans:          CharSpans {
        sentence:   Some(Span::new(0, 10)),
        event:      Some(Span::new(0, 9)),
        trigger:    Some(Span::new(2, 7)),
        controller: Some(Span::new(0, 1)),
        controlled: Some(Span::new(8, 9)),
      },
      article_id:     article.id,
      interaction_id: interaction.id,
    })
    .await
    .unwrap();

  Seed {
    app:            api_router(Arc::new(store)),
    interaction_id: interaction.id,
  }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
  let response = app
    .clone()
    .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
    .await
    .unwrap();
  let status = response.status();
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

// ─── Interactions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn interactions_for_participant_happy_path() {
  let seed = seed().await;
  let (status, body) = get(&seed.app, "/interactions/uniprot:P54829").await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([{
      "id":             seed.interaction_id,
      "controller":     "uniprot:P54829",
      "controlled":     "pfam:PF02985",
      "polarity":       true,
      "directed":       true,
      "evidence_count": 1
    }])
  );
}

#[tokio::test]
async fn unknown_participant_returns_empty_list() {
  let seed = seed().await;
  let (status, body) = get(&seed.app, "/interactions/uniprot:NOPE").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

#[tokio::test]
async fn malformed_participant_key_is_a_bad_request() {
  let seed = seed().await;
  let (status, body) = get(&seed.app, "/interactions/uniprot").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "invalid participant key: \"uniprot\"" }));

  let (status, _) = get(&seed.app, "/neighbors/uniprot").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = get(&seed.app, "/evidences/uniprot/pfam:PF02985").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn interactions_in_article_normalises_the_document_id() {
  let seed = seed().await;
  let (status, body) =
    get(&seed.app, "/interactions-in-article/8910733").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["id"], json!(seed.interaction_id));
}

// ─── Evidence ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn evidence_by_interaction_id() {
  let seed = seed().await;
  let uri = format!("/evidences/{}", seed.interaction_id);
  let (status, body) = get(&seed.app, &uri).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["text"], json!("A binds B."));
}

#[tokio::test]
async fn evidence_by_pair_and_filters() {
  let seed = seed().await;

  let (status, body) =
    get(&seed.app, "/evidences/uniprot:P54829/pfam:PF02985").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);

  // Matching filters keep the row; a non-matching polarity drops it.
  let (_, body) =
    get(&seed.app, "/evidences/uniprot:P54829/pfam:PF02985/true/true").await;
  assert_eq!(body.as_array().unwrap().len(), 1);
  let (status, body) =
    get(&seed.app, "/evidences/uniprot:P54829/pfam:PF02985/false/true").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));

  // Reversed pair: no interaction in that direction.
  let (_, body) =
    get(&seed.app, "/evidences/pfam:PF02985/uniprot:P54829").await;
  assert_eq!(body, json!([]));
}

// ─── Neighbors ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn neighbors_carry_polarity_and_direction() {
  let seed = seed().await;

  let (status, body) = get(&seed.app, "/neighbors/uniprot:P54829").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!([{
      "kb_name":   "pfam",
      "kb_id":     "PF02985",
      "polarity":  true,
      "direction": "Out"
    }])
  );

  let (_, body) = get(&seed.app, "/neighbors/pfam:PF02985").await;
  assert_eq!(body[0]["direction"], json!("In"));
}

// ─── Articles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn article_text_lookup_and_not_found() {
  let seed = seed().await;

  // Bare and lower-case ids normalise to the stored PMC name.
  let (status, body) = get(&seed.app, "/article_text/8910733").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!("A binds B."));

  let (status, body) = get(&seed.app, "/article_text/pmc8910733").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!("A binds B."));

  let (status, body) = get(&seed.app, "/article_text/999").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body, json!({ "error": "no article named PMC999" }));
}

#[tokio::test]
async fn annotated_article_text_stacks_mention_spans() {
  let seed = seed().await;

  let (status, body) =
    get(&seed.app, "/annotated_article_text/PMC8910733").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!(
      "<span class=\"event selected_evidence\">\
       <span class=\"argument\">A</span> \
       <span class=\"argument trigger\">binds</span> \
       <span class=\"argument\">B</span>\
       </span>."
    )
  );

  let (status, _) = get(&seed.app, "/annotated_article_text/PMC999").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
