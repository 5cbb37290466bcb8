//! [`SqliteStore`] — the SQLite implementation of [`GraphStore`].

use std::{collections::HashSet, path::Path};

use rusqlite::OptionalExtension as _;

use regnet_core::{
  entity::{
    Article, Evidence, Interaction, Journal, NewArticle, NewDescription,
    NewEvidence, NewInteraction, NewJournal, NewParticipant, NewSignificance,
    Participant, ParticipantDescription, ParticipantKey, Significance,
  },
  span::{CharSpans, MentionSpans, Span},
  store::{
    Direction, EvidenceSummary, GraphStats, GraphStore, InteractionSummary,
    NeighborSummary,
  },
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Span column helpers ──────────────────────────────────────────────────────

fn span_cols(span: Option<Span>) -> (Option<i64>, Option<i64>) {
  match span {
    Some(s) => (Some(s.start as i64), Some(s.end as i64)),
    None => (None, None),
  }
}

fn span_from_cols(start: Option<i64>, end: Option<i64>) -> Option<Span> {
  match (start, end) {
    (Some(s), Some(e)) => Some(Span::new(s as usize, e as usize)),
    _ => None,
  }
}

// ─── Row helpers ──────────────────────────────────────────────────────────────

/// Look up a participant's surrogate id by natural key.
fn participant_id(
  conn: &rusqlite::Connection,
  kb_name: &str,
  kb_id: &str,
) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      "SELECT id FROM participants WHERE kb_name = ?1 AND kb_id = ?2",
      rusqlite::params![kb_name, kb_id],
      |row| row.get(0),
    )
    .optional()
}

/// Run an interaction-summary query. Every caller selects the same six
/// columns in the same order: id, controller key, controlled key, polarity,
/// directed, evidence count.
fn interaction_summaries(
  conn: &rusqlite::Connection,
  sql: &str,
  params: &[&dyn rusqlite::ToSql],
) -> rusqlite::Result<Vec<InteractionSummary>> {
  let mut stmt = conn.prepare(sql)?;
  stmt
    .query_map(params, |row| {
      Ok(InteractionSummary {
        id:             row.get(0)?,
        controller:     row.get(1)?,
        controlled:     row.get(2)?,
        polarity:       row.get(3)?,
        directed:       row.get(4)?,
        evidence_count: row.get(5)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()
}

/// Run an evidence-summary query selecting id, text, markup.
fn evidence_summaries(
  conn: &rusqlite::Connection,
  sql: &str,
  params: &[&dyn rusqlite::ToSql],
) -> rusqlite::Result<Vec<EvidenceSummary>> {
  let mut stmt = conn.prepare(sql)?;
  stmt
    .query_map(params, |row| {
      Ok(EvidenceSummary {
        id:     row.get(0)?,
        text:   row.get(1)?,
        markup: row.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()
}

fn count_rows(conn: &rusqlite::Connection, table: &str) -> rusqlite::Result<u64> {
  conn
    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
      row.get::<_, i64>(0)
    })
    .map(|n| n as u64)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A regnet graph store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// `resolve_*` methods run their lookup and insert inside one closure on the
/// connection's worker thread, so concurrent resolves of the same natural key
/// cannot interleave and create duplicate rows.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── GraphStore impl ─────────────────────────────────────────────────────────

impl GraphStore for SqliteStore {
  type Error = Error;

  // ── Resolve-or-create ─────────────────────────────────────────────────────

  async fn resolve_participant(
    &self,
    input: NewParticipant,
  ) -> Result<Participant> {
    let row = self
      .conn
      .call(move |conn| {
        let existing = participant_id(conn, &input.kb_name, &input.kb_id)?;
        let id = match existing {
          Some(id) => id,
          None => {
            conn.execute(
              "INSERT INTO participants (kb_name, kb_id) VALUES (?1, ?2)",
              rusqlite::params![input.kb_name, input.kb_id],
            )?;
            conn.last_insert_rowid()
          }
        };
        Ok(Participant {
          id,
          kb_name: input.kb_name,
          kb_id: input.kb_id,
        })
      })
      .await?;
    Ok(row)
  }

  async fn resolve_description(
    &self,
    input: NewDescription,
  ) -> Result<ParticipantDescription> {
    let row = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM participant_descriptions
             WHERE description = ?1 AND participant_id = ?2",
            rusqlite::params![input.description, input.participant_id],
            |row| row.get(0),
          )
          .optional()?;
        let id = match existing {
          Some(id) => id,
          None => {
            conn.execute(
              "INSERT INTO participant_descriptions (description, participant_id)
               VALUES (?1, ?2)",
              rusqlite::params![input.description, input.participant_id],
            )?;
            conn.last_insert_rowid()
          }
        };
        Ok(ParticipantDescription {
          id,
          description: input.description,
          participant_id: input.participant_id,
        })
      })
      .await?;
    Ok(row)
  }

  async fn resolve_interaction(
    &self,
    input: NewInteraction,
  ) -> Result<Interaction> {
    let row = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM interactions
             WHERE controller = ?1 AND controlled = ?2
               AND polarity = ?3 AND directed = ?4",
            rusqlite::params![
              input.controller,
              input.controlled,
              input.polarity,
              input.directed,
            ],
            |row| row.get(0),
          )
          .optional()?;
        let id = match existing {
          Some(id) => id,
          None => {
            conn.execute(
              "INSERT INTO interactions (controller, controlled, polarity, directed)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![
                input.controller,
                input.controlled,
                input.polarity,
                input.directed,
              ],
            )?;
            conn.last_insert_rowid()
          }
        };
        Ok(Interaction {
          id,
          controller: input.controller,
          controlled: input.controlled,
          polarity: input.polarity,
          directed: input.directed,
        })
      })
      .await?;
    Ok(row)
  }

  async fn resolve_journal(&self, input: NewJournal) -> Result<Journal> {
    let row = self
      .conn
      .call(move |conn| {
        // `IS` instead of `=` so NULL columns participate in the natural key.
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM journals
             WHERE name IS ?1 AND impact_factor IS ?2 AND issn IS ?3",
            rusqlite::params![input.name, input.impact_factor, input.issn],
            |row| row.get(0),
          )
          .optional()?;
        let id = match existing {
          Some(id) => id,
          None => {
            conn.execute(
              "INSERT INTO journals (name, impact_factor, issn)
               VALUES (?1, ?2, ?3)",
              rusqlite::params![input.name, input.impact_factor, input.issn],
            )?;
            conn.last_insert_rowid()
          }
        };
        Ok(Journal {
          id,
          name: input.name,
          impact_factor: input.impact_factor,
          issn: input.issn,
        })
      })
      .await?;
    Ok(row)
  }

  async fn resolve_article(&self, input: NewArticle) -> Result<Article> {
    let row = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM articles
             WHERE doi IS ?1 AND url IS ?2 AND name = ?3
               AND publish_date IS ?4 AND text IS ?5 AND journal_id = ?6",
            rusqlite::params![
              input.doi,
              input.url,
              input.name,
              input.publish_date,
              input.text,
              input.journal_id,
            ],
            |row| row.get(0),
          )
          .optional()?;
        let id = match existing {
          Some(id) => id,
          None => {
            conn.execute(
              "INSERT INTO articles (doi, url, name, publish_date, text, journal_id)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![
                input.doi,
                input.url,
                input.name,
                input.publish_date,
                input.text,
                input.journal_id,
              ],
            )?;
            conn.last_insert_rowid()
          }
        };
        Ok(Article {
          id,
          doi: input.doi,
          url: input.url,
          name: input.name,
          publish_date: input.publish_date,
          text: input.text,
          journal_id: input.journal_id,
        })
      })
      .await?;
    Ok(row)
  }

  async fn resolve_significance(
    &self,
    input: NewSignificance,
  ) -> Result<Significance> {
    let row = self
      .conn
      .call(move |conn| {
        let existing: Option<i64> = conn
          .query_row(
            "SELECT id FROM significances
             WHERE type IS ?1 AND value IS ?2 AND secondary_value IS ?3
               AND article_id = ?4",
            rusqlite::params![
              input.kind,
              input.value,
              input.secondary_value,
              input.article_id,
            ],
            |row| row.get(0),
          )
          .optional()?;
        let id = match existing {
          Some(id) => id,
          None => {
            conn.execute(
              "INSERT INTO significances (type, value, secondary_value, article_id)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![
                input.kind,
                input.value,
                input.secondary_value,
                input.article_id,
              ],
            )?;
            conn.last_insert_rowid()
          }
        };
        Ok(Significance {
          id,
          kind: input.kind,
          value: input.value,
          secondary_value: input.secondary_value,
          article_id: input.article_id,
        })
      })
      .await?;
    Ok(row)
  }

  async fn resolve_evidence(&self, input: NewEvidence) -> Result<Evidence> {
    let row = self
      .conn
      .call(move |conn| {
        // Span columns are not part of the identity; an existing row keeps
        // the spans it was first inserted with.
        let existing: Option<(i64, CharSpans)> = conn
          .query_row(
            "SELECT id,
                    sentence_start, sentence_end,
                    event_start, event_end,
                    trigger_start, trigger_end,
                    controller_start, controller_end,
                    controlled_start, controlled_end
             FROM evidences
             WHERE text = ?1 AND markup = ?2
               AND article_id = ?3 AND interaction_id = ?4",
            rusqlite::params![
              input.text,
              input.markup,
              input.article_id,
              input.interaction_id,
            ],
            |row| {
              Ok((
                row.get(0)?,
                CharSpans {
                  sentence:   span_from_cols(row.get(1)?, row.get(2)?),
                  event:      span_from_cols(row.get(3)?, row.get(4)?),
                  trigger:    span_from_cols(row.get(5)?, row.get(6)?),
                  controller: span_from_cols(row.get(7)?, row.get(8)?),
                  controlled: span_from_cols(row.get(9)?, row.get(10)?),
                },
              ))
            },
          )
          .optional()?;

        let (id, spans) = match existing {
          Some(found) => found,
          None => {
            let (sentence_start, sentence_end) = span_cols(input.spans.sentence);
            let (event_start, event_end) = span_cols(input.spans.event);
            let (trigger_start, trigger_end) = span_cols(input.spans.trigger);
            let (controller_start, controller_end) =
              span_cols(input.spans.controller);
            let (controlled_start, controlled_end) =
              span_cols(input.spans.controlled);
            conn.execute(
              "INSERT INTO evidences (
                 text, markup,
                 sentence_start, sentence_end,
                 event_start, event_end,
                 trigger_start, trigger_end,
                 controller_start, controller_end,
                 controlled_start, controlled_end,
                 article_id, interaction_id
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
              rusqlite::params![
                input.text,
                input.markup,
                sentence_start,
                sentence_end,
                event_start,
                event_end,
                trigger_start,
                trigger_end,
                controller_start,
                controller_end,
                controlled_start,
                controlled_end,
                input.article_id,
                input.interaction_id,
              ],
            )?;
            (conn.last_insert_rowid(), input.spans)
          }
        };

        Ok(Evidence {
          id,
          text: input.text,
          markup: input.markup,
          spans,
          article_id: input.article_id,
          interaction_id: input.interaction_id,
        })
      })
      .await?;
    Ok(row)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn interactions_for_participant(
    &self,
    key: &ParticipantKey,
  ) -> Result<Vec<InteractionSummary>> {
    let kb_name = key.kb_name.clone();
    let kb_id = key.kb_id.clone();

    let rows = self
      .conn
      .call(move |conn| {
        let controller_side = interaction_summaries(
          conn,
          "SELECT i.id,
                  pc.kb_name || ':' || pc.kb_id,
                  pd.kb_name || ':' || pd.kb_id,
                  i.polarity, i.directed, COUNT(e.id)
           FROM interactions i
           JOIN participants pc ON pc.id = i.controller
           JOIN participants pd ON pd.id = i.controlled
           JOIN evidences e ON e.interaction_id = i.id
           WHERE pc.kb_name = ?1 AND pc.kb_id = ?2
           GROUP BY i.id
           ORDER BY i.id",
          &[&kb_name, &kb_id],
        )?;
        let controlled_side = interaction_summaries(
          conn,
          "SELECT i.id,
                  pc.kb_name || ':' || pc.kb_id,
                  pd.kb_name || ':' || pd.kb_id,
                  i.polarity, i.directed, COUNT(e.id)
           FROM interactions i
           JOIN participants pc ON pc.id = i.controller
           JOIN participants pd ON pd.id = i.controlled
           JOIN evidences e ON e.interaction_id = i.id
           WHERE pd.kb_name = ?1 AND pd.kb_id = ?2
           GROUP BY i.id
           ORDER BY i.id",
          &[&kb_name, &kb_id],
        )?;

        // Self-interactions match both queries; report them once.
        let seen: HashSet<i64> =
          controller_side.iter().map(|s| s.id).collect();
        let mut summaries = controller_side;
        summaries
          .extend(controlled_side.into_iter().filter(|s| !seen.contains(&s.id)));
        Ok(summaries)
      })
      .await?;
    Ok(rows)
  }

  async fn interactions_in_article(
    &self,
    article_name: &str,
  ) -> Result<Vec<InteractionSummary>> {
    let name = article_name.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        interaction_summaries(
          conn,
          "SELECT i.id,
                  pc.kb_name || ':' || pc.kb_id,
                  pd.kb_name || ':' || pd.kb_id,
                  i.polarity, i.directed, COUNT(e.id)
           FROM interactions i
           JOIN evidences e ON e.interaction_id = i.id
           JOIN articles a ON a.id = e.article_id
           JOIN participants pc ON pc.id = i.controller
           JOIN participants pd ON pd.id = i.controlled
           WHERE a.name = ?1
           GROUP BY i.id
           ORDER BY i.id",
          &[&name],
        )
        .map_err(tokio_rusqlite::Error::from)
      })
      .await?;
    Ok(rows)
  }

  async fn evidence_for_interaction(
    &self,
    interaction_id: i64,
  ) -> Result<Vec<EvidenceSummary>> {
    let rows = self
      .conn
      .call(move |conn| {
        evidence_summaries(
          conn,
          "SELECT id, text, markup FROM evidences
           WHERE interaction_id = ?1
           ORDER BY id",
          &[&interaction_id],
        )
        .map_err(tokio_rusqlite::Error::from)
      })
      .await?;
    Ok(rows)
  }

  async fn evidence_for_pair(
    &self,
    controller: &ParticipantKey,
    controlled: &ParticipantKey,
  ) -> Result<Vec<EvidenceSummary>> {
    let (c_name, c_id) = (controller.kb_name.clone(), controller.kb_id.clone());
    let (d_name, d_id) = (controlled.kb_name.clone(), controlled.kb_id.clone());

    let rows = self
      .conn
      .call(move |conn| {
        evidence_summaries(
          conn,
          "SELECT e.id, e.text, e.markup
           FROM evidences e
           JOIN interactions i ON i.id = e.interaction_id
           JOIN participants pc ON pc.id = i.controller
           JOIN participants pd ON pd.id = i.controlled
           WHERE pc.kb_name = ?1 AND pc.kb_id = ?2
             AND pd.kb_name = ?3 AND pd.kb_id = ?4
           ORDER BY e.id",
          &[&c_name, &c_id, &d_name, &d_id],
        )
        .map_err(tokio_rusqlite::Error::from)
      })
      .await?;
    Ok(rows)
  }

  async fn evidence_for_pair_filtered(
    &self,
    controller: &ParticipantKey,
    controlled: &ParticipantKey,
    polarity: bool,
    directed: bool,
  ) -> Result<Vec<EvidenceSummary>> {
    let (c_name, c_id) = (controller.kb_name.clone(), controller.kb_id.clone());
    let (d_name, d_id) = (controlled.kb_name.clone(), controlled.kb_id.clone());

    let rows = self
      .conn
      .call(move |conn| {
        evidence_summaries(
          conn,
          "SELECT e.id, e.text, e.markup
           FROM evidences e
           JOIN interactions i ON i.id = e.interaction_id
           JOIN participants pc ON pc.id = i.controller
           JOIN participants pd ON pd.id = i.controlled
           WHERE pc.kb_name = ?1 AND pc.kb_id = ?2
             AND pd.kb_name = ?3 AND pd.kb_id = ?4
             AND i.polarity = ?5 AND i.directed = ?6
           ORDER BY e.id",
          &[&c_name, &c_id, &d_name, &d_id, &polarity, &directed],
        )
        .map_err(tokio_rusqlite::Error::from)
      })
      .await?;
    Ok(rows)
  }

  async fn neighbors(
    &self,
    key: &ParticipantKey,
  ) -> Result<Vec<NeighborSummary>> {
    let kb_name = key.kb_name.clone();
    let kb_id = key.kb_id.clone();

    let rows = self
      .conn
      .call(move |conn| {
        let Some(pid) = participant_id(conn, &kb_name, &kb_id)? else {
          return Ok(Vec::new());
        };

        // (other participant id, polarity, direction), in first-seen order.
        let mut triples: Vec<(i64, bool, Direction)> = Vec::new();
        {
          let mut stmt = conn.prepare(
            "SELECT controlled, polarity, directed FROM interactions
             WHERE controller = ?1
             ORDER BY id",
          )?;
          let outgoing = stmt.query_map(rusqlite::params![pid], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, bool>(1)?,
              row.get::<_, bool>(2)?,
            ))
          })?;
          for row in outgoing {
            let (other, polarity, directed) = row?;
            let direction =
              if directed { Direction::Out } else { Direction::None };
            triples.push((other, polarity, direction));
          }
        }
        {
          let mut stmt = conn.prepare(
            "SELECT controller, polarity, directed FROM interactions
             WHERE controlled = ?1
             ORDER BY id",
          )?;
          let incoming = stmt.query_map(rusqlite::params![pid], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, bool>(1)?,
              row.get::<_, bool>(2)?,
            ))
          })?;
          for row in incoming {
            let (other, polarity, directed) = row?;
            let direction =
              if directed { Direction::In } else { Direction::None };
            triples.push((other, polarity, direction));
          }
        }

        let mut seen = HashSet::new();
        let mut neighbors = Vec::new();
        for (other, polarity, direction) in triples {
          if !seen.insert((other, polarity, direction)) {
            continue;
          }
          let (kb_name, kb_id): (String, String) = conn.query_row(
            "SELECT kb_name, kb_id FROM participants WHERE id = ?1",
            rusqlite::params![other],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )?;
          neighbors.push(NeighborSummary {
            kb_name,
            kb_id,
            polarity,
            direction,
          });
        }
        Ok(neighbors)
      })
      .await?;
    Ok(rows)
  }

  async fn article_text(&self, article_name: &str) -> Result<Option<String>> {
    let name = article_name.to_owned();

    let text = self
      .conn
      .call(move |conn| {
        let text: Option<Option<String>> = conn
          .query_row(
            "SELECT text FROM articles WHERE name = ?1 ORDER BY id LIMIT 1",
            rusqlite::params![name],
            |row| row.get(0),
          )
          .optional()?;
        // A known article whose text column is NULL reads as an empty
        // string; `None` is reserved for names with no article row at all.
        Ok(text.map(Option::unwrap_or_default))
      })
      .await?;
    Ok(text)
  }

  async fn mention_spans(
    &self,
    article_name: &str,
  ) -> Result<Vec<MentionSpans>> {
    let name = article_name.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        // Pinned to the single row `article_text` reads, so spans from one
        // revision of an article never land on another revision's text.
        let mut stmt = conn.prepare(
          "SELECT e.event_start, e.event_end,
                  e.trigger_start, e.trigger_end,
                  e.controller_start, e.controller_end,
                  e.controlled_start, e.controlled_end,
                  i.polarity
           FROM evidences e
           JOIN interactions i ON i.id = e.interaction_id
           WHERE e.article_id =
             (SELECT id FROM articles WHERE name = ?1 ORDER BY id LIMIT 1)
           ORDER BY e.id",
        )?;
        let mentions = stmt
          .query_map(rusqlite::params![name], |row| {
            let spans = CharSpans {
              sentence:   None,
              event:      span_from_cols(row.get(0)?, row.get(1)?),
              trigger:    span_from_cols(row.get(2)?, row.get(3)?),
              controller: span_from_cols(row.get(4)?, row.get(5)?),
              controlled: span_from_cols(row.get(6)?, row.get(7)?),
            };
            let polarity: bool = row.get(8)?;
            Ok(MentionSpans::from_char_spans(&spans, polarity))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(mentions.into_iter().flatten().collect::<Vec<_>>())
      })
      .await?;
    Ok(rows)
  }

  async fn stats(&self) -> Result<GraphStats> {
    let stats = self
      .conn
      .call(|conn| {
        Ok(GraphStats {
          participants:  count_rows(conn, "participants")?,
          descriptions:  count_rows(conn, "participant_descriptions")?,
          interactions:  count_rows(conn, "interactions")?,
          journals:      count_rows(conn, "journals")?,
          articles:      count_rows(conn, "articles")?,
          significances: count_rows(conn, "significances")?,
          evidences:     count_rows(conn, "evidences")?,
        })
      })
      .await?;
    Ok(stats)
  }
}
