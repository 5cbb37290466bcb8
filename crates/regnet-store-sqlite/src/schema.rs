//! SQL schema for the regnet SQLite store.
//!
//! Executed once at connection startup. The graph is append-only: no UPDATE
//! or DELETE is ever issued against any of these tables. UNIQUE constraints
//! back the natural keys whose columns are all NOT NULL; identities with
//! nullable columns (journals, articles, significances, evidences) are
//! enforced by the store's serialised lookup-before-insert instead, because
//! SQLite treats NULLs as distinct inside UNIQUE indexes.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS journals (
    id            INTEGER PRIMARY KEY,
    name          TEXT,
    impact_factor REAL,
    issn          TEXT
);

CREATE TABLE IF NOT EXISTS articles (
    id           INTEGER PRIMARY KEY,
    doi          TEXT,
    url          TEXT,
    name         TEXT NOT NULL,   -- canonical document id, e.g. 'PMC8910733'
    publish_date TEXT,
    text         TEXT,
    journal_id   INTEGER NOT NULL REFERENCES journals(id)
);

CREATE TABLE IF NOT EXISTS participants (
    id      INTEGER PRIMARY KEY,
    kb_name TEXT NOT NULL,
    kb_id   TEXT NOT NULL,
    UNIQUE (kb_name, kb_id)
);

CREATE TABLE IF NOT EXISTS participant_descriptions (
    id             INTEGER PRIMARY KEY,
    description    TEXT NOT NULL,
    participant_id INTEGER NOT NULL REFERENCES participants(id),
    UNIQUE (description, participant_id)
);

-- controller and controlled are two independent role-tagged foreign keys
-- into participants.
CREATE TABLE IF NOT EXISTS interactions (
    id         INTEGER PRIMARY KEY,
    controller INTEGER NOT NULL REFERENCES participants(id),
    controlled INTEGER NOT NULL REFERENCES participants(id),
    polarity   INTEGER NOT NULL,
    directed   INTEGER NOT NULL,
    UNIQUE (controller, controlled, polarity, directed)
);

CREATE TABLE IF NOT EXISTS significances (
    id              INTEGER PRIMARY KEY,
    type            TEXT,
    value           REAL,
    secondary_value REAL,
    article_id      INTEGER NOT NULL REFERENCES articles(id)
);

-- Dedup identity is (text, markup, article_id, interaction_id); the span
-- columns ride along from the first insert and may all be NULL.
CREATE TABLE IF NOT EXISTS evidences (
    id               INTEGER PRIMARY KEY,
    text             TEXT NOT NULL,
    markup           TEXT NOT NULL,
    sentence_start   INTEGER,
    sentence_end     INTEGER,
    event_start      INTEGER,
    event_end        INTEGER,
    trigger_start    INTEGER,
    trigger_end      INTEGER,
    controller_start INTEGER,
    controller_end   INTEGER,
    controlled_start INTEGER,
    controlled_end   INTEGER,
    article_id       INTEGER NOT NULL REFERENCES articles(id),
    interaction_id   INTEGER NOT NULL REFERENCES interactions(id)
);

CREATE INDEX IF NOT EXISTS interactions_controller_idx ON interactions(controller);
CREATE INDEX IF NOT EXISTS interactions_controlled_idx ON interactions(controlled);
CREATE INDEX IF NOT EXISTS evidences_interaction_idx   ON evidences(interaction_id);
CREATE INDEX IF NOT EXISTS evidences_article_idx       ON evidences(article_id);
CREATE INDEX IF NOT EXISTS articles_name_idx           ON articles(name);

PRAGMA user_version = 1;
";
