//! Database schema, applied when a connection is opened.

pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS snippets (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    title   TEXT NOT NULL,
    content TEXT NOT NULL,
    created TEXT NOT NULL,
    expires TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_snippets_created ON snippets(created);
";
