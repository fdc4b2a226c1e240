//! Unique-constraint violation classification
//!
//! A duplicate is recognised from the engine's extended result code, not from
//! its message. The message is only consulted to learn which column clashed,
//! and the answer is accepted only when it names one of the natural keys of
//! the table that was written to.

use regex::Regex;
use rusqlite::ffi;
use std::sync::LazyLock;

/// SQLite: `UNIQUE constraint failed: table.col[, table.col...]`
static SQLITE_DETAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"constraint failed: (.+)$").expect("valid regex"));

static QUALIFIED_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)\s*$").expect("valid regex"));

/// Other engines: `Key (col)=(value) already exists.`
static KEY_DETAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key \(([^)]*?)\)=").expect("valid regex"));

/// A unique-constraint violation raised by an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueViolation {
    /// Natural-key column that clashed, if it could be determined
    pub column: Option<String>,
    /// Engine message, kept for error reporting
    pub detail: String,
}

/// Classify `err` as a unique violation on `table`.
///
/// Returns `None` for every other kind of failure.
pub fn unique_violation(err: &rusqlite::Error, table: &str, natural_keys: &[&str]) -> Option<UniqueViolation> {
    let rusqlite::Error::SqliteFailure(failure, message) = err else {
        return None;
    };
    if failure.code != rusqlite::ErrorCode::ConstraintViolation {
        return None;
    }
    if failure.extended_code != ffi::SQLITE_CONSTRAINT_UNIQUE
        && failure.extended_code != ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    {
        return None;
    }

    let detail = message.clone().unwrap_or_else(|| err.to_string());
    let column = violated_column(&detail, table, natural_keys);
    Some(UniqueViolation { column, detail })
}

/// Find the natural-key column named by a violation message.
pub fn violated_column(detail: &str, table: &str, natural_keys: &[&str]) -> Option<String> {
    let is_key = |column: &str| natural_keys.contains(&column);

    if let Some(caps) = SQLITE_DETAIL.captures(detail) {
        return caps[1].split(',').find_map(|qualified| {
            let parts = QUALIFIED_COLUMN.captures(qualified)?;
            (parts[1].eq_ignore_ascii_case(table) && is_key(&parts[2])).then(|| parts[2].to_string())
        });
    }

    let caps = KEY_DETAIL.captures(detail)?;
    let column = caps[1].trim();
    is_key(column).then(|| column.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::NATURAL_KEYS;

    #[test]
    fn test_sqlite_message() {
        let col = violated_column("UNIQUE constraint failed: papers_x_citations.doi", "papers_x_citations", NATURAL_KEYS);
        assert_eq!(col.as_deref(), Some("doi"));
    }

    #[test]
    fn test_other_engine_message() {
        let msg = r#"duplicate key value violates unique constraint "p_doi_key" DETAIL: Key (doi)=(10.1/a) already exists."#;
        assert_eq!(violated_column(msg, "p", NATURAL_KEYS).as_deref(), Some("doi"));
    }

    #[test]
    fn test_table_name_case_is_ignored() {
        let col = violated_column("UNIQUE constraint failed: papers_x.pmid", "PAPERS_X", NATURAL_KEYS);
        assert_eq!(col.as_deref(), Some("pmid"));
    }

    #[test]
    fn test_never_misattributes() {
        // Wrong table, non-key column, and unparseable text all yield no column.
        assert_eq!(violated_column("UNIQUE constraint failed: other.doi", "papers", NATURAL_KEYS), None);
        assert_eq!(violated_column("UNIQUE constraint failed: papers.atitle", "papers", NATURAL_KEYS), None);
        assert_eq!(violated_column("something odd happened", "papers", NATURAL_KEYS), None);
    }

    #[test]
    fn test_classifies_real_violation() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE papers (id INTEGER PRIMARY KEY, doi TEXT UNIQUE)", []).unwrap();
        conn.execute("INSERT INTO papers (doi) VALUES ('10.1/a')", []).unwrap();
        let err = conn.execute("INSERT INTO papers (doi) VALUES ('10.1/a')", []).unwrap_err();

        let violation = unique_violation(&err, "papers", NATURAL_KEYS).unwrap();
        assert_eq!(violation.column.as_deref(), Some("doi"));

        let other = conn.execute("INSERT INTO missing (doi) VALUES ('x')", []).unwrap_err();
        assert!(unique_violation(&other, "papers", NATURAL_KEYS).is_none());
    }
}
