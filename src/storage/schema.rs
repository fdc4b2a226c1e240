//! Database schema definitions
//!
//! Primary and citation tables share one layout. Sequence columns hold JSON
//! arrays; `citations` holds ids into the sibling citation table.

use crate::{Error, Result};

/// Suffix of the sibling table that holds cited Papers.
pub const CITATION_SUFFIX: &str = "_citations";

/// Prefix of generated table names.
pub const TABLE_PREFIX: &str = "papers_";

/// SQL to create a Paper table; `{table}` is replaced by the quoted name.
pub const CREATE_PAPER_TABLE: &str = r#"
CREATE TABLE {table} (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    aulast          TEXT,
    auinit          TEXT,
    auuri           TEXT,
    institutions    TEXT,
    atitle          TEXT,
    jtitle          TEXT,
    volume          TEXT,
    issue           TEXT,
    spage           TEXT,
    epage           TEXT,
    date            INTEGER,
    ayjid           TEXT,
    uri             TEXT UNIQUE,
    doi             TEXT UNIQUE,
    pmid            TEXT UNIQUE,
    wosid           TEXT UNIQUE,
    eid             TEXT UNIQUE,
    abstract        TEXT,
    contents        TEXT,
    topics          TEXT,
    accession       TEXT,
    citations       TEXT
)
"#;

/// Primary key column; present in every table but not a Paper field.
pub const ID_COLUMN: &str = "id";

/// Name of the citation table belonging to `table`.
pub fn citation_table_name(table: &str) -> String {
    format!("{}{}", table, CITATION_SUFFIX)
}

/// Generate a fresh, collision-resistant table name.
///
/// The hyphens of the UUID are not valid in a bare identifier, so they
/// become underscores.
pub fn generate_table_name() -> String {
    format!("{}{}", TABLE_PREFIX, uuid::Uuid::new_v4().to_string().replace('-', "_"))
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(Error::InvalidTableName(name.to_string()))
    }
}

/// Quote an identifier for use in SQL. Callers validate first.
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}

/// Statements creating the primary table and its citation table.
pub fn create_statements(table: &str) -> Vec<String> {
    [table.to_string(), citation_table_name(table)]
        .iter()
        .map(|name| CREATE_PAPER_TABLE.replace("{table}", &quote(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_are_valid_and_distinct() {
        let a = generate_table_name();
        let b = generate_table_name();
        assert!(a.starts_with(TABLE_PREFIX));
        assert_eq!(a.len(), TABLE_PREFIX.len() + 36);
        assert_eq!(a.matches('_').count(), 5);
        assert_ne!(a, b);
        validate_table_name(&a).unwrap();
        validate_table_name(&citation_table_name(&a)).unwrap();
    }

    #[test]
    fn test_rejects_injection() {
        assert!(validate_table_name("papers; DROP TABLE x").is_err());
        assert!(validate_table_name("1papers").is_err());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("\"papers\"").is_err());
    }

    #[test]
    fn test_create_statements_cover_both_tables() {
        let stmts = create_statements("papers_x");
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("CREATE TABLE \"papers_x\" ("));
        assert!(stmts[1].contains("CREATE TABLE \"papers_x_citations\" ("));
    }
}
