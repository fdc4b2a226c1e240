//! Schema catalog queries
//!
//! Column names are read from the table at attach/create time so the
//! row-to-Paper mapping follows the table rather than a hard-coded layout.

use super::schema::{quote, ID_COLUMN};
use crate::Result;
use rusqlite::{Connection, OptionalExtension};

/// One column of a Paper table, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Zero-based position in `SELECT *` order
    pub position: usize,
    pub name: String,
    /// Declared SQL type, as written in the DDL
    pub declared_type: String,
    pub primary_key: bool,
}

impl ColumnDescriptor {
    /// The row id column is expected in every table and is never a Paper field.
    pub fn is_row_id(&self) -> bool {
        self.primary_key && self.name == ID_COLUMN
    }
}

/// Ordered columns of `table`; empty if the table does not exist.
pub fn discover_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnDescriptor>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote(table)))?;

    let columns = stmt
        .query_map([], |row| {
            let position: i64 = row.get(0)?;
            let pk: i64 = row.get(5)?;
            Ok(ColumnDescriptor {
                position: position as usize,
                name: row.get(1)?,
                declared_type: row.get(2)?,
                primary_key: pk > 0,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(columns)
}

/// Name of `table` as stored in the catalog, matched case-insensitively.
///
/// SQLite resolves table names without regard to ASCII case, so a store
/// attached as `PAPERS_X` must use the stored spelling `papers_x`.
pub fn stored_table_name(conn: &Connection, table: &str) -> Result<Option<String>> {
    let name = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name)
}

/// Names of all Paper tables in the database, excluding citation tables.
pub fn list_paper_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(names
        .iter()
        .filter(|name| !name.ends_with(super::schema::CITATION_SUFFIX))
        .filter(|name| names.contains(&super::schema::citation_table_name(name)))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema;

    #[test]
    fn test_discover_columns_in_table_order() {
        let conn = Connection::open_in_memory().unwrap();
        for stmt in schema::create_statements("papers_t") {
            conn.execute(&stmt, []).unwrap();
        }

        let columns = discover_columns(&conn, "papers_t").unwrap();
        assert_eq!(columns.len(), 23);
        assert!(columns[0].is_row_id());
        assert_eq!(columns[1].name, "aulast");
        assert_eq!(columns[11].declared_type, "INTEGER");
        assert_eq!(columns.last().unwrap().name, "citations");
        assert!(columns.iter().enumerate().all(|(i, c)| c.position == i));
    }

    #[test]
    fn test_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(stored_table_name(&conn, "nope").unwrap().is_none());
        assert!(discover_columns(&conn, "nope").unwrap().is_empty());
    }

    #[test]
    fn test_stored_name_ignores_case() {
        let conn = Connection::open_in_memory().unwrap();
        for stmt in schema::create_statements("papers_t") {
            conn.execute(&stmt, []).unwrap();
        }
        assert_eq!(stored_table_name(&conn, "PAPERS_T").unwrap().as_deref(), Some("papers_t"));
        assert_eq!(
            stored_table_name(&conn, "Papers_T_Citations").unwrap().as_deref(),
            Some("papers_t_citations")
        );
    }

    #[test]
    fn test_list_paper_tables() {
        let conn = Connection::open_in_memory().unwrap();
        for stmt in schema::create_statements("papers_a") {
            conn.execute(&stmt, []).unwrap();
        }
        conn.execute("CREATE TABLE unrelated (x INTEGER)", []).unwrap();

        assert_eq!(list_paper_tables(&conn).unwrap(), vec!["papers_a".to_string()]);
    }
}
