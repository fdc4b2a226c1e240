//! PaperStore - a sequence of Papers backed by a SQLite table
//!
//! The store keeps only the ordered row ids of its table in memory. Papers are
//! rebuilt from rows when read and decomposed into rows when appended; no
//! Paper outlives the call that produced it.
//!
//! Every primary table `T` has a sibling `T_citations` with the same layout.
//! A Paper's `citations` column holds ids into that sibling, and the sibling is
//! itself represented by a `PaperStore` one level down. Citation rows are never
//! expanded further.

use std::borrow::Borrow;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use super::catalog::{self, ColumnDescriptor};
use super::conflict::{self, UniqueViolation};
use super::cursor::Papers;
use super::schema::{self, quote, ID_COLUMN};
use crate::config::ConnectionParams;
use crate::paper::{FieldKind, Paper, CITATIONS, NATURAL_KEYS};
use crate::value::FieldValue;
use crate::{Error, Result};

/// Integer primary key of a stored row.
pub type RowId = i64;

/// Default number of rows fetched per page during iteration.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// What `append_with` does when the Paper's natural key is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDuplicate {
    /// Fail with [`Error::DuplicateRecord`]
    #[default]
    Complain,
    /// Drop the Paper silently
    Ignore,
}

/// Nesting level of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Primary table; citations are expanded into Papers
    Primary,
    /// Citation table; its own `citations` column is never expanded
    Citation,
}

/// List-like collection of Papers stored in one table.
///
/// The row-id cache is the only per-row memory cost. It grows with every
/// successful append and is never evicted.
pub struct PaperStore<'c> {
    conn: &'c Connection,
    params: ConnectionParams,
    table: String,
    row_ids: Vec<RowId>,
    columns: Vec<ColumnDescriptor>,
    depth: Depth,
    citations: Option<Box<PaperStore<'c>>>,
    batch_size: usize,
}

impl<'c> PaperStore<'c> {
    /// Create fresh tables when `table` is `None`, otherwise attach to `table`.
    pub fn new(conn: &'c Connection, params: ConnectionParams, table: Option<&str>) -> Result<Self> {
        match table {
            Some(table) => Self::attach(conn, params, table),
            None => Self::create(conn, params),
        }
    }

    /// Provision a new, empty table and its citation table.
    pub fn create(conn: &'c Connection, params: ConnectionParams) -> Result<Self> {
        let table = schema::generate_table_name();
        schema::validate_table_name(&table)?;
        debug!(table = %table, "Creating Paper and citation tables");

        let tx = conn.unchecked_transaction()?;
        for stmt in schema::create_statements(&table) {
            tx.execute_batch(&stmt)?;
        }
        tx.commit()?;

        Self::open(conn, params, table, Depth::Primary, Vec::new())
    }

    /// Attach to an existing table, loading its row ids in primary-key order.
    ///
    /// A missing table is not an error here; the store is empty and reads
    /// fail later with a storage error.
    pub fn attach(conn: &'c Connection, params: ConnectionParams, table: &str) -> Result<Self> {
        Self::attach_at(conn, params, table, Depth::Primary)
    }

    fn attach_at(conn: &'c Connection, params: ConnectionParams, table: &str, depth: Depth) -> Result<Self> {
        schema::validate_table_name(table)?;
        match catalog::stored_table_name(conn, table)? {
            Some(stored) => {
                let row_ids = load_row_ids(conn, &stored)?;
                Self::open(conn, params, stored, depth, row_ids)
            }
            None => {
                warn!(table = %table, "Attaching to a table that does not exist");
                Self::open(conn, params, table.to_string(), depth, Vec::new())
            }
        }
    }

    fn open(
        conn: &'c Connection,
        params: ConnectionParams,
        table: String,
        depth: Depth,
        row_ids: Vec<RowId>,
    ) -> Result<Self> {
        let columns = catalog::discover_columns(conn, &table)?;
        let citations = match depth {
            Depth::Primary => {
                let citation_table = schema::citation_table_name(&table);
                let store = Self::attach_at(conn, params.clone(), &citation_table, Depth::Citation)?;
                Some(Box::new(store))
            }
            Depth::Citation => None,
        };

        debug!(table = %table, rows = row_ids.len(), columns = columns.len(), "Opened Paper store");
        Ok(Self {
            conn,
            params,
            table,
            row_ids,
            columns,
            depth,
            citations,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Set the number of rows fetched per page by [`PaperStore::iter`].
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        if let Some(citations) = self.citations.take() {
            self.citations = Some(Box::new((*citations).with_batch_size(batch_size)));
        }
        self
    }

    // ========== Accessors ==========

    pub fn len(&self) -> usize {
        self.row_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn citation_table_name(&self) -> String {
        schema::citation_table_name(&self.table)
    }

    /// Cached row ids, in sequence order
    pub fn row_ids(&self) -> &[RowId] {
        &self.row_ids
    }

    /// Columns discovered from the table, in table order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub(crate) fn connection(&self) -> &'c Connection {
        self.conn
    }

    pub(crate) fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The store over the citation table, or `None` for a citation store.
    pub fn citations(&self) -> Option<&PaperStore<'c>> {
        self.citations.as_deref()
    }

    /// Number of rows currently in the backing table
    pub fn count_rows(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote(&self.table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    // ========== Reads ==========

    /// Paper at sequence position `index`.
    pub fn get(&self, index: usize) -> Result<Paper> {
        let id = *self.row_ids.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.row_ids.len(),
        })?;
        self.resolve_by_id(id)
    }

    /// Paper stored under row id `id`, with citations expanded one level.
    pub fn resolve_by_id(&self, id: RowId) -> Result<Paper> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            self.select_list(),
            quote(&self.table),
            quote(ID_COLUMN)
        );

        let paper = self
            .conn
            .query_row(&sql, [id], |row| Ok(self.decode_row(row)))
            .optional()?
            .transpose()?;

        paper.ok_or_else(|| {
            debug!(table = %self.table, id, "No Paper with id");
            Error::NotFound(id)
        })
    }

    /// Lazily iterate over every Paper in primary-key order.
    ///
    /// Each call starts a fresh scan.
    pub fn iter(&self) -> Papers<'_, 'c> {
        Papers::new(self)
    }

    /// Column list matching `columns`, so row position `i` is `columns[i]`.
    pub(crate) fn select_list(&self) -> String {
        if self.columns.is_empty() {
            return quote(ID_COLUMN);
        }
        self.columns
            .iter()
            .map(|c| quote(&c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Position of the row id column in `select_list`.
    pub(crate) fn id_position(&self) -> usize {
        self.columns.iter().position(|c| c.is_row_id()).unwrap_or(0)
    }

    /// Rebuild a Paper from a row selected with `select_list`.
    pub(crate) fn decode_row(&self, row: &rusqlite::Row<'_>) -> Result<Paper> {
        let mut paper = Paper::new();

        for (i, column) in self.columns.iter().enumerate() {
            let raw = row.get_ref(i)?;

            if column.name == CITATIONS {
                paper.citations = self.decode_citations(raw)?;
                continue;
            }
            if column.is_row_id() {
                continue;
            }
            let Some(kind) = Paper::field_kind(&column.name) else {
                debug!(table = %self.table, column = %column.name, "Skipping column with no Paper field");
                continue;
            };
            paper.set(&column.name, FieldValue::from_sql(&column.name, kind, raw)?)?;
        }

        Ok(paper)
    }

    fn decode_citations(&self, raw: rusqlite::types::ValueRef<'_>) -> Result<Option<Vec<Paper>>> {
        let ids = FieldValue::from_sql(CITATIONS, FieldKind::IntegerList, raw)?.into_integer_list(CITATIONS)?;
        let Some(ids) = ids else {
            return Ok(None);
        };

        match self.citations.as_deref() {
            Some(store) => ids
                .into_iter()
                .map(|id| store.resolve_by_id(id))
                .collect::<Result<Vec<_>>>()
                .map(Some),
            None => {
                debug!(table = %self.table, "Not expanding citations below the citation table");
                Ok(None)
            }
        }
    }

    // ========== Writes ==========

    /// Append a Paper, failing with `DuplicateRecord` if its natural key exists.
    pub fn append(&mut self, paper: &Paper) -> Result<RowId> {
        self.insert_primary(paper)?.map_err(|violation| Error::DuplicateRecord {
            column: violation.column,
            detail: violation.detail,
        })
    }

    /// Append a Paper with an explicit duplicate policy.
    ///
    /// Returns the new row id, or `None` if a duplicate was ignored.
    pub fn append_with(&mut self, paper: &Paper, on_duplicate: OnDuplicate) -> Result<Option<RowId>> {
        match (self.insert_primary(paper)?, on_duplicate) {
            (Ok(id), _) => Ok(Some(id)),
            (Err(violation), OnDuplicate::Complain) => Err(Error::DuplicateRecord {
                column: violation.column,
                detail: violation.detail,
            }),
            (Err(violation), OnDuplicate::Ignore) => {
                debug!(table = %self.table, detail = %violation.detail, "Ignoring duplicate Paper");
                Ok(None)
            }
        }
    }

    /// Append each Paper in turn, stopping at the first failure.
    ///
    /// Returns the number of Papers appended.
    pub fn extend<I>(&mut self, papers: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Borrow<Paper>,
    {
        let mut appended = 0;
        for paper in papers {
            self.append(paper.borrow())?;
            appended += 1;
        }
        Ok(appended)
    }

    fn insert_primary(&mut self, paper: &Paper) -> Result<std::result::Result<RowId, UniqueViolation>> {
        let citation_ids = self.store_citations(paper)?;

        let mut values = self.row_values(paper);
        if self.has_column(CITATIONS) {
            values.push((CITATIONS, FieldValue::from(citation_ids)));
        }

        match self.try_insert(&values) {
            Ok(id) => {
                self.row_ids.push(id);
                debug!(table = %self.table, id, "Appended Paper");
                Ok(Ok(id))
            }
            Err(err) => match conflict::unique_violation(&err, &self.table, NATURAL_KEYS) {
                Some(violation) => Ok(Err(violation)),
                None => Err(err.into()),
            },
        }
    }

    /// Insert or reuse each citation, returning the ids to store on the Paper.
    fn store_citations(&mut self, paper: &Paper) -> Result<Option<Vec<RowId>>> {
        let Some(citations) = &paper.citations else {
            return Ok(None);
        };
        if self.depth == Depth::Citation {
            debug!(table = %self.table, "Not storing citations below the citation table");
            return Ok(None);
        }
        let Some(store) = self.citations.as_deref_mut() else {
            return Ok(None);
        };

        let mut ids = Vec::with_capacity(citations.len());
        for citation in citations {
            if let Some(id) = store.insert_or_reuse(citation)? {
                ids.push(id);
            }
        }
        Ok(Some(ids))
    }

    /// Insert a Paper without citations, or find the row already holding its natural key.
    ///
    /// Returns `None` when the clashing row cannot be identified.
    fn insert_or_reuse(&mut self, paper: &Paper) -> Result<Option<RowId>> {
        let values = self.row_values(paper);

        let err = match self.try_insert(&values) {
            Ok(id) => {
                self.row_ids.push(id);
                return Ok(Some(id));
            }
            Err(err) => err,
        };

        let Some(violation) = conflict::unique_violation(&err, &self.table, NATURAL_KEYS) else {
            return Err(err.into());
        };
        let Some(column) = violation.column else {
            warn!(table = %self.table, detail = %violation.detail, "Dropping citation: conflicting key unknown");
            return Ok(None);
        };
        let Some(FieldValue::Text(value)) = paper.get(&column) else {
            warn!(table = %self.table, column = %column, "Dropping citation: no value for conflicting key");
            return Ok(None);
        };

        let existing = self.find_id_by(&column, &value)?;
        if existing.is_none() {
            warn!(table = %self.table, column = %column, value = %value, "Dropping citation: conflicting row not found");
        }
        Ok(existing)
    }

    /// Row id holding `value` in natural-key column `column`.
    fn find_id_by(&self, column: &str, value: &str) -> Result<Option<RowId>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            quote(ID_COLUMN),
            quote(&self.table),
            quote(column)
        );
        self.conn
            .query_row(&sql, params![value], |row| row.get(0))
            .optional()
            .map_err(Into::into)
    }

    /// Scalar fields of `paper` that have a column in this table.
    fn row_values(&self, paper: &Paper) -> Vec<(&'static str, FieldValue)> {
        paper
            .fields()
            .into_iter()
            .filter(|(name, _)| {
                let known = self.has_column(name);
                if !known {
                    debug!(table = %self.table, field = %name, "Skipping field with no column");
                }
                known
            })
            .collect()
    }

    /// Insert one row in its own transaction.
    fn try_insert(&self, values: &[(&'static str, FieldValue)]) -> rusqlite::Result<RowId> {
        let sql = if values.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote(&self.table))
        } else {
            let names: Vec<String> = values.iter().map(|(name, _)| quote(name)).collect();
            let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote(&self.table),
                names.join(", "),
                placeholders.join(", ")
            )
        };

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(&sql, rusqlite::params_from_iter(values.iter().map(|(_, value)| value)))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }
}

impl<'s, 'c> IntoIterator for &'s PaperStore<'c> {
    type Item = Result<Paper>;
    type IntoIter = Papers<'s, 'c>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for PaperStore<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperStore")
            .field("table", &self.table)
            .field("depth", &self.depth)
            .field("len", &self.row_ids.len())
            .field("columns", &self.columns.len())
            .finish()
    }
}

fn load_row_ids(conn: &Connection, table: &str) -> Result<Vec<RowId>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {id} FROM {} ORDER BY {id}",
        quote(table),
        id = quote(ID_COLUMN)
    ))?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<RowId>>>()?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(doi: &str, title: &str) -> Paper {
        Paper::new().with_doi(doi).with_title(title)
    }

    fn citation_rows(conn: &Connection, store: &PaperStore<'_>) -> usize {
        conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote(&store.citation_table_name())),
            [],
            |row| row.get::<_, i64>(0),
        )
        .unwrap() as usize
    }

    #[test]
    fn test_create_discovers_columns() {
        let conn = Connection::open_in_memory().unwrap();
        let store = PaperStore::new(&conn, ConnectionParams::default(), None).unwrap();

        assert!(store.is_empty());
        assert!(store.table_name().starts_with(schema::TABLE_PREFIX));
        assert_eq!(store.citation_table_name(), format!("{}_citations", store.table_name()));
        assert_eq!(store.columns().len(), 23);
        assert_eq!(store.citations().unwrap().columns(), store.columns());
        assert!(store.citations().unwrap().citations().is_none());
    }

    #[test]
    fn test_append_and_index() {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();

        let mut first = paper("10.1/a", "First");
        first.aulast = Some(vec!["Curie".into()]);
        first.institutions = Some(vec![vec!["Sorbonne".into(), "ESPCI".into()]]);
        first.date = Some(1903);
        store.append(&first).unwrap();
        store.append(&paper("10.1/b", "Second")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap(), first);
        assert_eq!(store.get(1).unwrap().atitle.as_deref(), Some("Second"));
        assert!(matches!(
            store.get(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let conn = Connection::open_in_memory().unwrap();
        let store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();
        assert!(matches!(store.resolve_by_id(42), Err(Error::NotFound(42))));
    }

    #[test]
    fn test_shared_citation_is_stored_once() {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();

        let cited = paper("10.1/b", "Cited");
        store
            .append(&paper("10.1/a", "A").with_citations(vec![cited.clone()]))
            .unwrap();
        store
            .append(&paper("10.1/c", "C").with_citations(vec![cited]))
            .unwrap();

        assert_eq!(citation_rows(&conn, &store), 1);
        assert_eq!(store.citations().unwrap().len(), 1);

        let a = store.get(0).unwrap();
        let c = store.get(1).unwrap();
        assert_eq!(a.citations.unwrap()[0].doi.as_deref(), Some("10.1/b"));
        assert_eq!(c.citations.unwrap()[0].doi.as_deref(), Some("10.1/b"));
    }

    #[test]
    fn test_null_and_empty_citations_are_distinct() {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();

        store.append(&paper("10.1/a", "None")).unwrap();
        store.append(&paper("10.1/b", "Empty").with_citations(vec![])).unwrap();

        assert_eq!(store.get(0).unwrap().citations, None);
        assert_eq!(store.get(1).unwrap().citations, Some(vec![]));
    }

    #[test]
    fn test_keyless_citations_are_not_deduplicated() {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();

        // No natural key at all: never conflicts, so each is inserted.
        let anonymous = Paper::new().with_title("Anonymous");
        store
            .append(&paper("10.1/a", "A").with_citations(vec![anonymous.clone(), anonymous]))
            .unwrap();

        assert_eq!(citation_rows(&conn, &store), 2);
        assert_eq!(store.get(0).unwrap().citations.unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_complain_and_ignore() {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();

        store.append(&paper("10.1/a", "A")).unwrap();
        let err = store.append(&paper("10.1/a", "Again")).unwrap_err();
        match err {
            Error::DuplicateRecord { column, .. } => assert_eq!(column.as_deref(), Some("doi")),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(store.len(), 1);

        let ignored = store.append_with(&paper("10.1/a", "Again"), OnDuplicate::Ignore).unwrap();
        assert_eq!(ignored, None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.count_rows().unwrap(), 1);
    }

    #[test]
    fn test_extend_appends_in_order() {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();

        let papers = vec![paper("10.1/a", "A"), paper("10.1/b", "B")];
        assert_eq!(store.extend(&papers).unwrap(), 2);
        assert_eq!(store.get(1).unwrap().doi.as_deref(), Some("10.1/b"));
    }

    #[test]
    fn test_attach_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        let store = PaperStore::attach(&conn, ConnectionParams::default(), "papers_missing").unwrap();

        assert!(store.is_empty());
        assert!(store.columns().is_empty());
        assert!(matches!(store.resolve_by_id(1), Err(Error::Storage(_))));
    }

    #[test]
    fn test_attach_rejects_bad_name() {
        let conn = Connection::open_in_memory().unwrap();
        let err = PaperStore::attach(&conn, ConnectionParams::default(), "x; DROP TABLE y").unwrap_err();
        assert!(matches!(err, Error::InvalidTableName(_)));
    }

    #[test]
    fn test_extra_column_is_skipped() {
        let conn = Connection::open_in_memory().unwrap();
        let table = {
            let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();
            store.append(&paper("10.1/a", "A")).unwrap();
            store.table_name().to_string()
        };
        conn.execute(&format!("ALTER TABLE {} ADD COLUMN legacy TEXT", quote(&table)), [])
            .unwrap();

        let mut store = PaperStore::attach(&conn, ConnectionParams::default(), &table).unwrap();
        assert_eq!(store.columns().last().unwrap().name, "legacy");
        assert_eq!(store.get(0).unwrap().doi.as_deref(), Some("10.1/a"));

        store.append(&paper("10.1/b", "B")).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_attach_ignores_name_case() {
        let conn = Connection::open_in_memory().unwrap();
        let table = {
            let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();
            store
                .append(&paper("10.1/a", "A").with_citations(vec![paper("10.1/b", "B")]))
                .unwrap();
            store.table_name().to_string()
        };

        let mut store = PaperStore::attach(&conn, ConnectionParams::default(), &table.to_uppercase()).unwrap();
        assert_eq!(store.table_name(), table);
        assert_eq!(store.len(), store.count_rows().unwrap());
        assert_eq!(store.citations().unwrap().len(), 1);

        store
            .append(&paper("10.1/c", "C").with_citations(vec![paper("10.1/b", "B")]))
            .unwrap();
        assert_eq!(citation_rows(&conn, &store), 1);
        assert_eq!(store.get(1).unwrap().citations.unwrap()[0].doi.as_deref(), Some("10.1/b"));

        match store.append(&paper("10.1/a", "Again")).unwrap_err() {
            Error::DuplicateRecord { column, .. } => assert_eq!(column.as_deref(), Some("doi")),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_citation_with_unknown_conflict_is_dropped() {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();
        conn.execute(
            &format!(
                "CREATE UNIQUE INDEX citation_titles ON {} (atitle)",
                quote(&store.citation_table_name())
            ),
            [],
        )
        .unwrap();

        store
            .append(&paper("10.1/a", "A").with_citations(vec![paper("10.1/b", "Same")]))
            .unwrap();
        store
            .append(&paper("10.1/c", "C").with_citations(vec![paper("10.1/d", "Same"), paper("10.1/e", "Other")]))
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(citation_rows(&conn, &store), 2);
        let cited = store.get(1).unwrap().citations.unwrap();
        assert_eq!(cited.len(), 1);
        assert_eq!(cited[0].doi.as_deref(), Some("10.1/e"));
    }

    #[test]
    fn test_citations_reused_by_pmid_and_eid() {
        let conn = Connection::open_in_memory().unwrap();
        let mut store = PaperStore::create(&conn, ConnectionParams::default()).unwrap();

        let mut by_pmid = Paper::new().with_title("Indexed");
        by_pmid.pmid = Some("12345".into());
        let mut by_eid = Paper::new().with_title("Scopus");
        by_eid.eid = Some("2-s2.0-1".into());

        store
            .append(&paper("10.1/a", "A").with_citations(vec![by_pmid.clone(), by_eid.clone()]))
            .unwrap();
        store
            .append(&paper("10.1/c", "C").with_citations(vec![by_eid, by_pmid]))
            .unwrap();

        assert_eq!(citation_rows(&conn, &store), 2);
        assert_eq!(store.citations().unwrap().len(), 2);
        let first = store.get(0).unwrap().citations.unwrap();
        let second = store.get(1).unwrap().citations.unwrap();
        assert_eq!(first[0], second[1]);
        assert_eq!(first[1], second[0]);
        assert_eq!(second[1].pmid.as_deref(), Some("12345"));
        assert_eq!(second[0].eid.as_deref(), Some("2-s2.0-1"));
    }
}
