//! Lazy iteration over a PaperStore
//!
//! Rows are read in primary-key order, one page at a time, resuming after the
//! last id seen. No statement stays open between pages, so the iterator does
//! not borrow a cursor from the connection.

use std::collections::VecDeque;

use rusqlite::params;

use super::schema::{quote, ID_COLUMN};
use super::store::{PaperStore, RowId};
use crate::paper::Paper;
use crate::Result;

/// Iterator over every Paper in a store, yielded in primary-key order.
pub struct Papers<'s, 'c> {
    store: &'s PaperStore<'c>,
    after: Option<RowId>,
    buffer: VecDeque<Paper>,
    exhausted: bool,
}

impl<'s, 'c> Papers<'s, 'c> {
    pub(crate) fn new(store: &'s PaperStore<'c>) -> Self {
        Self {
            store,
            after: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    fn fetch_page(&mut self) -> Result<()> {
        let limit = self.store.batch_size();
        let table = quote(self.store.table_name());
        let id = quote(ID_COLUMN);
        let select = self.store.select_list();

        let sql = match self.after {
            Some(_) => format!("SELECT {select} FROM {table} WHERE {id} > ?1 ORDER BY {id} LIMIT ?2"),
            None => format!("SELECT {select} FROM {table} ORDER BY {id} LIMIT ?1"),
        };

        let conn = self.store.connection();
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = match self.after {
            Some(after) => stmt.query(params![after, limit as i64])?,
            None => stmt.query(params![limit as i64])?,
        };

        let id_position = self.store.id_position();
        let mut fetched = 0;
        while let Some(row) = rows.next()? {
            let row_id: RowId = row.get(id_position)?;
            self.buffer.push_back(self.store.decode_row(row)?);
            self.after = Some(row_id);
            fetched += 1;
        }

        if fetched < limit {
            self.exhausted = true;
        }
        Ok(())
    }
}

impl Iterator for Papers<'_, '_> {
    type Item = Result<Paper>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                self.buffer.clear();
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
