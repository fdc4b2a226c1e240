//! Paper - the bibliographic record
//!
//! A Paper carries author lists, venue strings, a publication year, five
//! natural-key identifiers (URI, DOI, PMID, WoS ID, EID) and an optional list
//! of cited Papers.
//!
//! Fields are addressable by name so that rows can be mapped onto a Paper
//! using the column names discovered from the table, without hard-coding the
//! table layout in the store.

use crate::value::FieldValue;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Name of the field holding cited Papers.
pub const CITATIONS: &str = "citations";

/// Uniquely constrained identifier fields.
pub const NATURAL_KEYS: &[&str] = &["uri", "doi", "pmid", "wosid", "eid"];

/// Every scalar field of a Paper with its value kind, in table column order.
/// `citations` is not listed: it holds Papers, not a plain value.
pub const FIELDS: &[(&str, FieldKind)] = &[
    ("aulast", FieldKind::TextList),
    ("auinit", FieldKind::TextList),
    ("auuri", FieldKind::TextList),
    ("institutions", FieldKind::NestedTextList),
    ("atitle", FieldKind::Text),
    ("jtitle", FieldKind::Text),
    ("volume", FieldKind::Text),
    ("issue", FieldKind::Text),
    ("spage", FieldKind::Text),
    ("epage", FieldKind::Text),
    ("date", FieldKind::Integer),
    ("ayjid", FieldKind::Text),
    ("uri", FieldKind::Text),
    ("doi", FieldKind::Text),
    ("pmid", FieldKind::Text),
    ("wosid", FieldKind::Text),
    ("eid", FieldKind::Text),
    ("abstract", FieldKind::Text),
    ("contents", FieldKind::Text),
    ("topics", FieldKind::Text),
    ("accession", FieldKind::Text),
];

/// Shape of the value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    TextList,
    NestedTextList,
    IntegerList,
}

impl FieldKind {
    /// Get the string representation of the field kind
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::TextList => "text_list",
            FieldKind::NestedTextList => "nested_text_list",
            FieldKind::IntegerList => "integer_list",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bibliographic record.
///
/// Every field is optional; `None` is stored as SQL NULL. `citations` is
/// `None` when the citing relationship is unknown and `Some(vec![])` when the
/// Paper is known to cite nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paper {
    /// Author surnames
    pub aulast: Option<Vec<String>>,
    /// Author initials, parallel to `aulast`
    pub auinit: Option<Vec<String>>,
    /// Author URIs, parallel to `aulast`
    pub auuri: Option<Vec<String>>,
    /// Institutions per author
    pub institutions: Option<Vec<Vec<String>>>,
    /// Article title
    pub atitle: Option<String>,
    /// Journal title
    pub jtitle: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    /// Start page
    pub spage: Option<String>,
    /// End page
    pub epage: Option<String>,
    /// Publication year
    pub date: Option<i64>,
    /// Author-year-journal identifier
    pub ayjid: Option<String>,
    pub uri: Option<String>,
    pub doi: Option<String>,
    pub pmid: Option<String>,
    /// Web of Science accession id
    pub wosid: Option<String>,
    /// Scopus EID
    pub eid: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub contents: Option<String>,
    pub topics: Option<String>,
    pub accession: Option<String>,
    /// Cited Papers
    pub citations: Option<Vec<Paper>>,
}

impl Paper {
    /// Create an empty Paper
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the article title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.atitle = Some(title.into());
        self
    }

    /// Set the DOI
    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    /// Set the publication year
    pub fn with_date(mut self, year: i64) -> Self {
        self.date = Some(year);
        self
    }

    /// Set the cited Papers
    pub fn with_citations(mut self, citations: Vec<Paper>) -> Self {
        self.citations = Some(citations);
        self
    }

    /// Kind of a named scalar field, or `None` if the Paper has no such field.
    pub fn field_kind(name: &str) -> Option<FieldKind> {
        FIELDS.iter().find(|(field, _)| *field == name).map(|(_, kind)| *kind)
    }

    /// Read a scalar field by name. Returns `None` for unknown fields.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "aulast" => FieldValue::from(self.aulast.clone()),
            "auinit" => FieldValue::from(self.auinit.clone()),
            "auuri" => FieldValue::from(self.auuri.clone()),
            "institutions" => FieldValue::from(self.institutions.clone()),
            "atitle" => FieldValue::from(self.atitle.clone()),
            "jtitle" => FieldValue::from(self.jtitle.clone()),
            "volume" => FieldValue::from(self.volume.clone()),
            "issue" => FieldValue::from(self.issue.clone()),
            "spage" => FieldValue::from(self.spage.clone()),
            "epage" => FieldValue::from(self.epage.clone()),
            "date" => FieldValue::from(self.date),
            "ayjid" => FieldValue::from(self.ayjid.clone()),
            "uri" => FieldValue::from(self.uri.clone()),
            "doi" => FieldValue::from(self.doi.clone()),
            "pmid" => FieldValue::from(self.pmid.clone()),
            "wosid" => FieldValue::from(self.wosid.clone()),
            "eid" => FieldValue::from(self.eid.clone()),
            "abstract" => FieldValue::from(self.abstract_text.clone()),
            "contents" => FieldValue::from(self.contents.clone()),
            "topics" => FieldValue::from(self.topics.clone()),
            "accession" => FieldValue::from(self.accession.clone()),
            _ => return None,
        };
        Some(value)
    }

    /// Write a scalar field by name.
    ///
    /// Fails with `UnknownField` for names outside [`FIELDS`] and with
    /// `FieldType` when the value does not match the field's kind.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<()> {
        match name {
            "aulast" => self.aulast = value.into_text_list(name)?,
            "auinit" => self.auinit = value.into_text_list(name)?,
            "auuri" => self.auuri = value.into_text_list(name)?,
            "institutions" => self.institutions = value.into_nested_text_list(name)?,
            "atitle" => self.atitle = value.into_text(name)?,
            "jtitle" => self.jtitle = value.into_text(name)?,
            "volume" => self.volume = value.into_text(name)?,
            "issue" => self.issue = value.into_text(name)?,
            "spage" => self.spage = value.into_text(name)?,
            "epage" => self.epage = value.into_text(name)?,
            "date" => self.date = value.into_integer(name)?,
            "ayjid" => self.ayjid = value.into_text(name)?,
            "uri" => self.uri = value.into_text(name)?,
            "doi" => self.doi = value.into_text(name)?,
            "pmid" => self.pmid = value.into_text(name)?,
            "wosid" => self.wosid = value.into_text(name)?,
            "eid" => self.eid = value.into_text(name)?,
            "abstract" => self.abstract_text = value.into_text(name)?,
            "contents" => self.contents = value.into_text(name)?,
            "topics" => self.topics = value.into_text(name)?,
            "accession" => self.accession = value.into_text(name)?,
            _ => return Err(Error::UnknownField(name.to_string())),
        }
        Ok(())
    }

    /// Enumerate `(name, value)` pairs of every scalar field, in [`FIELDS`] order.
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        FIELDS
            .iter()
            .filter_map(|(name, _)| self.get(name).map(|value| (*name, value)))
            .collect()
    }

    /// Natural-key identifiers that are present on this Paper.
    pub fn natural_keys(&self) -> Vec<(&'static str, String)> {
        NATURAL_KEYS
            .iter()
            .filter_map(|key| match self.get(key) {
                Some(FieldValue::Text(value)) => Some((*key, value)),
                _ => None,
            })
            .collect()
    }

    /// Get a short description for display
    pub fn short_description(&self) -> String {
        let title = self.atitle.as_deref().unwrap_or("(untitled)");
        let author = self
            .aulast
            .as_ref()
            .and_then(|names| names.first())
            .map(String::as_str)
            .unwrap_or("?");
        match self.date {
            Some(year) => format!("{} ({}) {}", author, year, title),
            None => format!("{} {}", author, title),
        }
    }
}
