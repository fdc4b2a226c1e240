use crate::paper::Paper;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct PaperRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Year")]
    pub year: String,
    #[tabled(rename = "DOI")]
    pub doi: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Cites")]
    pub cites: String,
}

impl PaperRow {
    pub fn new(index: usize, paper: &Paper) -> Self {
        Self {
            index,
            year: paper.date.map(|y| y.to_string()).unwrap_or_default(),
            doi: paper.doi.clone().unwrap_or_default(),
            title: paper.atitle.clone().unwrap_or_default(),
            cites: paper
                .citations
                .as_ref()
                .map(|c| c.len().to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

pub fn papers_table(rows: Vec<PaperRow>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}
