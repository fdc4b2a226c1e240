//! Terminal output for the `papertable` binary.

pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

use std::sync::OnceLock;

pub use icons::Icons;
pub use output::{header, info, paper_detail, paper_line, section, success, summary_row, warn};
pub use progress::{ImportProgress, Spinner};
pub use table::{papers_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};

static QUIET: OnceLock<bool> = OnceLock::new();

/// Plain output requested through `PAPERTABLE_PLAIN`.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("PAPERTABLE_PLAIN")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
