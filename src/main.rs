//! Papertable CLI - manage Paper tables from the command line

use anyhow::Context;
use clap::{Parser, Subcommand};
use papertable::config::{self, ConnectionParams, PapertableConfig};
use papertable::storage::{catalog, OnDuplicate, PaperStore};
use papertable::ui::{self, Icons};
use papertable::Paper;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "papertable")]
#[command(version)]
#[command(about = "Bibliographic Papers stored in SQLite tables, read back lazily")]
#[command(long_about = r#"
Papertable keeps Papers and the Papers they cite in a pair of SQLite tables.

Example usage:
  papertable init
  papertable create
  papertable import --table papers_1f0c... --file papers.jsonl
  papertable get --table papers_1f0c... --index 0
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default papertable.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Create a new Paper table and its citation table
    Create,

    /// List Paper tables in the database
    Tables,

    /// Append Papers from a JSON-lines file
    Import {
        /// Table name (defaults to the config's table)
        #[arg(short, long)]
        table: Option<String>,

        /// File with one JSON Paper per line
        #[arg(short, long)]
        file: PathBuf,

        /// Skip Papers whose identifiers already exist instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Show the Paper at a position
    Get {
        #[arg(short, long)]
        table: Option<String>,

        /// Zero-based position in the table
        #[arg(short, long)]
        index: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List Papers in table order
    List {
        #[arg(short, long)]
        table: Option<String>,

        /// Maximum number of Papers
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show row counts for a table
    Stats {
        #[arg(short, long)]
        table: Option<String>,
    },
}

/// Settings resolved from flags and the config file.
struct Settings {
    database: PathBuf,
    table: Option<String>,
    batch_size: Option<usize>,
    params: ConnectionParams,
}

impl Settings {
    fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();
        let database = match (&cli.database, &config.database) {
            (Some(path), _) => path.clone(),
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => config::default_database_path_in(&std::env::current_dir()?),
        };
        Ok(Self {
            database,
            table: config.table,
            batch_size: config.batch_size,
            params: config.params,
        })
    }

    fn table(&self, flag: Option<String>) -> anyhow::Result<String> {
        flag.or_else(|| self.table.clone())
            .context("no table given: pass --table or set `table` in papertable.toml")
    }

    fn connect(&self) -> anyhow::Result<rusqlite::Connection> {
        config::ensure_db_dir(&self.database)?;
        self.params
            .open(&self.database)
            .with_context(|| format!("opening {}", self.database.display()))
    }

    fn attach<'c>(&self, conn: &'c rusqlite::Connection, table: &str) -> anyhow::Result<PaperStore<'c>> {
        let store = PaperStore::attach(conn, self.params.clone(), table)?;
        Ok(match self.batch_size {
            Some(size) => store.with_batch_size(size),
            None => store,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = Settings::resolve(&cli)?;

    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.clone().unwrap_or_else(config::default_config_path);
            let config = PapertableConfig {
                database: Some(settings.database.display().to_string()),
                table: None,
                batch_size: Some(papertable::storage::DEFAULT_BATCH_SIZE),
                params: ConnectionParams::new().with(ConnectionParams::BUSY_TIMEOUT_MS, "5000"),
            };
            config::write_config(&path, &config, force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }

        Commands::Create => {
            let conn = settings.connect()?;
            let store = PaperStore::create(&conn, settings.params.clone())?;
            tracing::info!("Created {} and {}", store.table_name(), store.citation_table_name());

            ui::success(&format!("Created table {}", store.table_name()));
            ui::info("Citations", &store.citation_table_name());
            ui::info("Database", &settings.database.display().to_string());
        }

        Commands::Tables => {
            let conn = settings.connect()?;
            let tables = catalog::list_paper_tables(&conn)?;
            if tables.is_empty() {
                println!("∅ No Paper tables in {}", settings.database.display());
            } else {
                ui::header(&format!("{} Paper tables", tables.len()));
                for table in tables {
                    println!("  {} {}", Icons::TABLE, table);
                }
            }
        }

        Commands::Import { table, file, lenient } => {
            let table = settings.table(table)?;
            let conn = settings.connect()?;
            let mut store = settings.attach(&conn, &table)?;
            ui::header(&format!("Importing {} into {}", file.display(), table));
            import(&mut store, &file, lenient)?;
        }

        Commands::Get { table, index, json } => {
            let table = settings.table(table)?;
            let conn = settings.connect()?;
            let store = settings.attach(&conn, &table)?;
            let paper = store.get(index)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&paper)?);
            } else {
                ui::paper_detail(index, &paper);
            }
        }

        Commands::List { table, limit } => {
            let table = settings.table(table)?;
            let conn = settings.connect()?;
            let store = settings.attach(&conn, &table)?;

            let rows = store
                .iter()
                .take(limit)
                .enumerate()
                .map(|(i, paper)| paper.map(|p| ui::table::PaperRow::new(i, &p)))
                .collect::<papertable::Result<Vec<_>>>()?;

            if rows.is_empty() {
                println!("∅ No Papers in {}", table);
            } else {
                println!("{}", ui::papers_table(rows));
                if store.len() > limit {
                    ui::summary_row("Showing", &format!("{} of {}", limit, store.len()));
                }
            }
        }

        Commands::Stats { table } => {
            let table = settings.table(table)?;
            let conn = settings.connect()?;
            let store = settings.attach(&conn, &table)?;
            let citations = store.citations().context("primary store has no citation table")?;

            println!("{} Papertable Statistics ({})", Icons::STATS, table);
            println!(
                "{}",
                ui::stats_table(&[
                    ("Papers", store.count_rows()?.to_string()),
                    ("Cached row ids", store.len().to_string()),
                    ("Cited Papers", citations.count_rows()?.to_string()),
                    ("Columns", store.columns().len().to_string()),
                ])
            );

            if let (Some(first), Some(last)) = (store.row_ids().first(), store.row_ids().last()) {
                ui::summary_row("Row id range", &format!("{}..={}", first, last));
            }
            let params: Vec<_> = store.params().iter().collect();
            if !params.is_empty() {
                ui::section("Connection parameters");
                for (key, value) in params {
                    ui::summary_row(key, value);
                }
            }
        }
    }

    Ok(())
}

fn import(store: &mut PaperStore<'_>, file: &Path, lenient: bool) -> anyhow::Result<()> {
    let reader = std::io::BufReader::new(
        std::fs::File::open(file).with_context(|| format!("opening {}", file.display()))?,
    );
    let on_duplicate = if lenient {
        OnDuplicate::Ignore
    } else {
        OnDuplicate::Complain
    };

    let mut progress = ui::ImportProgress::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let paper: Paper = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid Paper", file.display(), number + 1))?;

        match store
            .append_with(&paper, on_duplicate)
            .with_context(|| format!("{}:{}", file.display(), number + 1))?
        {
            Some(_) => progress.appended(),
            None => progress.duplicate(),
        }
    }

    let (appended, duplicates) = progress.finish();
    if duplicates > 0 {
        ui::warn(&format!("Skipped {} duplicate Papers", duplicates));
    }
    ui::success(&format!("Appended {} Papers ({} total)", appended, store.len()));
    Ok(())
}
