use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PapertableConfig {
    pub database: Option<String>,
    pub table: Option<String>,
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub params: ConnectionParams,
}

/// Connection parameters, kept as an opaque string map.
///
/// Known keys are applied when a connection is opened; every key is carried
/// unchanged into the citation store of a `PaperStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionParams(BTreeMap<String, String>);

impl ConnectionParams {
    pub const BUSY_TIMEOUT_MS: &'static str = "busy_timeout_ms";
    pub const FOREIGN_KEYS: &'static str = "foreign_keys";
    pub const JOURNAL_MODE: &'static str = "journal_mode";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn busy_timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.get(Self::BUSY_TIMEOUT_MS)
            .map(|ms| {
                ms.parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| anyhow::anyhow!("{} must be a number of milliseconds, got {:?}", Self::BUSY_TIMEOUT_MS, ms))
            })
            .transpose()
    }

    pub fn foreign_keys(&self) -> anyhow::Result<Option<bool>> {
        self.get(Self::FOREIGN_KEYS)
            .map(|v| match v.to_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Ok(true),
                "0" | "false" | "off" | "no" => Ok(false),
                _ => anyhow::bail!("{} must be a boolean, got {:?}", Self::FOREIGN_KEYS, v),
            })
            .transpose()
    }

    /// Open a database file (creates if doesn't exist) and apply known parameters.
    pub fn open(&self, path: &Path) -> anyhow::Result<Connection> {
        let conn = Connection::open(path)?;
        self.apply(&conn)?;
        Ok(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory(&self) -> anyhow::Result<Connection> {
        let conn = Connection::open_in_memory()?;
        self.apply(&conn)?;
        Ok(conn)
    }

    fn apply(&self, conn: &Connection) -> anyhow::Result<()> {
        if let Some(timeout) = self.busy_timeout()? {
            conn.busy_timeout(timeout)?;
        }
        if let Some(enabled) = self.foreign_keys()? {
            conn.pragma_update(None, "foreign_keys", enabled)?;
        }
        if let Some(mode) = self.get(Self::JOURNAL_MODE) {
            let applied: String =
                conn.pragma_update_and_check(None, "journal_mode", mode, |row| row.get(0))?;
            tracing::debug!(requested = %mode, applied = %applied, "Set journal mode");
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("papertable.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".papertable").join("papers.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<PapertableConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: PapertableConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &PapertableConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papertable.toml");
        let config = PapertableConfig {
            database: Some("papers.db".into()),
            table: Some("papers_abc".into()),
            batch_size: Some(64),
            params: ConnectionParams::new().with(ConnectionParams::BUSY_TIMEOUT_MS, "2500"),
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.table.as_deref(), Some("papers_abc"));
        assert_eq!(loaded.batch_size, Some(64));
        assert_eq!(loaded.params, config.params);
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("none.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_params_parsing() {
        let params = ConnectionParams::new()
            .with(ConnectionParams::BUSY_TIMEOUT_MS, "150")
            .with(ConnectionParams::FOREIGN_KEYS, "on")
            .with("application_name", "ingest");
        assert_eq!(params.busy_timeout().unwrap(), Some(Duration::from_millis(150)));
        assert_eq!(params.foreign_keys().unwrap(), Some(true));
        assert_eq!(params.get("application_name"), Some("ingest"));
        let keys: Vec<&str> = params.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["application_name", "busy_timeout_ms", "foreign_keys"]);
        params.open_in_memory().unwrap();

        let bad = ConnectionParams::new().with(ConnectionParams::BUSY_TIMEOUT_MS, "soon");
        assert!(bad.busy_timeout().is_err());
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = default_database_path_in(dir.path());
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
