//! Console configuration.

use std::path::Path;

use anyhow::Context;
use reconcile_engine::{Reconciler, Schema, SqliteStorage, ValidationPolicy};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured database location.
pub const DATABASE_ENV: &str = "STOCKROOM_DB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockroomConfig {
    /// SQLite file path, or `:memory:`
    pub database: String,
    /// Table holding the product rows
    pub table: String,
    /// Column rules applied when saving
    pub schema: Schema,
    /// Whether one bad row rejects the whole save
    pub validation: ValidationPolicy,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Product names loaded into an empty in-memory database at startup
    pub starter_stock: Vec<String>,
}

impl Default for StockroomConfig {
    fn default() -> Self {
        Self {
            database: "stockroom.db".to_string(),
            table: "products".to_string(),
            schema: Schema::inventory(),
            validation: ValidationPolicy::CollectPerRow,
            log_level: "warn".to_string(),
            starter_stock: vec!["Drill".to_string(), "M8 bolts".to_string(), "Work gloves".to_string()],
        }
    }
}

impl StockroomConfig {
    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Applies `STOCKROOM_DB` if it is set and non-empty.
    pub fn with_env(mut self) -> Self {
        if let Ok(db) = std::env::var(DATABASE_ENV) {
            if !db.trim().is_empty() {
                self.database = db;
            }
        }
        self
    }

    /// An in-memory database starts empty on every run.
    pub fn is_ephemeral(&self) -> bool {
        self.database == ":memory:"
    }

    pub fn open_storage(&self) -> anyhow::Result<SqliteStorage> {
        SqliteStorage::open_table(&self.database, &self.table)
            .with_context(|| format!("opening database {}", self.database))
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.schema.clone()).with_policy(self.validation)
    }
}
