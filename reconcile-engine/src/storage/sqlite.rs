use rusqlite::{params, Connection, OptionalExtension};

use super::StoragePort;
use crate::error::{Error, Result};
use crate::record::{data_fields, Fields, Record, RecordId, Snapshot};

pub const DEFAULT_TABLE: &str = "products";

/// Records in one relational table; each row's fields are a JSON object.
pub struct SqliteStorage {
    conn: Connection,
    table: String,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self> {
        Self::open_table(path, DEFAULT_TABLE)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    pub fn open_table(path: &str, table: &str) -> Result<Self> {
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::InvalidState(format!("invalid table name '{}'", table)));
        }
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fields TEXT NOT NULL
            );
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;"
        ))?;
        tracing::debug!(path, table, "opened sqlite storage");
        Ok(Self { conn, table: table.to_string() })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn load(&self, id: RecordId) -> Result<Option<Fields>> {
        let raw: Option<String> = self.conn.query_row(
            &format!("SELECT fields FROM {} WHERE id = ?1", self.table),
            params![id.0],
            |row| row.get(0),
        ).optional()?;
        raw.map(|json| serde_json::from_str(&json).map_err(Error::from)).transpose()
    }
}

impl StoragePort for SqliteStorage {
    fn create(&mut self, fields: &Fields) -> Result<RecordId> {
        let json = serde_json::to_string(&data_fields(fields))?;
        self.conn.execute(
            &format!("INSERT INTO {} (fields) VALUES (?1)", self.table),
            params![json],
        )?;
        Ok(RecordId(self.conn.last_insert_rowid()))
    }

    fn update(&mut self, id: RecordId, changes: &Fields) -> Result<()> {
        let mut fields = self.load(id)?
            .ok_or_else(|| Error::Storage(format!("no record with id {}", id)))?;
        fields.extend(data_fields(changes));
        let json = serde_json::to_string(&fields)?;
        self.conn.execute(
            &format!("UPDATE {} SET fields = ?1 WHERE id = ?2", self.table),
            params![json, id.0],
        )?;
        Ok(())
    }

    fn delete(&mut self, id: RecordId) -> Result<()> {
        let deleted = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", self.table),
            params![id.0],
        )?;
        if deleted == 0 {
            return Err(Error::Storage(format!("no record with id {}", id)));
        }
        Ok(())
    }

    fn list_all(&self) -> Result<Snapshot> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT id, fields FROM {} ORDER BY id", self.table),
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, json)| -> Result<Record> {
                let fields: Fields = serde_json::from_str(&json)?;
                Ok(Record { id: Some(RecordId(id)), fields })
            })
            .collect()
    }

    fn find(&self, id: RecordId) -> Result<Option<Record>> {
        Ok(self.load(id)?.map(|fields| Record { id: Some(id), fields }))
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_basic_operations() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();

        let id = storage.create(&Record::new().field("name", "Drill").field("qty", 5).fields).unwrap();
        storage.update(id, &Record::new().field("qty", 8).field("active", true).fields).unwrap();

        let record = storage.find(id).unwrap().unwrap();
        assert_eq!(record.get("name"), Some(&Value::from("Drill")));
        assert_eq!(record.get("qty"), Some(&Value::Int(8)));
        assert_eq!(record.get("active"), Some(&Value::Bool(true)));
        assert_eq!(storage.len().unwrap(), 1);

        storage.delete(id).unwrap();
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_missing_ids_fail() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        assert!(matches!(storage.delete(RecordId(1)), Err(Error::Storage(_))));
        assert!(matches!(storage.update(RecordId(1), &Fields::new()), Err(Error::Storage(_))));
        assert_eq!(storage.find(RecordId(1)).unwrap(), None);
    }

    #[test]
    fn test_list_all_ascending() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        for name in ["Drill", "M8 bolts", "Work gloves"] {
            storage.create(&Record::new().field("name", name).fields).unwrap();
        }
        storage.delete(RecordId(2)).unwrap();
        let ids: Vec<_> = storage.list_all().unwrap().iter().filter_map(|r| r.id).collect();
        assert_eq!(ids, vec![RecordId(1), RecordId(3)]);
    }

    #[test]
    fn test_rejects_bad_table_name() {
        assert!(SqliteStorage::open_table(":memory:", "products; DROP").is_err());
    }
}
