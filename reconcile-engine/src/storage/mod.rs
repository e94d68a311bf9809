#[cfg(feature = "sqlite")]
mod sqlite;
mod memory;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;
pub use memory::MemoryStorage;

use crate::error::Result;
use crate::record::{Fields, Record, RecordId, Snapshot};

/// Persistence collaborator consumed by `apply` and the inventory session.
///
/// Every failure is reported as [`Error::Storage`](crate::Error::Storage)
/// carrying the backend's message; callers do not interpret it further.
pub trait StoragePort {
    /// Persists a new record and returns the id the backend assigned.
    fn create(&mut self, fields: &Fields) -> Result<RecordId>;

    /// Overwrites the given fields of an existing record. Unknown ids fail.
    fn update(&mut self, id: RecordId, changes: &Fields) -> Result<()>;

    /// Removes a record. Unknown ids fail.
    fn delete(&mut self, id: RecordId) -> Result<()>;

    /// All records, ascending by id.
    fn list_all(&self) -> Result<Snapshot>;

    /// Exact-match lookup by id.
    fn find(&self, id: RecordId) -> Result<Option<Record>> {
        Ok(self.list_all()?.into_iter().find(|r| r.id == Some(id)))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.list_all()?.len())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
