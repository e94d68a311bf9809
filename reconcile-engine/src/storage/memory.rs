use std::collections::BTreeMap;

use super::StoragePort;
use crate::error::{Error, Result};
use crate::record::{data_fields, Fields, Record, RecordId, Snapshot};

/// In-process record list. Ids start at 1 and are never reused.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    records: BTreeMap<RecordId, Fields>,
    /// `None` once the id space is used up.
    next_id: Option<i64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: Some(1),
        }
    }

    /// Seeds storage with already-persisted records. Records without an id
    /// are assigned one after the highest seeded id.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        let mut storage = Self::new();
        let mut highest = 0;
        let mut pending = Vec::new();
        for record in records {
            match record.id {
                Some(id) => {
                    highest = highest.max(id.0);
                    storage.records.insert(id, data_fields(&record.fields));
                }
                None => pending.push(record.fields),
            }
        }
        storage.next_id = highest.checked_add(1);
        for fields in pending {
            storage.insert_new(&fields)?;
        }
        Ok(storage)
    }

    fn insert_new(&mut self, fields: &Fields) -> Result<RecordId> {
        let next = self.next_id
            .ok_or_else(|| Error::Storage("record id space exhausted".to_string()))?;
        self.next_id = next.checked_add(1);
        let id = RecordId(next);
        self.records.insert(id, data_fields(fields));
        Ok(id)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MemoryStorage {
    fn create(&mut self, fields: &Fields) -> Result<RecordId> {
        self.insert_new(fields)
    }

    fn update(&mut self, id: RecordId, changes: &Fields) -> Result<()> {
        let fields = self.records.get_mut(&id)
            .ok_or_else(|| Error::Storage(format!("no record with id {}", id)))?;
        fields.extend(data_fields(changes));
        Ok(())
    }

    fn delete(&mut self, id: RecordId) -> Result<()> {
        self.records.remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::Storage(format!("no record with id {}", id)))
    }

    fn list_all(&self) -> Result<Snapshot> {
        Ok(self.records.iter()
            .map(|(id, fields)| Record { id: Some(*id), fields: fields.clone() })
            .collect())
    }

    fn find(&self, id: RecordId) -> Result<Option<Record>> {
        Ok(self.records.get(&id).map(|fields| Record { id: Some(id), fields: fields.clone() }))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}
