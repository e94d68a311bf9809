use crate::changeset::{ChangeSet, Operation};
use crate::error::Error;
use crate::record::Record;
use crate::storage::StoragePort;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyFailure {
    pub operation: Operation,
    pub error: Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub succeeded: usize,
    pub deleted: usize,
    pub updated: usize,
    /// Successfully created records, with their assigned ids.
    pub created: Vec<Record>,
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed()
    }

    fn fail(&mut self, operation: Operation, error: Error) {
        tracing::warn!("{} failed: {}", operation, error);
        self.failures.push(ApplyFailure { operation, error });
    }
}

/// Applies deletions, then updates, then creations, one storage call each.
///
/// Best effort: a failed operation is recorded and the rest still run.
/// Nothing is retried and nothing is rolled back.
pub fn apply<S: StoragePort + ?Sized>(changes: ChangeSet, storage: &mut S) -> ApplyReport {
    let mut report = ApplyReport::default();

    for id in changes.to_delete {
        match storage.delete(id) {
            Ok(()) => report.deleted += 1,
            Err(e) => report.fail(Operation::Delete { id }, e),
        }
    }

    for update in changes.to_update {
        match storage.update(update.id, &update.changes) {
            Ok(()) => report.updated += 1,
            Err(e) => report.fail(Operation::Update { id: update.id, changes: update.changes }, e),
        }
    }

    for fields in changes.to_create {
        match storage.create(&fields) {
            Ok(id) => report.created.push(Record { id: Some(id), fields }),
            Err(e) => report.fail(Operation::Create { fields }, e),
        }
    }

    report.succeeded = report.deleted + report.updated + report.created.len();
    tracing::debug!(
        succeeded = report.succeeded,
        failed = report.failed(),
        "applied change set"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::FieldUpdate;
    use crate::error::Result;
    use crate::record::{Fields, RecordId, Snapshot};
    use crate::storage::MemoryStorage;

    /// Records every call; refuses writes whose fields contain `"fail": true`.
    #[derive(Default)]
    struct JournalStorage {
        inner: MemoryStorage,
        calls: Vec<String>,
    }

    impl StoragePort for JournalStorage {
        fn create(&mut self, fields: &Fields) -> Result<RecordId> {
            self.calls.push("create".into());
            if fields.contains_key("fail") {
                return Err(Error::Storage("insert rejected".into()));
            }
            self.inner.create(fields)
        }

        fn update(&mut self, id: RecordId, changes: &Fields) -> Result<()> {
            self.calls.push(format!("update {}", id));
            self.inner.update(id, changes)
        }

        fn delete(&mut self, id: RecordId) -> Result<()> {
            self.calls.push(format!("delete {}", id));
            self.inner.delete(id)
        }

        fn list_all(&self) -> Result<Snapshot> {
            self.inner.list_all()
        }
    }

    #[test]
    fn test_apply_order_and_ids() {
        let mut storage = JournalStorage {
            inner: MemoryStorage::with_records(vec![
                Record::with_id(1).field("name", "Drill"),
                Record::with_id(2).field("name", "Saw"),
            ]).unwrap(),
            ..Default::default()
        };
        let changes = ChangeSet {
            to_delete: vec![RecordId(2)],
            to_update: vec![FieldUpdate { id: RecordId(1), changes: Record::new().field("qty", 3).fields }],
            to_create: vec![Record::new().field("name", "Gloves").fields],
        };

        let report = apply(changes, &mut storage);

        assert!(report.is_clean());
        assert_eq!(report.succeeded, 3);
        assert_eq!(storage.calls, vec!["delete 2", "update 1", "create"]);
        assert_eq!(report.created, vec![Record::with_id(3).field("name", "Gloves")]);
    }

    #[test]
    fn test_failures_do_not_abort() {
        let mut storage = JournalStorage::default();
        let changes = ChangeSet {
            to_delete: vec![RecordId(9)],
            to_update: vec![FieldUpdate { id: RecordId(8), changes: Record::new().field("qty", 1).fields }],
            to_create: vec![
                Record::new().field("name", "Bad").field("fail", true).fields,
                Record::new().field("name", "Good").fields,
            ],
        };

        let report = apply(changes, &mut storage);

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.attempted(), 4);
        assert_eq!(report.failures[0].operation, Operation::Delete { id: RecordId(9) });
        assert!(matches!(report.failures[2].error, Error::Storage(ref m) if m == "insert rejected"));
        assert_eq!(storage.inner.len().unwrap(), 1);
    }
}
