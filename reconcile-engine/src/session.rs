use crate::apply::{apply, ApplyReport};
use crate::error::{Error, Result};
use crate::reconcile::{Reconciler, RowError};
use crate::record::{EditedRow, EditedSet, Fields, Record, RecordId, Snapshot};
use crate::storage::StoragePort;
use crate::value::Value;

/// An edited set under construction, seeded from a snapshot.
#[derive(Debug, Clone, Default)]
pub struct WorkingCopy {
    rows: EditedSet,
}

impl WorkingCopy {
    pub fn from_snapshot(snapshot: &[Record]) -> Self {
        Self { rows: snapshot.iter().map(EditedRow::from).collect() }
    }

    /// Appends a row that has not been persisted yet.
    pub fn add(&mut self, fields: Fields) -> &mut Self {
        self.rows.push(EditedRow { id: None, marked_for_deletion: false, fields });
        self
    }

    /// Appends a row as given, persisted or not. Its id is not checked here.
    pub fn push(&mut self, row: EditedRow) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn edit(&mut self, id: RecordId) -> Result<RowEditor<'_>> {
        let row = self.row_mut(id)?;
        Ok(RowEditor { row })
    }

    pub fn mark_for_deletion(&mut self, id: RecordId) -> Result<&mut Self> {
        self.row_mut(id)?.marked_for_deletion = true;
        Ok(self)
    }

    pub fn rows(&self) -> &[EditedRow] {
        &self.rows
    }

    pub fn into_rows(self) -> EditedSet {
        self.rows
    }

    fn row_mut(&mut self, id: RecordId) -> Result<&mut EditedRow> {
        self.rows.iter_mut()
            .find(|row| row.id == Some(id))
            .ok_or(Error::NotFound { id })
    }
}

pub struct RowEditor<'a> {
    row: &'a mut EditedRow,
}

impl<'a> RowEditor<'a> {
    pub fn set(self, name: &str, value: impl Into<Value>) -> Self {
        self.row.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn set_all(self, fields: Fields) -> Self {
        self.row.fields.extend(fields);
        self
    }
}

/// Result of one save cycle.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// Edited rows that produced no operation.
    pub rejected: Vec<RowError>,
    pub report: ApplyReport,
    /// Fresh snapshot read after applying; the basis of the next edit.
    pub snapshot: Snapshot,
}

impl SaveOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.report.is_clean()
    }
}

/// A record collection behind a storage port, edited in save cycles.
pub struct Inventory<S: StoragePort> {
    storage: S,
    reconciler: Reconciler,
}

impl<S: StoragePort> Inventory<S> {
    pub fn new(storage: S, reconciler: Reconciler) -> Self {
        Self { storage, reconciler }
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        self.storage.list_all()
    }

    pub fn working_copy(&self) -> Result<WorkingCopy> {
        Ok(WorkingCopy::from_snapshot(&self.snapshot()?))
    }

    pub fn find(&self, id: RecordId) -> Result<Option<Record>> {
        self.storage.find(id)
    }

    /// Reconciles `edited` against `snapshot`, applies the result and re-reads storage.
    ///
    /// Fails only when reconciliation itself fails (see [`Reconciler::reconcile`])
    /// or when the fresh snapshot cannot be read; individual storage failures
    /// land in the outcome's report.
    pub fn save(&mut self, snapshot: &[Record], edited: &[EditedRow]) -> Result<SaveOutcome> {
        let reconciliation = self.reconciler.reconcile(snapshot, edited)?;
        let report = apply(reconciliation.changes, &mut self.storage);
        let snapshot = self.storage.list_all()?;
        Ok(SaveOutcome { rejected: reconciliation.rejected, report, snapshot })
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
