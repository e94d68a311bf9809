use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::changeset::{ChangeSet, FieldUpdate};
use crate::error::{Error, Result};
use crate::record::{data_fields, EditedRow, Fields, Record, RecordId};
use crate::schema::Schema;

/// What to do when an edited row is invalid or references a missing record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Record the error against the row, emit nothing for it, keep going.
    #[default]
    CollectPerRow,
    /// Fail the whole reconciliation on the first bad row.
    AbortOnFirst,
}

/// A row that produced no operation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// Position in the edited set.
    pub row: usize,
    pub id: Option<RecordId>,
    #[serde(serialize_with = "serialize_display")]
    pub error: Error,
}

fn serialize_display<S: serde::Serializer>(error: &Error, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(error)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub changes: ChangeSet,
    pub rejected: Vec<RowError>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    schema: Schema,
    policy: ValidationPolicy,
}

impl Reconciler {
    pub fn new(schema: Schema) -> Self {
        Self { schema, policy: ValidationPolicy::default() }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Computes the operations that turn `snapshot` into `edited`. Performs no I/O.
    ///
    /// Duplicate or missing snapshot ids and duplicate edited ids are
    /// `InvalidState` regardless of policy. Row-level `Validation` and
    /// `NotFound` errors follow the configured [`ValidationPolicy`].
    pub fn reconcile(&self, snapshot: &[Record], edited: &[EditedRow]) -> Result<Reconciliation> {
        let base = index_snapshot(snapshot)?;
        check_unique_ids(edited)?;

        let mut out = Reconciliation::default();

        // One pass in edited order, so each list keeps that order and the
        // first bad row is the one reported under `AbortOnFirst`.
        for (idx, row) in edited.iter().enumerate() {
            match (row.marked_for_deletion, row.id) {
                (true, Some(id)) => out.changes.to_delete.push(id),
                // Never persisted, nothing to delete.
                (true, None) => {}
                (false, Some(id)) => {
                    let Some(original) = base.get(&id) else {
                        self.reject(&mut out, idx, Some(id), Error::NotFound { id })?;
                        continue;
                    };
                    let changes = diff_fields(&original.fields, &row.fields);
                    if changes.is_empty() {
                        continue;
                    }
                    match self.schema.validate_types(&changes) {
                        Ok(()) => out.changes.to_update.push(FieldUpdate { id, changes }),
                        Err(e) => self.reject(&mut out, idx, Some(id), e)?,
                    }
                }
                (false, None) => {
                    let fields = data_fields(&row.fields);
                    match self.schema.validate_new(&fields) {
                        Ok(()) => out.changes.to_create.push(fields),
                        Err(e) => self.reject(&mut out, idx, None, e)?,
                    }
                }
            }
        }

        tracing::debug!(
            deletes = out.changes.to_delete.len(),
            updates = out.changes.to_update.len(),
            creates = out.changes.to_create.len(),
            rejected = out.rejected.len(),
            "reconciled {} edited rows against {} snapshot records",
            edited.len(),
            snapshot.len()
        );
        Ok(out)
    }

    fn reject(&self, out: &mut Reconciliation, row: usize, id: Option<RecordId>, error: Error) -> Result<()> {
        match self.policy {
            ValidationPolicy::AbortOnFirst => Err(error),
            ValidationPolicy::CollectPerRow => {
                tracing::warn!(row, id = ?id, "rejected edited row: {}", error);
                out.rejected.push(RowError { row, id, error });
                Ok(())
            }
        }
    }
}

/// Fields of `edited` whose value differs from (or is absent in) `original`.
/// Reserved names are ignored. Fields only present in `original` are kept as-is.
pub fn diff_fields(original: &Fields, edited: &Fields) -> Fields {
    data_fields(edited)
        .into_iter()
        .filter(|(name, value)| original.get(name) != Some(value))
        .collect()
}

fn index_snapshot(snapshot: &[Record]) -> Result<HashMap<RecordId, &Record>> {
    let mut index = HashMap::with_capacity(snapshot.len());
    for (pos, record) in snapshot.iter().enumerate() {
        let id = record.id.ok_or_else(|| {
            Error::InvalidState(format!("snapshot record at position {} has no id", pos))
        })?;
        if index.insert(id, record).is_some() {
            return Err(Error::InvalidState(format!("duplicate id {} in snapshot", id)));
        }
    }
    Ok(index)
}

fn check_unique_ids(edited: &[EditedRow]) -> Result<()> {
    let mut seen = HashSet::with_capacity(edited.len());
    for id in edited.iter().filter_map(|row| row.id) {
        if !seen.insert(id) {
            return Err(Error::InvalidState(format!("duplicate id {} in edited set", id)));
        }
    }
    Ok(())
}
