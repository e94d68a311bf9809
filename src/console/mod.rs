//! Inventory console: single-row commands and bulk edits, all saved through
//! the same reconcile → apply → re-read cycle.

pub mod render;

use anyhow::{bail, Context};
use reconcile_engine::{
    EditedRow, Fields, Inventory, Reconciler, RecordId, SaveOutcome, Snapshot, StoragePort, Value,
    WorkingCopy,
};

/// Parses `field=value` arguments. Integers and booleans are typed, the rest is text.
pub fn parse_assignments(args: &[String]) -> anyhow::Result<Fields> {
    let mut fields = Fields::new();
    for arg in args {
        let Some((name, raw)) = arg.split_once('=') else {
            bail!("expected field=value, got '{}'", arg);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("empty field name in '{}'", arg);
        }
        fields.insert(name.to_string(), Value::parse_loose(raw.trim()));
    }
    Ok(fields)
}

pub struct Console<S: StoragePort> {
    inventory: Inventory<S>,
}

impl<S: StoragePort> Console<S> {
    pub fn new(storage: S, reconciler: Reconciler) -> Self {
        Self { inventory: Inventory::new(storage, reconciler) }
    }

    pub fn snapshot(&self) -> anyhow::Result<Snapshot> {
        Ok(self.inventory.snapshot()?)
    }

    pub fn add(&mut self, fields: Fields) -> anyhow::Result<SaveOutcome> {
        let snapshot = self.snapshot()?;
        let mut copy = WorkingCopy::from_snapshot(&snapshot);
        copy.add(fields);
        self.save(&snapshot, copy.rows())
    }

    /// An unknown id is not an error here; it comes back in the outcome as a
    /// rejected row.
    pub fn set(&mut self, id: RecordId, fields: Fields) -> anyhow::Result<SaveOutcome> {
        let snapshot = self.snapshot()?;
        let mut copy = WorkingCopy::from_snapshot(&snapshot);
        if is_known(&snapshot, id) {
            copy.edit(id)?.set_all(fields);
        } else {
            copy.push(EditedRow { id: Some(id), marked_for_deletion: false, fields });
        }
        self.save(&snapshot, copy.rows())
    }

    pub fn remove(&mut self, id: RecordId) -> anyhow::Result<SaveOutcome> {
        let snapshot = self.snapshot()?;
        let mut copy = WorkingCopy::from_snapshot(&snapshot);
        if is_known(&snapshot, id) {
            copy.mark_for_deletion(id)?;
        } else {
            // Kept live so reconciliation rejects it instead of queueing a delete.
            copy.push(EditedRow::with_id(id));
        }
        self.save(&snapshot, copy.rows())
    }

    /// Adds one row per name when the inventory is empty. Returns `None` if
    /// there was already stock.
    pub fn seed(&mut self, names: &[String]) -> anyhow::Result<Option<SaveOutcome>> {
        let snapshot = self.snapshot()?;
        if !snapshot.is_empty() || names.is_empty() {
            return Ok(None);
        }
        let mut copy = WorkingCopy::from_snapshot(&snapshot);
        for name in names {
            copy.add(Fields::from([("name".to_string(), Value::from(name.as_str()))]));
        }
        self.save(&snapshot, copy.rows()).map(Some)
    }

    /// Saves a complete edited set, e.g. one loaded from a JSON file.
    pub fn save_edits(&mut self, edited: &[EditedRow]) -> anyhow::Result<SaveOutcome> {
        let snapshot = self.snapshot()?;
        self.save(&snapshot, edited)
    }

    fn save(&mut self, snapshot: &Snapshot, edited: &[EditedRow]) -> anyhow::Result<SaveOutcome> {
        let edited: Vec<EditedRow> = edited.iter().cloned().map(trim_text).collect();
        let outcome = self.inventory.save(snapshot, &edited).context("save rejected")?;
        tracing::info!(
            succeeded = outcome.report.succeeded,
            failed = outcome.report.failed(),
            rejected = outcome.rejected.len(),
            "save finished"
        );
        Ok(outcome)
    }
}

fn is_known(snapshot: &Snapshot, id: RecordId) -> bool {
    snapshot.iter().any(|record| record.id == Some(id))
}

/// Strips surrounding whitespace from every text field of a row.
fn trim_text(mut row: EditedRow) -> EditedRow {
    row.fields = row.fields.into_iter().map(|(name, value)| (name, value.trimmed())).collect();
    row
}
