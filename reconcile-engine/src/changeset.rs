use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{Fields, RecordId};

/// Changed fields of one persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub id: RecordId,
    pub changes: Fields,
}

/// Minimal operations that bring storage in line with an edited set.
/// Each list keeps the order of the edited rows it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub to_delete: Vec<RecordId>,
    pub to_update: Vec<FieldUpdate>,
    pub to_create: Vec<Fields>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.to_delete.len() + self.to_update.len() + self.to_create.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field_count(&self) -> usize {
        self.to_update.iter().map(|u| u.changes.len()).sum::<usize>()
            + self.to_create.iter().map(|f| f.len()).sum::<usize>()
    }

    /// Operations in apply order: deletions, then updates, then creations.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        let deletes = self.to_delete.iter().map(|id| Operation::Delete { id: *id });
        let updates = self.to_update.iter()
            .map(|u| Operation::Update { id: u.id, changes: u.changes.clone() });
        let creates = self.to_create.iter().map(|f| Operation::Create { fields: f.clone() });
        deletes.chain(updates).chain(creates)
    }
}

/// Descriptor of a single storage operation, as reported on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Delete { id: RecordId },
    Update { id: RecordId, changes: Fields },
    Create { fields: Fields },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete { id } => write!(f, "delete {}", id),
            Operation::Update { id, changes } => {
                write!(f, "update {} (", id)?;
                write_fields(f, changes)?;
                f.write_str(")")
            }
            Operation::Create { fields } => {
                f.write_str("create (")?;
                write_fields(f, fields)?;
                f.write_str(")")
            }
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &Fields) -> fmt::Result {
    for (i, (name, value)) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}={}", name, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_operations_order() {
        let changes = ChangeSet {
            to_delete: vec![RecordId(4)],
            to_update: vec![FieldUpdate {
                id: RecordId(2),
                changes: Record::new().field("qty", 8).fields,
            }],
            to_create: vec![Record::new().field("name", "Gloves").fields],
        };
        let ops: Vec<String> = changes.operations().map(|op| op.to_string()).collect();
        assert_eq!(ops, vec!["delete 4", "update 2 (qty=8)", "create (name=Gloves)"]);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes.field_count(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(ChangeSet::new().is_empty());
        assert_eq!(ChangeSet::new().operations().count(), 0);
    }
}
