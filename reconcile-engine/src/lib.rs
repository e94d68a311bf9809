//! Reconciliation of edited record collections against persistent storage.
//!
//! A caller reads a [`Snapshot`] from a [`StoragePort`], lets the user edit a
//! copy of it, then saves in two explicit steps: [`Reconciler::reconcile`]
//! computes the minimal [`ChangeSet`] without touching storage, and [`apply`]
//! runs it against the port, collecting per-operation failures.
//!
//! # Example
//! ```rust
//! use reconcile_engine::{apply, EditedRow, MemoryStorage, Reconciler, Record, Schema, StoragePort};
//!
//! let mut storage = MemoryStorage::with_records(vec![
//!     Record::with_id(1).field("name", "Drill").field("quantity", 5),
//! ]).unwrap();
//! let snapshot = storage.list_all().unwrap();
//!
//! let edited = vec![
//!     EditedRow::from(&snapshot[0]).field("quantity", 8),
//!     EditedRow::new().field("name", "Work gloves").field("quantity", 10),
//! ];
//!
//! let reconciliation = Reconciler::new(Schema::inventory())
//!     .reconcile(&snapshot, &edited)
//!     .unwrap();
//! assert_eq!(reconciliation.changes.to_update.len(), 1);
//! assert_eq!(reconciliation.changes.to_create.len(), 1);
//!
//! let report = apply(reconciliation.changes, &mut storage);
//! assert!(report.is_clean());
//! assert_eq!(storage.len().unwrap(), 2);
//! ```

mod apply;
mod changeset;
mod error;
mod reconcile;
mod record;
mod schema;
mod session;
mod storage;
mod value;

pub use apply::{apply, ApplyFailure, ApplyReport};
pub use changeset::{ChangeSet, FieldUpdate, Operation};
pub use error::{Error, Result};
pub use reconcile::{diff_fields, Reconciler, Reconciliation, RowError, ValidationPolicy};
pub use record::{EditedRow, EditedSet, Fields, Record, RecordId, Snapshot, DELETE_FLAG, ID_FIELD};
pub use schema::{FieldType, Schema};
pub use session::{Inventory, RowEditor, SaveOutcome, WorkingCopy};
#[cfg(feature = "sqlite")]
pub use storage::SqliteStorage;
pub use storage::{MemoryStorage, StoragePort};
pub use value::Value;
