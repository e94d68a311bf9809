#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reconcile_engine::{EditedRow, Record, Snapshot};

pub fn generate_product(idx: usize) -> Record {
    let kinds = ["Drill", "Saw", "Hammer", "Wrench", "Gloves"];
    let aisles = ["A", "B", "C", "D"];

    Record::with_id(idx as i64 + 1)
        .field("name", format!("{} {}", kinds[idx % 5], idx))
        .field("quantity", (idx % 250) as i64)
        .field("aisle", aisles[idx % 4])
        .field("sku", format!("SKU-{:08}", idx))
        .field("discontinued", idx % 17 == 0)
}

pub fn create_snapshot(rows: usize) -> Snapshot {
    (0..rows).map(generate_product).collect()
}

/// Edits roughly `churn` of the rows: a third updated, a third deleted, and
/// as many new rows appended as were deleted.
pub fn create_edits(snapshot: &[Record], churn: f64, seed: u64) -> Vec<EditedRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edited = Vec::with_capacity(snapshot.len());
    let mut added = 0;

    for record in snapshot {
        let row = EditedRow::from(record);
        if !rng.gen_bool(churn) {
            edited.push(row);
            continue;
        }
        match rng.gen_range(0..3) {
            0 => edited.push(row.field("quantity", rng.gen_range(0..1000i64))),
            1 => {
                edited.push(row.deleted());
                added += 1;
            }
            _ => edited.push(row.field("aisle", "Z")),
        }
    }

    for i in 0..added {
        edited.push(EditedRow::new().field("name", format!("New item {}", i)).field("quantity", 1));
    }
    edited
}
