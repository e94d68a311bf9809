//! Plain-text views of a snapshot and of save results.

use std::collections::BTreeSet;
use std::fmt::Write;

use reconcile_engine::{Record, SaveOutcome};

const EMPTY_MESSAGE: &str = "Inventory is empty. Add the first product!";

/// Column-aligned table: `id` first, then `name` if any record has it, then
/// the remaining fields alphabetically.
pub fn table(snapshot: &[Record]) -> String {
    if snapshot.is_empty() {
        return format!("{}\n", EMPTY_MESSAGE);
    }

    let mut names: BTreeSet<&str> = snapshot.iter()
        .flat_map(|r| r.fields.keys().map(String::as_str))
        .collect();
    let mut columns = vec!["id"];
    if names.remove("name") {
        columns.push("name");
    }
    columns.extend(names);

    let rows: Vec<Vec<String>> = snapshot.iter()
        .map(|record| {
            columns.iter()
                .map(|col| match *col {
                    "id" => record.id.map(|id| id.to_string()).unwrap_or_default(),
                    _ => record.get(col).map(|v| v.to_string()).unwrap_or_default(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns.iter().enumerate()
        .map(|(i, col)| rows.iter().map(|r| r[i].chars().count()).fold(col.len(), usize::max))
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns.iter().zip(&widths)
        .map(|(col, w)| format!("{:<w$}", col, w = w))
        .collect();
    let _ = writeln!(out, "{}", header.join("  ").trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &rows {
        let cells: Vec<String> = row.iter().zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

/// Bullet list of product names, the export format.
pub fn listing(snapshot: &[Record]) -> String {
    if snapshot.is_empty() {
        return format!("{}\n", EMPTY_MESSAGE);
    }
    snapshot.iter()
        .map(|record| match record.get("name") {
            Some(name) => format!("* {}\n", name),
            None => format!("* #{}\n", record.id.map(|id| id.to_string()).unwrap_or_default()),
        })
        .collect()
}

/// One line per outcome: a summary, then each rejected row and failed operation.
pub fn outcome(outcome: &SaveOutcome) -> String {
    let report = &outcome.report;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "saved: {} deleted, {} updated, {} created",
        report.deleted,
        report.updated,
        report.created.len()
    );
    for record in &report.created {
        if let Some(id) = record.id {
            let name = record.get("name").map(|v| v.to_string()).unwrap_or_default();
            let _ = writeln!(out, "  added #{} {}", id, name);
        }
    }
    for rejected in &outcome.rejected {
        match rejected.id {
            Some(id) => {
                let _ = writeln!(out, "  row {} (#{}): {}", rejected.row + 1, id, rejected.error);
            }
            None => {
                let _ = writeln!(out, "  row {} (new): {}", rejected.row + 1, rejected.error);
            }
        }
    }
    for failure in &report.failures {
        let _ = writeln!(out, "  {}: {}", failure.operation, failure.error);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> Vec<Record> {
        vec![
            Record::with_id(1).field("name", "Drill").field("quantity", 5),
            Record::with_id(12).field("name", "M8 bolts").field("quantity", 200).field("aisle", "B"),
        ]
    }

    #[test]
    fn test_table_layout() {
        let text = table(&stock());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id  name      aisle  quantity");
        assert_eq!(lines[1], "--  --------  -----  --------");
        assert_eq!(lines[2], "1   Drill            5");
        assert_eq!(lines[3], "12  M8 bolts  B      200");
    }

    #[test]
    fn test_listing() {
        assert_eq!(listing(&stock()), "* Drill\n* M8 bolts\n");
        assert_eq!(listing(&[]), format!("{}\n", EMPTY_MESSAGE));
    }
}
