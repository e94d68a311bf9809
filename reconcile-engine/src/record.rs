use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Name of the storage-assigned identifier. Never a data field.
pub const ID_FIELD: &str = "id";
/// Name of the deletion flag on edited rows. Never a data field.
pub const DELETE_FLAG: &str = "delete";

pub(crate) fn is_reserved(name: &str) -> bool {
    name == ID_FIELD || name == DELETE_FLAG
}

/// Storage-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        RecordId(i64::from(id))
    }
}

pub type Fields = BTreeMap<String, Value>;

/// Copy of `fields` without the reserved `id`/`delete` names.
pub(crate) fn data_fields(fields: &Fields) -> Fields {
    fields.iter()
        .filter(|(name, _)| !is_reserved(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<RecordId>) -> Self {
        Self { id: Some(id.into()), fields: Fields::new() }
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// One row of an edited set: a record plus the user's deletion flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditedRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, rename = "delete", skip_serializing_if = "std::ops::Not::not")]
    pub marked_for_deletion: bool,
    #[serde(flatten)]
    pub fields: Fields,
}

impl EditedRow {
    /// A freshly added row with no id.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<RecordId>) -> Self {
        Self { id: Some(id.into()), ..Self::default() }
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn deleted(mut self) -> Self {
        self.marked_for_deletion = true;
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl From<&Record> for EditedRow {
    fn from(record: &Record) -> Self {
        Self { id: record.id, marked_for_deletion: false, fields: record.fields.clone() }
    }
}

impl From<Record> for EditedRow {
    fn from(record: Record) -> Self {
        Self { id: record.id, marked_for_deletion: false, fields: record.fields }
    }
}

/// Last-known persisted state of a collection.
pub type Snapshot = Vec<Record>;
/// The user's working copy of a snapshot.
pub type EditedSet = Vec<EditedRow>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edited_row_flat_json() {
        let row: EditedRow =
            serde_json::from_str(r#"{"id":1,"name":"Drill","qty":5,"delete":true}"#).unwrap();
        assert_eq!(row.id, Some(RecordId(1)));
        assert!(row.marked_for_deletion);
        assert_eq!(row.fields.len(), 2);
        assert_eq!(row.fields.get("qty"), Some(&Value::Int(5)));

        let row: EditedRow = serde_json::from_str(r#"{"name":"Gloves","qty":10}"#).unwrap();
        assert_eq!(row.id, None);
        assert!(!row.marked_for_deletion);
    }

    #[test]
    fn test_record_json_omits_missing_id() {
        let record = Record::new().field("name", "Gloves");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"name":"Gloves"}"#);

        let record = Record::with_id(3).field("name", "Gloves");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":3,"name":"Gloves"}"#);
    }

    #[test]
    fn test_data_fields_strips_reserved() {
        let mut fields = Fields::new();
        fields.insert("id".into(), Value::Int(9));
        fields.insert("delete".into(), Value::Bool(true));
        fields.insert("name".into(), Value::from("Drill"));
        let data = data_fields(&fields);
        assert_eq!(data.len(), 1);
        assert!(data.contains_key("name"));
    }
}
