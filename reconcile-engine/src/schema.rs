//! Caller-supplied column rules: which fields are required and what type each holds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Fields;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Integer,
    Boolean,
}

impl FieldType {
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldType::Text, Value::Text(_))
                | (FieldType::Integer, Value::Int(_))
                | (FieldType::Boolean, Value::Bool(_))
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub types: BTreeMap<String, FieldType>,
}

impl Schema {
    /// No required fields, no type rules.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Product rows of the inventory console: a non-empty `name` and an integer `quantity`.
    pub fn inventory() -> Self {
        Self::permissive()
            .require("name", FieldType::Text)
            .column("quantity", FieldType::Integer)
    }

    pub fn column(mut self, name: &str, ty: FieldType) -> Self {
        self.types.insert(name.to_string(), ty);
        self
    }

    pub fn require(mut self, name: &str, ty: FieldType) -> Self {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
        self.column(name, ty)
    }

    /// Checks a row about to be created: every required field present and
    /// non-blank, every typed field of the declared type.
    pub fn validate_new(&self, fields: &Fields) -> Result<()> {
        for name in &self.required {
            match fields.get(name) {
                None => return Err(Error::validation(name, "required field is missing")),
                Some(value) if value.is_blank() => {
                    return Err(Error::validation(name, "required field is empty"))
                }
                Some(_) => {}
            }
        }
        self.validate_types(fields)
    }

    /// Checks only the declared types, for partial field sets such as update diffs.
    pub fn validate_types(&self, fields: &Fields) -> Result<()> {
        for (name, value) in fields {
            if let Some(ty) = self.types.get(name) {
                if !ty.accepts(value) {
                    return Err(Error::validation(
                        name,
                        format!("expected {}, got {}", ty.name(), value.type_name()),
                    ));
                }
            }
        }
        Ok(())
    }
}
