//! Rows handed to the table renderer.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{TableError, value_kind};
use crate::markup::Markup;

/// A single cell: plain data, or a fragment the caller already rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Json(Value),
    Markup(Markup),
}

impl CellValue {
    pub const NULL: Self = Self::Json(Value::Null);

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Markup(_) => None,
        }
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Markup> for CellValue {
    fn from(markup: Markup) -> Self {
        Self::Markup(markup)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Json(Value::String(s.to_owned()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Json(Value::String(s))
    }
}

/// An ordered mapping from column name to cell value.
///
/// Column order is insertion order. Inserting an existing column replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    cells: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from any value that serializes to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, TableError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(TableError::NotAnObject {
                kind: value_kind(&other),
            }),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Builder form of [`Record::insert`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            cells: map
                .into_iter()
                .map(|(name, value)| (name, CellValue::Json(value)))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        zeta: u32,
        alpha: &'static str,
    }

    #[test]
    fn from_serialize_keeps_field_order() {
        let record = Record::from_serialize(&Row {
            zeta: 1,
            alpha: "a",
        })
        .unwrap();
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn from_serialize_rejects_non_objects() {
        let err = Record::from_serialize(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, TableError::NotAnObject { kind: "array" }));
    }

    #[test]
    fn insert_replaces_in_place() {
        let record = Record::new()
            .with("a", json!(1))
            .with("b", json!(2))
            .with("a", Markup::raw("<b>x</b>"));
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            record.get("a"),
            Some(&CellValue::Markup(Markup::raw("<b>x</b>")))
        );
    }

    #[test]
    fn json_map_order_is_preserved() {
        let Value::Object(map) = json!({ "z": 1, "m": 2, "a": 3 }) else {
            panic!("expected object");
        };
        let record = Record::from(map);
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["z", "m", "a"]);
    }
}
