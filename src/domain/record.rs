// Sensor record domain model
use serde::Deserialize;
use serde_json::{Map, Value};

/// A single field of a sensor record. Missing stays missing; nothing is coerced to zero.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Numeric view of the field. Numeric text (as spreadsheets tend to emit) counts as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            FieldValue::Missing => None,
        }
    }

    /// Display text for labels and identifiers.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Number(n) => Some(format_number(*n)),
            FieldValue::Text(s) if s.trim().is_empty() => None,
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Missing => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Missing),
            Value::String(s) => FieldValue::Text(s),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => FieldValue::Missing,
        }
    }
}

/// Render 21.0 as "21" and 21.5 as "21.5".
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One reading event for one device, as an ordered column → value mapping.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct SensorRecord {
    fields: Vec<(String, FieldValue)>,
}

impl SensorRecord {
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    /// Value of a column, or `None` when this record does not carry the column at all.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(FieldValue::as_number)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(FieldValue::as_text)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl From<Map<String, Value>> for SensorRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
        }
    }
}

/// Records in arrival order. Not sorted by embedded timestamp unless sorted explicitly.
pub type RecordSet = Vec<SensorRecord>;

/// Ordered set of column names known across a record set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnCatalog {
    columns: Vec<String>,
}

impl ColumnCatalog {
    pub fn new(columns: Vec<String>) -> Self {
        let mut catalog = Self::default();
        for column in columns {
            catalog.push(column);
        }
        catalog
    }

    /// Union of every record's columns in first-seen order.
    pub fn from_records(records: &[SensorRecord]) -> Self {
        let mut catalog = Self::default();
        for column in records.iter().flat_map(SensorRecord::columns) {
            catalog.push(column.to_string());
        }
        catalog
    }

    fn push(&mut self, column: String) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}
