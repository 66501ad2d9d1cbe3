//! Dataset representation for validation.
//!
//! Datasets are columnar: an ordered list of named columns of equal length.
//! Column order is significant for ordered-column expectations.

use crate::ValidationError;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

/// A value in a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Null/missing value
    Null,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// RFC 3339 timestamp, kept as written
    Timestamp(String),
}

impl DataValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::String(_) => "string",
            DataValue::Int(_) => "int64",
            DataValue::Float(_) => "float64",
            DataValue::Bool(_) => "boolean",
            DataValue::Date(_) => "date",
            DataValue::Timestamp(_) => "timestamp",
        }
    }

    /// Canonical text used for set membership and diagnostics.
    ///
    /// Returns `None` for null.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            DataValue::Null => None,
            DataValue::String(s) => Some(s.clone()),
            DataValue::Int(i) => Some(i.to_string()),
            DataValue::Float(f) => Some(f.to_string()),
            DataValue::Bool(b) => Some(b.to_string()),
            DataValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            DataValue::Timestamp(ts) => Some(ts.clone()),
        }
    }

    /// Key used for duplicate detection.
    ///
    /// The key carries the value's type, so `Int(1)` and `String("1")` are
    /// distinct. Nulls all share one key.
    pub fn unique_key(&self) -> String {
        match self {
            DataValue::Null => "null".to_string(),
            other => format!(
                "{}:{}",
                other.type_name(),
                other.canonical_text().unwrap_or_default()
            ),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("NULL"),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<i64> for DataValue {
    fn from(i: i64) -> Self {
        DataValue::Int(i)
    }
}

impl From<f64> for DataValue {
    fn from(f: f64) -> Self {
        DataValue::Float(f)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl From<NaiveDate> for DataValue {
    fn from(d: NaiveDate) -> Self {
        DataValue::Date(d)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Null, Into::into)
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<DataValue>,
}

impl Column {
    /// Creates a new column.
    pub fn new(name: impl Into<String>, values: Vec<DataValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[DataValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of null entries.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

/// A dataset: ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    columns: Vec<Column>,
    row_count: usize,
}

impl DataSet {
    /// Creates a new empty dataset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a dataset from columns.
    ///
    /// # Errors
    ///
    /// Returns an error if two columns share a name or if column lengths differ.
    pub fn new(columns: Vec<Column>) -> Result<Self, ValidationError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ValidationError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != row_count {
                return Err(ValidationError::RaggedColumn {
                    column: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Creates a dataset from a header and row-major records.
    ///
    /// # Errors
    ///
    /// Returns an error if a record's width differs from the header or the
    /// header repeats a name.
    pub fn from_records(
        headers: Vec<String>,
        records: Vec<Vec<DataValue>>,
    ) -> Result<Self, ValidationError> {
        let mut values: Vec<Vec<DataValue>> = headers
            .iter()
            .map(|_| Vec::with_capacity(records.len()))
            .collect();

        for (row, record) in records.into_iter().enumerate() {
            if record.len() != headers.len() {
                return Err(ValidationError::RaggedColumn {
                    column: format!("row {}", row + 1),
                    expected: headers.len(),
                    actual: record.len(),
                });
            }
            for (column, value) in values.iter_mut().zip(record) {
                column.push(value);
            }
        }

        let columns = headers
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Self::new(columns)
    }

    /// Gets a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Returns the number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns true if the dataset has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
