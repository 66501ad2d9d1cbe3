//! Expectation types and structures.
//!
//! An expectation document is the declarative rule-set for one dataset. On disk it
//! is a list of `{expectation_type, kwargs}` entries; in memory every recognized
//! entry becomes a typed [`Expectation`] variant, and unrecognized entries are kept
//! aside so callers can report them without evaluating them.

use crate::{QualityError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The five rule kinds understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationKind {
    /// Dataset column names, in order, equal an expected list
    ColumnsMatchOrderedList,
    /// Column has no null entries
    ValuesNotNull,
    /// Every non-null entry is coercible to a semantic type
    ValuesOfType,
    /// Every distinct entry belongs to an allowed set
    ValuesInSet,
    /// Column has no duplicate entries
    ValuesUnique,
}

impl ExpectationKind {
    /// All kinds, in declaration order.
    pub const ALL: [ExpectationKind; 5] = [
        ExpectationKind::ColumnsMatchOrderedList,
        ExpectationKind::ValuesNotNull,
        ExpectationKind::ValuesOfType,
        ExpectationKind::ValuesInSet,
        ExpectationKind::ValuesUnique,
    ];

    /// Looks up a kind by the `expectation_type` string used in documents.
    ///
    /// Returns `None` for types the engine does not know about.
    pub fn from_type_name(expectation_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name() == expectation_type)
    }

    /// The `expectation_type` string used in documents.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ColumnsMatchOrderedList => "expect_table_columns_to_match_ordered_list",
            Self::ValuesNotNull => "expect_column_values_to_not_be_null",
            Self::ValuesOfType => "expect_column_values_to_be_of_type",
            Self::ValuesInSet => "expect_column_values_to_be_in_set",
            Self::ValuesUnique => "expect_column_values_to_be_unique",
        }
    }

    /// Short name used in validation results.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnsMatchOrderedList => "columns_match_ordered_list",
            Self::ValuesNotNull => "values_not_null",
            Self::ValuesOfType => "values_of_type",
            Self::ValuesInSet => "values_in_set",
            Self::ValuesUnique => "values_unique",
        }
    }
}

impl fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic column types checked by `values_of_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SemanticType {
    /// Integer or floating point values
    #[serde(alias = "numeric")]
    Numeric,
    /// Textual values
    #[serde(alias = "string")]
    String,
    /// Calendar dates or timestamps
    #[serde(alias = "date")]
    Date,
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => f.write_str("NUMERIC"),
            Self::String => f.write_str("STRING"),
            Self::Date => f.write_str("DATE"),
        }
    }
}

/// A single declarative data-quality rule with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expectation {
    /// Column names must equal `column_list` exactly, in order
    ColumnsMatchOrderedList { column_list: Vec<String> },

    /// `column` must have no null entries
    ValuesNotNull { column: String },

    /// Every non-null entry of `column` must be coercible to `semantic_type`
    ValuesOfType {
        column: String,
        semantic_type: SemanticType,
    },

    /// Distinct entries of `column` must be a subset of `value_set`
    ///
    /// Allowed values are kept in canonical text form: strings as written,
    /// numbers and booleans as their display text.
    ValuesInSet {
        column: String,
        value_set: Vec<String>,
    },

    /// `column` must have no duplicate entries
    ValuesUnique { column: String },
}

impl Expectation {
    /// Returns the kind of this expectation.
    pub fn kind(&self) -> ExpectationKind {
        match self {
            Self::ColumnsMatchOrderedList { .. } => ExpectationKind::ColumnsMatchOrderedList,
            Self::ValuesNotNull { .. } => ExpectationKind::ValuesNotNull,
            Self::ValuesOfType { .. } => ExpectationKind::ValuesOfType,
            Self::ValuesInSet { .. } => ExpectationKind::ValuesInSet,
            Self::ValuesUnique { .. } => ExpectationKind::ValuesUnique,
        }
    }

    /// Returns the target column, or `None` for table-level expectations.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::ColumnsMatchOrderedList { .. } => None,
            Self::ValuesNotNull { column }
            | Self::ValuesOfType { column, .. }
            | Self::ValuesInSet { column, .. }
            | Self::ValuesUnique { column } => Some(column),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnsMatchOrderedList { column_list } => {
                write!(f, "{}([{}])", self.kind(), column_list.join(", "))
            }
            Self::ValuesOfType {
                column,
                semantic_type,
            } => write!(f, "{}({}, {})", self.kind(), column, semantic_type),
            Self::ValuesInSet { column, value_set } => {
                write!(f, "{}({}, {{{}}})", self.kind(), column, value_set.join(", "))
            }
            Self::ValuesNotNull { column } | Self::ValuesUnique { column } => {
                write!(f, "{}({})", self.kind(), column)
            }
        }
    }
}

/// One raw entry of an expectation document, as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationConfig {
    /// Rule identifier, e.g. `expect_column_values_to_be_unique`
    pub expectation_type: String,

    /// Rule parameters
    #[serde(default)]
    pub kwargs: Value,
}

/// Raw expectation document: `{"expectations": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectationDocument {
    /// Entries in declaration order
    pub expectations: Vec<ExpectationConfig>,
}

/// The resolved, ordered rule-set for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSuite {
    /// Recognized expectations in document order
    pub expectations: Vec<Expectation>,

    /// `expectation_type` values that were not recognized and will not be evaluated
    #[serde(default)]
    pub ignored: Vec<String>,
}

impl ExpectationSuite {
    /// Creates a suite from already-typed expectations.
    pub fn new(expectations: Vec<Expectation>) -> Self {
        Self {
            expectations,
            ignored: Vec::new(),
        }
    }

    /// Resolves a raw document into typed expectations.
    ///
    /// Unknown expectation types are skipped and recorded in `ignored`. A known
    /// type whose kwargs are missing or ill-typed makes the whole document invalid.
    pub fn from_document(document: ExpectationDocument) -> Result<Self> {
        let mut suite = Self::default();

        for config in document.expectations {
            match ExpectationKind::from_type_name(&config.expectation_type) {
                Some(kind) => suite.expectations.push(resolve(kind, &config)?),
                None => suite.ignored.push(config.expectation_type),
            }
        }

        Ok(suite)
    }

    /// Number of recognized expectations.
    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    /// Returns true if no expectation will be evaluated.
    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Iterates over recognized expectations in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Expectation> {
        self.expectations.iter()
    }
}

#[derive(Deserialize)]
struct ColumnListKwargs {
    column_list: Vec<String>,
}

#[derive(Deserialize)]
struct ColumnKwargs {
    column: String,
}

#[derive(Deserialize)]
struct TypeKwargs {
    column: String,
    #[serde(rename = "type_", alias = "type")]
    semantic_type: SemanticType,
}

#[derive(Deserialize)]
struct SetKwargs {
    column: String,
    value_set: Vec<Value>,
}

fn resolve(kind: ExpectationKind, config: &ExpectationConfig) -> Result<Expectation> {
    let kwargs = config.kwargs.clone();
    let invalid = |e: serde_json::Error| QualityError::invalid_kwargs(&config.expectation_type, e.to_string());

    let expectation = match kind {
        ExpectationKind::ColumnsMatchOrderedList => {
            let k: ColumnListKwargs = serde_json::from_value(kwargs).map_err(invalid)?;
            Expectation::ColumnsMatchOrderedList {
                column_list: k.column_list,
            }
        }
        ExpectationKind::ValuesNotNull => {
            let k: ColumnKwargs = serde_json::from_value(kwargs).map_err(invalid)?;
            Expectation::ValuesNotNull { column: k.column }
        }
        ExpectationKind::ValuesOfType => {
            let k: TypeKwargs = serde_json::from_value(kwargs).map_err(invalid)?;
            Expectation::ValuesOfType {
                column: k.column,
                semantic_type: k.semantic_type,
            }
        }
        ExpectationKind::ValuesInSet => {
            let k: SetKwargs = serde_json::from_value(kwargs).map_err(invalid)?;
            let value_set = k
                .value_set
                .iter()
                .map(canonical_text)
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    QualityError::invalid_kwargs(
                        &config.expectation_type,
                        "value_set entries must be strings, numbers or booleans",
                    )
                })?;
            Expectation::ValuesInSet {
                column: k.column,
                value_set,
            }
        }
        ExpectationKind::ValuesUnique => {
            let k: ColumnKwargs = serde_json::from_value(kwargs).map_err(invalid)?;
            Expectation::ValuesUnique { column: k.column }
        }
    };

    Ok(expectation)
}

/// Canonical text of a scalar JSON value.
///
/// Numbers go through `i64`/`f64` display so that `2023` and `100.0` render the
/// same way a loaded cell value does.
fn canonical_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i.to_string()),
            None => n.as_f64().map(|f| f.to_string()),
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
