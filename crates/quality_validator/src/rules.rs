//! Rule evaluators.
//!
//! One pure function per expectation kind. Each returns `Ok(())` when the
//! rule holds and a [`ValidationError`] describing the violation otherwise.
//! [`evaluate`] maps an [`Expectation`] to its evaluator.

use crate::{Column, DataSet, DataValue, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quality_core::{Expectation, SemanticType};
use std::collections::{BTreeSet, HashSet};

/// Evaluates one expectation against a dataset.
///
/// A column the expectation names but the dataset lacks is reported as
/// [`ValidationError::MissingColumn`].
pub fn evaluate(expectation: &Expectation, dataset: &DataSet) -> Result<(), ValidationError> {
    match expectation {
        Expectation::ColumnsMatchOrderedList { column_list } => {
            columns_match_ordered_list(dataset, column_list)
        }
        Expectation::ValuesNotNull { column } => values_not_null(lookup(dataset, column)?),
        Expectation::ValuesOfType {
            column,
            semantic_type,
        } => values_of_type(lookup(dataset, column)?, *semantic_type),
        Expectation::ValuesInSet { column, value_set } => {
            values_in_set(lookup(dataset, column)?, value_set)
        }
        Expectation::ValuesUnique { column } => values_unique(lookup(dataset, column)?),
    }
}

fn lookup<'a>(dataset: &'a DataSet, column: &str) -> Result<&'a Column, ValidationError> {
    dataset
        .column(column)
        .ok_or_else(|| ValidationError::missing_column(column))
}

/// Column names, in order, must equal `expected` exactly.
pub fn columns_match_ordered_list(
    dataset: &DataSet,
    expected: &[String],
) -> Result<(), ValidationError> {
    let actual = dataset.column_names();
    if actual.iter().copied().eq(expected.iter().map(String::as_str)) {
        return Ok(());
    }

    Err(ValidationError::ColumnMismatch {
        expected: expected.to_vec(),
        actual: actual.into_iter().map(str::to_string).collect(),
    })
}

/// The column must contain no nulls.
pub fn values_not_null(column: &Column) -> Result<(), ValidationError> {
    match column.null_count() {
        0 => Ok(()),
        count => Err(ValidationError::NullValues {
            column: column.name().to_string(),
            count,
        }),
    }
}

/// Every non-null value must be coercible to `semantic_type`.
///
/// Reports the first offending value.
pub fn values_of_type(column: &Column, semantic_type: SemanticType) -> Result<(), ValidationError> {
    let offending = column
        .values()
        .iter()
        .enumerate()
        .find(|(_, value)| !value.is_null() && !is_coercible(value, semantic_type));

    match offending {
        None => Ok(()),
        Some((index, value)) => Err(ValidationError::TypeMismatch {
            column: column.name().to_string(),
            expected: semantic_type,
            value: value.to_string(),
            row: index + 1,
        }),
    }
}

/// Returns true if a non-null value can be read as `semantic_type`.
pub fn is_coercible(value: &DataValue, semantic_type: SemanticType) -> bool {
    match semantic_type {
        SemanticType::Numeric => match value {
            DataValue::Int(_) | DataValue::Float(_) => true,
            DataValue::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => false,
        },
        SemanticType::String => matches!(
            value,
            DataValue::String(_) | DataValue::Date(_) | DataValue::Timestamp(_)
        ),
        SemanticType::Date => match value {
            DataValue::Date(_) | DataValue::Timestamp(_) => true,
            DataValue::String(s) => parse_date(s).is_some(),
            _ => false,
        },
    }
}

/// Parses a date in one of the accepted textual forms.
///
/// Accepted: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, RFC 3339 and `MM/DD/YYYY`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    NaiveDate::parse_from_str(text, "%m/%d/%Y").ok()
}

/// Distinct non-null values must all appear in `allowed`.
///
/// Comparison is on canonical text, exact and case-sensitive.
pub fn values_in_set(column: &Column, allowed: &[String]) -> Result<(), ValidationError> {
    let allowed: HashSet<&str> = allowed.iter().map(String::as_str).collect();

    let invalid: BTreeSet<String> = column
        .values()
        .iter()
        .filter_map(DataValue::canonical_text)
        .filter(|text| !allowed.contains(text.as_str()))
        .collect();

    if invalid.is_empty() {
        return Ok(());
    }

    Err(ValidationError::ValuesNotInSet {
        column: column.name().to_string(),
        values: invalid.into_iter().collect(),
    })
}

/// The column must have as many distinct values as rows. Nulls count as values.
pub fn values_unique(column: &Column) -> Result<(), ValidationError> {
    match duplicate_count(column) {
        0 => Ok(()),
        count => Err(ValidationError::DuplicateValues {
            column: column.name().to_string(),
            count,
        }),
    }
}

/// Row count minus distinct value count.
pub fn duplicate_count(column: &Column) -> usize {
    let distinct: HashSet<String> = column.values().iter().map(DataValue::unique_key).collect();
    column.len() - distinct.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| DataValue::from(*v)).collect())
    }

    fn dataset(names: &[&str]) -> DataSet {
        DataSet::new(names.iter().map(|n| Column::new(*n, vec![])).collect()).unwrap()
    }

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_columns_match_exact_order() {
        assert!(columns_match_ordered_list(&dataset(&["a", "b", "c"]), &list(&["a", "b", "c"])).is_ok());
    }

    #[test]
    fn test_columns_reordered_fails() {
        let err = columns_match_ordered_list(&dataset(&["a", "c", "b"]), &list(&["a", "b", "c"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Column mismatch. Expected: [a, b, c], Got: [a, c, b]");
    }

    #[test]
    fn test_columns_extra_or_missing_fails() {
        assert!(columns_match_ordered_list(&dataset(&["a", "b", "c", "d"]), &list(&["a", "b", "c"])).is_err());
        assert!(columns_match_ordered_list(&dataset(&["a", "b"]), &list(&["a", "b", "c"])).is_err());
    }

    #[test]
    fn test_empty_expected_list() {
        assert!(columns_match_ordered_list(&DataSet::empty(), &[]).is_ok());
        assert!(columns_match_ordered_list(&dataset(&["a"]), &[]).is_err());
    }

    #[test]
    fn test_not_null() {
        assert!(values_not_null(&strings("id", &["C001", "C002"])).is_ok());
        assert!(values_not_null(&Column::new("id", vec![])).is_ok());

        let column = Column::new("id", vec!["C001".into(), DataValue::Null, DataValue::Null]);
        match values_not_null(&column) {
            Err(ValidationError::NullValues { count, .. }) => assert_eq!(count, 2),
            other => panic!("expected NullValues, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_type() {
        let column = Column::new(
            "contract_value",
            vec![DataValue::Int(10), DataValue::Float(2.5), "30".into(), DataValue::Null],
        );
        assert!(values_of_type(&column, SemanticType::Numeric).is_ok());
    }

    #[test]
    fn test_numeric_type_rejects_text() {
        let column = strings("amount", &["10", "20", "x"]);
        match values_of_type(&column, SemanticType::Numeric) {
            Err(ValidationError::TypeMismatch { value, row, .. }) => {
                assert_eq!(value, "x");
                assert_eq!(row, 3);
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_type_rejects_bool() {
        let column = Column::new("flag", vec![DataValue::Bool(true)]);
        assert!(values_of_type(&column, SemanticType::Numeric).is_err());
    }

    #[test]
    fn test_string_type() {
        assert!(values_of_type(&strings("name", &["Acme", "Globex"]), SemanticType::String).is_ok());
        let column = Column::new("name", vec!["Acme".into(), DataValue::Int(5)]);
        assert!(values_of_type(&column, SemanticType::String).is_err());
    }

    #[test]
    fn test_date_type() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let column = Column::new(
            "start_date",
            vec![
                date.into(),
                "2024-01-15".into(),
                "2024-01-15 10:30:00".into(),
                "2024-01-15T10:30:00Z".into(),
                "01/15/2024".into(),
                DataValue::Null,
            ],
        );
        assert!(values_of_type(&column, SemanticType::Date).is_ok());
    }

    #[test]
    fn test_single_bad_date_fails_column() {
        let column = strings("end_date", &["2024-01-15", "2024-02-30"]);
        assert!(values_of_type(&column, SemanticType::Date).is_err());

        let column = Column::new("end_date", vec![DataValue::Int(20240115)]);
        assert!(values_of_type(&column, SemanticType::Date).is_err());
    }

    #[test]
    fn test_loaded_timestamps_are_textual_dates() {
        let data = "processed_at\n2024-03-09T10:30:00Z\n2024-03-10T08:00:00+01:00\n";
        let dataset = crate::read_csv_from_reader(data.as_bytes()).unwrap();
        let column = dataset.column("processed_at").unwrap();

        assert!(matches!(column.values()[0], DataValue::Timestamp(_)));
        assert!(values_of_type(column, SemanticType::String).is_ok());
        assert!(values_of_type(column, SemanticType::Date).is_ok());
        assert!(values_of_type(column, SemanticType::Numeric).is_err());
    }

    #[test]
    fn test_in_set() {
        let allowed = list(&["executed", "sent", "draft"]);
        assert!(values_in_set(&strings("status", &["sent", "draft", "sent"]), &allowed).is_ok());
        assert!(values_in_set(&Column::new("status", vec![]), &allowed).is_ok());
        assert!(values_in_set(&Column::new("status", vec![DataValue::Null]), &allowed).is_ok());
    }

    #[test]
    fn test_in_set_is_case_sensitive() {
        let allowed = list(&["executed", "sent"]);
        match values_in_set(&strings("status", &["Executed", "sent", "bogus", "bogus"]), &allowed) {
            Err(ValidationError::ValuesNotInSet { values, .. }) => {
                assert_eq!(values, list(&["Executed", "bogus"]));
            }
            other => panic!("expected ValuesNotInSet, got {:?}", other),
        }
    }

    #[test]
    fn test_in_set_numeric_values() {
        let column = Column::new("priority", vec![DataValue::Int(1), DataValue::Int(2)]);
        assert!(values_in_set(&column, &list(&["1", "2", "3"])).is_ok());
    }

    #[test]
    fn test_unique() {
        assert!(values_unique(&strings("id", &["C001", "C002"])).is_ok());
        assert!(values_unique(&Column::new("id", vec![])).is_ok());
    }

    #[test]
    fn test_unique_reports_n_minus_d() {
        let column = strings("id", &["a", "a", "a", "b", "c", "c"]);
        assert_eq!(duplicate_count(&column), 3);
        match values_unique(&column) {
            Err(ValidationError::DuplicateValues { count, .. }) => assert_eq!(count, 3),
            other => panic!("expected DuplicateValues, got {:?}", other),
        }
    }

    #[test]
    fn test_nulls_are_duplicates() {
        let column = Column::new("id", vec![DataValue::Null, DataValue::Null, "x".into()]);
        assert_eq!(duplicate_count(&column), 1);
    }

    #[test]
    fn test_evaluate_missing_column() {
        let expectation = Expectation::ValuesUnique {
            column: "budget_id".to_string(),
        };
        assert!(matches!(
            evaluate(&expectation, &dataset(&["contract_id"])),
            Err(ValidationError::MissingColumn(_))
        ));
    }
}
