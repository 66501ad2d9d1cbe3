//! Builder pattern for creating expectation suites.
//!
//! This module provides an ergonomic builder for constructing suites in code
//! with a fluent API, in the same order a document would list them.

use crate::{Expectation, ExpectationSuite, SemanticType};

/// Builder for creating an `ExpectationSuite`.
///
/// # Example
///
/// ```rust
/// use quality_core::{ExpectationSuiteBuilder, SemanticType};
///
/// let suite = ExpectationSuiteBuilder::new()
///     .not_null("budget_id")
///     .in_set("department", ["Facilities", "Legal", "IT"])
///     .of_type("budget_amount", SemanticType::Numeric)
///     .build();
///
/// assert_eq!(suite.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ExpectationSuiteBuilder {
    expectations: Vec<Expectation>,
}

impl ExpectationSuiteBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the dataset columns to equal `columns`, in order.
    pub fn columns_match<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expectations.push(Expectation::ColumnsMatchOrderedList {
            column_list: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Requires `column` to have no nulls.
    pub fn not_null(mut self, column: impl Into<String>) -> Self {
        self.expectations.push(Expectation::ValuesNotNull {
            column: column.into(),
        });
        self
    }

    /// Requires every non-null value of `column` to be of `semantic_type`.
    pub fn of_type(mut self, column: impl Into<String>, semantic_type: SemanticType) -> Self {
        self.expectations.push(Expectation::ValuesOfType {
            column: column.into(),
            semantic_type,
        });
        self
    }

    /// Requires the values of `column` to come from `values`.
    pub fn in_set<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expectations.push(Expectation::ValuesInSet {
            column: column.into(),
            value_set: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Requires `column` to have no duplicates.
    pub fn unique(mut self, column: impl Into<String>) -> Self {
        self.expectations.push(Expectation::ValuesUnique {
            column: column.into(),
        });
        self
    }

    /// Adds an already-built expectation.
    pub fn expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Builds the suite.
    pub fn build(self) -> ExpectationSuite {
        ExpectationSuite::new(self.expectations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExpectationKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_preserves_order() {
        let suite = ExpectationSuiteBuilder::new()
            .unique("contract_id")
            .not_null("contract_id")
            .columns_match(["contract_id"])
            .build();

        let kinds: Vec<_> = suite.iter().map(Expectation::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ExpectationKind::ValuesUnique,
                ExpectationKind::ValuesNotNull,
                ExpectationKind::ColumnsMatchOrderedList,
            ]
        );
        assert!(suite.ignored.is_empty());
    }

    #[test]
    fn test_in_set_values() {
        let suite = ExpectationSuiteBuilder::new()
            .in_set("contract_status", ["executed", "sent"])
            .build();

        assert_eq!(
            suite.expectations[0],
            Expectation::ValuesInSet {
                column: "contract_status".to_string(),
                value_set: vec!["executed".to_string(), "sent".to_string()],
            }
        );
    }
}
