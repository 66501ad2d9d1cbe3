//! Parser for expectation documents and pipeline configuration.
//!
//! Expectation documents are read from JSON (the canonical encoding) or YAML and
//! resolved into a typed [`ExpectationSuite`]. Pipeline configuration is read
//! from TOML.
//!
//! # Example
//!
//! ```rust
//! use quality_parser::parse_json;
//!
//! let json = r#"
//! {
//!   "expectations": [
//!     {"expectation_type": "expect_column_values_to_be_unique",
//!      "kwargs": {"column": "contract_id"}}
//!   ]
//! }
//! "#;
//!
//! let suite = parse_json(json).expect("Failed to parse document");
//! assert_eq!(suite.len(), 1);
//! ```

use quality_core::{ExpectationDocument, ExpectationSuite, QualityError};
use std::path::Path;
use thiserror::Error;

mod config;
mod store;

pub use config::{parse_pipeline_config, parse_pipeline_toml};
pub use store::FileExpectationStore;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// Document parsed but could not be resolved into expectations
    #[error(transparent)]
    Document(#[from] QualityError),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

impl From<ParserError> for QualityError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::Document(inner) => inner,
            other => QualityError::invalid_document(other.to_string()),
        }
    }
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported expectation document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yml, .yaml)
    Yaml,
}

/// Parse an expectation document from a JSON string.
///
/// Unrecognized expectation types are kept in [`ExpectationSuite::ignored`];
/// a recognized type with bad kwargs fails the whole document.
pub fn parse_json(content: &str) -> Result<ExpectationSuite> {
    let document: ExpectationDocument = serde_json::from_str(content)?;
    Ok(ExpectationSuite::from_document(document)?)
}

/// Parse an expectation document from a YAML string.
///
/// # Example
///
/// ```rust
/// use quality_parser::parse_yaml;
///
/// let yaml = r#"
/// expectations:
///   - expectation_type: expect_column_values_to_not_be_null
///     kwargs:
///       column: budget_id
/// "#;
///
/// let suite = parse_yaml(yaml).unwrap();
/// assert_eq!(suite.len(), 1);
/// ```
pub fn parse_yaml(content: &str) -> Result<ExpectationSuite> {
    let document: ExpectationDocument = serde_yaml_ng::from_str(content)?;
    Ok(ExpectationSuite::from_document(document)?)
}

/// Detect the document format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.json` → `DocumentFormat::Json`
/// * `.yaml`, `.yml` → `DocumentFormat::Yaml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "json" => Ok(DocumentFormat::Json),
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse an expectation document from a file with automatic format detection.
///
/// ```no_run
/// use quality_parser::parse_file;
/// use std::path::Path;
///
/// let suite = parse_file(Path::new("expectations/bronze_contracts.json")).unwrap();
/// println!("Loaded {} expectations", suite.len());
/// ```
pub fn parse_file(path: &Path) -> Result<ExpectationSuite> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        DocumentFormat::Json => parse_json(&content),
        DocumentFormat::Yaml => parse_yaml(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quality_core::{Expectation, SemanticType};

    const CONTRACTS_JSON: &str = r#"
{
  "expectations": [
    {
      "expectation_type": "expect_table_columns_to_match_ordered_list",
      "kwargs": {
        "column_list": ["contract_id", "contract_name", "client_name", "start_date",
                        "end_date", "contract_value", "contract_status"]
      }
    },
    {"expectation_type": "expect_column_values_to_not_be_null", "kwargs": {"column": "contract_id"}},
    {"expectation_type": "expect_column_values_to_be_of_type",
     "kwargs": {"column": "contract_value", "type_": "NUMERIC"}},
    {"expectation_type": "expect_column_values_to_be_in_set",
     "kwargs": {"column": "contract_status",
                "value_set": ["executed", "sent", "draft", "approved", "pending"]}}
  ]
}
"#;

    #[test]
    fn test_parse_valid_json() {
        let suite = parse_json(CONTRACTS_JSON).expect("Failed to parse valid JSON");

        assert_eq!(suite.len(), 4);
        assert!(suite.ignored.is_empty());
        assert_eq!(
            suite.expectations[2],
            Expectation::ValuesOfType {
                column: "contract_value".to_string(),
                semantic_type: SemanticType::Numeric,
            }
        );
    }

    #[test]
    fn test_parse_json_with_meta_fields() {
        let json = r#"
{
  "expectation_suite_name": "bronze_contracts",
  "meta": {"great_expectations_version": "0.15.50"},
  "expectations": [
    {"expectation_type": "expect_column_values_to_be_unique",
     "kwargs": {"column": "budget_id"}, "meta": {}}
  ]
}
"#;
        let suite = parse_json(json).expect("Extra fields should be tolerated");
        assert_eq!(suite.len(), 1);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_json("{ \"expectations\": [ ");
        assert!(matches!(result, Err(ParserError::JsonError(_))));
    }

    #[test]
    fn test_parse_json_missing_expectations_key() {
        let result = parse_json("{}");
        assert!(matches!(result, Err(ParserError::JsonError(_))));
    }

    #[test]
    fn test_parse_json_bad_kwargs() {
        let json = r#"{"expectations": [
            {"expectation_type": "expect_column_values_to_be_in_set", "kwargs": {"column": "x"}}
        ]}"#;
        let result = parse_json(json);
        assert!(matches!(result, Err(ParserError::Document(_))));
    }

    #[test]
    fn test_parse_yaml_matches_json() {
        let yaml = r#"
expectations:
  - expectation_type: expect_table_columns_to_match_ordered_list
    kwargs:
      column_list: [contract_id, contract_name, client_name, start_date, end_date, contract_value, contract_status]
  - expectation_type: expect_column_values_to_not_be_null
    kwargs:
      column: contract_id
  - expectation_type: expect_column_values_to_be_of_type
    kwargs:
      column: contract_value
      type_: NUMERIC
  - expectation_type: expect_column_values_to_be_in_set
    kwargs:
      column: contract_status
      value_set: [executed, sent, draft, approved, pending]
"#;
        assert_eq!(parse_yaml(yaml).unwrap(), parse_json(CONTRACTS_JSON).unwrap());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("bronze_contracts.json")).unwrap(),
            DocumentFormat::Json
        );
        assert_eq!(
            detect_format(Path::new("suite.YML")).unwrap(),
            DocumentFormat::Yaml
        );
        assert!(matches!(
            detect_format(Path::new("suite.toml")),
            Err(ParserError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format(Path::new("suite")),
            Err(ParserError::InvalidExtension)
        ));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(ParserError::IoError(_))));
    }

    #[test]
    fn test_parser_error_into_quality_error() {
        let err: QualityError = parse_json("not json").unwrap_err().into();
        assert!(matches!(err, QualityError::InvalidDocument(_)));
    }
}
