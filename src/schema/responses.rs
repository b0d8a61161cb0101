//! Response bodies of the translate and execute endpoints. Never persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::error::ValidationError;
use super::validator::{Record, Validate, ValidationOptions, validate_object};

/// SQL generated from a natural-language question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateQueryResponse {
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Validate for TranslateQueryResponse {
    const SHAPE: &'static str = "translate-query-response";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            let sql = fields.required(cx, "sql");
            let explanation = fields.optional(cx, "explanation");

            let (Some(sql), Some(explanation)) = (sql, explanation) else {
                return None;
            };
            Some(TranslateQueryResponse { sql, explanation })
        })
    }
}

/// Rows returned by running a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteQueryResponse {
    pub results: Vec<Record>,
    pub columns: Vec<String>,
    pub row_count: Number,
    pub execution_time_ms: Number,
}

impl ExecuteQueryResponse {
    /// Builds a response whose `rowCount` is the number of rows given.
    pub fn from_rows(results: Vec<Record>, columns: Vec<String>, execution_time_ms: u64) -> Self {
        Self {
            row_count: Number::from(results.len() as u64),
            results,
            columns,
            execution_time_ms: Number::from(execution_time_ms),
        }
    }
}

impl Validate for ExecuteQueryResponse {
    const SHAPE: &'static str = "execute-query-response";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            let results = fields.required(cx, "results");
            let columns = fields.required(cx, "columns");
            let row_count = fields.required(cx, "rowCount");
            let execution_time_ms = fields.required(cx, "executionTimeMs");

            let (Some(results), Some(columns), Some(row_count), Some(execution_time_ms)) =
                (results, columns, row_count, execution_time_ms)
            else {
                return None;
            };
            Some(ExecuteQueryResponse {
                results,
                columns,
                row_count,
                execution_time_ms,
            })
        })
    }
}
