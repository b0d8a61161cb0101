use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::error::ValidationError;
use super::validator::{Checker, Fields, Record, Validate, ValidationOptions, validate_object};

/// A SQL query run against a dataset, with its cached results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_language: Option<String>,
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Record>>,
    pub executed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<Number>,
    #[serde(default)]
    pub is_saved: bool,
}

impl Validate for Query {
    const SHAPE: &'static str = "query";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            let id = fields.required::<String>(cx, "id");
            let body = read_body(fields, cx);
            let executed_at = fields.required::<String>(cx, "executedAt");

            let (Some(id), Some(body), Some(executed_at)) = (id, body, executed_at) else {
                return None;
            };
            Some(body.into_query(id, executed_at))
        })
    }
}

/// A query as submitted for execution; `id` and `executedAt` are assigned
/// by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_language: Option<String>,
    pub dataset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Record>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<Number>,
    #[serde(default)]
    pub is_saved: bool,
}

impl InsertQuery {
    pub fn into_query(self, id: impl Into<String>, executed_at: impl Into<String>) -> Query {
        Query {
            id: id.into(),
            name: self.name,
            sql: self.sql,
            natural_language: self.natural_language,
            dataset_id: self.dataset_id,
            results: self.results,
            executed_at: executed_at.into(),
            execution_time_ms: self.execution_time_ms,
            is_saved: self.is_saved,
        }
    }
}

impl From<Query> for InsertQuery {
    fn from(query: Query) -> Self {
        Self {
            name: query.name,
            sql: query.sql,
            natural_language: query.natural_language,
            dataset_id: query.dataset_id,
            results: query.results,
            execution_time_ms: query.execution_time_ms,
            is_saved: query.is_saved,
        }
    }
}

impl Validate for InsertQuery {
    const SHAPE: &'static str = "insert-query";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            fields.strip(&["id", "executedAt"]);
            read_body(fields, cx)
        })
    }
}

fn read_body(fields: &mut Fields<'_>, cx: &mut Checker<'_>) -> Option<InsertQuery> {
    let name = fields.optional(cx, "name");
    let sql = fields.required(cx, "sql");
    let natural_language = fields.optional(cx, "naturalLanguage");
    let dataset_id = fields.required(cx, "datasetId");
    let results = fields.optional(cx, "results");
    let execution_time_ms = fields.optional(cx, "executionTimeMs");
    let is_saved = fields.with_default(cx, "isSaved", false);

    let (
        Some(name),
        Some(sql),
        Some(natural_language),
        Some(dataset_id),
        Some(results),
        Some(execution_time_ms),
        Some(is_saved),
    ) = (
        name,
        sql,
        natural_language,
        dataset_id,
        results,
        execution_time_ms,
        is_saved,
    )
    else {
        return None;
    };
    Some(InsertQuery {
        name,
        sql,
        natural_language,
        dataset_id,
        results,
        execution_time_ms,
        is_saved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::error::IssueKind;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "q-1",
            "name": "Top regions",
            "sql": "SELECT region, SUM(amount) FROM sales GROUP BY region",
            "naturalLanguage": "total sales per region",
            "datasetId": "ds-1",
            "results": [{ "region": "north", "sum": 40 }],
            "executedAt": "2024-01-04T10:05:00Z",
            "executionTimeMs": 12.75,
            "isSaved": true
        })
    }

    #[test]
    fn test_valid_query_round_trips() {
        let input = sample();
        let query = Query::validate(&input).unwrap();
        assert!(query.is_saved);
        assert_eq!(query.execution_time_ms.as_ref().and_then(Number::as_f64), Some(12.75));
        assert_eq!(serde_json::to_value(&query).unwrap(), input);
    }

    #[test]
    fn test_missing_sql() {
        let mut input = sample();
        input.as_object_mut().unwrap().remove("sql");
        let err = Query::validate(&input).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issue_at("sql").unwrap().kind, IssueKind::Required);
    }

    #[test]
    fn test_insert_defaults_is_saved() {
        let query = InsertQuery::validate(&json!({
            "sql": "SELECT 1",
            "datasetId": "ds-1"
        }))
        .unwrap();
        assert!(!query.is_saved);
        assert!(query.name.is_none());
        assert!(query.results.is_none());
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({ "sql": "SELECT 1", "datasetId": "ds-1", "isSaved": false })
        );
    }

    #[test]
    fn test_insert_strips_server_fields() {
        let query = InsertQuery::validate(&sample()).unwrap();
        let body = serde_json::to_value(&query).unwrap();
        assert!(body.get("id").is_none());
        assert!(body.get("executedAt").is_none());

        let full = query.into_query("q-9", "2024-03-01T00:00:00Z");
        assert_eq!(full.id, "q-9");
        assert_eq!(full.executed_at, "2024-03-01T00:00:00Z");
    }

    #[test]
    fn test_every_bad_field_is_reported() {
        let err = InsertQuery::validate(&json!({
            "name": null,
            "sql": 42,
            "results": [{ "ok": 1 }, 7],
            "isSaved": "yes"
        }))
        .unwrap_err();

        let paths: Vec<String> = err.issues.iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["name", "sql", "datasetId", "results[1]", "isSaved"]);
        assert_eq!(err.issue_at("isSaved").unwrap().message, "Expected boolean, received string");
    }

    #[test]
    fn test_serde_defaults_agree_with_validator() {
        let parsed: InsertQuery =
            serde_json::from_value(json!({ "sql": "SELECT 1", "datasetId": "ds-1" })).unwrap();
        let validated =
            InsertQuery::validate(&json!({ "sql": "SELECT 1", "datasetId": "ds-1" })).unwrap();
        assert_eq!(parsed, validated);
    }
}
