use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::error::{FieldPath, ValidationError};
use super::validator::{
    Checker, FieldValue, Fields, Record, Validate, ValidationOptions, closed_set, validate_object,
};

closed_set! {
    /// Format the dataset was uploaded in.
    pub enum DatasetType {
        Csv => "csv",
        Json => "json",
    }
}

closed_set! {
    pub enum ColumnType {
        String => "string",
        Number => "number",
        Boolean => "boolean",
        Date => "date",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl DatasetColumn {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

impl FieldValue for DatasetColumn {
    fn read(value: &Value, path: &FieldPath, cx: &mut Checker<'_>) -> Option<Self> {
        let mut fields = Fields::open(value, path.clone(), cx)?;
        let name = fields.required(cx, "name");
        let column_type = fields.required(cx, "type");
        fields.close(cx);

        let (Some(name), Some(column_type)) = (name, column_type) else {
            return None;
        };
        Some(Self { name, column_type })
    }
}

/// An uploaded CSV or JSON file, parsed into typed columns and row-records.
///
/// Row keys are not checked against `columns`, and `row_count` is not
/// checked against `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub dataset_type: DatasetType,
    pub columns: Vec<DatasetColumn>,
    pub data: Vec<Record>,
    pub row_count: Number,
    pub uploaded_at: String,
}

impl Dataset {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}

impl Validate for Dataset {
    const SHAPE: &'static str = "dataset";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            let id = fields.required::<String>(cx, "id");
            let body = read_body(fields, cx);
            let uploaded_at = fields.required::<String>(cx, "uploadedAt");

            let (Some(id), Some(body), Some(uploaded_at)) = (id, body, uploaded_at) else {
                return None;
            };
            Some(body.into_dataset(id, uploaded_at))
        })
    }
}

/// A dataset as submitted for creation; `id` and `uploadedAt` are assigned
/// by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertDataset {
    pub name: String,
    #[serde(rename = "type")]
    pub dataset_type: DatasetType,
    pub columns: Vec<DatasetColumn>,
    pub data: Vec<Record>,
    pub row_count: Number,
}

impl InsertDataset {
    pub fn into_dataset(self, id: impl Into<String>, uploaded_at: impl Into<String>) -> Dataset {
        Dataset {
            id: id.into(),
            name: self.name,
            dataset_type: self.dataset_type,
            columns: self.columns,
            data: self.data,
            row_count: self.row_count,
            uploaded_at: uploaded_at.into(),
        }
    }
}

impl From<Dataset> for InsertDataset {
    fn from(dataset: Dataset) -> Self {
        Self {
            name: dataset.name,
            dataset_type: dataset.dataset_type,
            columns: dataset.columns,
            data: dataset.data,
            row_count: dataset.row_count,
        }
    }
}

impl Validate for InsertDataset {
    const SHAPE: &'static str = "insert-dataset";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            fields.strip(&["id", "uploadedAt"]);
            read_body(fields, cx)
        })
    }
}

fn read_body(fields: &mut Fields<'_>, cx: &mut Checker<'_>) -> Option<InsertDataset> {
    let name = fields.required(cx, "name");
    let dataset_type = fields.required(cx, "type");
    let columns = fields.required(cx, "columns");
    let data = fields.required(cx, "data");
    let row_count = fields.required(cx, "rowCount");

    let (Some(name), Some(dataset_type), Some(columns), Some(data), Some(row_count)) =
        (name, dataset_type, columns, data, row_count)
    else {
        return None;
    };
    Some(InsertDataset {
        name,
        dataset_type,
        columns,
        data,
        row_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::error::IssueKind;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "ds-1",
            "name": "sales.csv",
            "type": "csv",
            "columns": [
                { "name": "region", "type": "string" },
                { "name": "amount", "type": "number" },
                { "name": "closed", "type": "boolean" },
                { "name": "day", "type": "date" }
            ],
            "data": [
                { "region": "north", "amount": 12.5, "closed": true, "day": "2024-01-02" },
                { "region": "south", "amount": 7, "closed": false, "day": "2024-01-03" }
            ],
            "rowCount": 2,
            "uploadedAt": "2024-01-04T10:00:00Z"
        })
    }

    #[test]
    fn test_valid_dataset_round_trips() {
        let input = sample();
        let dataset = Dataset::validate(&input).unwrap();
        assert_eq!(dataset.dataset_type, DatasetType::Csv);
        assert_eq!(dataset.columns[3].column_type, ColumnType::Date);
        assert_eq!(dataset.row_count.as_u64(), Some(2));
        assert_eq!(serde_json::to_value(&dataset).unwrap(), input);
    }

    #[test]
    fn test_column_type_outside_set() {
        let mut input = sample();
        input["columns"][1]["type"] = json!("float");

        let err = Dataset::validate(&input).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        let issue = err.issue_at("columns[1].type").unwrap();
        assert_eq!(
            issue.kind,
            IssueKind::InvalidEnumValue {
                options: vec!["string".into(), "number".into(), "boolean".into(), "date".into()],
                received: "float".into(),
            }
        );
    }

    #[test]
    fn test_dataset_type_outside_set() {
        let mut input = sample();
        input["type"] = json!("xml");
        let err = Dataset::validate(&input).unwrap_err();
        assert!(err.has_issue_at("type"));
    }

    #[test]
    fn test_rows_are_not_checked_against_columns() {
        let mut input = sample();
        input["data"] = json!([{ "unexpected": [1, 2, { "nested": null }] }]);
        input["rowCount"] = json!(99);
        assert!(Dataset::validate(&input).is_ok());
    }

    #[test]
    fn test_non_object_row() {
        let mut input = sample();
        input["data"] = json!([{ "a": 1 }, "row"]);
        let err = Dataset::validate(&input).unwrap_err();
        assert_eq!(err.issue_at("data[1]").unwrap().message, "Expected object, received string");
    }

    #[test]
    fn test_insert_strips_server_fields() {
        let insert = InsertDataset::validate(&sample()).unwrap();
        let body = serde_json::to_value(&insert).unwrap();
        assert!(body.get("id").is_none());
        assert!(body.get("uploadedAt").is_none());
        assert_eq!(body["name"], "sales.csv");

        let dataset = insert.into_dataset("ds-2", "2024-02-01T00:00:00Z");
        assert_eq!(dataset.id, "ds-2");
        assert_eq!(InsertDataset::from(dataset.clone()).name, dataset.name);
    }

    #[test]
    fn test_insert_requires_body_fields_only() {
        let err = InsertDataset::validate(&json!({})).unwrap_err();
        let paths: Vec<String> = err.issues.iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["name", "type", "columns", "data", "rowCount"]);
    }

    #[test]
    fn test_column_names_keep_declared_order() {
        let odd_name = "a\" VARCHAR); DROP TABLE x; --";
        let mut input = sample();
        input["columns"][0]["name"] = json!(odd_name);

        let dataset = Dataset::validate(&input).unwrap();
        assert_eq!(
            dataset.column_names().collect::<Vec<_>>(),
            vec![odd_name, "amount", "closed", "day"]
        );
        assert_eq!(dataset.columns[0], DatasetColumn::new(odd_name, ColumnType::String));
        assert_eq!(serde_json::to_value(&dataset).unwrap(), input);
    }
}
