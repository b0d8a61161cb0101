use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidationError;
use super::validator::{Checker, Fields, Record, Validate, ValidationOptions, closed_set, validate_object};

closed_set! {
    pub enum ChartType {
        Bar => "bar",
        Line => "line",
        Pie => "pie",
        Table => "table",
    }
}

/// Chart settings bound to the results of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    pub id: String,
    pub query_id: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Record>,
    pub created_at: String,
}

impl Validate for Visualization {
    const SHAPE: &'static str = "visualization";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            let id = fields.required::<String>(cx, "id");
            let body = read_body(fields, cx);
            let created_at = fields.required::<String>(cx, "createdAt");

            let (Some(id), Some(body), Some(created_at)) = (id, body, created_at) else {
                return None;
            };
            Some(body.into_visualization(id, created_at))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertVisualization {
    pub query_id: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Record>,
}

impl InsertVisualization {
    pub fn into_visualization(self, id: impl Into<String>, created_at: impl Into<String>) -> Visualization {
        Visualization {
            id: id.into(),
            query_id: self.query_id,
            chart_type: self.chart_type,
            title: self.title,
            x_axis: self.x_axis,
            y_axis: self.y_axis,
            config: self.config,
            created_at: created_at.into(),
        }
    }
}

impl From<Visualization> for InsertVisualization {
    fn from(visualization: Visualization) -> Self {
        Self {
            query_id: visualization.query_id,
            chart_type: visualization.chart_type,
            title: visualization.title,
            x_axis: visualization.x_axis,
            y_axis: visualization.y_axis,
            config: visualization.config,
        }
    }
}

impl Validate for InsertVisualization {
    const SHAPE: &'static str = "insert-visualization";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            fields.strip(&["id", "createdAt"]);
            read_body(fields, cx)
        })
    }
}

fn read_body(fields: &mut Fields<'_>, cx: &mut Checker<'_>) -> Option<InsertVisualization> {
    let query_id = fields.required(cx, "queryId");
    let chart_type = fields.required(cx, "type");
    let title = fields.optional(cx, "title");
    let x_axis = fields.optional(cx, "xAxis");
    let y_axis = fields.optional(cx, "yAxis");
    let config = fields.optional(cx, "config");

    let (Some(query_id), Some(chart_type), Some(title), Some(x_axis), Some(y_axis), Some(config)) =
        (query_id, chart_type, title, x_axis, y_axis, config)
    else {
        return None;
    };
    Some(InsertVisualization {
        query_id,
        chart_type,
        title,
        x_axis,
        y_axis,
        config,
    })
}
