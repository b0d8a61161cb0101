//! Data contracts shared by the API layer, the persistence layer and the frontend.
//!
//! Each entity has a full shape and an insert shape without the
//! server-assigned fields. Both validate from arbitrary JSON through
//! [`Validate`], and [`Shape`] looks them up by name.

pub mod dataset;
pub mod error;
pub mod query;
pub mod responses;
pub mod share;
pub mod user;
pub mod validator;
pub mod visualization;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

pub use dataset::{ColumnType, Dataset, DatasetColumn, DatasetType, InsertDataset};
pub use error::{FieldPath, Issue, IssueKind, PathSegment, ValidationError};
pub use query::{InsertQuery, Query};
pub use responses::{ExecuteQueryResponse, TranslateQueryResponse};
pub use share::{InsertShare, Share};
pub use user::{InsertUser, User};
pub use validator::{Record, UnknownKeys, Validate, ValidationOptions};
pub use visualization::{ChartType, InsertVisualization, Visualization};

/// Every validatable shape, addressable by its kebab-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    User,
    InsertUser,
    Dataset,
    InsertDataset,
    Query,
    InsertQuery,
    Visualization,
    InsertVisualization,
    Share,
    InsertShare,
    TranslateQueryResponse,
    ExecuteQueryResponse,
}

impl Shape {
    pub const ALL: [Shape; 12] = [
        Shape::User,
        Shape::InsertUser,
        Shape::Dataset,
        Shape::InsertDataset,
        Shape::Query,
        Shape::InsertQuery,
        Shape::Visualization,
        Shape::InsertVisualization,
        Shape::Share,
        Shape::InsertShare,
        Shape::TranslateQueryResponse,
        Shape::ExecuteQueryResponse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::User => User::SHAPE,
            Shape::InsertUser => InsertUser::SHAPE,
            Shape::Dataset => Dataset::SHAPE,
            Shape::InsertDataset => InsertDataset::SHAPE,
            Shape::Query => Query::SHAPE,
            Shape::InsertQuery => InsertQuery::SHAPE,
            Shape::Visualization => Visualization::SHAPE,
            Shape::InsertVisualization => InsertVisualization::SHAPE,
            Shape::Share => Share::SHAPE,
            Shape::InsertShare => InsertShare::SHAPE,
            Shape::TranslateQueryResponse => TranslateQueryResponse::SHAPE,
            Shape::ExecuteQueryResponse => ExecuteQueryResponse::SHAPE,
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|shape| shape.name()).collect()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.name() == name)
    }

    pub fn validate(self, value: &Value, options: &ValidationOptions) -> Result<Payload, ValidationError> {
        let result = match self {
            Shape::User => User::validate_with(value, options).map(Payload::User),
            Shape::InsertUser => InsertUser::validate_with(value, options).map(Payload::InsertUser),
            Shape::Dataset => Dataset::validate_with(value, options).map(Payload::Dataset),
            Shape::InsertDataset => InsertDataset::validate_with(value, options).map(Payload::InsertDataset),
            Shape::Query => Query::validate_with(value, options).map(Payload::Query),
            Shape::InsertQuery => InsertQuery::validate_with(value, options).map(Payload::InsertQuery),
            Shape::Visualization => {
                Visualization::validate_with(value, options).map(Payload::Visualization)
            }
            Shape::InsertVisualization => {
                InsertVisualization::validate_with(value, options).map(Payload::InsertVisualization)
            }
            Shape::Share => Share::validate_with(value, options).map(Payload::Share),
            Shape::InsertShare => InsertShare::validate_with(value, options).map(Payload::InsertShare),
            Shape::TranslateQueryResponse => {
                TranslateQueryResponse::validate_with(value, options).map(Payload::TranslateQueryResponse)
            }
            Shape::ExecuteQueryResponse => {
                ExecuteQueryResponse::validate_with(value, options).map(Payload::ExecuteQueryResponse)
            }
        };

        if let Err(e) = &result {
            debug!(shape = self.name(), issues = e.issues.len(), "payload rejected");
        }
        result
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated value of any shape. Serializes as the bare entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    User(User),
    InsertUser(InsertUser),
    Dataset(Dataset),
    InsertDataset(InsertDataset),
    Query(Query),
    InsertQuery(InsertQuery),
    Visualization(Visualization),
    InsertVisualization(InsertVisualization),
    Share(Share),
    InsertShare(InsertShare),
    TranslateQueryResponse(TranslateQueryResponse),
    ExecuteQueryResponse(ExecuteQueryResponse),
}
