use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidationError;
use super::validator::{Checker, Fields, Validate, ValidationOptions, validate_object};

fn default_public() -> bool {
    true
}

/// A tokenized link to a visualization.
///
/// Expiry is recorded, not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub id: String,
    pub visualization_id: String,
    pub share_token: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub created_at: String,
}

impl Validate for Share {
    const SHAPE: &'static str = "share";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            let id = fields.required(cx, "id");
            let visualization_id = fields.required(cx, "visualizationId");
            let share_token = fields.required(cx, "shareToken");
            let rest = read_settings(fields, cx);
            let created_at = fields.required(cx, "createdAt");

            let (Some(id), Some(visualization_id), Some(share_token), Some((is_public, expires_at)), Some(created_at)) =
                (id, visualization_id, share_token, rest, created_at)
            else {
                return None;
            };
            Some(Share {
                id,
                visualization_id,
                share_token,
                is_public,
                expires_at,
                created_at,
            })
        })
    }
}

/// A share as requested by a client; `id`, `createdAt` and the token are
/// assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertShare {
    pub visualization_id: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl InsertShare {
    pub fn into_share(
        self,
        id: impl Into<String>,
        share_token: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Share {
        Share {
            id: id.into(),
            visualization_id: self.visualization_id,
            share_token: share_token.into(),
            is_public: self.is_public,
            expires_at: self.expires_at,
            created_at: created_at.into(),
        }
    }
}

impl From<Share> for InsertShare {
    fn from(share: Share) -> Self {
        Self {
            visualization_id: share.visualization_id,
            is_public: share.is_public,
            expires_at: share.expires_at,
        }
    }
}

impl Validate for InsertShare {
    const SHAPE: &'static str = "insert-share";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            fields.strip(&["id", "createdAt", "shareToken"]);
            let visualization_id = fields.required(cx, "visualizationId");
            let settings = read_settings(fields, cx);

            let (Some(visualization_id), Some((is_public, expires_at))) = (visualization_id, settings) else {
                return None;
            };
            Some(InsertShare {
                visualization_id,
                is_public,
                expires_at,
            })
        })
    }
}

fn read_settings(fields: &mut Fields<'_>, cx: &mut Checker<'_>) -> Option<(bool, Option<String>)> {
    let is_public = fields.with_default(cx, "isPublic", default_public());
    let expires_at = fields.optional(cx, "expiresAt");
    Some((is_public?, expires_at?))
}
