use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidationError;
use super::validator::{Validate, ValidationOptions, validate_object};

/// A user account. `password` holds the stored representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
}

impl Validate for User {
    const SHAPE: &'static str = "user";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            let id = fields.required(cx, "id");
            let username = fields.required(cx, "username");
            let password = fields.required(cx, "password");

            let (Some(id), Some(username), Some(password)) = (id, username, password) else {
                return None;
            };
            Some(User { id, username, password })
        })
    }
}

/// Registration payload: only the credentials are taken from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertUser {
    pub username: String,
    pub password: String,
}

impl InsertUser {
    pub fn into_user(self, id: impl Into<String>) -> User {
        User {
            id: id.into(),
            username: self.username,
            password: self.password,
        }
    }
}

impl From<User> for InsertUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            password: user.password,
        }
    }
}

impl Validate for InsertUser {
    const SHAPE: &'static str = "insert-user";

    fn validate_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationError> {
        validate_object(Self::SHAPE, value, options, |fields, cx| {
            fields.strip(&["id"]);
            let username = fields.required(cx, "username");
            let password = fields.required(cx, "password");

            let (Some(username), Some(password)) = (username, password) else {
                return None;
            };
            Some(InsertUser { username, password })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_round_trips() {
        let input = json!({ "id": "u-1", "username": "ada", "password": "$argon2id$v=19$..." });
        let user = User::validate(&input).unwrap();
        assert_eq!(serde_json::to_value(&user).unwrap(), input);
    }

    #[test]
    fn test_insert_user_strips_id() {
        let input = json!({ "id": "u-1", "username": "ada", "password": "secret" });
        let insert = InsertUser::validate_with(&input, &ValidationOptions::rejecting_unknown_keys()).unwrap();
        assert_eq!(
            serde_json::to_value(&insert).unwrap(),
            json!({ "username": "ada", "password": "secret" })
        );
        assert_eq!(insert.into_user("u-2").id, "u-2");
    }

    #[test]
    fn test_insert_user_requires_credentials() {
        let err = InsertUser::validate(&json!({ "username": 7 })).unwrap_err();
        assert_eq!(err.shape, "insert-user");
        assert_eq!(err.issue_at("username").unwrap().message, "Expected string, received number");
        assert_eq!(err.issue_at("password").unwrap().message, "Required");
    }
}
