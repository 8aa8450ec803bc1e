//! Request and response bodies of the REST backend

use crate::auth::{AuthSession, Role, UserProfile};
use crate::state::FormData;
use serde::{Deserialize, Serialize};

/// Publication state of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
}

impl FormStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// A form as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub id: String,
    pub client_id: i64,
    pub title: String,
    #[serde(default)]
    pub data: FormData,
    #[serde(default)]
    pub status: FormStatus,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[cfg(test)]
impl FormRecord {
    pub fn fixture(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            client_id: 7,
            title: title.to_string(),
            data: FormData::default(),
            status: FormStatus::Draft,
            is_template: false,
            created_at: "2024-01-05T09:30:00".to_string(),
            updated_at: "2024-01-05T09:30:00".to_string(),
        }
    }
}

/// Body of `POST /api/forms`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateFormRequest {
    pub client_id: i64,
    pub title: String,
    pub data: FormData,
    pub status: FormStatus,
    pub is_template: bool,
}

impl CreateFormRequest {
    /// New forms always start as non-template drafts
    pub fn draft(client_id: i64, title: String, data: FormData) -> Self {
        Self {
            client_id,
            title,
            data,
            status: FormStatus::Draft,
            is_template: false,
        }
    }
}

/// Body of `PUT /api/forms/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateFormRequest {
    pub title: String,
    pub data: FormData,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body returned by `POST /api/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub role: Role,
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<TokenResponse> for AuthSession {
    fn from(response: TokenResponse) -> Self {
        AuthSession {
            token: response.access_token,
            user: UserProfile {
                id: response.user_id,
                email: response.email,
                name: response.name,
                role: response.role,
            },
        }
    }
}

/// Body returned by `GET /api/auth/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_request_shape() {
        let request = CreateFormRequest::draft(3, "Check-in".to_string(), FormData::default());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "client_id": 3,
                "title": "Check-in",
                "data": {"fields": []},
                "status": "draft",
                "is_template": false
            })
        );
    }

    #[test]
    fn test_update_request_shape() {
        let request = UpdateFormRequest {
            title: "Renamed".to_string(),
            data: FormData::default(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"title": "Renamed", "data": {"fields": []}})
        );
    }

    #[test]
    fn test_form_record_parses_backend_listing() {
        let value = json!({
            "id": "9b1d",
            "client_id": 4,
            "title": "Weekly Check-in",
            "data": {"fields": [{"id": "a", "type": "number", "label": "Weight", "required": true}]},
            "status": "published",
            "is_template": false,
            "created_at": "2024-01-05T09:30:00.123456",
            "updated_at": "2024-01-06T10:00:00"
        });
        let record: FormRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.status, FormStatus::Published);
        assert_eq!(record.data.fields.len(), 1);
        assert!(record.data.fields[0].required);
    }

    #[test]
    fn test_token_response_into_session() {
        let value = json!({
            "access_token": "tok",
            "token_type": "bearer",
            "role": "admin",
            "user_id": "1",
            "email": "a@b.c",
            "name": "Ada"
        });
        let response: TokenResponse = serde_json::from_value(value).unwrap();
        let session = AuthSession::from(response);
        assert_eq!(session.token, "tok");
        assert_eq!(session.user.role, Role::Admin);
        assert_eq!(session.user.name.as_deref(), Some("Ada"));
    }
}
