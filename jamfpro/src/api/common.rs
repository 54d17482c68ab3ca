//! Common types shared across Jamf Pro API endpoints

use serde::{Deserialize, Serialize};

/// Response body returned by create operations: the new object's ID
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Structured error body from the Jamf Pro API
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(rename = "httpStatus")]
    pub http_status: Option<u16>,
    #[serde(default)]
    pub errors: Vec<ApiErrorCause>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorCause {
    pub code: Option<String>,
    pub description: Option<String>,
    pub field: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("API error details: {causes:?}")]
pub struct ApiErrorDetails {
    pub causes: Vec<ApiErrorCause>,
}

/// A scoped object reference (device, group, building, ...) as the API
/// returns it inside scope/limitation/exclusion lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeEntity {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ScopeEntity {
    pub fn with_id(id: i64) -> Self {
        Self { id, name: None }
    }
}

/// Percent-encode a single path segment (object names may carry spaces and
/// shell-hostile characters)
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segment_encoding() {
        assert_eq!(encode_path_segment("Firefox 115.pkg"), "Firefox%20115.pkg");
        assert_eq!(encode_path_segment("plain"), "plain");
    }

    #[test]
    fn created_response_parses_jamf_body() {
        let body = r#"{"id": "212", "href": "https://example.jamfcloud.com/api/v1/packages/212"}"#;
        let parsed: CreatedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.id, "212");
        assert!(parsed.href.is_some());
    }

    #[test]
    fn error_response_parses_causes() {
        let body = r#"{"httpStatus": 400, "errors": [{"code": "INVALID_FIELD", "description": "is required", "field": "name"}]}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.http_status, Some(400));
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].field.as_deref(), Some("name"));
    }
}
