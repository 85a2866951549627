use serde::Deserialize;
use serde_json::Value;

const UNKNOWN_ERROR: &str = "Unknown error";

/// An error body returned by either the Web API or the accounts service. The Web API wraps its errors in an object
/// (`{"error": {"status": 404, "message": "..."}}`), while the accounts service uses the OAuth form
/// (`{"error": "invalid_grant", "error_description": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorResponse {
    Api {
        error: ApiErrorObject,
    },
    Authentication {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiErrorObject {
    #[allow(dead_code)]
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl ErrorResponse {
    fn from_value(body: &Value) -> Option<Self> {
        Self::deserialize(body).ok()
    }

    /// The message for an error in a regular API response: `error.message` for the object form, `error` for the
    /// string form.
    pub fn api_message(body: Option<&Value>) -> String {
        match body.and_then(Self::from_value) {
            Some(ErrorResponse::Api {
                error: ApiErrorObject {
                    message: Some(message), ..
                },
            }) => message,
            Some(ErrorResponse::Authentication { error, .. }) => error,
            _ => UNKNOWN_ERROR.to_owned(),
        }
    }

    /// The message for an error in a token endpoint response: `error_description`, falling back to `error`.
    pub fn authentication_message(body: Option<&Value>) -> String {
        match body.and_then(Self::from_value) {
            Some(ErrorResponse::Authentication {
                error_description: Some(description),
                ..
            }) if !description.is_empty() => description,
            Some(ErrorResponse::Authentication { error, .. }) => error,
            Some(ErrorResponse::Api {
                error: ApiErrorObject {
                    message: Some(message), ..
                },
            }) => message,
            _ => UNKNOWN_ERROR.to_owned(),
        }
    }
}
