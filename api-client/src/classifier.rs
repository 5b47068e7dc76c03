//! Classification of error responses by status code and payload.

use crate::response::ApiResponse;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Payload keys read from JSON error bodies
const PAYLOAD_KEYS: [&str; 3] = ["message", "code", "type"];

/// Category of an error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCategory {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    UnsupportedMediaType,
    TooManyRequests,
    ServerError,
    ServiceUnavailable,
    Unknown,
}

impl ErrorCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            415 => Self::UnsupportedMediaType,
            429 => Self::TooManyRequests,
            500 => Self::ServerError,
            503 => Self::ServiceUnavailable,
            _ => Self::Unknown,
        }
    }

    /// Human-readable explanation of the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request - The request was invalid or cannot be served",
            Self::Unauthorized => "Unauthorized - Authentication credentials are required",
            Self::Forbidden => {
                "Forbidden - The server understood the request but refuses to authorize it"
            }
            Self::NotFound => "Not Found - The requested resource could not be found",
            Self::MethodNotAllowed => {
                "Method Not Allowed - The method specified is not allowed for the resource"
            }
            Self::UnsupportedMediaType => {
                "Unsupported Media Type - The media format is not supported"
            }
            Self::TooManyRequests => "Too Many Requests - Rate limit exceeded",
            Self::ServerError => "Internal Server Error - Something went wrong on the server",
            Self::ServiceUnavailable => {
                "Service Unavailable - The server is temporarily unable to handle the request"
            }
            Self::Unknown => "Unknown error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Structured view of an error response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorClassification {
    pub status_code: u16,
    pub category: ErrorCategory,
    /// Recognized payload fields; `None` unless the body is JSON carrying at
    /// least one of them
    pub extracted_fields: Option<BTreeMap<String, Value>>,
}

/// Trait for error-response classification
pub trait ErrorClassifier: Send + Sync {
    /// Categorize a response and pull out its payload fields
    fn classify(&self, response: &ApiResponse) -> ErrorClassification;

    /// Whether the status code signals an error (400 and above)
    fn is_error(&self, response: &ApiResponse) -> bool;

    /// Payload fields plus `statusCode` and `statusLine`; never fails
    fn extract_fields(&self, response: &ApiResponse) -> BTreeMap<String, Value>;

    /// One-line summary suitable for assertion failures and logs
    fn error_message(&self, response: &ApiResponse) -> String;
}

/// Default implementation of error classifier
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifierImpl;

impl ErrorClassifierImpl {
    pub fn new() -> Self {
        Self
    }

    /// Read the recognized keys of a JSON body; anything unreadable is omitted
    fn payload_fields(&self, response: &ApiResponse) -> BTreeMap<String, Value> {
        let mut fields = BTreeMap::new();
        if !response.is_json() {
            return fields;
        }

        let Ok(Value::Object(object)) = serde_json::from_str::<Value>(&response.body) else {
            return fields;
        };

        for key in PAYLOAD_KEYS {
            match object.get(key) {
                Some(Value::Null) | None => {}
                Some(value) => {
                    fields.insert(key.to_string(), value.clone());
                }
            }
        }
        fields
    }
}

impl Default for ErrorClassifierImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorClassifier for ErrorClassifierImpl {
    fn classify(&self, response: &ApiResponse) -> ErrorClassification {
        let fields = self.payload_fields(response);
        ErrorClassification {
            status_code: response.status,
            category: ErrorCategory::from_status(response.status),
            extracted_fields: (!fields.is_empty()).then_some(fields),
        }
    }

    fn is_error(&self, response: &ApiResponse) -> bool {
        response.status >= 400
    }

    fn extract_fields(&self, response: &ApiResponse) -> BTreeMap<String, Value> {
        let mut fields = self.payload_fields(response);
        fields.insert("statusCode".to_string(), Value::from(response.status));
        fields.insert(
            "statusLine".to_string(),
            Value::from(response.status_line.clone()),
        );
        fields
    }

    fn error_message(&self, response: &ApiResponse) -> String {
        format!(
            "API Error - Status Code: {} ({}), Response: {}",
            response.status,
            ErrorCategory::from_status(response.status).description(),
            response.body
        )
    }
}
