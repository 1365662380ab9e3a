//! Response bodies, content negotiation and the `X-Operation` header.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Header naming the core operation a response came from.
pub const X_OPERATION: HeaderName = HeaderName::from_static("x-operation");

pub const MIME_JSON: &str = "application/json";
pub const MIME_YAML: &str = "application/x-yaml";
pub const MIME_TEXT: &str = "text/plain";

/// The six REST operations, as reported in `X-Operation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Status,
    BatchLookup,
    SingleLookup,
    Verify,
    Add,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Status => "Status",
            Operation::BatchLookup => "Batch-Lookup",
            Operation::SingleLookup => "Single-Lookup",
            Operation::Verify => "Verify",
            Operation::Add => "Add",
            Operation::Delete => "Delete",
        }
    }
}

/// Wire format negotiated from the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Negotiate from the request headers. An absent `Accept` means
    /// JSON; anything other than the two supported types is refused
    /// with the offending value.
    pub fn negotiate(headers: &HeaderMap) -> Result<Self, String> {
        match headers.get(header::ACCEPT) {
            None => Ok(Format::Json),
            Some(value) => match value.to_str().unwrap_or("") {
                MIME_JSON => Ok(Format::Json),
                MIME_YAML => Ok(Format::Yaml),
                other => Err(other.to_string()),
            },
        }
    }

    fn mime(self) -> &'static str {
        match self {
            Format::Json => MIME_JSON,
            Format::Yaml => MIME_YAML,
        }
    }
}

/// One lookup answer. A batch response is an array of these; a single
/// lookup is the one-element array.
#[derive(Debug, Serialize)]
pub struct LookupEntry {
    pub ip: String,
    pub valid: bool,
    pub cidrs: Vec<String>,
}

/// Body for verify/add/delete: `present` is the membership answer after
/// the operation completed.
#[derive(Debug, Serialize)]
pub struct VerifyBody {
    pub cidr: String,
    pub valid: bool,
    pub present: bool,
}

/// Body for the status operation.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

/// Serialize `body` in the negotiated format, tagged with the operation.
pub fn render<T: Serialize>(op: Operation, format: Format, body: &T) -> Response {
    let text: Result<String, String> = match format {
        Format::Json => serde_json::to_string(body)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::to_string(body)
            .map(|s| format!("---\n{}", s))
            .map_err(|e| e.to_string()),
    };

    match text {
        Ok(text) => with_operation(
            op,
            ([(header::CONTENT_TYPE, format.mime())], text).into_response(),
        ),
        Err(e) => {
            log::error!("response serialization failed: {}", e);
            plain(
                op,
                StatusCode::INTERNAL_SERVER_ERROR,
                "response serialization failed\n".to_string(),
            )
        }
    }
}

/// A plain-text response tagged with the operation.
pub fn plain(op: Operation, status: StatusCode, body: String) -> Response {
    with_operation(
        op,
        (status, [(header::CONTENT_TYPE, MIME_TEXT)], body).into_response(),
    )
}

/// The 400 for an `Accept` value we cannot produce.
pub fn unsupported_type(op: Operation, requested: &str) -> Response {
    let body = format!(
        "Unsupported content type: {}\n\nSupported types include:\n  - {}\n  - {}\n",
        requested, MIME_JSON, MIME_YAML
    );
    plain(op, StatusCode::BAD_REQUEST, body)
}

fn with_operation(op: Operation, mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(X_OPERATION, HeaderValue::from_static(op.as_str()));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_defaults_to_json() {
        assert_eq!(Format::negotiate(&HeaderMap::new()), Ok(Format::Json));
    }

    #[test]
    fn test_negotiate_exact_types() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, MIME_JSON.parse().unwrap());
        assert_eq!(Format::negotiate(&headers), Ok(Format::Json));

        headers.insert(header::ACCEPT, MIME_YAML.parse().unwrap());
        assert_eq!(Format::negotiate(&headers), Ok(Format::Yaml));
    }

    #[test]
    fn test_negotiate_refuses_everything_else() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "text/html".parse().unwrap());
        assert_eq!(Format::negotiate(&headers), Err("text/html".to_string()));
    }

    #[test]
    fn test_render_json_shape() {
        let body = vec![LookupEntry {
            ip: "10.1.2.3".to_string(),
            valid: true,
            cidrs: vec!["10.0.0.0/8".to_string()],
        }];
        let response = render(Operation::SingleLookup, Format::Json, &body);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(X_OPERATION).unwrap(),
            "Single-Lookup"
        );
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::BatchLookup.as_str(), "Batch-Lookup");
        assert_eq!(Operation::Status.as_str(), "Status");
        assert_eq!(Operation::Delete.as_str(), "Delete");
    }
}
