//! Stateless HTTP request builder and response parser for the Matrix login
//! API.
//!
//! # Design
//! `MatrixClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! the core deterministic and free of I/O dependencies.
//!
//! Response bodies are parsed into a `serde_json::Value` tree and then
//! unmarshalled by tag. The default `parse_*` methods are strict — any kind
//! mismatch fails the call — while `parse_login_flows_lenient` returns a
//! best-effort value plus the recorded diagnostics.

use unjson::{Unmarshalled, Value};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{LoginFlows, LoginSession, MatrixError, PasswordLogin};

const LOGIN_PATH: &str = "/_matrix/client/r0/login";

/// Synchronous, stateless client for the Matrix login endpoints.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct MatrixClient {
    base_url: String,
}

impl MatrixClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_get_login_flows(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{LOGIN_PATH}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_password_login(&self, input: &PasswordLogin) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{LOGIN_PATH}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_login_flows(&self, response: HttpResponse) -> Result<LoginFlows, ApiError> {
        check_status(&response, 200)?;
        let doc = decode(&response.body)?;
        unjson::unmarshal_strict(&doc).map_err(ApiError::Mismatch)
    }

    /// Best-effort variant of [`parse_login_flows`](Self::parse_login_flows):
    /// mismatched or missing fields degrade to their fallback values, and
    /// the diagnostics are returned alongside the result instead of failing
    /// the call.
    pub fn parse_login_flows_lenient(
        &self,
        response: HttpResponse,
    ) -> Result<Unmarshalled<LoginFlows>, ApiError> {
        check_status(&response, 200)?;
        let doc = decode(&response.body)?;
        Ok(unjson::unmarshal(&doc))
    }

    pub fn parse_password_login(&self, response: HttpResponse) -> Result<LoginSession, ApiError> {
        check_status(&response, 200)?;
        let doc = decode(&response.body)?;
        unjson::unmarshal_strict(&doc).map_err(ApiError::Mismatch)
    }
}

fn decode(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::InvalidJson(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant. A 403
/// decodes its Matrix error body leniently — a malformed body still yields
/// `Forbidden`, with fallback values in place of the missing fields.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 403 {
        let matrix_error = match decode(&response.body) {
            Ok(doc) => unjson::unmarshal::<MatrixError>(&doc).into_value(),
            Err(_) => MatrixError::default(),
        };
        return Err(ApiError::Forbidden(matrix_error));
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MatrixClient {
        MatrixClient::new("http://localhost:8008")
    }

    #[test]
    fn build_get_login_flows_produces_correct_request() {
        let req = client().build_get_login_flows();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8008/_matrix/client/r0/login");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_password_login_produces_correct_request() {
        let input = PasswordLogin::new("alice", "wonderland");
        let req = client().build_password_login(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8008/_matrix/client/r0/login");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["type"], "m.login.password");
        assert_eq!(body["user"], "alice");
        assert_eq!(body["password"], "wonderland");
    }

    #[test]
    fn parse_login_flows_success() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"flows":[{"type":"m.login.password"},{"type":"m.login.token"}]}"#.to_string(),
        };
        let flows = client().parse_login_flows(response).unwrap();
        assert_eq!(flows.flows.len(), 2);
        assert_eq!(flows.flows[0].kind, "m.login.password");
        assert_eq!(flows.flows[1].kind, "m.login.token");
    }

    #[test]
    fn parse_login_flows_strict_rejects_wrong_shape() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"flows":"not an array"}"#.to_string(),
        };
        let err = client().parse_login_flows(response).unwrap_err();
        assert!(matches!(err, ApiError::Mismatch(_)));
    }

    #[test]
    fn parse_login_flows_lenient_degrades_with_diagnostics() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"flows":"not an array"}"#.to_string(),
        };
        let out = client().parse_login_flows_lenient(response).unwrap();
        assert!(out.value.flows.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].path, "$.flows");
    }

    #[test]
    fn parse_login_flows_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        let err = client().parse_login_flows(response).unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson(_)));
    }

    #[test]
    fn parse_password_login_success() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"user_id":"@alice:example.org","access_token":"syt_abc","home_server":"example.org","device_id":"GHTYAJCE"}"#.to_string(),
        };
        let session = client().parse_password_login(response).unwrap();
        assert_eq!(session.user_id, "@alice:example.org");
        assert_eq!(session.access_token, "syt_abc");
    }

    #[test]
    fn parse_password_login_forbidden_decodes_error_body() {
        let response = HttpResponse {
            status: 403,
            headers: Vec::new(),
            body: r#"{"errcode":"M_FORBIDDEN","error":"Invalid password"}"#.to_string(),
        };
        let err = client().parse_password_login(response).unwrap_err();
        match err {
            ApiError::Forbidden(e) => {
                assert_eq!(e.errcode, "M_FORBIDDEN");
                assert_eq!(e.message, "Invalid password");
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn forbidden_with_malformed_body_still_maps_to_forbidden() {
        let response = HttpResponse {
            status: 403,
            headers: Vec::new(),
            body: "<html>".to_string(),
        };
        let err = client().parse_password_login(response).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn unexpected_status_maps_to_http_error() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse_login_flows(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = MatrixClient::new("http://localhost:8008/");
        let req = client.build_get_login_flows();
        assert_eq!(req.path, "http://localhost:8008/_matrix/client/r0/login");
    }
}
