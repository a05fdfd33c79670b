//! Domain DTOs for the Matrix login endpoints.
//!
//! # Design
//! Request payloads derive serde `Serialize` and are encoded with
//! `serde_json::to_string`. Response types derive `unjson::Unmarshal`
//! instead of serde `Deserialize`: the server's responses are loosely
//! typed, and the engine's tag-driven walk lets the client decide per call
//! whether mismatches fail the parse or degrade to fallbacks.

use serde::Serialize;
use unjson::Unmarshal;

/// Discovery response for `GET /_matrix/client/r0/login`.
#[derive(Unmarshal, Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFlows {
    pub flows: Vec<LoginFlow>,
}

/// One advertised login flow.
#[derive(Unmarshal, Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFlow {
    /// Flow identifier, e.g. `m.login.password`. The JSON key is `type`,
    /// which is a Rust keyword, so it is bound with an explicit tag.
    #[json(tag = "type")]
    pub kind: String,
}

/// Request payload for `POST /_matrix/client/r0/login` with the password
/// flow.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordLogin {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: String,
    pub password: String,
}

impl PasswordLogin {
    pub fn new(user: &str, password: &str) -> Self {
        Self {
            kind: "m.login.password".to_string(),
            user: user.to_string(),
            password: password.to_string(),
        }
    }
}

/// Successful login response.
#[derive(Unmarshal, Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginSession {
    pub user_id: String,
    pub access_token: String,
    pub home_server: String,
    pub device_id: String,
}

/// Standard Matrix error body, e.g. `{"errcode":"M_FORBIDDEN","error":...}`.
#[derive(Unmarshal, Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixError {
    pub errcode: String,
    #[json(tag = "error")]
    pub message: String,
}
