use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const SERVER_NAME: &str = "mock.example.org";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginFlow {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginFlows {
    pub flows: Vec<LoginFlow>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub access_token: String,
    pub home_server: String,
    pub device_id: String,
}

#[derive(Serialize)]
struct ErrorBody {
    errcode: &'static str,
    error: &'static str,
}

/// Registered accounts, user localpart to password. The login endpoints
/// never mutate this, so a plain shared map suffices.
pub type Accounts = Arc<HashMap<String, String>>;

pub fn app(accounts: HashMap<String, String>) -> Router {
    let accounts: Accounts = Arc::new(accounts);
    Router::new()
        .route("/_matrix/client/r0/login", get(get_login).post(post_login))
        .with_state(accounts)
}

pub async fn run(
    listener: TcpListener,
    accounts: HashMap<String, String>,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(accounts)).await
}

async fn get_login() -> Json<LoginFlows> {
    Json(LoginFlows {
        flows: vec![
            LoginFlow {
                kind: "m.login.password".to_string(),
            },
            LoginFlow {
                kind: "m.login.token".to_string(),
            },
        ],
    })
}

async fn post_login(
    State(accounts): State<Accounts>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorBody>)> {
    if input.kind != "m.login.password" {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                errcode: "M_UNKNOWN",
                error: "Unsupported login type",
            }),
        ));
    }

    match accounts.get(&input.user) {
        Some(password) if *password == input.password => Ok(Json(LoginResponse {
            user_id: format!("@{}:{SERVER_NAME}", input.user),
            access_token: format!("syt_{}", Uuid::new_v4().simple()),
            home_server: SERVER_NAME.to_string(),
            device_id: Uuid::new_v4()
                .simple()
                .to_string()
                .get(..10)
                .unwrap_or_default()
                .to_uppercase(),
        })),
        _ => Err((
            StatusCode::FORBIDDEN,
            Json(ErrorBody {
                errcode: "M_FORBIDDEN",
                error: "Invalid password",
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_flow_serializes_with_type_key() {
        let flow = LoginFlow {
            kind: "m.login.password".to_string(),
        };
        let json = serde_json::to_value(&flow).unwrap();
        assert_eq!(json["type"], "m.login.password");
    }

    #[test]
    fn login_response_roundtrips_through_json() {
        let resp = LoginResponse {
            user_id: "@alice:mock.example.org".to_string(),
            access_token: "syt_abc".to_string(),
            home_server: SERVER_NAME.to_string(),
            device_id: "GHTYAJCE".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        let back: LoginResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_id, resp.user_id);
        assert_eq!(back.access_token, resp.access_token);
        assert_eq!(back.home_server, resp.home_server);
        assert_eq!(back.device_id, resp.device_id);
    }

    #[test]
    fn login_request_binds_the_type_key() {
        let input: LoginRequest = serde_json::from_str(
            r#"{"type":"m.login.password","user":"alice","password":"wonderland"}"#,
        )
        .unwrap();
        assert_eq!(input.kind, "m.login.password");
        assert_eq!(input.user, "alice");
    }

    #[test]
    fn login_request_rejects_missing_password() {
        let result: Result<LoginRequest, _> =
            serde_json::from_str(r#"{"type":"m.login.password","user":"alice"}"#);
        assert!(result.is_err());
    }
}
