use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResponse {
    pub fn ok() -> Self {
        AuthResponse {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: &str) -> Self {
        AuthResponse {
            success: false,
            error: Some(error.to_string()),
        }
    }
}
