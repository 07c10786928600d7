//! Authentication Models
//! Mission: Define admin account and token data structures

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub created_at: String,
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (username)
    pub exp: usize,  // expiration timestamp
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: usize, // seconds until expiration
    pub username: String,
}

impl LoginResponse {
    pub fn bearer(token: String, expires_in: usize, username: String) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            username,
        }
    }
}
