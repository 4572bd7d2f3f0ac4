use serde::{Deserialize, Serialize};

use crate::users::store::Role;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public part of the registered user returned to the client.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}
