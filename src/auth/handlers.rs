use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, RegisteredUser, TokenResponse},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::DbUser,
    },
    error::{AppError, AppResult, FieldViolation},
    state::AppState,
};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/protected-route", get(protected_route))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisteredUser>)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation(vec![FieldViolation {
            field: "email",
            message: "email must be a valid address".into(),
        }]));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::Validation(vec![FieldViolation {
            field: "password",
            message: "password must be at least 8 characters".into(),
        }]));
    }

    if payload.name.len() < 3 {
        warn!("name too short");
        return Err(AppError::Validation(vec![FieldViolation {
            field: "name",
            message: "name must be at least 3 characters".into(),
        }]));
    }

    // Ensure email is not taken
    if let Ok(Some(_)) = DbUser::find_by_email(&state.db, &payload.email).await {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::EmailTaken);
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err(AppError::Internal(e));
        }
    };

    let user = match DbUser::create(&state.db, &payload.name, &payload.email, &hash).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(AppError::Internal(e));
        }
    };

    info!(user_id = user.id, email = %payload.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            name: user.name,
            email: payload.email,
            role: user.role.parse().unwrap_or_default(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match DbUser::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(AppError::Internal(e));
        }
    };

    // a record without a stored hash can never log in; same failure as a
    // wrong password
    let ok = match user.password_hash.as_deref() {
        Some(hash) => match verify_password(&payload.password, hash) {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, "verify_password failed");
                return Err(AppError::Internal(e));
            }
        },
        None => false,
    };

    if !ok {
        warn!(email = %payload.email, user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys
        .sign(user.id, user.role.parse().unwrap_or_default())
        .map_err(AppError::Internal)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip_all)]
pub async fn protected_route(AuthUser(claims): AuthUser) -> String {
    format!(
        "This is a protected route. Hello, user {} ({})!",
        claims.sub,
        claims.role.as_str()
    )
}
