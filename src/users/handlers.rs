use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

use super::db_store::DbStore;
use super::dto::{CreateUserRequest, UpdateUserRequest};
use super::store::{StoreError, User, UserStore};
use super::validate::{validate_create, validate_update};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/db-users", get(list_db_users))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", put(update_user))
        .route("/users/delete/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.store.list().await?;
    Ok(Json(users))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = validate_create(body)?;
    let created = state.store.create(user).await?;
    info!(id = created.id, "user created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let patch = validate_update(body)?;
    let merged = state.store.update(id, patch).await?;
    info!(id, "user updated");
    Ok(Json(merged))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    match state.store.delete(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(id)) => Err(AppError::MissingDeleteTarget(id)),
        Err(e) => {
            error!(error = %e, id, "delete failed");
            Err(e.into())
        }
    }
}

/// Always reads the database, whichever backend serves /users.
#[instrument(skip(state))]
pub async fn list_db_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = DbStore::new(state.db.clone()).list().await?;
    Ok(Json(users))
}
