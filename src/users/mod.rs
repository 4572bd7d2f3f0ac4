pub mod db_store;
pub mod dto;
pub mod file_store;
pub mod handlers;
pub mod store;
pub mod validate;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
