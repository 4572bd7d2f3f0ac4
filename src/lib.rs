//! REST service for user records with interchangeable storage backends.
//!
//! Records live either in a JSON-array file on disk or in Postgres; the
//! backend is picked from configuration at startup and injected into the
//! handlers through [`state::AppState`]. Registration and login issue signed
//! bearer tokens verified by an extractor on protected routes.

pub mod app;
pub mod auth;
pub mod config;
pub mod demo;
pub mod error;
pub mod state;
pub mod users;

pub use app::build_app;
pub use error::AppError;
pub use state::AppState;
