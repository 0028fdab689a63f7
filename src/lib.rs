//! Spendlog is a two-tier expense tracker: a REST API over a single SQLite
//! expense table, and a terminal client that drives the four CRUD
//! operations against it.
//!
//! The library provides the server's router and store layer along with the
//! client's state machine, so both binaries share the same wire types.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
pub mod client;
mod db;
pub mod endpoints;
pub mod expense;
mod routing;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the expense store.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested expense could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows. The
    /// client should check that the ID is correct and that the expense has
    /// been created.
    #[error("the requested expense could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist.
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist.
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::UpdateMissingExpense | Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Expense not found" })),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": error.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[tokio::test]
    async fn missing_expense_errors_map_to_404() {
        for error in [
            Error::NotFound,
            Error::UpdateMissingExpense,
            Error::DeleteMissingExpense,
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["error"], "Expense not found");
        }
    }

    #[tokio::test]
    async fn lock_error_maps_to_500_with_error_payload() {
        let response = Error::DatabaseLockError.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].is_string());
    }
}
