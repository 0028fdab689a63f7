//! Application router configuration for the expense store API.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, list_expenses_endpoint,
        update_expense_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Cross-origin requests are permitted from any origin so that a browser
/// client served from elsewhere can reach the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::EXPENSES_API,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .layer(CorsLayer::permissive())
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Respond with a JSON 404 for any route outside the API surface.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
        .into_response()
}
