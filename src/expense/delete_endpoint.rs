//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

use super::core::{ExpenseId, delete_expense};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection holding the expense table.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The success body for a delete request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAcknowledgement {
    /// A human-readable confirmation of the deletion.
    pub message: String,
}

/// A route handler for deleting an expense, responds with an
/// acknowledgment message.
///
/// The removal is permanent. Responds with 404 when `expense_id` does not
/// refer to an expense, including on a repeated delete of the same ID.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<DeleteAcknowledgement>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    delete_expense(expense_id, &connection).inspect_err(|error| {
        if *error != Error::DeleteMissingExpense {
            tracing::error!("Could not delete expense {expense_id}: {error}");
        }
    })?;

    Ok(Json(DeleteAcknowledgement {
        message: "Expense deleted successfully".to_owned(),
    }))
}
