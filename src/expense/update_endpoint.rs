//! Defines the endpoint for updating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{AppState, Error};

use super::core::{Expense, ExpenseId, UpdateExpense, update_expense};

/// The state needed to update an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseState {
    /// The database connection holding the expense table.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an expense, responds with the updated
/// record.
///
/// The description, amount, and date are replaced together in a single
/// statement. Responds with 404 when `expense_id` does not refer to an
/// expense.
pub async fn update_expense_endpoint(
    State(state): State<UpdateExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Json(payload): Json<UpdateExpense>,
) -> Result<Json<Expense>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let expense = update_expense(expense_id, &payload, &connection).inspect_err(|error| {
        if *error != Error::UpdateMissingExpense {
            tracing::error!("Could not update expense {expense_id}: {error}");
        }
    })?;

    Ok(Json(expense))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        expense::{UpdateExpense, create_expense, get_all_expenses},
        initialize_db,
    };

    use super::{UpdateExpenseState, update_expense_endpoint};

    fn get_test_state() -> UpdateExpenseState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        UpdateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn echoes_updated_fields() {
        let state = get_test_state();
        create_expense(
            "Coffee",
            4.5,
            date!(2024 - 01 - 01),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let payload = UpdateExpense {
            description: "Lunch".to_owned(),
            amount: 12.0,
            date: date!(2024 - 01 - 15),
        };
        let Json(expense) = update_expense_endpoint(State(state), Path(1), Json(payload))
            .await
            .expect("Could not update expense");

        assert_eq!(expense.id, 1);
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.amount, 12.0);
        assert_eq!(expense.date, date!(2024 - 01 - 15));
    }

    #[tokio::test]
    async fn missing_id_returns_error_and_mutates_nothing() {
        let state = get_test_state();
        let existing = create_expense(
            "Coffee",
            4.5,
            date!(2024 - 01 - 01),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let payload = UpdateExpense {
            description: "Lunch".to_owned(),
            amount: 12.0,
            date: date!(2024 - 01 - 15),
        };
        let result = update_expense_endpoint(State(state.clone()), Path(999), Json(payload)).await;

        assert_eq!(result.unwrap_err(), Error::UpdateMissingExpense);
        assert_eq!(
            get_all_expenses(&state.db_connection.lock().unwrap()).unwrap(),
            vec![existing]
        );
    }
}
