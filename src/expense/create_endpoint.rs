//! Defines the endpoint for creating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{AppState, Error};

use super::core::{CreateExpense, Expense, create_expense};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection holding the expense table.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating an expense, responds with the full created
/// record including the assigned ID.
///
/// When the request omits `date`, the handler assigns the current UTC date
/// rather than leaving the default to the database.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Json(payload): Json<CreateExpense>,
) -> Result<Json<Expense>, Error> {
    let date = payload
        .date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let expense = create_expense(&payload.description, payload.amount, date, &connection)
        .inspect_err(|error| tracing::error!("Could not create expense: {error}"))?;

    Ok(Json(expense))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        expense::{CreateExpense, get_expense},
        initialize_db,
    };

    use super::{CreateExpenseState, create_expense_endpoint};

    fn get_test_state() -> CreateExpenseState {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();

        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn echoes_submitted_fields_and_assigns_id() {
        let state = get_test_state();
        let payload = CreateExpense {
            description: "Coffee".to_owned(),
            amount: 4.5,
            date: Some(date!(2024 - 01 - 15)),
        };

        let Json(expense) = create_expense_endpoint(State(state.clone()), Json(payload))
            .await
            .expect("Could not create expense");

        assert!(expense.id > 0);
        assert_eq!(expense.description, "Coffee");
        assert_eq!(expense.amount, 4.5);
        assert_eq!(expense.date, date!(2024 - 01 - 15));
        assert_eq!(
            Ok(expense),
            get_expense(1, &state.db_connection.lock().unwrap())
        );
    }

    #[tokio::test]
    async fn missing_date_defaults_to_today() {
        let state = get_test_state();
        let payload = CreateExpense {
            description: "Coffee".to_owned(),
            amount: 4.5,
            date: None,
        };

        let Json(expense) = create_expense_endpoint(State(state), Json(payload))
            .await
            .expect("Could not create expense");

        assert_eq!(expense.date, OffsetDateTime::now_utc().date());
    }
}
