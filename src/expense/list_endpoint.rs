//! Defines the endpoint for listing all expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{AppState, Error, expense::core::get_all_expenses};

use super::core::Expense;

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection holding the expense table.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every expense, newest first.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let expenses = get_all_expenses(&connection)
        .inspect_err(|error| tracing::error!("Could not list expenses: {error}"))?;

    Ok(Json(expenses))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{expense::create_expense, initialize_db};

    use super::{ListExpensesState, list_expenses_endpoint};

    #[tokio::test]
    async fn lists_expenses_newest_first() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let older = create_expense("Groceries", 32.1, date!(2024 - 01 - 01), &connection).unwrap();
        let newer = create_expense("Coffee", 4.5, date!(2024 - 02 - 01), &connection).unwrap();
        let state = ListExpensesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let Json(expenses) = list_expenses_endpoint(State(state))
            .await
            .expect("Could not list expenses");

        assert_eq!(expenses, vec![newer, older]);
    }

    #[tokio::test]
    async fn lists_nothing_for_empty_table() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let state = ListExpensesState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let Json(expenses) = list_expenses_endpoint(State(state))
            .await
            .expect("Could not list expenses");

        assert_eq!(expenses, vec![]);
    }
}
