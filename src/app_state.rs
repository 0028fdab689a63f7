//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the REST server.
///
/// Handlers take scoped views of this state via `FromRef`, so the database
/// handle is injected rather than reached for through a global.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection holding the expense table.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the expense
    /// table if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use super::AppState;

    #[test]
    fn new_initializes_the_expense_table() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection).expect("Could not create app state");

        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM expense", [], |row| row.get(0))
            .expect("expense table should exist");
        assert_eq!(count, 0);
    }
}
