//! Database schema initialization.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, expense::create_expense_table};

/// Create the application's tables if they do not already exist.
///
/// # Errors
/// Returns an error if a table could not be created or the schema
/// transaction could not be committed.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_expense_table() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize database");

        connection
            .execute(
                "INSERT INTO expense (description, amount, date) VALUES ('Coffee', 4.5, '2024-01-15')",
                (),
            )
            .expect("expense table should accept inserts");
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialize failed");
        initialize(&connection).expect("second initialize failed");
    }
}
