//! The expense model, its table schema, and the queries over it.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// The database ID of an expense.
pub type ExpenseId = i64;

/// The calendar date format used on the wire and in form input.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A single financial record: what was spent, how much, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the store on creation.
    pub id: ExpenseId,

    /// A free-text label for the expense.
    pub description: String,

    /// The amount of money spent.
    pub amount: f64,

    /// The calendar date the expense is associated with.
    #[serde(with = "iso_date")]
    pub date: Date,
}

/// The request body for creating an expense.
///
/// `date` is optional; when absent the server assigns the current UTC date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpense {
    /// A free-text label for the expense.
    pub description: String,

    /// The amount of money spent.
    pub amount: f64,

    /// The calendar date the expense is associated with.
    #[serde(default, with = "iso_date::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
}

/// The request body for updating an expense.
///
/// All three mutable fields are replaced together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateExpense {
    /// A free-text label for the expense.
    pub description: String,

    /// The amount of money spent.
    pub amount: f64,

    /// The calendar date the expense is associated with.
    #[serde(with = "iso_date")]
    pub date: Date,
}

pub(crate) fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub(crate) fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;

    Ok(Expense {
        id,
        description,
        amount,
        date,
    })
}

/// Retrieve every expense, newest first.
///
/// Expenses are ordered by date descending; the ID breaks ties so that the
/// order is deterministic.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare("SELECT id, description, amount, date FROM expense ORDER BY date DESC, id DESC")?
        .query_map([], map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Retrieve an expense by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to an expense, or an
/// error if there is an SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare("SELECT id, description, amount, date FROM expense WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row_to_expense)
        .map_err(|error| error.into())
}

/// Create an expense in the database.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn create_expense(
    description: &str,
    amount: f64,
    date: Date,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (description, amount, date) VALUES (?1, ?2, ?3)",
        (description, amount, date),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        description: description.to_owned(),
        amount,
        date,
    })
}

/// Replace an expense's description, amount, and date in one statement.
///
/// # Errors
/// Returns [Error::UpdateMissingExpense] if `id` does not refer to an
/// expense, or an error if there is an SQL error.
pub fn update_expense(
    id: ExpenseId,
    update: &UpdateExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET description = ?1, amount = ?2, date = ?3 WHERE id = ?4",
        (&update.description, update.amount, update.date, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(Expense {
        id,
        description: update.description.clone(),
        amount: update.amount,
        date: update.date,
    })
}

/// Delete an expense from the database.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if `id` does not refer to an
/// expense, or an error if there is an SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_expense_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_expense_table(&connection));
    }
}


#[cfg(test)]
mod wire_format_tests {
    use time::macros::date;

    use super::{CreateExpense, Expense};

    #[test]
    fn expense_serializes_date_as_iso_calendar_date() {
        let expense = Expense {
            id: 1,
            description: "Coffee".to_owned(),
            amount: 4.5,
            date: date!(2024 - 01 - 15),
        };

        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "description": "Coffee",
                "amount": 4.5,
                "date": "2024-01-15",
            })
        );
    }

    #[test]
    fn create_expense_accepts_missing_date() {
        let payload: CreateExpense =
            serde_json::from_str(r#"{"description": "Coffee", "amount": 4.5}"#).unwrap();

        assert_eq!(payload.description, "Coffee");
        assert_eq!(payload.amount, 4.5);
        assert_eq!(payload.date, None);
    }

    #[test]
    fn create_expense_accepts_explicit_date() {
        let payload: CreateExpense = serde_json::from_str(
            r#"{"description": "Coffee", "amount": 4.5, "date": "2024-01-15"}"#,
        )
        .unwrap();

        assert_eq!(payload.date, Some(date!(2024 - 01 - 15)));
    }
}
