//! The expense entity and the API endpoints for it.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod update_endpoint;

pub use core::{
    CreateExpense, DATE_FORMAT, Expense, ExpenseId, UpdateExpense, create_expense,
    delete_expense, get_all_expenses, get_expense, update_expense,
};
pub(crate) use core::create_expense_table;
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::{DeleteAcknowledgement, delete_expense_endpoint};
pub use list_endpoint::list_expenses_endpoint;
pub use update_endpoint::update_expense_endpoint;
