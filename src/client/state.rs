//! The client's application state: the fetched expense list, the dialog
//! state machine gating each mutation, and the transient notices shown
//! after one completes.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::TableState;
use time::{Date, OffsetDateTime};

use crate::expense::{CreateExpense, DATE_FORMAT, Expense, ExpenseId, UpdateExpense};

use super::api::{ApiClient, ApiError};

/// How many event-loop ticks a notice stays on screen.
const NOTICE_TICKS: u8 = 15;

/// The input field currently focused in an add/edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The free-text description field.
    Description,
    /// The amount field.
    Amount,
    /// The calendar date field.
    Date,
}

/// The text being composed in an add or edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    /// The description input.
    pub description: String,
    /// The amount input, kept as text until submission.
    pub amount: String,
    /// The date input, kept as text until submission.
    pub date: String,
    /// The field that receives typed characters.
    pub focus: Field,
    /// An inline error from the last failed submission attempt.
    pub error: Option<String>,
}

/// The outcome of validating a form for submission.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    /// At least one required field is empty; submission is silently
    /// withheld and no request is issued.
    Incomplete,
    /// Every field is filled but one does not parse; the message is shown
    /// inline and no request is issued.
    Invalid(String),
    /// The form parsed cleanly and can be sent.
    Ready {
        /// The trimmed description.
        description: String,
        /// The parsed amount.
        amount: f64,
        /// The parsed date.
        date: Date,
    },
}

impl ExpenseForm {
    /// An empty form with the date prefilled with today's date.
    pub fn for_today() -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            date: OffsetDateTime::now_utc().date().to_string(),
            focus: Field::Description,
            error: None,
        }
    }

    /// A form seeded from an existing record's current values.
    pub fn prefilled(expense: &Expense) -> Self {
        Self {
            description: expense.description.clone(),
            amount: expense.amount.to_string(),
            date: expense.date.to_string(),
            focus: Field::Description,
            error: None,
        }
    }

    /// Validate the form.
    pub fn submission(&self) -> FormSubmission {
        let description = self.description.trim();
        let amount = self.amount.trim();
        let date = self.date.trim();

        if description.is_empty() || amount.is_empty() || date.is_empty() {
            return FormSubmission::Incomplete;
        }

        let amount: f64 = match amount.parse() {
            Ok(value) => value,
            Err(_) => return FormSubmission::Invalid(format!("Not a number: {amount}")),
        };

        let date = match Date::parse(date, DATE_FORMAT) {
            Ok(value) => value,
            Err(_) => {
                return FormSubmission::Invalid(format!("Dates look like 2024-01-15, got {date}"));
            }
        };

        FormSubmission::Ready {
            description: description.to_owned(),
            amount,
            date,
        }
    }

    /// The text of the focused field, for editing.
    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Description => &mut self.description,
            Field::Amount => &mut self.amount,
            Field::Date => &mut self.date,
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Description => Field::Amount,
            Field::Amount => Field::Date,
            Field::Date => Field::Description,
        };
    }

    fn focus_previous(&mut self) {
        self.focus = match self.focus {
            Field::Description => Field::Date,
            Field::Amount => Field::Description,
            Field::Date => Field::Amount,
        };
    }
}

/// The dialog currently gating input, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    /// No dialog; the table has focus.
    None,
    /// The add dialog is composing a new expense.
    Add {
        /// The form being composed.
        form: ExpenseForm,
    },
    /// The edit dialog is composing replacement values for an expense.
    Edit {
        /// The ID of the expense being edited.
        id: ExpenseId,
        /// The form being composed.
        form: ExpenseForm,
    },
    /// The delete confirmation names its target and waits for an explicit
    /// confirm.
    ConfirmDelete {
        /// The ID of the expense to delete.
        id: ExpenseId,
    },
}

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A mutation completed.
    Success,
    /// A request failed.
    Error,
}

/// A transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// The text to display.
    pub message: String,
    /// Whether the notice reports success or failure.
    pub kind: NoticeKind,
    ticks_left: u8,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Success,
            ticks_left: NOTICE_TICKS,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Error,
            ticks_left: NOTICE_TICKS,
        }
    }
}

/// The state of the expense tracker client.
///
/// The expense list is a derived copy of the store's contents: it is
/// rebuilt by [App::refresh] after every successful mutation, never
/// patched in place.
pub struct App {
    api: ApiClient,
    /// The most recently fetched expense list, newest first.
    pub expenses: Vec<Expense>,
    /// The table row selection.
    pub table: TableState,
    /// The dialog currently gating input.
    pub dialog: Dialog,
    /// The transient status-bar message, if one is showing.
    pub notice: Option<Notice>,
    /// Set when the user asks to exit.
    pub quit: bool,
}

impl App {
    /// Create a client that talks to the store through `api`.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            expenses: Vec::new(),
            table: TableState::default(),
            dialog: Dialog::None,
            notice: None,
            quit: false,
        }
    }

    /// Re-fetch the full expense list from the store.
    ///
    /// This is the sole reconciliation mechanism: every successful
    /// mutation ends here. A fetch failure leaves the stale list in place
    /// and surfaces an error notice.
    pub async fn refresh(&mut self) {
        match self.api.list_expenses().await {
            Ok(expenses) => {
                self.expenses = expenses;
                self.clamp_selection();
            }
            Err(error) => {
                self.notice = Some(Notice::error(format!("Could not fetch expenses: {error}")));
            }
        }
    }

    /// Advance notice expiry by one event-loop tick.
    pub fn tick(&mut self) {
        if let Some(notice) = &mut self.notice {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
            }
        }
    }

    /// The expense under the table cursor.
    pub fn selected_expense(&self) -> Option<&Expense> {
        let index = self.table.selected()?;
        self.expenses.get(index)
    }

    /// Dispatch a key event to whichever dialog (or the table) has focus.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if matches!(self.dialog, Dialog::None) {
            self.handle_browse_key(key).await;
        } else if matches!(self.dialog, Dialog::ConfirmDelete { .. }) {
            self.handle_confirm_key(key).await;
        } else {
            self.handle_form_key(key).await;
        }
    }

    async fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Char('a') => self.open_add(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit(),
            KeyCode::Char('d') | KeyCode::Delete => self.open_confirm_delete(),
            KeyCode::Char('r') => self.refresh().await,
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.dialog = Dialog::None,
            KeyCode::Enter => self.submit_form().await,
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.form_mut() {
                    form.focus_next();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.form_mut() {
                    form.focus_previous();
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.form_mut() {
                    form.focused_value_mut().push(c);
                    form.error = None;
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = self.form_mut() {
                    form.focused_value_mut().pop();
                    form.error = None;
                }
            }
            _ => {}
        }
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => self.dialog = Dialog::None,
            KeyCode::Enter | KeyCode::Char('y') => self.confirm_delete().await,
            _ => {}
        }
    }

    /// Open the add dialog with a blank form dated today.
    pub fn open_add(&mut self) {
        self.dialog = Dialog::Add {
            form: ExpenseForm::for_today(),
        };
    }

    /// Open the edit dialog seeded from the selected expense.
    ///
    /// Does nothing when no row is selected.
    pub fn open_edit(&mut self) {
        if let Some(expense) = self.selected_expense() {
            self.dialog = Dialog::Edit {
                id: expense.id,
                form: ExpenseForm::prefilled(expense),
            };
        }
    }

    /// Open the delete confirmation naming the selected expense.
    ///
    /// Does nothing when no row is selected. The delete request is only
    /// issued from the confirmation dialog, never directly.
    pub fn open_confirm_delete(&mut self) {
        if let Some(expense) = self.selected_expense() {
            self.dialog = Dialog::ConfirmDelete { id: expense.id };
        }
    }

    fn form_mut(&mut self) -> Option<&mut ExpenseForm> {
        match &mut self.dialog {
            Dialog::Add { form } | Dialog::Edit { form, .. } => Some(form),
            _ => None,
        }
    }

    // Awaiting the request here means a second submit cannot be dispatched
    // while one is in flight.
    async fn submit_form(&mut self) {
        let (target, submission) = match &self.dialog {
            Dialog::Add { form } => (None, form.submission()),
            Dialog::Edit { id, form } => (Some(*id), form.submission()),
            _ => return,
        };

        let (description, amount, date) = match submission {
            FormSubmission::Incomplete => return,
            FormSubmission::Invalid(message) => {
                if let Some(form) = self.form_mut() {
                    form.error = Some(message);
                }
                return;
            }
            FormSubmission::Ready {
                description,
                amount,
                date,
            } => (description, amount, date),
        };

        let result = match target {
            None => {
                let payload = CreateExpense {
                    description,
                    amount,
                    date: Some(date),
                };
                self.api
                    .create_expense(&payload)
                    .await
                    .map(|_| "Expense added")
            }
            Some(id) => {
                let payload = UpdateExpense {
                    description,
                    amount,
                    date,
                };
                self.api
                    .update_expense(id, &payload)
                    .await
                    .map(|_| "Expense updated")
            }
        };

        match result {
            Ok(message) => {
                self.dialog = Dialog::None;
                self.notice = Some(Notice::success(message));
                self.refresh().await;
            }
            // The dialog stays open so the user can retry.
            Err(error) => {
                let message = error.to_string();
                if let Some(form) = self.form_mut() {
                    form.error = Some(message);
                }
            }
        }
    }

    async fn confirm_delete(&mut self) {
        let id = match &self.dialog {
            Dialog::ConfirmDelete { id } => *id,
            _ => return,
        };

        match self.api.delete_expense(id).await {
            Ok(()) => {
                self.dialog = Dialog::None;
                self.notice = Some(Notice::success("Expense deleted"));
                self.refresh().await;
            }
            // Already gone on the server; realign with the store instead
            // of offering a retry that can never succeed.
            Err(error @ ApiError::NotFound) => {
                self.dialog = Dialog::None;
                self.notice = Some(Notice::error(format!("Delete failed: {error}")));
                self.refresh().await;
            }
            Err(error) => {
                self.notice = Some(Notice::error(format!("Delete failed: {error}")));
            }
        }
    }

    /// Move the table selection by `delta` rows, wrapping at either end.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.expenses.len();
        if len == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.table.select(Some(next));
    }

    fn clamp_selection(&mut self) {
        let len = self.expenses.len();
        match (len, self.table.selected()) {
            (0, _) => self.table.select(None),
            (n, Some(i)) if i >= n => self.table.select(Some(n - 1)),
            (_, None) => self.table.select(Some(0)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod form_submission_tests {
    use time::macros::date;

    use super::{ExpenseForm, Field, FormSubmission};

    fn filled_form() -> ExpenseForm {
        ExpenseForm {
            description: "Coffee".to_owned(),
            amount: "4.5".to_owned(),
            date: "2024-01-15".to_owned(),
            focus: Field::Description,
            error: None,
        }
    }

    #[test]
    fn complete_form_is_ready() {
        let submission = filled_form().submission();

        assert_eq!(
            submission,
            FormSubmission::Ready {
                description: "Coffee".to_owned(),
                amount: 4.5,
                date: date!(2024 - 01 - 15),
            }
        );
    }

    #[test]
    fn empty_description_is_incomplete() {
        let mut form = filled_form();
        form.description = "".to_owned();

        assert_eq!(form.submission(), FormSubmission::Incomplete);
    }

    #[test]
    fn empty_amount_is_incomplete() {
        let mut form = filled_form();
        form.amount = "".to_owned();

        assert_eq!(form.submission(), FormSubmission::Incomplete);
    }

    #[test]
    fn empty_date_is_incomplete() {
        let mut form = filled_form();
        form.date = "   ".to_owned();

        assert_eq!(form.submission(), FormSubmission::Incomplete);
    }

    #[test]
    fn unparseable_amount_is_invalid() {
        let mut form = filled_form();
        form.amount = "four fifty".to_owned();

        assert!(matches!(form.submission(), FormSubmission::Invalid(_)));
    }

    #[test]
    fn unparseable_date_is_invalid() {
        let mut form = filled_form();
        form.date = "15/01/2024".to_owned();

        assert!(matches!(form.submission(), FormSubmission::Invalid(_)));
    }
}
