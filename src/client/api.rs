//! A typed HTTP client for the expense store API.

use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    endpoints,
    expense::{CreateExpense, DeleteAcknowledgement, Expense, ExpenseId, UpdateExpense},
};

/// The errors that may occur while talking to the expense store.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server could not find the requested expense.
    #[error("the server could not find the requested expense")]
    NotFound,

    /// The server reported a failure, e.g., the store was unreachable.
    #[error("server error ({status}): {message}")]
    Server {
        /// The HTTP status code of the response.
        status: u16,
        /// The error message from the response payload.
        message: String,
    },

    /// The request never produced a response, e.g., the server is down.
    #[error("could not reach the expense store: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// A client for the four expense operations.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client that sends requests to the API at `base_url`,
    /// e.g., `http://localhost:5000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn expenses_url(&self) -> String {
        format!("{}{}", self.base_url, endpoints::EXPENSES_API)
    }

    fn expense_url(&self, id: ExpenseId) -> String {
        format!(
            "{}{}",
            self.base_url,
            endpoints::format_endpoint(endpoints::EXPENSE, id)
        )
    }

    /// Fetch every expense, newest first.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>, ApiError> {
        let response = self.http.get(self.expenses_url()).send().await?;
        decode(response).await
    }

    /// Create an expense and return the record the store assigned.
    pub async fn create_expense(&self, payload: &CreateExpense) -> Result<Expense, ApiError> {
        let response = self
            .http
            .post(self.expenses_url())
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// Replace an expense's description, amount, and date.
    pub async fn update_expense(
        &self,
        id: ExpenseId,
        payload: &UpdateExpense,
    ) -> Result<Expense, ApiError> {
        let response = self
            .http
            .put(self.expense_url(id))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    /// Permanently delete an expense.
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), ApiError> {
        let response = self.http.delete(self.expense_url(id)).send().await?;
        decode::<DeleteAcknowledgement>(response).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };

    if status == reqwest::StatusCode::NOT_FOUND {
        Err(ApiError::NotFound)
    } else {
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
