//! reqwest clients for the broker and transaction services.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use warden_application::{BrokerUserGateway, TransactionGateway};
use warden_core::{AppError, AppResult};
use warden_domain::{BrokerId, UserId};

#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    error: String,
}

/// Shared plumbing for deleting a resource on a sibling service.
#[derive(Clone)]
struct ServiceClient {
    http_client: reqwest::Client,
    base_url: String,
    service_name: &'static str,
}

impl ServiceClient {
    fn new(http_client: reqwest::Client, base_url: &str, service_name: &'static str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            service_name,
        }
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let url = format!("{}{path}", self.base_url);
        debug!(service = self.service_name, url = %url, "sending delete request");

        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|error| self.transport_error(&error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        Err(self.status_error(status, &body))
    }

    fn transport_error(&self, error: &reqwest::Error) -> AppError {
        if error.is_timeout() || error.is_connect() {
            return AppError::Unavailable(format!(
                "{} is unreachable: {error}",
                self.service_name
            ));
        }

        AppError::Internal(format!("{} request failed: {error}", self.service_name))
    }

    fn status_error(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<RemoteErrorBody>(body)
            .map(|parsed| parsed.error)
            .unwrap_or_else(|_| body.trim().to_owned());
        let message = format!("{} responded with {status}: {detail}", self.service_name);

        match status.as_u16() {
            404 => AppError::NotFound(message),
            409 => AppError::Conflict(message),
            503 | 504 => AppError::Unavailable(message),
            400..=499 => AppError::Validation(message),
            _ => AppError::Internal(message),
        }
    }
}

/// HTTP implementation of the broker service port.
#[derive(Clone)]
pub struct HttpBrokerUserGateway {
    client: ServiceClient,
}

impl HttpBrokerUserGateway {
    /// Creates a gateway targeting the broker service at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client: ServiceClient::new(http_client, base_url, "broker service"),
        }
    }
}

#[async_trait]
impl BrokerUserGateway for HttpBrokerUserGateway {
    async fn delete_broker_user(&self, user_id: UserId, broker_id: BrokerId) -> AppResult<()> {
        self.client
            .delete(&format!("/brokers/{broker_id}/users/{user_id}"))
            .await
    }
}

/// HTTP implementation of the transaction service port.
#[derive(Clone)]
pub struct HttpTransactionGateway {
    client: ServiceClient,
}

impl HttpTransactionGateway {
    /// Creates a gateway targeting the transaction service at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client: ServiceClient::new(http_client, base_url, "transaction service"),
        }
    }
}

#[async_trait]
impl TransactionGateway for HttpTransactionGateway {
    async fn delete_transactions_for_broker_user(
        &self,
        user_id: UserId,
        broker_id: BrokerId,
    ) -> AppResult<()> {
        self.client
            .delete(&format!("/users/{user_id}/brokers/{broker_id}/transactions"))
            .await
    }
}
