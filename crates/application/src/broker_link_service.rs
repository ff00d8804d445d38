//! Cross-service removal of a broker link and the transactions that hang off it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use warden_core::{AppError, AppResult};
use warden_domain::{BrokerId, UserId};

use crate::with_deadline;


/// Port onto the broker service, owner of broker-user links.
#[async_trait]
pub trait BrokerUserGateway: Send + Sync {
    /// Deletes the link between a user and a broker.
    async fn delete_broker_user(&self, user_id: UserId, broker_id: BrokerId) -> AppResult<()>;
}

/// Port onto the transaction service, owner of transactions.
#[async_trait]
pub trait TransactionGateway: Send + Sync {
    /// Deletes every transaction of a user at a broker.
    async fn delete_transactions_for_broker_user(
        &self,
        user_id: UserId,
        broker_id: BrokerId,
    ) -> AppResult<()>;
}

/// Two-step, non-atomic cascade across the broker and transaction services.
///
/// Step one deletes the link; step two runs only after it succeeded. A failed
/// step two is not compensated: it leaves the link gone and the transactions
/// in place, and is reported as `PartialFailure` so it gets reconciled rather
/// than retried (a retry would now stop at step one with `NotFound`).
#[derive(Clone)]
pub struct BrokerLinkService {
    broker_gateway: Arc<dyn BrokerUserGateway>,
    transaction_gateway: Arc<dyn TransactionGateway>,
    step_timeout: Duration,
}

impl BrokerLinkService {
    /// Creates a new cascade service. Each remote step runs under `step_timeout`.
    #[must_use]
    pub fn new(
        broker_gateway: Arc<dyn BrokerUserGateway>,
        transaction_gateway: Arc<dyn TransactionGateway>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            broker_gateway,
            transaction_gateway,
            step_timeout,
        }
    }

    /// Deletes the broker-user link, then the dependent transactions.
    pub async fn delete_broker_link_and_dependents(
        &self,
        user_id: UserId,
        broker_id: BrokerId,
    ) -> AppResult<()> {
        with_deadline(
            "broker link deletion",
            self.step_timeout,
            self.broker_gateway.delete_broker_user(user_id, broker_id),
        )
        .await?;

        let dependents = with_deadline(
            "broker transaction deletion",
            self.step_timeout,
            self.transaction_gateway
                .delete_transactions_for_broker_user(user_id, broker_id),
        )
        .await;

        if let Err(step_error) = dependents {
            error!(
                user_id = %user_id,
                broker_id = %broker_id,
                error = %step_error,
                "broker link deleted but dependent transactions remain; reconciliation required"
            );
            return Err(AppError::PartialFailure(format!(
                "link between user '{user_id}' and broker '{broker_id}' was deleted but its transactions were not: {step_error}"
            )));
        }

        info!(user_id = %user_id, broker_id = %broker_id, "deleted broker link and transactions");
        Ok(())
    }
}
