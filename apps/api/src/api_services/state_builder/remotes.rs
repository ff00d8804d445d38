use std::sync::Arc;

use warden_application::{BrokerUserGateway, TransactionGateway};
use warden_core::AppError;
use warden_infrastructure::{HttpBrokerUserGateway, HttpTransactionGateway};

use crate::api_config::ApiConfig;

pub(super) fn build_remote_gateways(
    config: &ApiConfig,
) -> Result<(Arc<dyn BrokerUserGateway>, Arc<dyn TransactionGateway>), AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(config.remote_call_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

    Ok((
        Arc::new(HttpBrokerUserGateway::new(
            http_client.clone(),
            &config.broker_service_url,
        )),
        Arc::new(HttpTransactionGateway::new(
            http_client,
            &config.transaction_service_url,
        )),
    ))
}
