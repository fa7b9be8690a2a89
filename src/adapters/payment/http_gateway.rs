//! REST payment gateway client.
//!
//! Speaks a minimal JSON protocol:
//!
//! - `POST {base}/v1/checkouts` creates a hosted checkout for an order and
//!   returns the URL to send the applicant to
//! - `GET {base}/v1/checkouts/{order_id}` returns the order's status
//!
//! Requests authenticate with the API key as a bearer token. Every call is
//! bounded by the client timeout.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::OrderId;
use crate::domain::payment::{GatewayReport, PaymentStatus};
use crate::ports::{Checkout, CheckoutRequest, GatewayError, PaymentGateway};

/// Gateway connection settings.
#[derive(Clone)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout: Duration,
}

pub struct HttpPaymentGateway {
    config: HttpGatewayConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CreateCheckoutBody<'a> {
    order_id: String,
    amount_minor: i64,
    currency: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_url: Option<&'a str>,
    metadata: CheckoutMetadata,
}

#[derive(Debug, Serialize)]
struct CheckoutMetadata {
    applicant_id: String,
}

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    checkout_url: String,
    #[serde(default)]
    reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    tracking_id: Option<String>,
    #[serde(default)]
    failure_message: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Unavailable(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.config.timeout.as_secs())
        } else {
            GatewayError::Unavailable(err.to_string())
        }
    }

    async fn error_for(&self, response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            GatewayError::Unavailable(format!("gateway returned {}: {}", status, error_text))
        } else {
            GatewayError::Rejected(format!("gateway returned {}: {}", status, error_text))
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<Checkout, GatewayError> {
        let body = CreateCheckoutBody {
            order_id: request.order_id.to_string(),
            amount_minor: request.amount.amount_minor,
            currency: &request.amount.currency,
            description: request.payment_type.as_str(),
            return_url: request.return_url.as_deref(),
            metadata: CheckoutMetadata {
                applicant_id: request.applicant_id.to_string(),
            },
        };

        let response = self
            .http_client
            .post(self.url("/v1/checkouts"))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.error_for(response).await);
        }

        let checkout: CheckoutResponse = response.json().await.map_err(|e| {
            GatewayError::Unavailable(format!("failed to parse gateway response: {}", e))
        })?;

        Ok(Checkout {
            redirect_url: checkout.checkout_url,
            gateway_reference: checkout.reference,
        })
    }

    async fn query_status(&self, order_id: &OrderId) -> Result<GatewayReport, GatewayError> {
        let response = self
            .http_client
            .get(self.url(&format!("/v1/checkouts/{}", order_id)))
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::UnknownOrder(*order_id));
        }
        if !response.status().is_success() {
            return Err(self.error_for(response).await);
        }

        let body: StatusResponse = response.json().await.map_err(|e| {
            GatewayError::Unavailable(format!("failed to parse gateway response: {}", e))
        })?;
        let status: PaymentStatus = body
            .status
            .parse()
            .map_err(|_| GatewayError::Rejected(format!("unknown payment status '{}'", body.status)))?;

        Ok(GatewayReport {
            order_id: *order_id,
            status,
            tracking_id: body.tracking_id,
            failure_message: body.failure_message,
        })
    }
}
