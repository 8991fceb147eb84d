//! HTTP client for the JoyTel customer-order API.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use orderlink_core::{retry_with_backoff, HttpSettings, RetryPolicy};
use reqwest::Client;

use crate::error::JoytelError;
use crate::retry::is_retriable;
use crate::signature::auto_graph;
use crate::types::{CustomerOrderRequest, CustomerOrderResponse, OrderSubmission, SubmittedOrder};

const DEFAULT_BASE_URL: &str = "https://api.joytelshop.com";
const CUSTOMER_ORDER_PATH: &str = "/customerApi/customerOrder";

/// eSIM order type.
const ORDER_TYPE_ESIM: u8 = 3;
/// Deliver the QR code by e-mail.
const REPLY_TYPE_EMAIL: u8 = 1;

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Account identity for the customer-order API.
#[derive(Clone)]
pub struct JoytelCredentials {
    pub customer_code: String,
    pub customer_auth: String,
    /// Signed always, sent only when non-empty.
    pub warehouse: String,
}

impl std::fmt::Debug for JoytelCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoytelCredentials")
            .field("customer_code", &self.customer_code)
            .field("customer_auth", &"[redacted]")
            .field("warehouse", &self.warehouse)
            .finish()
    }
}

/// Client for JoyTel order submission.
pub struct JoytelClient {
    client: Client,
    base_url: String,
    credentials: JoytelCredentials,
    retry: RetryPolicy,
}

impl JoytelClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`JoytelError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(credentials: JoytelCredentials, settings: &HttpSettings) -> Result<Self, JoytelError> {
        Self::with_base_url(credentials, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`JoytelError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`JoytelError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        credentials: JoytelCredentials,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, JoytelError> {
        reqwest::Url::parse(base_url).map_err(|e| JoytelError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
            retry: settings.retry_policy(),
        })
    }

    /// Generates the `orderTid` for the next submission with this account.
    #[must_use]
    pub fn next_order_tid(&self) -> String {
        generate_order_tid(&self.credentials.customer_code, Utc::now())
    }

    /// Submits one eSIM order under `order_tid`.
    ///
    /// The caller owns the transaction id so it can record or log it even
    /// when the call fails. It is reused across retries, so a retried
    /// request cannot create a second order.
    ///
    /// # Errors
    ///
    /// - [`JoytelError::InvalidOrder`] if `order_tid` is blank, or the order
    ///   has no items, an empty product code or a non-positive quantity.
    ///   No request is made.
    /// - [`JoytelError::Http`] on network failure or non-2xx HTTP status.
    /// - [`JoytelError::Deserialize`] if the response is not JSON of the expected shape.
    /// - [`JoytelError::ApiError`] if the response carries a non-zero `code`.
    pub async fn submit_order(
        &self,
        order: &OrderSubmission,
        order_tid: &str,
    ) -> Result<SubmittedOrder, JoytelError> {
        if order_tid.trim().is_empty() {
            return Err(JoytelError::InvalidOrder("blank orderTid".to_owned()));
        }
        validate(order)?;

        let mut request = CustomerOrderRequest {
            customer_code: &self.credentials.customer_code,
            order_tid,
            warehouse: &self.credentials.warehouse,
            receive_name: &order.receive_name,
            phone: &order.phone,
            timestamp: Utc::now().timestamp_millis().to_string(),
            email: &order.email,
            order_type: ORDER_TYPE_ESIM,
            reply_type: REPLY_TYPE_EMAIL,
            item_list: &order.items,
            auto_graph: String::new(),
        };
        request.auto_graph = auto_graph(&request, &self.credentials.customer_auth);

        let response = retry_with_backoff(self.retry, is_retriable, || {
            self.post_order(&request)
        })
        .await?;

        if response.code != 0 {
            return Err(JoytelError::ApiError {
                code: response.code,
                message: response
                    .mesg
                    .unwrap_or_else(|| "no message".to_owned()),
            });
        }

        let data = response.data.unwrap_or_default();
        let echoed = data
            .order_tid
            .or(response.order_tid)
            .filter(|tid| !tid.trim().is_empty());
        if echoed.is_none() {
            tracing::debug!(
                order_tid,
                "response carried no orderTid, keeping the submitted one"
            );
        }

        Ok(SubmittedOrder {
            order_tid: echoed.unwrap_or_else(|| order_tid.to_owned()),
            order_code: data.order_code,
        })
    }

    async fn post_order(
        &self,
        request: &CustomerOrderRequest<'_>,
    ) -> Result<CustomerOrderResponse, JoytelError> {
        let response = self
            .client
            .post(format!("{}{CUSTOMER_ORDER_PATH}", self.base_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| JoytelError::Deserialize {
            context: format!("customerOrder(orderTid={})", request.order_tid),
            source: e,
        })
    }
}

/// Builds a transaction id: customer code, KST `yyyyMMddHHmmss`, then six
/// random digits.
#[must_use]
pub fn generate_order_tid(customer_code: &str, at: DateTime<Utc>) -> String {
    let stamp = match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => at.with_timezone(&kst).format("%Y%m%d%H%M%S").to_string(),
        None => at.format("%Y%m%d%H%M%S").to_string(),
    };
    let suffix: u32 = rand::random_range(0..1_000_000);
    format!("{customer_code}{stamp}{suffix:06}")
}

fn validate(order: &OrderSubmission) -> Result<(), JoytelError> {
    if order.items.is_empty() {
        return Err(JoytelError::InvalidOrder("order has no items".to_owned()));
    }
    for item in &order.items {
        if item.product_code.trim().is_empty() {
            return Err(JoytelError::InvalidOrder("empty product code".to_owned()));
        }
        if item.quantity < 1 {
            return Err(JoytelError::InvalidOrder(format!(
                "quantity {} for {} must be at least 1",
                item.quantity, item.product_code
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
