//! HTTP client for the Naver Commerce seller API.
//!
//! Covers the three calls the sync pipeline needs: the client-credentials
//! token grant, the changed-product-order listing and dispatch confirmation.
//! Every call is retried on transient failures per [`HttpSettings`].

use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use orderlink_core::{retry_with_backoff, HttpSettings, RetryPolicy};
use reqwest::Client;

use crate::error::NaverError;
use crate::retry::is_retriable;
use crate::signature::client_secret_sign;
use crate::types::{
    AccessToken, DispatchItem, DispatchOutcome, DispatchRequest, Envelope, ProductOrder,
    ProductOrderPage,
};

const DEFAULT_BASE_URL: &str = "https://api.commerce.naver.com/external";

const TOKEN_PATH: &str = "/v1/oauth2/token";
const PRODUCT_ORDERS_PATH: &str = "/v1/pay-order/seller/product-orders";
const DISPATCH_PATH: &str = "/v1/pay-order/seller/product-orders/dispatch";

/// Stops a listing whose `hasNext` never clears.
const MAX_ORDER_PAGES: u32 = 50;

/// eSIM deliveries carry no parcel.
const DELIVERY_METHOD_NOTHING: &str = "NOTHING";

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Client for the Naver Commerce API.
///
/// Use [`NaverClient::new`] for production or [`NaverClient::with_base_url`]
/// to point at a mock server in tests.
pub struct NaverClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    retry: RetryPolicy,
}

impl NaverClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`NaverError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        client_id: &str,
        client_secret: &str,
        settings: &HttpSettings,
    ) -> Result<Self, NaverError> {
        Self::with_base_url(client_id, client_secret, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (gateway path included,
    /// e.g. `https://api.commerce.naver.com/external`).
    ///
    /// # Errors
    ///
    /// Returns [`NaverError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NaverError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        client_id: &str,
        client_secret: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, NaverError> {
        reqwest::Url::parse(base_url).map_err(|e| NaverError::InvalidBaseUrl {
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
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            retry: settings.retry_policy(),
        })
    }

    /// Obtains an access token with the client-credentials grant.
    ///
    /// A fresh timestamp and signature are produced for every attempt.
    ///
    /// # Errors
    ///
    /// - [`NaverError::InvalidSecret`] if the client secret is not a bcrypt salt.
    /// - [`NaverError::Http`] on network failure or non-2xx HTTP status.
    /// - [`NaverError::Deserialize`] if the response has no `access_token`.
    pub async fn issue_token(&self) -> Result<AccessToken, NaverError> {
        let token = retry_with_backoff(self.retry, is_retriable, || {
            self.request_token()
        })
        .await?;
        tracing::debug!(expires_in = ?token.expires_in, "issued Naver access token");
        Ok(token)
    }

    /// Lists product orders changed since `since`, following pagination.
    ///
    /// # Errors
    ///
    /// - [`NaverError::Http`] on network failure or non-2xx HTTP status.
    /// - [`NaverError::Deserialize`] if a page does not match the expected shape.
    pub async fn list_changed_orders(
        &self,
        token: &AccessToken,
        since: DateTime<Utc>,
    ) -> Result<Vec<ProductOrder>, NaverError> {
        let from = format_kst(since);
        let mut orders = Vec::new();

        for page in 1..=MAX_ORDER_PAGES {
            let page_param = page.to_string();
            let query = [("from", from.as_str()), ("page", page_param.as_str())];
            let body = retry_with_backoff(self.retry, is_retriable, || {
                self.get_json(PRODUCT_ORDERS_PATH, &token.access_token, &query)
            })
            .await?;

            let envelope: Envelope<ProductOrderPage> =
                serde_json::from_value(body).map_err(|e| NaverError::Deserialize {
                    context: format!("product-orders(from={from}, page={page})"),
                    source: e,
                })?;

            let Some(data) = envelope.data else {
                return Ok(orders);
            };
            let has_next = data.pagination.as_ref().is_some_and(|p| p.has_next);
            tracing::debug!(page, count = data.contents.len(), has_next, "fetched order page");
            orders.extend(data.contents.into_iter().map(ProductOrder::from));

            if !has_next {
                return Ok(orders);
            }
        }

        tracing::warn!(
            max_pages = MAX_ORDER_PAGES,
            fetched = orders.len(),
            "order listing stopped at page cap"
        );
        Ok(orders)
    }

    /// Confirms dispatch for the given product orders.
    ///
    /// An empty id list makes no request.
    ///
    /// # Errors
    ///
    /// - [`NaverError::Http`] on network failure or non-2xx HTTP status.
    /// - [`NaverError::Deserialize`] if the response does not match the expected shape.
    /// - [`NaverError::ApiError`] if the response carries no result data.
    pub async fn confirm_dispatch(
        &self,
        token: &AccessToken,
        product_order_ids: &[String],
        dispatched_at: DateTime<Utc>,
    ) -> Result<DispatchOutcome, NaverError> {
        if product_order_ids.is_empty() {
            return Ok(DispatchOutcome::default());
        }

        let dispatch_date = format_kst(dispatched_at);
        let request = DispatchRequest {
            dispatch_product_orders: product_order_ids
                .iter()
                .map(|id| DispatchItem {
                    product_order_id: id,
                    delivery_method: DELIVERY_METHOD_NOTHING,
                    dispatch_date: dispatch_date.clone(),
                })
                .collect(),
        };

        let body = retry_with_backoff(self.retry, is_retriable, || {
            self.post_json(DISPATCH_PATH, &token.access_token, &request)
        })
        .await?;

        let envelope: Envelope<DispatchOutcome> =
            serde_json::from_value(body).map_err(|e| NaverError::Deserialize {
                context: "product-orders/dispatch".to_owned(),
                source: e,
            })?;

        envelope.data.ok_or_else(|| {
            NaverError::ApiError(format!(
                "dispatch response has no data (traceId {})",
                envelope.trace_id.as_deref().unwrap_or("unknown")
            ))
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn request_token(&self) -> Result<AccessToken, NaverError> {
        let timestamp = Utc::now().timestamp_millis();
        let sign = client_secret_sign(&self.client_id, &self.client_secret, timestamp)?;
        let timestamp = timestamp.to_string();
        let form = [
            ("client_id", self.client_id.as_str()),
            ("timestamp", timestamp.as_str()),
            ("grant_type", "client_credentials"),
            ("client_secret_sign", sign.as_str()),
            ("type", "SELF"),
        ];

        let response = self
            .client
            .post(self.endpoint(TOKEN_PATH))
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| NaverError::Deserialize {
            context: "oauth2/token".to_owned(),
            source: e,
        })
    }

    /// Sends an authorized GET, asserts a 2xx status, and parses the body as JSON.
    async fn get_json(
        &self,
        path: &str,
        bearer: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, NaverError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .bearer_auth(bearer)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| NaverError::Deserialize {
            context: path.to_owned(),
            source: e,
        })
    }

    /// Sends an authorized JSON POST, asserts a 2xx status, and parses the body as JSON.
    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        bearer: &str,
        payload: &B,
    ) -> Result<serde_json::Value, NaverError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(bearer)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| NaverError::Deserialize {
            context: path.to_owned(),
            source: e,
        })
    }
}

/// Formats a timestamp the way the commerce API expects: RFC 3339 with
/// milliseconds in Korea Standard Time.
pub(crate) fn format_kst(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => at
            .with_timezone(&kst)
            .to_rfc3339_opts(SecondsFormat::Millis, false),
        None => at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
