//! Wire types for the Naver Commerce API.
//!
//! Response payloads are wrapped in `{ "timestamp", "traceId", "data" }`.
//! Only the fields the sync pipeline reads are modelled; everything else is
//! ignored by serde.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductOrderPage {
    #[serde(default)]
    pub contents: Vec<ProductOrderEntry>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Pagination {
    #[serde(default)]
    pub has_next: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductOrderEntry {
    pub product_order_id: String,
    pub content: ProductOrderContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductOrderContent {
    pub order: OrderDetail,
    pub product_order: ProductOrderDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderDetail {
    pub order_id: String,
    #[serde(default)]
    pub orderer_name: Option<String>,
    #[serde(default)]
    pub orderer_tel: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductOrderDetail {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_option: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub product_order_status: Option<String>,
}

/// One product order, flattened from the marketplace's nested payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOrder {
    pub product_order_id: String,
    pub order_id: String,
    pub orderer_name: Option<String>,
    pub orderer_tel: Option<String>,
    pub product_name: Option<String>,
    /// Free-text option field carrying plan, duration and e-mail.
    pub product_option: Option<String>,
    pub quantity: Option<i64>,
    pub status: Option<String>,
}

impl From<ProductOrderEntry> for ProductOrder {
    fn from(entry: ProductOrderEntry) -> Self {
        let ProductOrderContent {
            order,
            product_order,
        } = entry.content;
        Self {
            product_order_id: entry.product_order_id,
            order_id: order.order_id,
            orderer_name: order.orderer_name,
            orderer_tel: order.orderer_tel,
            product_name: product_order.product_name,
            product_option: product_order.product_option,
            quantity: product_order.quantity,
            status: product_order.product_order_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DispatchRequest<'a> {
    pub dispatch_product_orders: Vec<DispatchItem<'a>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DispatchItem<'a> {
    pub product_order_id: &'a str,
    pub delivery_method: &'static str,
    /// RFC 3339 with a `+09:00` offset.
    pub dispatch_date: String,
}

/// Result of a dispatch confirmation. Partial success is normal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    #[serde(default)]
    pub success_product_order_ids: Vec<String>,
    #[serde(default)]
    pub fail_product_order_infos: Vec<DispatchFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchFailure {
    pub product_order_id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
