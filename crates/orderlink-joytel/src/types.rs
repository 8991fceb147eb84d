//! Wire types for the JoyTel customer-order API.

use serde::{Deserialize, Serialize};

/// What the caller knows about an order; the client adds the transaction id,
/// timestamp and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub receive_name: String,
    /// Dialable number, leading `0` included.
    pub phone: String,
    pub email: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_code: String,
    pub quantity: i64,
}

/// An accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedOrder {
    /// Transaction id echoed by JoyTel, or the generated one when the
    /// response carried none.
    pub order_tid: String,
    pub order_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerOrderRequest<'a> {
    pub customer_code: &'a str,
    pub order_tid: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub warehouse: &'a str,
    pub receive_name: &'a str,
    pub phone: &'a str,
    /// Epoch milliseconds, sent as a string.
    pub timestamp: String,
    pub email: &'a str,
    #[serde(rename = "type")]
    pub order_type: u8,
    pub reply_type: u8,
    pub item_list: &'a [OrderItem],
    pub auto_graph: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerOrderResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub mesg: Option<String>,
    #[serde(default)]
    pub order_tid: Option<String>,
    #[serde(default)]
    pub data: Option<CustomerOrderData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerOrderData {
    #[serde(default)]
    pub order_tid: Option<String>,
    #[serde(default)]
    pub order_code: Option<String>,
}
