//! The `autoGraph` request signature.
//!
//! `sha1_hex(customerCode + customerAuth + warehouse + type + orderTid +
//! receiveName + phone + timestamp + (productCode + quantity)...)`, lowercase.
//! The warehouse takes part in the digest even when it is left out of the body.

use sha1::{Digest, Sha1};

use crate::types::CustomerOrderRequest;

pub(crate) fn auto_graph(request: &CustomerOrderRequest<'_>, customer_auth: &str) -> String {
    let mut payload = format!(
        "{}{}{}{}{}{}{}{}",
        request.customer_code,
        customer_auth,
        request.warehouse,
        request.order_type,
        request.order_tid,
        request.receive_name,
        request.phone,
        request.timestamp,
    );
    for item in request.item_list {
        payload.push_str(&item.product_code);
        payload.push_str(&item.quantity.to_string());
    }
    format!("{:x}", Sha1::digest(payload.as_bytes()))
}
