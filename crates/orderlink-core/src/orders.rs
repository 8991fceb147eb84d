use crate::options::{parse_product_option, OrderOptions};

pub const DEFAULT_EMAIL: &str = "example@example.com";
pub const DEFAULT_PRODUCT_NAME: &str = "eSIM 상품";

/// Raw fields of one marketplace product order, as received.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFields<'a> {
    pub product_order_id: &'a str,
    pub order_id: &'a str,
    pub orderer_name: Option<&'a str>,
    pub orderer_tel: Option<&'a str>,
    pub product_name: Option<&'a str>,
    pub product_option: Option<&'a str>,
    pub quantity: Option<i64>,
}

/// An order ready to be recorded, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub product_order_id: String,
    pub order_id: String,
    pub orderer_name: String,
    /// Digits only.
    pub orderer_tel: String,
    pub email: String,
    /// Listing text from the option field, else the marketplace product name.
    pub product_name: String,
    pub day: i64,
    pub quantity: i64,
}

impl NewOrder {
    #[must_use]
    pub fn from_fields(fields: OrderFields<'_>) -> Self {
        let options = fields
            .product_option
            .map(parse_product_option)
            .unwrap_or_default();
        Self::from_parts(fields, options)
    }

    fn from_parts(fields: OrderFields<'_>, options: OrderOptions) -> Self {
        let product_name = options
            .listing
            .or_else(|| {
                fields
                    .product_name
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());

        Self {
            product_order_id: fields.product_order_id.to_string(),
            order_id: fields.order_id.to_string(),
            orderer_name: fields.orderer_name.unwrap_or_default().trim().to_string(),
            orderer_tel: digits_only(fields.orderer_tel.unwrap_or_default()),
            email: options.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            product_name,
            day: options.duration_days.unwrap_or(1),
            quantity: fields.quantity.filter(|q| *q > 0).unwrap_or(1),
        }
    }
}

#[must_use]
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Phone number in the form the fulfillment partner expects: domestic
/// digits with the leading trunk `0`.
#[must_use]
pub fn dialable_phone(tel: &str) -> String {
    let digits = digits_only(tel);
    if digits.is_empty() || digits.starts_with('0') {
        digits
    } else {
        format!("0{digits}")
    }
}
