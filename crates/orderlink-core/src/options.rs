//! Extraction of order details from the marketplace's free-text option field.
//!
//! The field is a list of `label: value` segments joined by `" / "`, e.g.
//! `이메일 (ex : ring@naver.com): a@b.com / eSIM 데이터 사용량 선택: [일본] ... / 사용일수 선택: 3일`.

const SEGMENT_SEPARATOR: &str = " / ";
const LISTING_LABEL: &str = "eSIM 데이터 사용량 선택";
const DURATION_LABEL: &str = "사용일수 선택";
const EMAIL_LABEL: &str = "이메일";
/// Buyers type a lone period to skip an optional field.
const SKIPPED: &str = ".";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderOptions {
    /// Plan text the catalog resolves against.
    pub listing: Option<String>,
    pub duration_days: Option<i64>,
    pub email: Option<String>,
}

/// Parse the option field. Missing or skipped segments come back as `None`.
#[must_use]
pub fn parse_product_option(option: &str) -> OrderOptions {
    OrderOptions {
        listing: extract_listing(option),
        duration_days: extract_duration(option),
        email: extract_email(option),
    }
}

/// First segment whose label contains `label` and which has a value part.
fn segment<'a>(option: &'a str, label: &str) -> Option<&'a str> {
    option
        .split(SEGMENT_SEPARATOR)
        .find(|part| part.contains(label) && part.contains(':'))
}

/// Text between the first and second `:` of a segment.
fn first_value(segment: &str) -> Option<&str> {
    segment.split(':').nth(1).map(str::trim)
}

fn extract_listing(option: &str) -> Option<String> {
    let value = first_value(segment(option, LISTING_LABEL)?)?;
    (value != SKIPPED && !value.is_empty()).then(|| value.to_string())
}

fn extract_duration(option: &str) -> Option<i64> {
    let value = first_value(segment(option, DURATION_LABEL)?)?;
    if value == SKIPPED {
        return None;
    }
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(1))
}

fn extract_email(option: &str) -> Option<String> {
    // The label itself carries a colon ("이메일 (ex : ring@naver.com): ..."),
    // so the address follows the last one.
    let segment = segment(option, EMAIL_LABEL)?;
    let value = segment.rsplit(':').next()?.trim();
    (value != SKIPPED && value.contains('@')).then(|| value.to_string())
}
