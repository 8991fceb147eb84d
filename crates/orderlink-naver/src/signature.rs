//! `client_secret_sign` for the OAuth2 client-credentials grant.
//!
//! The application secret issued by Naver is itself a bcrypt salt string
//! (`$2a$04$` followed by 22 salt characters). The signature is
//! `base64url(bcrypt(client_id + "_" + timestamp_millis, secret))`.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::error::NaverError;

const SALT_CHARS: usize = 22;

// bcrypt's own base64 variant. 22 characters carry 132 bits; the last 4 are
// discarded.
const BCRYPT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Builds the `client_secret_sign` form value.
///
/// # Errors
///
/// Returns [`NaverError::InvalidSecret`] if `client_secret` is not a bcrypt
/// salt string, or [`NaverError::Signature`] if hashing fails.
pub fn client_secret_sign(
    client_id: &str,
    client_secret: &str,
    timestamp_millis: i64,
) -> Result<String, NaverError> {
    let password = format!("{client_id}_{timestamp_millis}");
    let hashed = bcrypt_with_salt_string(&password, client_secret)?;
    Ok(URL_SAFE.encode(hashed))
}

/// bcrypt `password` with a full `$2a$NN$<salt>` string, returning the
/// 60-character modular-crypt hash.
fn bcrypt_with_salt_string(password: &str, salt_string: &str) -> Result<String, NaverError> {
    let (cost, salt) = parse_salt_string(salt_string)?;
    let parts = bcrypt::hash_with_salt(password, cost, salt)?;
    Ok(parts.format_for_version(bcrypt::Version::TwoA))
}

fn parse_salt_string(salt_string: &str) -> Result<(u32, [u8; 16]), NaverError> {
    let invalid = |reason: &str| NaverError::InvalidSecret(reason.to_string());

    let mut fields = salt_string.split('$');
    if fields.next() != Some("") {
        return Err(invalid("must start with '$'"));
    }
    match fields.next() {
        Some("2a" | "2b" | "2y") => {}
        _ => return Err(invalid("unsupported bcrypt version")),
    }
    let cost = fields
        .next()
        .and_then(|c| c.parse::<u32>().ok())
        .ok_or_else(|| invalid("cost must be a number"))?;
    let encoded = fields
        .next()
        .and_then(|s| s.get(..SALT_CHARS))
        .ok_or_else(|| invalid("salt must be 22 characters"))?;

    let decoded = BCRYPT_BASE64
        .decode(encoded)
        .map_err(|e| invalid(&format!("salt is not bcrypt base64: {e}")))?;
    let salt: [u8; 16] = decoded
        .try_into()
        .map_err(|_| invalid("salt must decode to 16 bytes"))?;

    Ok((cost, salt))
}
