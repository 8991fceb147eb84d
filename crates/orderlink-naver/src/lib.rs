//! Naver Commerce API client: OAuth signing, order listing and dispatch.

mod client;
mod error;
mod retry;
mod signature;
mod types;

pub use client::NaverClient;
pub use error::NaverError;
pub use signature::client_secret_sign;
pub use types::{AccessToken, DispatchFailure, DispatchOutcome, ProductOrder};
