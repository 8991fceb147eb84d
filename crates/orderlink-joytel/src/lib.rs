//! JoyTel customer-order client: `autoGraph` signing and order submission.

mod client;
mod error;
mod retry;
mod signature;
mod types;

pub use client::{generate_order_tid, JoytelClient, JoytelCredentials};
pub use error::JoytelError;
pub use types::{OrderItem, OrderSubmission, SubmittedOrder};
