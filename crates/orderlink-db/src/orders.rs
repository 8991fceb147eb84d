//! Database operations for the `user` order table.
//!
//! A row moves through three states: recorded (no `orderTid`), submitted
//! (`orderTid` set) and dispatched (`dispatchStatus = 1`). Rows whose listing
//! did not resolve are parked with `needsReview` until an operator requeues them.

use chrono::{DateTime, Utc};
use orderlink_core::NewOrder;
use sqlx::MySqlPool;

use crate::DbError;

const ORDER_COLUMNS: &str = "id, productOrderId, orderId, ordererName, ordererTel, email, \
     productName, day, quantity, productCode, orderTid, needsReview, kakaoSendYN, \
     dispatchStatus, created_at, updated_at";

/// A row from the `user` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    #[sqlx(rename = "productOrderId")]
    pub product_order_id: String,
    #[sqlx(rename = "orderId")]
    pub order_id: String,
    #[sqlx(rename = "ordererName")]
    pub orderer_name: String,
    #[sqlx(rename = "ordererTel")]
    pub orderer_tel: String,
    pub email: String,
    /// The listing text the catalog resolves against.
    #[sqlx(rename = "productName")]
    pub product_name: String,
    pub day: i64,
    pub quantity: i64,
    #[sqlx(rename = "productCode")]
    pub product_code: Option<String>,
    #[sqlx(rename = "orderTid")]
    pub order_tid: Option<String>,
    #[sqlx(rename = "needsReview")]
    pub needs_review: bool,
    #[sqlx(rename = "kakaoSendYN")]
    pub kakao_send_yn: String,
    #[sqlx(rename = "dispatchStatus")]
    pub dispatch_status: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Inserts a new order unless a row with the same `productOrderId` exists.
///
/// Existing rows are never updated. Returns `true` when a row was inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_order_if_new(pool: &MySqlPool, order: &NewOrder) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT IGNORE INTO `user` \
             (productOrderId, orderId, ordererName, ordererTel, email, productName, \
              day, quantity, created_at, kakaoSendYN, dispatchStatus) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW(), 'N', 0)",
    )
    .bind(&order.product_order_id)
    .bind(&order.order_id)
    .bind(&order.orderer_name)
    .bind(&order.orderer_tel)
    .bind(&order.email)
    .bind(&order.product_name)
    .bind(order.day)
    .bind(order.quantity)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Returns the row for a marketplace product order id, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_order_by_product_order_id(
    pool: &MySqlPool,
    product_order_id: &str,
) -> Result<Option<OrderRow>, DbError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM `user` WHERE productOrderId = ?"
    ))
    .bind(product_order_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Rows not yet submitted for fulfillment and not parked for review, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pending_submissions(
    pool: &MySqlPool,
    limit: u32,
) -> Result<Vec<OrderRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM `user` \
         WHERE orderTid IS NULL AND needsReview = FALSE \
         ORDER BY created_at ASC, id ASC \
         LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Records a successful fulfillment submission.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no unsubmitted row matches
/// `product_order_id`, or [`DbError::Sqlx`] if the update fails.
pub async fn set_order_tid(
    pool: &MySqlPool,
    product_order_id: &str,
    order_tid: &str,
    product_code: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE `user` \
         SET orderTid = ?, productCode = ?, updated_at = NOW() \
         WHERE productOrderId = ? AND orderTid IS NULL",
    )
    .bind(order_tid)
    .bind(product_code)
    .bind(product_order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Parks an order for manual review: its listing resolved to the fallback
/// code, or its submission was rejected or ended with an unknown outcome.
///
/// Only unsubmitted rows are touched; a row that already has an `orderTid`
/// keeps its state.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no unsubmitted row matches
/// `product_order_id`, or [`DbError::Sqlx`] if the update fails.
pub async fn mark_needs_review(
    pool: &MySqlPool,
    product_order_id: &str,
    product_code: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE `user` \
         SET needsReview = TRUE, productCode = ?, updated_at = NOW() \
         WHERE productOrderId = ? AND orderTid IS NULL",
    )
    .bind(product_code)
    .bind(product_order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Clears the review flag so the next pass resolves the order again.
///
/// Only unsubmitted rows can be requeued.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no unsubmitted row matches
/// `product_order_id`, or [`DbError::Sqlx`] if the update fails.
pub async fn requeue_order(pool: &MySqlPool, product_order_id: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE `user` \
         SET needsReview = FALSE, productCode = NULL, updated_at = NOW() \
         WHERE productOrderId = ? AND orderTid IS NULL",
    )
    .bind(product_order_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Submitted rows whose dispatch has not been confirmed, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_dispatch_candidates(
    pool: &MySqlPool,
    limit: u32,
) -> Result<Vec<OrderRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM `user` \
         WHERE dispatchStatus = 0 AND orderTid IS NOT NULL \
         ORDER BY created_at ASC, id ASC \
         LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Sets `dispatchStatus = 1` for each listed product order id.
///
/// Returns the number of rows changed. Ids that are unknown or already
/// dispatched are ignored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any update fails; no row is changed then.
pub async fn mark_dispatched(
    pool: &MySqlPool,
    product_order_ids: &[String],
) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut changed = 0u64;

    for product_order_id in product_order_ids {
        let result = sqlx::query(
            "UPDATE `user` \
             SET dispatchStatus = 1, updated_at = NOW() \
             WHERE productOrderId = ? AND dispatchStatus = 0",
        )
        .bind(product_order_id)
        .execute(&mut *tx)
        .await?;
        changed += result.rows_affected();
    }

    tx.commit().await?;
    Ok(changed)
}
