//! `orders` command handlers.

use sqlx::MySqlPool;

pub(crate) async fn run_show(pool: &MySqlPool, product_order_id: &str) -> anyhow::Result<()> {
    let row = orderlink_db::get_order_by_product_order_id(pool, product_order_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("order '{product_order_id}' not found"))?;

    println!("productOrderId  {}", row.product_order_id);
    println!("orderId         {}", row.order_id);
    println!("orderer         {} ({})", row.orderer_name, row.orderer_tel);
    println!("email           {}", row.email);
    println!("product         {}", row.product_name);
    println!("days            {}", row.day);
    println!("quantity        {}", row.quantity);
    println!("productCode     {}", row.product_code.as_deref().unwrap_or("-"));
    println!("orderTid        {}", row.order_tid.as_deref().unwrap_or("-"));
    println!("needsReview     {}", row.needs_review);
    println!("dispatchStatus  {}", row.dispatch_status);
    println!("created         {}", row.created_at.to_rfc3339());
    Ok(())
}

/// Put a parked order back in the submission queue.
pub(crate) async fn run_requeue(pool: &MySqlPool, product_order_id: &str) -> anyhow::Result<()> {
    match orderlink_db::requeue_order(pool, product_order_id).await {
        Ok(()) => {
            tracing::info!(product_order_id, "order requeued");
            println!("requeued {product_order_id}");
            Ok(())
        }
        Err(orderlink_db::DbError::NotFound) => anyhow::bail!(
            "order '{product_order_id}' not found or already submitted; only unsubmitted orders can be requeued"
        ),
        Err(e) => Err(e.into()),
    }
}
