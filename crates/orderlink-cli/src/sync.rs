//! One sync pass: collect new marketplace orders, submit them for
//! fulfillment, then confirm dispatch of submitted ones.
//!
//! A failing step is logged and the next step still runs. A failing order is
//! logged and skipped; it stays pending for the next pass only when the
//! partner certainly never received it, otherwise it is flagged for review.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use orderlink_core::{dialable_phone, AppConfig, Catalog, NewOrder, OrderFields};
use orderlink_db::OrderRow;
use orderlink_joytel::{JoytelClient, JoytelCredentials, JoytelError, OrderItem, OrderSubmission};
use orderlink_naver::{NaverClient, ProductOrder};
use sqlx::MySqlPool;

/// Upper bound on rows submitted in one pass.
const SUBMIT_BATCH_LIMIT: u32 = 200;

/// Marketplace statuses that are never fulfilled.
const INACTIVE_STATUSES: &[&str] = &[
    "PAYMENT_WAITING",
    "CANCELED",
    "CANCELED_BY_NOPAYMENT",
    "RETURNED",
    "EXCHANGED",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Steps {
    pub collect: bool,
    pub submit: bool,
    pub dispatch: bool,
}

/// Everything a pass needs, built once per process.
pub(crate) struct SyncContext {
    pool: MySqlPool,
    catalog: Catalog,
    naver: NaverClient,
    joytel: JoytelClient,
    config: AppConfig,
}

impl SyncContext {
    /// Loads the catalog, builds both API clients and connects the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing, the catalog is invalid,
    /// or the database is unreachable.
    pub(crate) async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        let catalog = Catalog::load_or_embedded(config.catalog_path.as_deref())?;
        let naver = build_naver_client(&config)?;
        let joytel = build_joytel_client(&config)?;

        let pool_config = orderlink_db::PoolConfig::from_app_config(&config);
        let pool = orderlink_db::connect_pool(&config.database_url, pool_config).await?;

        tracing::info!(
            regions = catalog.regions.len(),
            entries = catalog.entry_count(),
            "sync context ready"
        );
        Ok(Self {
            pool,
            catalog,
            naver,
            joytel,
            config,
        })
    }
}

/// Counters for one pass, printed by `sync` and logged by `watch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PassSummary {
    pub fetched: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub unsupported: usize,
    pub inactive: usize,
    pub submitted: usize,
    pub parked: usize,
    pub order_failures: usize,
    pub dispatched: u64,
    pub dispatch_rejected: usize,
    pub failed_steps: Vec<&'static str>,
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "collect: {} fetched, {} new, {} known, {} unsupported, {} inactive; \
             submit: {} submitted, {} need review; \
             dispatch: {} confirmed, {} rejected; \
             {} order failures",
            self.fetched,
            self.inserted,
            self.duplicates,
            self.unsupported,
            self.inactive,
            self.submitted,
            self.parked,
            self.dispatched,
            self.dispatch_rejected,
            self.order_failures,
        )?;
        if !self.failed_steps.is_empty() {
            write!(f, "; failed steps: {}", self.failed_steps.join(", "))?;
        }
        Ok(())
    }
}

/// Runs the enabled steps in order and reports what happened.
pub(crate) async fn run_pass(ctx: &SyncContext, steps: Steps) -> PassSummary {
    let mut summary = PassSummary::default();

    if steps.collect {
        if let Err(e) = collect(ctx, &mut summary).await {
            tracing::error!(error = %format!("{e:#}"), "collect step failed");
            summary.failed_steps.push("collect");
        }
    }
    if steps.submit {
        if let Err(e) = submit(ctx, &mut summary).await {
            tracing::error!(error = %format!("{e:#}"), "submit step failed");
            summary.failed_steps.push("submit");
        }
    }
    if steps.dispatch {
        if let Err(e) = dispatch(ctx, &mut summary).await {
            tracing::error!(error = %format!("{e:#}"), "dispatch step failed");
            summary.failed_steps.push("dispatch");
        }
    }

    tracing::info!(
        fetched = summary.fetched,
        inserted = summary.inserted,
        submitted = summary.submitted,
        parked = summary.parked,
        dispatched = summary.dispatched,
        order_failures = summary.order_failures,
        failed_steps = summary.failed_steps.len(),
        "sync pass complete"
    );
    summary
}

/// Fetches and resolves recent orders, printing what a pass would do.
/// Nothing is written or submitted and no database is needed.
pub(crate) async fn run_dry_run(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_embedded(config.catalog_path.as_deref())?;
    let naver = build_naver_client(config)?;
    let orders = fetch_recent_orders(&naver, config).await?;

    for order in &orders {
        match admit(order, &catalog) {
            Admission::Accept(new_order) => {
                let code = catalog.resolve(Some(new_order.product_name.as_str()), new_order.day);
                let action = if code == catalog.fallback {
                    "needs review"
                } else {
                    "submit"
                };
                println!(
                    "{}  {}  {}d x{}  -> {code} ({action})",
                    new_order.product_order_id,
                    new_order.product_name,
                    new_order.day,
                    new_order.quantity
                );
            }
            Admission::Inactive(status) => {
                println!("{}  skipped: status {status}", order.product_order_id);
            }
            Admission::Unsupported(listing) => {
                println!("{}  skipped: unsupported product '{listing}'", order.product_order_id);
            }
        }
    }

    println!(
        "dry-run: {} orders fetched; nothing written or submitted",
        orders.len()
    );
    Ok(())
}

async fn collect(ctx: &SyncContext, summary: &mut PassSummary) -> anyhow::Result<()> {
    let orders = fetch_recent_orders(&ctx.naver, &ctx.config).await?;
    summary.fetched = orders.len();

    for order in &orders {
        let new_order = match admit(order, &ctx.catalog) {
            Admission::Accept(new_order) => new_order,
            Admission::Inactive(status) => {
                tracing::debug!(
                    product_order_id = %order.product_order_id,
                    status = %status,
                    "skipping order, not payable"
                );
                summary.inactive += 1;
                continue;
            }
            Admission::Unsupported(listing) => {
                tracing::warn!(
                    product_order_id = %order.product_order_id,
                    listing = %listing,
                    "skipping order, unsupported product"
                );
                summary.unsupported += 1;
                continue;
            }
        };

        match orderlink_db::insert_order_if_new(&ctx.pool, &new_order).await {
            Ok(true) => {
                tracing::info!(
                    product_order_id = %new_order.product_order_id,
                    product_name = %new_order.product_name,
                    day = new_order.day,
                    "recorded new order"
                );
                summary.inserted += 1;
            }
            Ok(false) => summary.duplicates += 1,
            Err(e) => {
                tracing::warn!(
                    product_order_id = %new_order.product_order_id,
                    error = %e,
                    "failed to record order"
                );
                summary.order_failures += 1;
            }
        }
    }
    Ok(())
}

async fn submit(ctx: &SyncContext, summary: &mut PassSummary) -> anyhow::Result<()> {
    let pending = orderlink_db::list_pending_submissions(&ctx.pool, SUBMIT_BATCH_LIMIT).await?;
    if pending.is_empty() {
        tracing::debug!("no orders awaiting submission");
        return Ok(());
    }

    let delay = Duration::from_millis(ctx.config.submit_delay_ms);
    let mut first = true;

    for row in &pending {
        let (code, submission) = match plan_row(&ctx.catalog, row) {
            RowPlan::Park { code } => {
                tracing::warn!(
                    product_order_id = %row.product_order_id,
                    product_name = %row.product_name,
                    day = row.day,
                    "no catalog entry for listing, flagging for review"
                );
                park(ctx, row, code, summary).await;
                continue;
            }
            RowPlan::Submit { code, submission } => (code, submission),
        };

        if !first && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        first = false;

        let order_tid = ctx.joytel.next_order_tid();
        let submitted = match ctx.joytel.submit_order(&submission, &order_tid).await {
            Ok(submitted) => submitted,
            Err(e) => {
                match on_submit_error(&e) {
                    FailureAction::RetryNextPass => {
                        tracing::warn!(
                            product_order_id = %row.product_order_id,
                            product_code = code,
                            order_tid = %order_tid,
                            error = %e,
                            "fulfillment submission failed, will retry next pass"
                        );
                        summary.order_failures += 1;
                    }
                    FailureAction::Park => {
                        tracing::error!(
                            product_order_id = %row.product_order_id,
                            product_code = code,
                            order_tid = %order_tid,
                            error = %e,
                            "fulfillment submission rejected or outcome unknown, flagging for review"
                        );
                        park(ctx, row, code, summary).await;
                    }
                }
                continue;
            }
        };

        match orderlink_db::set_order_tid(&ctx.pool, &row.product_order_id, &submitted.order_tid, code)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    product_order_id = %row.product_order_id,
                    product_code = code,
                    order_tid = %submitted.order_tid,
                    "order submitted"
                );
                summary.submitted += 1;
            }
            Err(e) => {
                // The partner has the order; resubmitting would duplicate it.
                tracing::error!(
                    product_order_id = %row.product_order_id,
                    order_tid = %submitted.order_tid,
                    error = %e,
                    "order submitted but orderTid was not stored; record it manually"
                );
                summary.order_failures += 1;
            }
        }
    }
    Ok(())
}

/// Flags a row for review so later passes stop picking it up.
async fn park(ctx: &SyncContext, row: &OrderRow, code: &str, summary: &mut PassSummary) {
    match orderlink_db::mark_needs_review(&ctx.pool, &row.product_order_id, code).await {
        Ok(()) => summary.parked += 1,
        Err(e) => {
            tracing::warn!(
                product_order_id = %row.product_order_id,
                error = %e,
                "failed to flag order for review"
            );
            summary.order_failures += 1;
        }
    }
}

/// What the submit step does with one pending row.
#[derive(Debug, PartialEq, Eq)]
enum RowPlan<'a> {
    /// The listing resolved to the fallback code.
    Park { code: &'a str },
    Submit {
        code: &'a str,
        submission: OrderSubmission,
    },
}

fn plan_row<'a>(catalog: &'a Catalog, row: &OrderRow) -> RowPlan<'a> {
    let code = catalog.resolve(Some(row.product_name.as_str()), row.day);
    if code == catalog.fallback {
        RowPlan::Park { code }
    } else {
        RowPlan::Submit {
            code,
            submission: build_submission(row, code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureAction {
    /// The partner never got the request; leave the row pending.
    RetryNextPass,
    /// Rejected, or the partner may hold the order; a fresh `orderTid` next
    /// pass could duplicate it.
    Park,
}

/// Classifies a failed submission once the client's own retries are spent.
fn on_submit_error(err: &JoytelError) -> FailureAction {
    match err {
        JoytelError::Http(e) if e.is_connect() => FailureAction::RetryNextPass,
        JoytelError::Http(e) if e.is_timeout() => FailureAction::Park,
        JoytelError::Http(e) => match e.status() {
            Some(s) if s.is_server_error() || s.as_u16() == 429 => FailureAction::RetryNextPass,
            _ => FailureAction::Park,
        },
        JoytelError::ApiError { .. }
        | JoytelError::Deserialize { .. }
        | JoytelError::InvalidOrder(_)
        | JoytelError::InvalidBaseUrl { .. } => FailureAction::Park,
    }
}

async fn dispatch(ctx: &SyncContext, summary: &mut PassSummary) -> anyhow::Result<()> {
    let candidates =
        orderlink_db::list_dispatch_candidates(&ctx.pool, ctx.config.dispatch_batch_size).await?;
    if candidates.is_empty() {
        tracing::debug!("no orders awaiting dispatch confirmation");
        return Ok(());
    }
    let ids: Vec<String> = candidates
        .into_iter()
        .map(|row| row.product_order_id)
        .collect();

    let token = ctx
        .naver
        .issue_token()
        .await
        .map_err(|e| anyhow::anyhow!("failed to obtain marketplace token: {e}"))?;
    let outcome = ctx
        .naver
        .confirm_dispatch(&token, &ids, Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("dispatch confirmation failed: {e}"))?;

    for failure in &outcome.fail_product_order_infos {
        tracing::warn!(
            product_order_id = %failure.product_order_id,
            code = failure.code.as_deref().unwrap_or_default(),
            message = failure.message.as_deref().unwrap_or_default(),
            "marketplace rejected dispatch"
        );
    }
    summary.dispatch_rejected = outcome.fail_product_order_infos.len();
    summary.dispatched =
        orderlink_db::mark_dispatched(&ctx.pool, &outcome.success_product_order_ids).await?;
    Ok(())
}

async fn fetch_recent_orders(
    naver: &NaverClient,
    config: &AppConfig,
) -> anyhow::Result<Vec<ProductOrder>> {
    let token = naver
        .issue_token()
        .await
        .map_err(|e| anyhow::anyhow!("failed to obtain marketplace token: {e}"))?;
    let since = Utc::now() - chrono::Duration::hours(i64::from(config.order_lookback_hours));
    naver
        .list_changed_orders(&token, since)
        .await
        .map_err(|e| anyhow::anyhow!("failed to list marketplace orders: {e}"))
}

#[derive(Debug, PartialEq, Eq)]
enum Admission {
    Accept(NewOrder),
    /// Carries the marketplace status.
    Inactive(String),
    /// Carries the listing text that matched no region.
    Unsupported(String),
}

/// Decides whether a marketplace order enters the store.
fn admit(order: &ProductOrder, catalog: &Catalog) -> Admission {
    if let Some(status) = order
        .status
        .as_deref()
        .filter(|s| INACTIVE_STATUSES.contains(s))
    {
        return Admission::Inactive(status.to_string());
    }

    let new_order = NewOrder::from_fields(OrderFields {
        product_order_id: &order.product_order_id,
        order_id: &order.order_id,
        orderer_name: order.orderer_name.as_deref(),
        orderer_tel: order.orderer_tel.as_deref(),
        product_name: order.product_name.as_deref(),
        product_option: order.product_option.as_deref(),
        quantity: order.quantity,
    });

    if catalog.region_for(&new_order.product_name).is_none() {
        return Admission::Unsupported(new_order.product_name);
    }
    Admission::Accept(new_order)
}

fn build_submission(row: &OrderRow, product_code: &str) -> OrderSubmission {
    OrderSubmission {
        receive_name: row.orderer_name.clone(),
        phone: dialable_phone(&row.orderer_tel),
        email: row.email.clone(),
        items: vec![OrderItem {
            product_code: product_code.to_string(),
            quantity: row.quantity,
        }],
    }
}

fn build_naver_client(config: &AppConfig) -> anyhow::Result<NaverClient> {
    let (Some(client_id), Some(client_secret)) = (
        config.naver_client_id.as_deref(),
        config.naver_client_secret.as_deref(),
    ) else {
        anyhow::bail!("NAVER_CLIENT_ID and NAVER_CLIENT_SECRET must be set");
    };
    NaverClient::with_base_url(
        client_id,
        client_secret,
        &config.http_settings(),
        &config.naver_api_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Naver client: {e}"))
}

fn build_joytel_client(config: &AppConfig) -> anyhow::Result<JoytelClient> {
    let (Some(customer_code), Some(customer_auth)) = (
        config.joytel_customer_code.clone(),
        config.joytel_customer_auth.clone(),
    ) else {
        anyhow::bail!("JOYTEL_CUSTOMER_CODE and JOYTEL_CUSTOMER_AUTH must be set");
    };
    let credentials = JoytelCredentials {
        customer_code,
        customer_auth,
        warehouse: config.joytel_warehouse.clone(),
    };
    JoytelClient::with_base_url(
        credentials,
        &config.http_settings(),
        &config.joytel_api_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build JoyTel client: {e}"))
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
