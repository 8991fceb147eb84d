use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod catalog;
mod orders;
mod sync;
mod watch;

#[derive(Debug, Parser)]
#[command(name = "orderlink")]
#[command(about = "Marketplace to eSIM fulfillment order sync")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one sync pass: collect, submit, dispatch
    Sync {
        /// Fetch and resolve orders without writing or submitting anything
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        skip_collect: bool,
        #[arg(long)]
        skip_submit: bool,
        #[arg(long)]
        skip_dispatch: bool,
    },
    /// Run sync passes on a cron schedule until interrupted
    Watch {
        /// Six-field cron expression; defaults to ORDERLINK_SCHEDULE
        #[arg(long)]
        schedule: Option<String>,
    },
    /// Resolve a listing text and day count to a catalog code
    Resolve { listing: String, days: i64 },
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Database operations
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Inspect or repair individual orders
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCommands {
    /// Validate a catalog file (the active catalog when no path is given)
    Check {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Print every region, plan and duration entry
    Show,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[derive(Debug, Subcommand)]
enum OrdersCommands {
    /// Print the stored row for a product order id
    Show { product_order_id: String },
    /// Clear the review flag so the next pass resolves the order again
    Requeue { product_order_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `resolve` and `catalog` work without a database or credentials.
    let catalog_path = orderlink_core::load_catalog_path();
    let command = match cli.command {
        None => {
            println!("orderlink: use --help to list commands");
            return Ok(());
        }
        Some(Commands::Resolve { listing, days }) => {
            init_tracing("warn")?;
            return catalog::run_resolve(catalog_path.as_deref(), &listing, days);
        }
        Some(Commands::Catalog { command }) => {
            init_tracing("warn")?;
            return match command {
                CatalogCommands::Check { path } => {
                    catalog::run_check(path.as_deref().or(catalog_path.as_deref()))
                }
                CatalogCommands::Show => catalog::run_show(catalog_path.as_deref()),
            };
        }
        Some(command) => command,
    };

    let config = orderlink_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    tracing::debug!(?config, "configuration loaded");

    match command {
        Commands::Sync {
            dry_run,
            skip_collect,
            skip_submit,
            skip_dispatch,
        } => {
            let steps = sync::Steps {
                collect: !skip_collect,
                submit: !skip_submit,
                dispatch: !skip_dispatch,
            };
            if dry_run {
                sync::run_dry_run(&config).await
            } else {
                let context = sync::SyncContext::connect(config).await?;
                let summary = sync::run_pass(&context, steps).await;
                println!("{summary}");
                Ok(())
            }
        }
        Commands::Watch { schedule } => {
            let schedule = schedule.unwrap_or_else(|| config.schedule.clone());
            let context = sync::SyncContext::connect(config).await?;
            watch::run_watch(context, &schedule).await
        }
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    orderlink_db::ping(&pool).await?;
                    println!("database reachable");
                }
                DbCommands::Migrate => {
                    let applied = orderlink_db::run_migrations(&pool).await?;
                    println!("migrations up to date ({applied} applied)");
                }
            }
            Ok(())
        }
        Commands::Orders { command } => {
            let pool = connect(&config).await?;
            match command {
                OrdersCommands::Show { product_order_id } => {
                    orders::run_show(&pool, &product_order_id).await
                }
                OrdersCommands::Requeue { product_order_id } => {
                    orders::run_requeue(&pool, &product_order_id).await
                }
            }
        }
        Commands::Resolve { .. } | Commands::Catalog { .. } => Ok(()),
    }
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

async fn connect(config: &orderlink_core::AppConfig) -> anyhow::Result<sqlx::MySqlPool> {
    let pool_config = orderlink_db::PoolConfig::from_app_config(config);
    let pool = orderlink_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests;
