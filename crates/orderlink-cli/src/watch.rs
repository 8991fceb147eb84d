//! `watch`: run sync passes on a cron schedule until Ctrl-C or SIGTERM.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::sync::{self, SyncContext};

const ALL_STEPS: sync::Steps = sync::Steps {
    collect: true,
    submit: true,
    dispatch: true,
};

/// Registers the sync job and blocks until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if `schedule` is not a valid six-field cron expression
/// or the scheduler fails to start or stop.
pub(crate) async fn run_watch(context: SyncContext, schedule: &str) -> anyhow::Result<()> {
    let context = Arc::new(context);
    let running = Arc::new(Mutex::new(()));

    let mut scheduler = JobScheduler::new().await?;
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let context = Arc::clone(&context);
        let running = Arc::clone(&running);

        Box::pin(async move {
            let ran = run_exclusive(&running, async {
                tracing::info!("scheduler: starting sync pass");
                let summary = sync::run_pass(&context, ALL_STEPS).await;
                tracing::info!(%summary, "scheduler: sync pass complete");
            })
            .await;
            if !ran {
                tracing::warn!("scheduler: previous sync pass still running; skipping tick");
            }
        })
    })
    .map_err(|e| anyhow::anyhow!("invalid schedule '{schedule}': {e}"))?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!(cron = %schedule, "scheduler: registered sync job");

    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

/// Runs `pass` unless another pass holds `running`. Returns whether it ran.
async fn run_exclusive<F>(running: &Mutex<()>, pass: F) -> bool
where
    F: Future<Output = ()>,
{
    let Ok(_guard) = running.try_lock() else {
        return false;
    };
    pass.await;
    true
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}
