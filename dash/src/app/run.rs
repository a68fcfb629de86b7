//! Main application run loop

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::app::options::{AppOptions, Mode};
use crate::app::render::{render_deployments, render_replica_view};
use crate::app::state::AppState;
use crate::errors::DashError;
use crate::observe::aggregator::ReplicaAggregator;
use crate::observe::log_stream::LogStream;
use crate::services::navigate::Route;
use crate::workers::refresher;

/// Run one client session
///
/// Ends when the selected mode completes, on the shutdown signal, or with
/// [`DashError::Unauthorized`] once the session has been logged out.
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DashError> {
    let state = AppState::init(&options).await?;
    run_with_state(options, state, shutdown_signal).await
}

pub async fn run_with_state(
    options: AppOptions,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DashError> {
    info!("Starting session for workspace {}", options.workspace.id);

    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone(), options.max_shutdown_delay);
    let mut route = state.navigator.subscribe();

    let result = tokio::select! {
        _ = shutdown_signal => {
            info!("Shutdown signal received, shutting down...");
            Ok(())
        }
        _ = await_login_route(&mut route) => {
            error!("Session is no longer authorized, sign in again");
            Err(DashError::Unauthorized)
        }
        result = run_mode(&options, &state, &shutdown_tx, &mut shutdown_manager) => result,
    };

    drop(shutdown_tx);
    shutdown_manager.shutdown().await;
    result
}

async fn await_login_route(route: &mut watch::Receiver<Route>) {
    let logged_out = route.wait_for(|r| *r == Route::Login).await.is_ok();
    if !logged_out {
        // navigator gone, the session can no longer be logged out
        std::future::pending::<()>().await;
    }
}

async fn run_mode(
    options: &AppOptions,
    state: &AppState,
    shutdown_tx: &broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), DashError> {
    match &options.mode {
        Mode::ListDeployments => list_deployments(state).await,
        Mode::WatchReplicas {
            deployment_id,
            expand,
        } => {
            watch_replicas(
                options,
                state,
                deployment_id,
                expand,
                shutdown_tx,
                shutdown_manager,
            )
            .await
        }
        Mode::TailLog {
            deployment_id,
            replica_id,
        } => tail_log(state, deployment_id, replica_id).await,
    }
}

async fn list_deployments(state: &AppState) -> Result<(), DashError> {
    let deployments = state.http_client.list_deployments().await?;
    print!("{}", render_deployments(&deployments));
    Ok(())
}

async fn watch_replicas(
    options: &AppOptions,
    state: &AppState,
    deployment_id: &str,
    expand: &[String],
    shutdown_tx: &broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), DashError> {
    let aggregator = Arc::new(ReplicaAggregator::new(
        state.http_client.clone(),
        deployment_id,
    ));
    let mut view_rx = aggregator.subscribe();

    shutdown_manager.track(
        "refresher",
        init_refresher_worker(options.refresher.clone(), state, shutdown_tx.subscribe()),
    );
    shutdown_manager.track(
        "replica aggregator",
        init_aggregator(aggregator.clone(), state, shutdown_tx.subscribe()),
    );

    loop {
        for replica_id in expand {
            aggregator.expand(replica_id);
        }
        let view = view_rx.borrow_and_update().clone();
        print!("{}", render_replica_view(deployment_id, &view));
        println!();

        if view_rx.changed().await.is_err() {
            warn!("Replica view closed");
            return Ok(());
        }
    }
}

fn init_refresher_worker(
    options: refresher::Options,
    state: &AppState,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    info!("Initializing refresher worker...");
    let refresher = state.refresher.clone();
    tokio::spawn(async move {
        refresher::run(
            &options,
            refresher.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    })
}

fn init_aggregator(
    aggregator: Arc<ReplicaAggregator>,
    state: &AppState,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    info!("Initializing replica aggregator...");
    let ticks = state.refresher.subscribe();
    tokio::spawn(async move {
        aggregator
            .run(
                ticks,
                Box::pin(async move {
                    let _ = shutdown_rx.recv().await;
                }),
            )
            .await;
    })
}

async fn tail_log(state: &AppState, deployment_id: &str, replica_id: &str) -> Result<(), DashError> {
    let mut stream = LogStream::open(state.http_client.clone(), deployment_id, replica_id);
    let mut printed = 0;
    let mut stdout = std::io::stdout();

    while let Some(record) = stream.next().await {
        let record = record?;
        // the accumulator only grows, print what is new
        if let Some(delta) = record.get(printed..) {
            stdout.write_all(delta.as_bytes())?;
            stdout.flush()?;
        }
        printed = record.len();
    }

    info!("Log stream of {}/{} ended", deployment_id, replica_id);
    Ok(())
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    max_shutdown_delay: Duration,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl ShutdownManager {
    fn new(shutdown_tx: broadcast::Sender<()>, max_shutdown_delay: Duration) -> Self {
        Self {
            shutdown_tx,
            max_shutdown_delay,
            handles: Vec::new(),
        }
    }

    fn track(&mut self, name: &'static str, handle: JoinHandle<()>) {
        self.handles.push((name, handle));
    }

    async fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(());

        for (name, mut handle) in self.handles.drain(..) {
            match tokio::time::timeout(self.max_shutdown_delay, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("{} failed: {}", name, e),
                Err(_) => {
                    warn!("{} did not stop within {:?}, aborting", name, self.max_shutdown_delay);
                    handle.abort();
                }
            }
        }

        info!("Shutdown complete");
    }
}
