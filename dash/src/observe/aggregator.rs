//! Replica readiness view of one deployment
//!
//! On every refresh tick the replica list and the readiness mapping are
//! fetched concurrently and joined into issue-annotated rows. A new tick
//! drops the join still in flight, so the view always reflects the latest
//! tick rather than whichever request finished last.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use openapi_client::models::{DeploymentReadiness, Replica};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::DashError;
use crate::http::client::HttpClient;
use crate::observe::rows::{any_issues, build_rows, ExpandedRows, ReplicaRow};

/// Where replica and readiness data come from
#[async_trait]
pub trait ReplicaSource: Send + Sync {
    async fn list_replicas(&self, deployment_id: &str) -> Result<Vec<Replica>, DashError>;

    async fn get_readiness(&self, deployment_id: &str) -> Result<DeploymentReadiness, DashError>;
}

#[async_trait]
impl ReplicaSource for HttpClient {
    async fn list_replicas(&self, deployment_id: &str) -> Result<Vec<Replica>, DashError> {
        self.list_deployment_replicas(deployment_id).await
    }

    async fn get_readiness(&self, deployment_id: &str) -> Result<DeploymentReadiness, DashError> {
        self.get_deployment_readiness(deployment_id).await
    }
}

/// What a replica table shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaView {
    /// True until the first refresh resolves
    pub loading: bool,
    /// Whether any replica has at least one non-ready entry
    pub has_issues: bool,
    pub rows: Vec<ReplicaRow>,
    pub expanded: ExpandedRows,
    /// Tick whose results are shown
    pub generation: u64,
    /// Error of the latest failed refresh; rows from before stay in place
    pub last_error: Option<String>,
    pub(crate) loaded: bool,
}

impl Default for ReplicaView {
    fn default() -> Self {
        Self {
            loading: true,
            has_issues: false,
            rows: Vec::new(),
            expanded: ExpandedRows::new(),
            generation: 0,
            last_error: None,
            loaded: false,
        }
    }
}

impl ReplicaView {
    pub fn row(&self, replica_id: &str) -> Option<&ReplicaRow> {
        self.rows.iter().find(|r| r.id() == replica_id)
    }

    pub fn is_expanded(&self, replica_id: &str) -> bool {
        self.expanded.contains(replica_id)
    }
}

type Join = BoxFuture<'static, Result<(Vec<Replica>, DeploymentReadiness), DashError>>;

struct InFlight {
    tick: u64,
    join: Join,
}

pub struct ReplicaAggregator {
    source: Arc<dyn ReplicaSource>,
    deployment_id: String,
    view: watch::Sender<ReplicaView>,
}

impl ReplicaAggregator {
    pub fn new(source: Arc<dyn ReplicaSource>, deployment_id: impl Into<String>) -> Self {
        let (view, _) = watch::channel(ReplicaView::default());
        Self {
            source,
            deployment_id: deployment_id.into(),
            view,
        }
    }

    pub fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    pub fn subscribe(&self) -> watch::Receiver<ReplicaView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> ReplicaView {
        self.view.borrow().clone()
    }

    /// Expand the issue list of a replica; only rows with issues expand.
    /// Returns whether the row is expanded afterwards.
    pub fn expand(&self, replica_id: &str) -> bool {
        self.view.send_if_modified(|view| {
            let expandable = view.row(replica_id).is_some_and(ReplicaRow::has_issues);
            if !expandable || view.expanded.contains(replica_id) {
                return false;
            }
            view.expanded.expand(replica_id);
            true
        });
        self.view.borrow().is_expanded(replica_id)
    }

    pub fn collapse(&self, replica_id: &str) {
        self.view.send_if_modified(|view| {
            if !view.expanded.contains(replica_id) {
                return false;
            }
            view.expanded.collapse(replica_id);
            true
        });
    }

    /// Flip the expanded state of a row; returns the new state
    pub fn toggle(&self, replica_id: &str) -> bool {
        if self.view.borrow().is_expanded(replica_id) {
            self.collapse(replica_id);
            false
        } else {
            self.expand(replica_id)
        }
    }

    /// Refresh on every tick until shutdown or until the tick source closes
    ///
    /// The tick current at start is fetched right away.
    pub async fn run(
        &self,
        mut ticks: watch::Receiver<u64>,
        mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
    ) {
        info!("Replica aggregator starting for deployment {}", self.deployment_id);

        let first = *ticks.borrow_and_update();
        let mut in_flight = Some(self.start(first));

        loop {
            tokio::select! {
                _ = &mut shutdown_signal => {
                    info!("Replica aggregator shutting down...");
                    return;
                }
                changed = ticks.changed() => {
                    if changed.is_err() {
                        info!("Refresh source closed, replica aggregator stopping");
                        return;
                    }
                    let tick = *ticks.borrow_and_update();
                    if let Some(previous) = in_flight.take() {
                        debug!("Refresh {} superseded by {}", previous.tick, tick);
                    }
                    in_flight = Some(self.start(tick));
                }
                result = poll_in_flight(&mut in_flight) => {
                    if let Some(done) = in_flight.take() {
                        self.apply(done.tick, result);
                    }
                }
            }
        }
    }

    fn start(&self, tick: u64) -> InFlight {
        self.view.send_if_modified(|view| {
            if view.loaded || view.loading {
                return false;
            }
            view.loading = true;
            true
        });

        let source = self.source.clone();
        let deployment_id = self.deployment_id.clone();
        let join = async move {
            future::try_join(
                source.list_replicas(&deployment_id),
                source.get_readiness(&deployment_id),
            )
            .await
        }
        .boxed();

        InFlight { tick, join }
    }

    fn apply(&self, tick: u64, result: Result<(Vec<Replica>, DeploymentReadiness), DashError>) {
        match result {
            Ok((replicas, readiness)) => {
                let rows = build_rows(replicas, &readiness);
                let has_issues = any_issues(&rows);
                debug!(
                    "Refresh {} of {}: {} replicas, issues: {}",
                    tick,
                    self.deployment_id,
                    rows.len(),
                    has_issues
                );
                self.view.send_modify(|view| {
                    view.expanded.prune(&rows);
                    view.rows = rows;
                    view.has_issues = has_issues;
                    view.generation = tick;
                    view.loading = false;
                    view.loaded = true;
                    view.last_error = None;
                });
            }
            Err(e) => {
                warn!("Refresh {} of {} failed: {}", tick, self.deployment_id, e);
                self.view.send_modify(|view| {
                    view.loading = false;
                    view.last_error = Some(e.to_string());
                });
            }
        }
    }
}

async fn poll_in_flight(
    slot: &mut Option<InFlight>,
) -> Result<(Vec<Replica>, DeploymentReadiness), DashError> {
    match slot {
        Some(in_flight) => (&mut in_flight.join).await,
        None => future::pending().await,
    }
}
