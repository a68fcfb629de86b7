//! Replica aggregator tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lepdash::errors::DashError;
use lepdash::observe::aggregator::{ReplicaAggregator, ReplicaSource, ReplicaView};
use lepdash::workers::refresher::Refresher;
use openapi_client::models::{DeploymentReadiness, ReadinessEntry, ReadinessReason, Replica};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// One refresh worth of backend answers
#[derive(Clone)]
struct Step {
    delay: Duration,
    replicas: Vec<&'static str>,
    /// replica id -> number of non-ready entries
    issues: Vec<(&'static str, usize)>,
    fail: bool,
}

impl Step {
    fn ok(replicas: Vec<&'static str>, issues: Vec<(&'static str, usize)>) -> Self {
        Self {
            delay: Duration::from_millis(100),
            replicas,
            issues,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok(vec![], vec![])
        }
    }

    fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Answers the n-th refresh with the n-th step
struct ScriptedSource {
    steps: Vec<Step>,
    list_calls: AtomicUsize,
    readiness_calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps,
            list_calls: AtomicUsize::new(0),
            readiness_calls: AtomicUsize::new(0),
        })
    }

    fn step(&self, counter: &AtomicUsize) -> Step {
        let idx = counter.fetch_add(1, Ordering::SeqCst);
        self.steps
            .get(idx)
            .or_else(|| self.steps.last())
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl ReplicaSource for ScriptedSource {
    async fn list_replicas(&self, _deployment_id: &str) -> Result<Vec<Replica>, DashError> {
        let step = self.step(&self.list_calls);
        tokio::time::sleep(step.delay).await;
        if step.fail {
            return Err(DashError::Internal("replicas unavailable".to_string()));
        }
        Ok(step
            .replicas
            .iter()
            .map(|id| Replica { id: id.to_string() })
            .collect())
    }

    async fn get_readiness(&self, _deployment_id: &str) -> Result<DeploymentReadiness, DashError> {
        let step = self.step(&self.readiness_calls);
        tokio::time::sleep(step.delay).await;
        let mut readiness = DeploymentReadiness::new();
        for id in &step.replicas {
            let count = step
                .issues
                .iter()
                .find(|(r, _)| r == id)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            let mut entries = vec![ReadinessEntry {
                reason: ReadinessReason::Ready,
                message: None,
            }];
            entries.extend((0..count).map(|_| ReadinessEntry {
                reason: ReadinessReason::NoCapacity,
                message: Some("no gpu".to_string()),
            }));
            readiness.insert(id.to_string(), entries);
        }
        Ok(readiness)
    }
}

struct Harness {
    aggregator: Arc<ReplicaAggregator>,
    refresher: Refresher,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

fn start(source: Arc<ScriptedSource>) -> Harness {
    let aggregator = Arc::new(ReplicaAggregator::new(source, "dep"));
    let refresher = Refresher::new();
    let (shutdown, shutdown_rx) = oneshot::channel::<()>();

    let runner = aggregator.clone();
    let ticks = refresher.subscribe();
    let task = tokio::spawn(async move {
        runner
            .run(
                ticks,
                Box::pin(async move {
                    let _ = shutdown_rx.await;
                }),
            )
            .await;
    });

    Harness {
        aggregator,
        refresher,
        shutdown: Some(shutdown),
        task,
    }
}

async fn settled(aggregator: &ReplicaAggregator, generation: u64) -> ReplicaView {
    let mut rx = aggregator.subscribe();
    let view = rx
        .wait_for(|v| !v.loading && (v.generation >= generation || v.last_error.is_some()))
        .await
        .unwrap()
        .clone();
    view
}

fn ids(view: &ReplicaView) -> Vec<&str> {
    view.rows.iter().map(|r| r.id()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_first_refresh_builds_sorted_rows() {
    let source = ScriptedSource::new(vec![Step::ok(
        vec!["r1", "r2", "r3"],
        vec![("r2", 1), ("r3", 2)],
    )]);
    let harness = start(source);
    assert!(harness.aggregator.view().loading);

    let view = settled(&harness.aggregator, 0).await;
    assert_eq!(ids(&view), vec!["r3", "r2", "r1"]);
    assert!(view.has_issues);
    assert_eq!(view.generation, 0);
    assert!(view.last_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_new_tick_supersedes_slow_refresh() {
    let source = ScriptedSource::new(vec![
        Step::ok(vec!["old"], vec![]).after(Duration::from_secs(10)),
        Step::ok(vec!["new"], vec![]).after(Duration::from_secs(1)),
    ]);
    let harness = start(source.clone());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(harness.refresher.refresh(), 1);

    let view = settled(&harness.aggregator, 1).await;
    assert_eq!(view.generation, 1);
    assert_eq!(ids(&view), vec!["new"]);

    // the superseded join never lands
    tokio::time::sleep(Duration::from_secs(30)).await;
    let view = harness.aggregator.view();
    assert_eq!(view.generation, 1);
    assert_eq!(ids(&view), vec!["new"]);
    assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_error_keeps_previous_rows() {
    let source = ScriptedSource::new(vec![
        Step::ok(vec!["r1", "r2"], vec![("r1", 1)]),
        Step::failing(),
    ]);
    let harness = start(source);

    settled(&harness.aggregator, 0).await;
    assert!(harness.aggregator.expand("r1"));

    harness.refresher.refresh();
    let view = settled(&harness.aggregator, 1).await;
    assert!(!view.loading);
    assert_eq!(view.last_error.as_deref(), Some("Internal error: replicas unavailable"));
    assert_eq!(ids(&view), vec!["r1", "r2"]);
    assert_eq!(view.generation, 0);
    assert!(view.is_expanded("r1"));
}

#[tokio::test(start_paused = true)]
async fn test_only_rows_with_issues_expand() {
    let source = ScriptedSource::new(vec![Step::ok(vec!["sick", "fine"], vec![("sick", 2)])]);
    let harness = start(source);
    settled(&harness.aggregator, 0).await;

    assert!(!harness.aggregator.expand("fine"));
    assert!(!harness.aggregator.expand("missing"));
    assert!(harness.aggregator.toggle("sick"));
    assert!(harness.aggregator.view().is_expanded("sick"));
    assert!(!harness.aggregator.toggle("sick"));
    assert!(harness.aggregator.view().expanded.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_expanded_rows_clear_when_issues_resolve() {
    let source = ScriptedSource::new(vec![
        Step::ok(vec!["r1", "r2"], vec![("r1", 1), ("r2", 1)]),
        Step::ok(vec!["r2"], vec![("r2", 1)]),
        Step::ok(vec!["r2"], vec![]),
    ]);
    let harness = start(source);
    settled(&harness.aggregator, 0).await;
    harness.aggregator.expand("r1");
    harness.aggregator.expand("r2");

    // r1 is gone from readiness
    harness.refresher.refresh();
    let view = settled(&harness.aggregator, 1).await;
    assert_eq!(view.expanded.keys(), ["r2".to_string()]);

    // nothing has issues any more
    harness.refresher.refresh();
    let view = settled(&harness.aggregator, 2).await;
    assert!(!view.has_issues);
    assert!(view.expanded.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_healthy_replica_collapses_while_others_have_issues() {
    let source = ScriptedSource::new(vec![
        Step::ok(vec!["r1", "r2"], vec![("r1", 2), ("r2", 1)]),
        Step::ok(vec!["r1", "r2"], vec![("r1", 0), ("r2", 1)]),
    ]);
    let harness = start(source);
    settled(&harness.aggregator, 0).await;
    assert!(harness.aggregator.expand("r1"));
    assert!(harness.aggregator.expand("r2"));

    harness.refresher.refresh();
    let view = settled(&harness.aggregator, 1).await;
    assert!(view.has_issues);
    assert!(!view.is_expanded("r1"));
    assert!(view.is_expanded("r2"));
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_on_shutdown_and_on_closed_ticks() {
    let source = ScriptedSource::new(vec![Step::ok(vec!["r1"], vec![])]);
    let mut harness = start(source.clone());
    settled(&harness.aggregator, 0).await;

    if let Some(shutdown) = harness.shutdown.take() {
        shutdown.send(()).unwrap();
    }
    harness.task.await.unwrap();

    let harness = start(source);
    settled(&harness.aggregator, 0).await;
    let Harness {
        refresher,
        task,
        shutdown: _shutdown,
        ..
    } = harness;
    drop(refresher);
    task.await.unwrap();
}
