//! Navigation between screens

use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Deployment(String),
    Replica { deployment_id: String, replica_id: String },
}

pub trait Navigator: Send + Sync {
    fn navigate_to(&self, route: Route);
}

/// Publishes the current route on a watch channel
pub struct RouteNavigator {
    tx: watch::Sender<Route>,
}

impl RouteNavigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Route {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }
}

impl Navigator for RouteNavigator {
    fn navigate_to(&self, route: Route) {
        info!("Navigating to {:?}", route);
        self.tx.send_replace(route);
    }
}
