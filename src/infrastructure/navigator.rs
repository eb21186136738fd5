//! Where the application currently is, and how it moves.

use tokio::sync::watch;

use crate::routes::Route;

pub trait Navigator: Send + Sync {
    fn current(&self) -> Route;
    fn navigate(&self, to: Route);
}

/// Navigation history; the last entry is the current route.
pub struct History {
    trail: watch::Sender<Vec<Route>>,
}

impl History {
    pub fn new(start: Route) -> Self {
        let (trail, _) = watch::channel(vec![start]);
        Self { trail }
    }

    pub fn entries(&self) -> Vec<Route> {
        self.trail.borrow().clone()
    }

    /// How many times `route` was navigated to, the starting entry included.
    pub fn visits(&self, route: &Route) -> usize {
        self.trail.borrow().iter().filter(|r| *r == route).count()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Route>> {
        self.trail.subscribe()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for History {
    fn current(&self) -> Route {
        self.trail.borrow().last().cloned().unwrap_or(Route::Home)
    }

    fn navigate(&self, to: Route) {
        tracing::debug!("navigate -> {}", to);
        self.trail.send_modify(|trail| trail.push(to));
    }
}
