//! Navigation side effects
//!
//! The gate and the API client never move the user themselves; they ask a
//! `Navigator` to. A graphical shell would swap pages, the command-line
//! shell records the redirect and reports it.

use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::routes::Route;

pub trait Navigator: Send + Sync {
    /// Leave the current page for `route`.
    fn navigate(&self, route: &Route);
}

/// Navigator that keeps the history of every navigation it was asked for.
#[derive(Default)]
pub struct NavigationLog {
    visits: Mutex<Vec<Route>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<Route> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, route: &Route) {
        info!(path = %route, "navigating");
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_visits_in_order() {
        let log = NavigationLog::new();
        assert!(log.last().is_none());
        log.navigate(&Route::Jobs);
        log.navigate(&Route::login());
        assert_eq!(log.visits(), vec![Route::Jobs, Route::login()]);
        assert_eq!(log.last(), Some(Route::login()));
    }

    #[test]
    fn usable_as_trait_object() {
        let log = std::sync::Arc::new(NavigationLog::new());
        let navigator: std::sync::Arc<dyn Navigator> = log.clone();
        navigator.navigate(&Route::Home);
        assert_eq!(log.visits().len(), 1);
    }
}
