//! Readiness tracking.
//!
//! Components register themselves at startup and flip to ready once they can do
//! useful work. The process is ready when every registered component is.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::models::ReadinessResponse;

#[derive(Debug, Default)]
pub struct ReadinessTracker {
    components: RwLock<BTreeMap<String, bool>>,
}

impl ReadinessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `component` as not ready. Registering twice keeps the current state.
    pub fn register(&self, component: &str) {
        self.components
            .write()
            .entry(component.to_string())
            .or_insert(false);
    }

    pub fn set_ready(&self, component: &str) {
        self.set(component, true);
    }

    pub fn set_not_ready(&self, component: &str) {
        self.set(component, false);
    }

    fn set(&self, component: &str, ready: bool) {
        let mut components = self.components.write();
        match components.get_mut(component) {
            Some(state) => *state = ready,
            None => {
                tracing::warn!(component, "readiness update for unregistered component");
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.components.read().values().all(|ready| *ready)
    }

    /// Components that are registered but not ready, in name order.
    pub fn pending(&self) -> Vec<String> {
        self.components
            .read()
            .iter()
            .filter(|(_, ready)| !**ready)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn report(&self) -> ReadinessResponse {
        let pending = self.pending();
        ReadinessResponse {
            ready: pending.is_empty(),
            pending,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
