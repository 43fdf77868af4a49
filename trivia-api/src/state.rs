use app_core::metrics::PrometheusHandle;
use std::sync::Arc;

use crate::storage::TriviaStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TriviaStore>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Arc<dyn TriviaStore>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
