use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use wirediag::config::AppConfig;
use wirediag::diagnostics::{ClassifierHandle, HeuristicClassifier};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the classifier handle the deployment is configured for. Without a
/// model path the service runs rule-only.
pub(crate) fn classifier_handle(config: &AppConfig) -> ClassifierHandle {
    match &config.model.artifact_path {
        Some(path) => ClassifierHandle::from_artifact(path.clone(), config.model.load_timeout()),
        None => ClassifierHandle::rule_only(),
    }
}

/// Stand-in classifier so demo output shows hybrid fusion without a
/// trained artifact on disk.
pub(crate) fn demo_classifier_handle() -> ClassifierHandle {
    ClassifierHandle::preloaded(Arc::new(HeuristicClassifier))
}
