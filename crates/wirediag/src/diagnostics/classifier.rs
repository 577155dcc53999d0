use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::domain::{FaultDistribution, FaultLabel};
use super::encoder::{slot, FeatureVector};
use super::model::LinearSoftmaxClassifier;

/// Errors raised while loading or applying a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("model artifact unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("encoder produces {expected} features but artifact declares {found}")]
    FeatureLenMismatch { expected: usize, found: usize },
    #[error("artifact label {0:?} is not part of the fault taxonomy")]
    UnknownLabel(String),
    #[error("artifact lists label {0:?} more than once")]
    DuplicateLabel(String),
    #[error("artifact declares an empty label list")]
    EmptyLabelList,
    #[error("artifact declares {labels} labels but carries {rows} weight rows")]
    WeightRowCount { labels: usize, rows: usize },
    #[error("weight row {row} has {found} terms, expected {expected}")]
    WeightRowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("artifact declares {labels} labels but carries {terms} bias terms")]
    BiasCount { labels: usize, terms: usize },
}

/// Pluggable prediction capability over the fault taxonomy.
pub trait FaultClassifier: Send + Sync {
    /// Produce a probability distribution for one encoded profile.
    fn predict(&self, features: &FeatureVector) -> Result<FaultDistribution, ClassifierError>;
}

/// Deterministic stand-in classifier for demos and tests. Scores each
/// category from the feature slots directly, with no trained weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl FaultClassifier for HeuristicClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<FaultDistribution, ClassifierError> {
        let values = features.values();
        let battery = values[slot::BATTERY_VOLTAGE];
        let alternator = values[slot::ALTERNATOR_OUTPUT];
        let ground = values[slot::GROUND_RESISTANCE];

        // Distance below/above the neutral midpoint, rescaled to [0, 1].
        let undervolt = (0.5 - battery).max(0.0) * 2.0;
        let undercharge = (0.5 - alternator).max(0.0) * 2.0;
        let high_ground = (ground - 0.5).max(0.0) * 2.0;

        let flag_sum: f64 = values[slot::SYMPTOM_BATTERY..=slot::DTC_NETWORK].iter().sum();
        let activity = flag_sum + undervolt + undercharge + high_ground;

        let mut scores = BTreeMap::new();
        scores.insert(
            FaultLabel::BatteryCharging,
            0.4 + 1.2 * values[slot::SYMPTOM_BATTERY]
                + 0.8 * values[slot::SYMPTOM_CHARGING]
                + undervolt
                + 0.6 * undercharge,
        );
        scores.insert(
            FaultLabel::GroundCircuit,
            0.4 + 1.5 * high_ground + 0.3 * values[slot::SYMPTOM_INTERMITTENT],
        );
        scores.insert(
            FaultLabel::WiringHarness,
            0.4 + 0.7 * values[slot::SYMPTOM_ELECTRICAL] + 0.5 * values[slot::SYMPTOM_INTERMITTENT],
        );
        scores.insert(
            FaultLabel::FuseRelay,
            0.4 + 0.6 * values[slot::SYMPTOM_ELECTRICAL] + 0.5 * values[slot::DTC_BODY],
        );
        scores.insert(
            FaultLabel::LightingSystem,
            0.4 + 1.4 * values[slot::SYMPTOM_LIGHTING],
        );
        scores.insert(
            FaultLabel::SwitchControlModule,
            0.4 + 1.2 * values[slot::DTC_NETWORK] + 0.4 * values[slot::SYMPTOM_ELECTRICAL],
        );
        scores.insert(
            FaultLabel::SensorCircuit,
            0.4 + 0.8 * values[slot::DTC_POWERTRAIN] + 0.6 * values[slot::DTC_CHASSIS],
        );
        scores.insert(
            FaultLabel::NoFaultDetected,
            (1.6 - 0.8 * activity).max(0.1),
        );

        Ok(FaultDistribution::from_scores(scores))
    }
}

/// Where a service obtains its classifier.
pub enum ClassifierSource {
    /// No classifier configured; every diagnosis runs rule-only.
    RuleOnly,
    /// Load a weight artifact from disk on first use.
    Artifact(PathBuf),
    /// Use an already-constructed classifier.
    Preloaded(Arc<dyn FaultClassifier>),
}

const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_millis(1_500);

/// Lazily-resolved classifier shared across diagnosis calls.
///
/// The first `acquire` resolves the source; the outcome, including failure,
/// is cached for the life of the handle. A broken or slow artifact degrades
/// the service to rule-only analysis instead of failing requests.
pub struct ClassifierHandle {
    source: ClassifierSource,
    load_timeout: Duration,
    resolved: OnceCell<Option<Arc<dyn FaultClassifier>>>,
}

impl ClassifierHandle {
    pub fn rule_only() -> Self {
        Self::new(ClassifierSource::RuleOnly, DEFAULT_LOAD_TIMEOUT)
    }

    pub fn from_artifact(path: PathBuf, load_timeout: Duration) -> Self {
        Self::new(ClassifierSource::Artifact(path), load_timeout)
    }

    pub fn preloaded(classifier: Arc<dyn FaultClassifier>) -> Self {
        Self::new(ClassifierSource::Preloaded(classifier), DEFAULT_LOAD_TIMEOUT)
    }

    fn new(source: ClassifierSource, load_timeout: Duration) -> Self {
        Self {
            source,
            load_timeout,
            resolved: OnceCell::new(),
        }
    }

    pub async fn acquire(&self) -> Option<Arc<dyn FaultClassifier>> {
        self.resolved.get_or_init(|| self.initialize()).await.clone()
    }

    async fn initialize(&self) -> Option<Arc<dyn FaultClassifier>> {
        match &self.source {
            ClassifierSource::RuleOnly => None,
            ClassifierSource::Preloaded(classifier) => Some(classifier.clone()),
            ClassifierSource::Artifact(path) => {
                let load = LinearSoftmaxClassifier::load(path);
                match tokio::time::timeout(self.load_timeout, load).await {
                    Ok(Ok(model)) => {
                        info!(path = %path.display(), "model artifact loaded");
                        Some(Arc::new(model) as Arc<dyn FaultClassifier>)
                    }
                    Ok(Err(error)) => {
                        warn!(
                            path = %path.display(),
                            %error,
                            "model artifact rejected; diagnosis continues rule-only"
                        );
                        None
                    }
                    Err(_) => {
                        warn!(
                            path = %path.display(),
                            timeout_ms = self.load_timeout.as_millis() as u64,
                            "model load timed out; diagnosis continues rule-only"
                        );
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::encoder::{encode, FEATURE_LEN};
    use super::super::intake::DiagnosticProfile;
    use super::*;

    fn neutral_features() -> FeatureVector {
        let profile = DiagnosticProfile {
            vehicle: Default::default(),
            symptoms: String::new(),
            trouble_codes: Vec::new(),
            measurements: Default::default(),
        };
        encode(&profile)
    }

    #[test]
    fn heuristic_distribution_sums_to_one() {
        let distribution = HeuristicClassifier
            .predict(&neutral_features())
            .expect("heuristic predicts");
        let total: f64 = distribution.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(distribution.iter().count(), FaultLabel::ALL.len());
    }

    #[test]
    fn quiet_profile_favors_no_fault() {
        let distribution = HeuristicClassifier
            .predict(&neutral_features())
            .expect("heuristic predicts");
        let quiet = distribution.probability(FaultLabel::NoFaultDetected);
        for label in FaultLabel::ALL {
            assert!(quiet >= distribution.probability(label));
        }
    }

    #[test]
    fn feature_len_matches_encoder_layout() {
        assert_eq!(neutral_features().values().len(), FEATURE_LEN);
    }

    #[tokio::test]
    async fn preloaded_handle_resolves_to_classifier() {
        let handle = ClassifierHandle::preloaded(Arc::new(HeuristicClassifier));
        assert!(handle.acquire().await.is_some());
    }

    #[tokio::test]
    async fn rule_only_handle_resolves_to_none() {
        let handle = ClassifierHandle::rule_only();
        assert!(handle.acquire().await.is_none());
    }

    #[tokio::test]
    async fn missing_artifact_resolves_to_none_and_stays_resolved() {
        let handle = ClassifierHandle::from_artifact(
            PathBuf::from("/nonexistent/wirediag-model.json"),
            Duration::from_millis(200),
        );
        assert!(handle.acquire().await.is_none());
        assert!(handle.acquire().await.is_none());
    }
}
