use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::classifier::{ClassifierError, FaultClassifier};
use super::domain::{FaultDistribution, FaultLabel};
use super::encoder::{FeatureVector, FEATURE_LEN};

/// On-disk JSON layout for trained linear-softmax weights.
///
/// `labels` carries the model's output order; when absent, rows are taken
/// to follow the taxonomy's declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub feature_len: usize,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Linear scorer with a softmax head over the fault taxonomy.
pub struct LinearSoftmaxClassifier {
    labels: Vec<FaultLabel>,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl LinearSoftmaxClassifier {
    /// Read and validate a weight artifact from disk.
    pub async fn load(path: &Path) -> Result<Self, ClassifierError> {
        let raw = tokio::fs::read(path).await?;
        let artifact: ModelArtifact = serde_json::from_slice(&raw)?;
        Self::from_artifact(artifact)
    }

    /// Validate an artifact against the encoder layout and the taxonomy.
    /// Every shape mismatch is rejected here so `predict` never indexes
    /// out of bounds.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        if artifact.feature_len != FEATURE_LEN {
            return Err(ClassifierError::FeatureLenMismatch {
                expected: FEATURE_LEN,
                found: artifact.feature_len,
            });
        }

        let labels = match artifact.labels {
            Some(names) => {
                if names.is_empty() {
                    return Err(ClassifierError::EmptyLabelList);
                }
                let mut labels = Vec::with_capacity(names.len());
                for name in names {
                    let label = FaultLabel::parse(&name)
                        .ok_or_else(|| ClassifierError::UnknownLabel(name.clone()))?;
                    if labels.contains(&label) {
                        return Err(ClassifierError::DuplicateLabel(name));
                    }
                    labels.push(label);
                }
                labels
            }
            None => FaultLabel::ALL.to_vec(),
        };

        if artifact.weights.len() != labels.len() {
            return Err(ClassifierError::WeightRowCount {
                labels: labels.len(),
                rows: artifact.weights.len(),
            });
        }
        for (row, weights) in artifact.weights.iter().enumerate() {
            if weights.len() != FEATURE_LEN {
                return Err(ClassifierError::WeightRowWidth {
                    row,
                    expected: FEATURE_LEN,
                    found: weights.len(),
                });
            }
        }
        if artifact.bias.len() != labels.len() {
            return Err(ClassifierError::BiasCount {
                labels: labels.len(),
                terms: artifact.bias.len(),
            });
        }

        Ok(Self {
            labels,
            weights: artifact.weights,
            bias: artifact.bias,
        })
    }
}

impl FaultClassifier for LinearSoftmaxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<FaultDistribution, ClassifierError> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, bias)| {
                bias + row
                    .iter()
                    .zip(features.values())
                    .map(|(weight, value)| weight * value)
                    .sum::<f64>()
            })
            .collect();

        // Subtract the peak logit before exponentiating to keep softmax stable.
        let peak = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let scores: BTreeMap<FaultLabel, f64> = self
            .labels
            .iter()
            .zip(&logits)
            .map(|(label, logit)| (*label, (logit - peak).exp()))
            .collect();

        Ok(FaultDistribution::from_scores(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::super::encoder::{encode, slot};
    use super::super::intake::DiagnosticProfile;
    use super::*;

    fn artifact() -> ModelArtifact {
        ModelArtifact {
            feature_len: FEATURE_LEN,
            labels: None,
            weights: vec![vec![0.0; FEATURE_LEN]; FaultLabel::ALL.len()],
            bias: vec![0.0; FaultLabel::ALL.len()],
        }
    }

    fn neutral_features() -> FeatureVector {
        encode(&DiagnosticProfile {
            vehicle: Default::default(),
            symptoms: String::new(),
            trouble_codes: Vec::new(),
            measurements: Default::default(),
        })
    }

    #[test]
    fn accepts_well_formed_artifact_without_labels() {
        let classifier =
            LinearSoftmaxClassifier::from_artifact(artifact()).expect("valid artifact");
        assert_eq!(classifier.labels, FaultLabel::ALL.to_vec());
    }

    #[test]
    fn rejects_feature_len_mismatch() {
        let mut bad = artifact();
        bad.feature_len = 15;
        match LinearSoftmaxClassifier::from_artifact(bad) {
            Err(ClassifierError::FeatureLenMismatch { expected, found }) => {
                assert_eq!(expected, FEATURE_LEN);
                assert_eq!(found, 15);
            }
            other => panic!("expected feature length rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_label() {
        let mut bad = artifact();
        bad.labels = Some(vec!["transmission".to_string()]);
        match LinearSoftmaxClassifier::from_artifact(bad) {
            Err(ClassifierError::UnknownLabel(name)) => assert_eq!(name, "transmission"),
            other => panic!("expected unknown label rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_label() {
        let mut bad = artifact();
        bad.labels = Some(vec![
            "battery_charging".to_string(),
            "battery_charging".to_string(),
        ]);
        bad.weights = vec![vec![0.0; FEATURE_LEN]; 2];
        bad.bias = vec![0.0; 2];
        match LinearSoftmaxClassifier::from_artifact(bad) {
            Err(ClassifierError::DuplicateLabel(name)) => assert_eq!(name, "battery_charging"),
            other => panic!("expected duplicate label rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_label_list() {
        let mut bad = artifact();
        bad.labels = Some(Vec::new());
        bad.weights = Vec::new();
        bad.bias = Vec::new();
        match LinearSoftmaxClassifier::from_artifact(bad) {
            Err(ClassifierError::EmptyLabelList) => {}
            other => panic!("expected empty label rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_ragged_weight_rows() {
        let mut bad = artifact();
        bad.weights[3] = vec![0.0; FEATURE_LEN - 1];
        match LinearSoftmaxClassifier::from_artifact(bad) {
            Err(ClassifierError::WeightRowWidth { row, expected, found }) => {
                assert_eq!(row, 3);
                assert_eq!(expected, FEATURE_LEN);
                assert_eq!(found, FEATURE_LEN - 1);
            }
            other => panic!("expected row width rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bias_count_mismatch() {
        let mut bad = artifact();
        bad.bias = vec![0.0; 3];
        match LinearSoftmaxClassifier::from_artifact(bad) {
            Err(ClassifierError::BiasCount { labels, terms }) => {
                assert_eq!(labels, FaultLabel::ALL.len());
                assert_eq!(terms, 3);
            }
            other => panic!("expected bias count rejection, got {other:?}"),
        }
    }

    #[test]
    fn softmax_output_sums_to_one() {
        let mut raw = artifact();
        raw.bias = (0..FaultLabel::ALL.len()).map(|i| i as f64).collect();
        let classifier = LinearSoftmaxClassifier::from_artifact(raw).expect("valid artifact");
        let distribution = classifier.predict(&neutral_features()).expect("predicts");
        let total: f64 = distribution.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_slot_drives_its_label() {
        let mut raw = artifact();
        // Battery row keys on the battery symptom flag.
        raw.weights[0][slot::SYMPTOM_BATTERY] = 6.0;
        let classifier = LinearSoftmaxClassifier::from_artifact(raw).expect("valid artifact");

        let features = encode(&DiagnosticProfile {
            vehicle: Default::default(),
            symptoms: "dead battery".to_string(),
            trouble_codes: Vec::new(),
            measurements: Default::default(),
        });
        let distribution = classifier.predict(&features).expect("predicts");
        let battery = distribution.probability(FaultLabel::BatteryCharging);
        for label in FaultLabel::ALL.iter().skip(1) {
            assert!(battery > distribution.probability(*label));
        }
        assert!(battery > 0.9);
    }
}
