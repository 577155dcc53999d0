use std::collections::BTreeMap;

use super::catalog::FaultCatalog;
use super::domain::{FaultLabel, PredictionSource, RankedDiagnosis, SourcedPrediction};

/// Dials controlling prediction fusion and ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionSettings {
    /// Multiplier applied when both sources propose the same label.
    pub agreement_boost: f64,
    /// Hard upper bound on any fused confidence, so agreement never
    /// manufactures certainty.
    pub confidence_ceiling: f64,
    /// Maximum number of ranked diagnoses in a report.
    pub max_results: usize,
    /// Model probabilities below this floor are dropped before fusion.
    pub min_model_confidence: f64,
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            agreement_boost: 1.2,
            confidence_ceiling: 0.95,
            max_results: 5,
            min_model_confidence: 0.10,
        }
    }
}

/// Merge model and rule predictions into a ranked, annotated diagnosis list.
///
/// Predictions group by label; each label's confidence is the arithmetic
/// mean of its contributions, boosted when both sources agree. Results sort
/// by confidence descending, with ties broken by taxonomy declaration order
/// so equal-confidence output is stable across runs.
pub fn fuse(
    model: &[SourcedPrediction],
    rules: &[SourcedPrediction],
    catalog: &FaultCatalog,
    settings: &FusionSettings,
) -> Vec<RankedDiagnosis> {
    let mut grouped: BTreeMap<FaultLabel, Vec<&SourcedPrediction>> = BTreeMap::new();
    for prediction in model.iter().chain(rules) {
        grouped.entry(prediction.label).or_default().push(prediction);
    }

    let mut ranked: Vec<RankedDiagnosis> = grouped
        .into_iter()
        .map(|(label, contributions)| {
            let mean = contributions.iter().map(|p| p.confidence).sum::<f64>()
                / contributions.len() as f64;

            let mut sources: Vec<PredictionSource> =
                contributions.iter().map(|p| p.source).collect();
            sources.dedup();

            let agreed = sources.contains(&PredictionSource::Model)
                && sources.contains(&PredictionSource::Rule);
            let confidence = if agreed {
                mean * settings.agreement_boost
            } else {
                mean
            };
            let confidence = confidence.min(settings.confidence_ceiling);

            let entry = catalog.entry(label);
            RankedDiagnosis {
                label,
                confidence,
                description: entry.description,
                probable_causes: entry.probable_causes.clone(),
                recommended_actions: entry.recommended_actions.clone(),
                wiring_sections: entry.wiring_sections.clone(),
                sources,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.label.cmp(&b.label))
    });
    ranked.truncate(settings.max_results);
    ranked
}
