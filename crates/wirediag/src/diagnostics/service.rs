use chrono::Utc;
use tracing::{debug, warn};

use super::analyzer::RuleAnalyzer;
use super::catalog::FaultCatalog;
use super::classifier::ClassifierHandle;
use super::domain::{AnalysisMode, DiagnosisReport, DiagnosticInput};
use super::encoder;
use super::export::{self, ExportError};
use super::fusion::{self, FusionSettings};
use super::intake::{IntakeGuard, IntakeViolation};

/// Orchestrates one diagnosis end to end: intake, encoding, rule analysis,
/// classifier prediction, and fusion.
///
/// Rule analysis always runs. The classifier is best-effort: an absent,
/// broken, or failing classifier demotes the report to rule-only instead of
/// surfacing an error to the caller.
pub struct DiagnosisService {
    guard: IntakeGuard,
    analyzer: RuleAnalyzer,
    catalog: FaultCatalog,
    classifier: ClassifierHandle,
    settings: FusionSettings,
}

impl DiagnosisService {
    pub fn new(classifier: ClassifierHandle) -> Self {
        Self::with_settings(classifier, FusionSettings::default())
    }

    pub fn with_settings(classifier: ClassifierHandle, settings: FusionSettings) -> Self {
        Self {
            guard: IntakeGuard::default(),
            analyzer: RuleAnalyzer::standard(),
            catalog: FaultCatalog::standard(),
            classifier,
            settings,
        }
    }

    pub async fn diagnose(
        &self,
        input: DiagnosticInput,
    ) -> Result<DiagnosisReport, DiagnosisError> {
        let profile = self.guard.profile_from_input(input)?;
        let features = encoder::encode(&profile);
        let rule_predictions = self.analyzer.analyze(&profile);

        let (mode, model_predictions) = match self.classifier.acquire().await {
            Some(classifier) => match classifier.predict(&features) {
                Ok(distribution) => (
                    AnalysisMode::Hybrid,
                    distribution.sourced_predictions(self.settings.min_model_confidence),
                ),
                Err(error) => {
                    warn!(%error, "classifier prediction failed; falling back to rule-only");
                    (AnalysisMode::RuleOnly, Vec::new())
                }
            },
            None => (AnalysisMode::RuleOnly, Vec::new()),
        };

        let diagnoses = fusion::fuse(
            &model_predictions,
            &rule_predictions,
            &self.catalog,
            &self.settings,
        );
        debug!(
            mode = mode.label(),
            results = diagnoses.len(),
            "diagnosis complete"
        );

        Ok(DiagnosisReport {
            generated_at: Utc::now(),
            mode,
            diagnoses,
        })
    }

    /// Diagnose and render the report as CSV for download.
    pub async fn export_csv(&self, input: DiagnosticInput) -> Result<String, DiagnosisError> {
        let report = self.diagnose(input).await?;
        Ok(export::render_csv(&report)?)
    }
}

/// Failures surfaced by the diagnosis service.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Export(#[from] ExportError),
}
