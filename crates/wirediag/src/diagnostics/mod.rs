//! Electrical fault diagnosis engine.
//!
//! A submission flows through the intake guard, is encoded into a fixed
//! feature vector, scored independently by the rule analyzer and an optional
//! classifier, and the two prediction sets are fused into a ranked list of
//! catalog-annotated diagnoses.

pub mod analyzer;
pub mod catalog;
pub mod classifier;
pub mod domain;
pub mod encoder;
pub mod export;
pub mod fusion;
pub mod intake;
pub mod model;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analyzer::{RuleAnalyzer, RuleFinding};
pub use catalog::{CatalogEntry, FaultCatalog};
pub use classifier::{
    ClassifierError, ClassifierHandle, ClassifierSource, FaultClassifier, HeuristicClassifier,
};
pub use domain::{
    AnalysisMode, DiagnosisReport, DiagnosticInput, FaultDistribution, FaultLabel, Measurements,
    PredictionSource, RankedDiagnosis, SourcedPrediction, VehicleInfo,
};
pub use encoder::{encode, FeatureVector, FEATURE_LEN};
pub use export::{render_csv, ExportError};
pub use fusion::{fuse, FusionSettings};
pub use intake::{DiagnosticProfile, IntakeGuard, IntakePolicy, IntakeViolation};
pub use model::{LinearSoftmaxClassifier, ModelArtifact};
pub use router::diagnosis_router;
pub use service::{DiagnosisError, DiagnosisService};
