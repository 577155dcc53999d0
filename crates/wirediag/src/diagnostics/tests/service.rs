use std::path::PathBuf;
use std::time::Duration;

use super::common::*;

use crate::diagnostics::classifier::ClassifierHandle;
use crate::diagnostics::domain::{AnalysisMode, DiagnosticInput, FaultLabel, PredictionSource};
use crate::diagnostics::service::{DiagnosisError, DiagnosisService};

#[tokio::test]
async fn rule_only_ground_scenario_ranks_ground_circuit_first() {
    let report = rule_only_service()
        .diagnose(ground_input())
        .await
        .expect("diagnosis succeeds");

    assert_eq!(report.mode, AnalysisMode::RuleOnly);
    let top = report.top().expect("at least one diagnosis");
    assert_eq!(top.label, FaultLabel::GroundCircuit);
    // Single source, so the rule confidence passes through untouched.
    assert!((top.confidence - 0.80).abs() < 1e-9);
    assert_eq!(top.sources, vec![PredictionSource::Rule]);
    assert!(!top.recommended_actions.is_empty());
}

#[tokio::test]
async fn hybrid_mode_records_both_sources_on_agreement() {
    let report = hybrid_service()
        .diagnose(battery_input())
        .await
        .expect("diagnosis succeeds");

    assert_eq!(report.mode, AnalysisMode::Hybrid);
    let top = report.top().expect("at least one diagnosis");
    assert_eq!(top.label, FaultLabel::BatteryCharging);
    assert!(top.sources.contains(&PredictionSource::Model));
    assert!(top.sources.contains(&PredictionSource::Rule));
}

#[tokio::test]
async fn confidences_never_exceed_the_ceiling() {
    for input in [battery_input(), ground_input()] {
        let report = hybrid_service()
            .diagnose(input)
            .await
            .expect("diagnosis succeeds");
        for diagnosis in &report.diagnoses {
            assert!(diagnosis.confidence <= 0.95 + 1e-9);
        }
    }
}

#[tokio::test]
async fn vehicle_only_submission_yields_empty_rule_only_report() {
    let report = rule_only_service()
        .diagnose(vehicle_only_input())
        .await
        .expect("diagnosis succeeds");

    assert_eq!(report.mode, AnalysisMode::RuleOnly);
    assert!(report.is_empty());
}

#[tokio::test]
async fn empty_submission_surfaces_intake_violation() {
    match rule_only_service().diagnose(DiagnosticInput::default()).await {
        Err(DiagnosisError::Intake(_)) => {}
        other => panic!("expected intake violation, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_artifact_degrades_to_rule_only() {
    let handle = ClassifierHandle::from_artifact(
        PathBuf::from("/nonexistent/wirediag-model.json"),
        Duration::from_millis(200),
    );
    let service = DiagnosisService::new(handle);

    let report = service
        .diagnose(ground_input())
        .await
        .expect("diagnosis succeeds despite broken artifact");

    assert_eq!(report.mode, AnalysisMode::RuleOnly);
    assert_eq!(
        report.top().expect("ground diagnosis present").label,
        FaultLabel::GroundCircuit
    );
}

#[tokio::test]
async fn export_renders_ranked_rows() {
    let rendered = rule_only_service()
        .export_csv(ground_input())
        .await
        .expect("export succeeds");

    let mut lines = rendered.lines();
    let header = lines.next().expect("has header");
    assert_eq!(
        header,
        "rank,fault,confidence,description,probable_causes,recommended_actions,wiring_sections"
    );
    let first_row = lines.next().expect("one diagnosis row");
    assert!(first_row.starts_with("1,Ground Circuit,0.800"));
}
