use super::common::*;

use crate::diagnostics::analyzer::RuleAnalyzer;
use crate::diagnostics::domain::{DiagnosticInput, FaultLabel, Measurements, PredictionSource};

#[test]
fn battery_keywords_alone_reach_threshold() {
    let analyzer = RuleAnalyzer::standard();
    let predictions = analyzer.analyze(&profile(battery_input()));

    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].label, FaultLabel::BatteryCharging);
    assert!((predictions[0].confidence - 0.85).abs() < 1e-9);
    assert_eq!(predictions[0].source, PredictionSource::Rule);
}

#[test]
fn voltage_exactly_at_threshold_scores_nothing() {
    let analyzer = RuleAnalyzer::standard();
    let input = DiagnosticInput {
        measurements: Measurements {
            battery_voltage: Some(12.0),
            ..Measurements::default()
        },
        ..DiagnosticInput::default()
    };
    assert!(analyzer.analyze(&profile(input)).is_empty());
}

#[test]
fn low_voltage_and_weak_charging_accumulate() {
    let analyzer = RuleAnalyzer::standard();
    let input = DiagnosticInput {
        measurements: Measurements {
            battery_voltage: Some(11.9),
            alternator_output: Some(13.0),
            ..Measurements::default()
        },
        ..DiagnosticInput::default()
    };
    let predictions = analyzer.analyze(&profile(input));

    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].label, FaultLabel::BatteryCharging);
}

#[test]
fn overcharge_alone_stays_below_threshold() {
    let analyzer = RuleAnalyzer::standard();
    let input = DiagnosticInput {
        measurements: Measurements {
            battery_voltage: Some(15.4),
            ..Measurements::default()
        },
        ..DiagnosticInput::default()
    };
    let findings = analyzer.findings(&profile(input));

    let battery = findings
        .iter()
        .find(|finding| finding.label == FaultLabel::BatteryCharging)
        .expect("battery finding present");
    assert_eq!(battery.score, 2);
    assert!(!battery.emitted());
}

#[test]
fn ground_scenario_accumulates_over_both_resistance_steps() {
    let analyzer = RuleAnalyzer::standard();
    let findings = analyzer.findings(&profile(ground_input()));

    let ground = findings
        .iter()
        .find(|finding| finding.label == FaultLabel::GroundCircuit)
        .expect("ground finding present");
    // 3 for the corrosion keyword, 2 for each resistance step crossed.
    assert_eq!(ground.score, 7);
    assert!(ground.emitted());
    assert!((ground.base_confidence - 0.80).abs() < 1e-9);

    let wiring = findings
        .iter()
        .find(|finding| finding.label == FaultLabel::WiringHarness)
        .expect("wiring finding present");
    assert_eq!(wiring.score, 2);
    assert!(!wiring.emitted());
}

#[test]
fn trouble_codes_contribute_weight() {
    let analyzer = RuleAnalyzer::standard();
    let input = DiagnosticInput {
        symptoms: "weak headlights at idle".to_string(),
        dtc_codes: "P0562".to_string(),
        ..DiagnosticInput::default()
    };
    let predictions = analyzer.analyze(&profile(input));

    // "weak" (2) plus the undervoltage code (2) crosses the threshold.
    assert!(predictions
        .iter()
        .any(|p| p.label == FaultLabel::BatteryCharging));
}

#[test]
fn network_code_and_switch_keywords_flag_control_module() {
    let analyzer = RuleAnalyzer::standard();
    let input = DiagnosticInput {
        symptoms: "power window switch unresponsive".to_string(),
        dtc_codes: "U0100".to_string(),
        ..DiagnosticInput::default()
    };
    let predictions = analyzer.analyze(&profile(input));

    let switch = predictions
        .iter()
        .find(|p| p.label == FaultLabel::SwitchControlModule)
        .expect("switch prediction present");
    assert!((switch.confidence - 0.70).abs() < 1e-9);
}

#[test]
fn rules_never_propose_no_fault_detected() {
    let analyzer = RuleAnalyzer::standard();
    for finding in analyzer.findings(&profile(battery_input())) {
        assert_ne!(finding.label, FaultLabel::NoFaultDetected);
    }
}

#[test]
fn analysis_is_deterministic() {
    let analyzer = RuleAnalyzer::standard();
    let first = analyzer.analyze(&profile(ground_input()));
    let second = analyzer.analyze(&profile(ground_input()));
    assert_eq!(first, second);
}

#[test]
fn quiet_profile_emits_nothing() {
    let analyzer = RuleAnalyzer::standard();
    assert!(analyzer.analyze(&profile(vehicle_only_input())).is_empty());
}
