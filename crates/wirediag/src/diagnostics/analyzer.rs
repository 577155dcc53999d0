use super::domain::{FaultLabel, SourcedPrediction};
use super::intake::DiagnosticProfile;

/// Measurement a threshold condition reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeasurementField {
    BatteryVoltage,
    AlternatorOutput,
    GroundResistance,
}

/// One way a rule condition can fire against a profile.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    SymptomAny(&'static [&'static str]),
    Below(MeasurementField, f64),
    Above(MeasurementField, f64),
    CodeAny(&'static [&'static str]),
    CodePrefix(char),
}

#[derive(Debug, Clone, Copy)]
struct WeightedCondition {
    weight: i16,
    trigger: Trigger,
}

fn symptom_any(weight: i16, keywords: &'static [&'static str]) -> WeightedCondition {
    WeightedCondition {
        weight,
        trigger: Trigger::SymptomAny(keywords),
    }
}

fn below(weight: i16, field: MeasurementField, threshold: f64) -> WeightedCondition {
    WeightedCondition {
        weight,
        trigger: Trigger::Below(field, threshold),
    }
}

fn above(weight: i16, field: MeasurementField, threshold: f64) -> WeightedCondition {
    WeightedCondition {
        weight,
        trigger: Trigger::Above(field, threshold),
    }
}

fn code_any(weight: i16, codes: &'static [&'static str]) -> WeightedCondition {
    WeightedCondition {
        weight,
        trigger: Trigger::CodeAny(codes),
    }
}

fn code_prefix(weight: i16, prefix: char) -> WeightedCondition {
    WeightedCondition {
        weight,
        trigger: Trigger::CodePrefix(prefix),
    }
}

/// Scoring template for one fault category. A rule emits its category at
/// `base_confidence` once the summed weights of satisfied conditions reach
/// `emit_threshold`.
#[derive(Debug, Clone)]
struct FaultRule {
    label: FaultLabel,
    base_confidence: f64,
    emit_threshold: i16,
    conditions: Vec<WeightedCondition>,
}

/// Per-category audit row from one analysis pass, kept even when the score
/// never reaches the emission threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleFinding {
    pub label: FaultLabel,
    pub score: i16,
    pub threshold: i16,
    pub base_confidence: f64,
}

impl RuleFinding {
    pub fn emitted(&self) -> bool {
        self.score >= self.threshold
    }
}

/// Deterministic keyword and threshold analyzer over the fault taxonomy.
///
/// `NoFaultDetected` is intentionally absent from the rule table; only a
/// classifier may propose it.
#[derive(Debug, Clone)]
pub struct RuleAnalyzer {
    rules: Vec<FaultRule>,
}

impl Default for RuleAnalyzer {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleAnalyzer {
    pub fn standard() -> Self {
        Self {
            rules: standard_rules(),
        }
    }

    /// Emit a rule-sourced prediction for every category whose score reaches
    /// its threshold. Same profile, same output.
    pub fn analyze(&self, profile: &DiagnosticProfile) -> Vec<SourcedPrediction> {
        self.findings(profile)
            .into_iter()
            .filter(|finding| finding.emitted())
            .map(|finding| SourcedPrediction::rule(finding.label, finding.base_confidence))
            .collect()
    }

    /// Score every category, including those below their threshold.
    pub fn findings(&self, profile: &DiagnosticProfile) -> Vec<RuleFinding> {
        self.rules
            .iter()
            .map(|rule| RuleFinding {
                label: rule.label,
                score: rule
                    .conditions
                    .iter()
                    .filter(|condition| condition_met(&condition.trigger, profile))
                    .map(|condition| condition.weight)
                    .sum(),
                threshold: rule.emit_threshold,
                base_confidence: rule.base_confidence,
            })
            .collect()
    }
}

fn condition_met(trigger: &Trigger, profile: &DiagnosticProfile) -> bool {
    match trigger {
        Trigger::SymptomAny(keywords) => keywords.iter().any(|keyword| profile.mentions(keyword)),
        Trigger::Below(field, threshold) => {
            read_measurement(profile, *field).map_or(false, |value| value < *threshold)
        }
        Trigger::Above(field, threshold) => {
            read_measurement(profile, *field).map_or(false, |value| value > *threshold)
        }
        Trigger::CodeAny(codes) => codes.iter().any(|code| profile.has_code(code)),
        Trigger::CodePrefix(prefix) => profile.has_code_prefix(*prefix),
    }
}

fn read_measurement(profile: &DiagnosticProfile, field: MeasurementField) -> Option<f64> {
    match field {
        MeasurementField::BatteryVoltage => profile.measurements.battery_voltage,
        MeasurementField::AlternatorOutput => profile.measurements.alternator_output,
        MeasurementField::GroundResistance => profile.measurements.ground_resistance,
    }
}

/// The deployed rule table. Thresholds are strict comparisons, so a reading
/// exactly at a limit contributes nothing.
fn standard_rules() -> Vec<FaultRule> {
    vec![
        FaultRule {
            label: FaultLabel::BatteryCharging,
            base_confidence: 0.85,
            emit_threshold: 3,
            conditions: vec![
                symptom_any(3, &["won't start", "wont start", "dead battery"]),
                symptom_any(2, &["weak", "slow crank"]),
                below(2, MeasurementField::BatteryVoltage, 12.0),
                above(2, MeasurementField::BatteryVoltage, 15.0),
                below(2, MeasurementField::AlternatorOutput, 13.5),
                code_any(2, &["P0560", "P0562", "P0563"]),
            ],
        },
        FaultRule {
            label: FaultLabel::GroundCircuit,
            base_confidence: 0.80,
            emit_threshold: 3,
            conditions: vec![
                symptom_any(3, &["ground", "corrosion"]),
                above(2, MeasurementField::GroundResistance, 0.5),
                above(2, MeasurementField::GroundResistance, 1.0),
            ],
        },
        FaultRule {
            label: FaultLabel::WiringHarness,
            base_confidence: 0.75,
            emit_threshold: 3,
            conditions: vec![
                symptom_any(3, &["wiring", "harness"]),
                symptom_any(2, &["burning", "melted", "chafed"]),
                symptom_any(2, &["short"]),
                symptom_any(2, &["intermittent"]),
            ],
        },
        FaultRule {
            label: FaultLabel::FuseRelay,
            base_confidence: 0.78,
            emit_threshold: 3,
            conditions: vec![
                symptom_any(3, &["fuse", "relay"]),
                symptom_any(2, &["blown", "blows"]),
                symptom_any(2, &["clicking"]),
                code_prefix(2, 'B'),
            ],
        },
        FaultRule {
            label: FaultLabel::LightingSystem,
            base_confidence: 0.72,
            emit_threshold: 3,
            conditions: vec![
                symptom_any(3, &["headlight", "tail light", "lights"]),
                symptom_any(2, &["dim", "flicker"]),
                symptom_any(2, &["bulb", "one side"]),
            ],
        },
        FaultRule {
            label: FaultLabel::SwitchControlModule,
            base_confidence: 0.70,
            emit_threshold: 3,
            conditions: vec![
                symptom_any(3, &["switch", "control module", "power window"]),
                symptom_any(2, &["unresponsive", "stuck"]),
                code_prefix(2, 'U'),
                code_any(2, &["P0601"]),
            ],
        },
        FaultRule {
            label: FaultLabel::SensorCircuit,
            base_confidence: 0.68,
            emit_threshold: 3,
            conditions: vec![
                symptom_any(3, &["sensor", "gauge"]),
                symptom_any(2, &["erratic", "false reading"]),
                code_prefix(2, 'C'),
            ],
        },
    ]
}
