use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fault taxonomy shared by the rule analyzer, classifiers, and fusion.
///
/// Declaration order doubles as the ranking tie-break, so new categories
/// belong at the end, ahead of `NoFaultDetected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultLabel {
    BatteryCharging,
    GroundCircuit,
    WiringHarness,
    FuseRelay,
    LightingSystem,
    SwitchControlModule,
    SensorCircuit,
    NoFaultDetected,
}

impl FaultLabel {
    /// Every supported category, in declaration order.
    pub const ALL: [FaultLabel; 8] = [
        FaultLabel::BatteryCharging,
        FaultLabel::GroundCircuit,
        FaultLabel::WiringHarness,
        FaultLabel::FuseRelay,
        FaultLabel::LightingSystem,
        FaultLabel::SwitchControlModule,
        FaultLabel::SensorCircuit,
        FaultLabel::NoFaultDetected,
    ];

    /// Human-readable name used in rendered reports and CSV exports.
    pub const fn label(self) -> &'static str {
        match self {
            FaultLabel::BatteryCharging => "Battery/Charging System",
            FaultLabel::GroundCircuit => "Ground Circuit",
            FaultLabel::WiringHarness => "Wiring Harness",
            FaultLabel::FuseRelay => "Fuse/Relay",
            FaultLabel::LightingSystem => "Lighting System",
            FaultLabel::SwitchControlModule => "Switch/Control Module",
            FaultLabel::SensorCircuit => "Sensor Circuit",
            FaultLabel::NoFaultDetected => "No Fault Detected",
        }
    }

    /// Resolve a label from either its human-readable name or its wire token.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "battery/charging system" | "battery_charging" => Some(FaultLabel::BatteryCharging),
            "ground circuit" | "ground_circuit" => Some(FaultLabel::GroundCircuit),
            "wiring harness" | "wiring_harness" => Some(FaultLabel::WiringHarness),
            "fuse/relay" | "fuse_relay" => Some(FaultLabel::FuseRelay),
            "lighting system" | "lighting_system" => Some(FaultLabel::LightingSystem),
            "switch/control module" | "switch_control_module" => {
                Some(FaultLabel::SwitchControlModule)
            }
            "sensor circuit" | "sensor_circuit" => Some(FaultLabel::SensorCircuit),
            "no fault detected" | "no_fault_detected" => Some(FaultLabel::NoFaultDetected),
            _ => None,
        }
    }
}

/// Vehicle identity fields accepted with a submission. All optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleInfo {
    pub year: Option<i32>,
    pub make: String,
    pub model: String,
    pub mileage: Option<u32>,
}

/// Electrical measurements captured at the vehicle, when available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub battery_voltage: Option<f64>,
    pub alternator_output: Option<f64>,
    pub ground_resistance: Option<f64>,
}

impl Measurements {
    pub fn any_present(&self) -> bool {
        self.battery_voltage.is_some()
            || self.alternator_output.is_some()
            || self.ground_resistance.is_some()
    }
}

/// Raw diagnosis submission as received on the wire, before intake validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticInput {
    pub vehicle: VehicleInfo,
    pub symptoms: String,
    pub dtc_codes: String,
    pub measurements: Measurements,
}

/// Which side of the engine produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    Model,
    Rule,
}

impl PredictionSource {
    pub const fn label(self) -> &'static str {
        match self {
            PredictionSource::Model => "model",
            PredictionSource::Rule => "rule",
        }
    }
}

/// Single prediction tagged with its origin, the unit fusion consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedPrediction {
    pub label: FaultLabel,
    pub confidence: f64,
    pub source: PredictionSource,
}

impl SourcedPrediction {
    pub fn model(label: FaultLabel, confidence: f64) -> Self {
        Self {
            label,
            confidence,
            source: PredictionSource::Model,
        }
    }

    pub fn rule(label: FaultLabel, confidence: f64) -> Self {
        Self {
            label,
            confidence,
            source: PredictionSource::Rule,
        }
    }
}

/// Normalized probability distribution over the fault taxonomy.
///
/// Negative or non-finite scores are treated as zero before normalization.
/// When every score is zero the distribution falls back to uniform rather
/// than dividing by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultDistribution {
    probabilities: BTreeMap<FaultLabel, f64>,
}

impl FaultDistribution {
    pub fn from_scores(scores: BTreeMap<FaultLabel, f64>) -> Self {
        let mut probabilities: BTreeMap<FaultLabel, f64> = scores
            .into_iter()
            .map(|(label, score)| {
                let score = if score.is_finite() && score > 0.0 {
                    score
                } else {
                    0.0
                };
                (label, score)
            })
            .collect();

        let total: f64 = probabilities.values().sum();
        if total <= 0.0 {
            let uniform = 1.0 / FaultLabel::ALL.len() as f64;
            return Self {
                probabilities: FaultLabel::ALL.iter().map(|label| (*label, uniform)).collect(),
            };
        }

        for value in probabilities.values_mut() {
            *value /= total;
        }
        Self { probabilities }
    }

    pub fn probability(&self, label: FaultLabel) -> f64 {
        self.probabilities.get(&label).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FaultLabel, f64)> + '_ {
        self.probabilities.iter().map(|(label, p)| (*label, *p))
    }

    /// Convert to model-sourced predictions, dropping entries below `floor`
    /// so near-zero probabilities never dilute fusion averages.
    pub fn sourced_predictions(&self, floor: f64) -> Vec<SourcedPrediction> {
        self.iter()
            .filter(|(_, probability)| *probability >= floor)
            .map(|(label, probability)| SourcedPrediction::model(label, probability))
            .collect()
    }
}

/// One fused diagnosis with its catalog annotations, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDiagnosis {
    pub label: FaultLabel,
    pub confidence: f64,
    pub description: &'static str,
    pub probable_causes: Vec<&'static str>,
    pub recommended_actions: Vec<&'static str>,
    pub wiring_sections: Vec<&'static str>,
    pub sources: Vec<PredictionSource>,
}

/// Whether the classifier participated in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Hybrid,
    RuleOnly,
}

impl AnalysisMode {
    pub const fn label(self) -> &'static str {
        match self {
            AnalysisMode::Hybrid => "hybrid",
            AnalysisMode::RuleOnly => "rule_only",
        }
    }
}

/// Complete output of one diagnosis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisReport {
    pub generated_at: DateTime<Utc>,
    pub mode: AnalysisMode,
    pub diagnoses: Vec<RankedDiagnosis>,
}

impl DiagnosisReport {
    pub fn top(&self) -> Option<&RankedDiagnosis> {
        self.diagnoses.first()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty()
    }
}
