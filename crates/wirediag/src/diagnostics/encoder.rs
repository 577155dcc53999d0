use super::intake::DiagnosticProfile;

/// Width of the encoded feature vector. Model artifacts must declare the
/// same width or they are rejected at load time.
pub const FEATURE_LEN: usize = 20;

/// Named slot positions within the feature vector.
pub mod slot {
    pub const BATTERY_VOLTAGE: usize = 0;
    pub const ALTERNATOR_OUTPUT: usize = 1;
    pub const GROUND_RESISTANCE: usize = 2;
    pub const MODEL_YEAR: usize = 3;
    pub const MAKE_FORD: usize = 4;
    pub const MAKE_CHEVROLET: usize = 5;
    pub const MAKE_TOYOTA: usize = 6;
    pub const MAKE_HONDA: usize = 7;
    pub const MAKE_NISSAN: usize = 8;
    pub const MAKE_OTHER: usize = 9;
    pub const SYMPTOM_BATTERY: usize = 10;
    pub const SYMPTOM_CHARGING: usize = 11;
    pub const SYMPTOM_STARTING: usize = 12;
    pub const SYMPTOM_LIGHTING: usize = 13;
    pub const SYMPTOM_INTERMITTENT: usize = 14;
    pub const SYMPTOM_ELECTRICAL: usize = 15;
    pub const DTC_POWERTRAIN: usize = 16;
    pub const DTC_BODY: usize = 17;
    pub const DTC_CHASSIS: usize = 18;
    pub const DTC_NETWORK: usize = 19;
}

/// Value written for measurements and vehicle fields that were not supplied.
const NEUTRAL: f64 = 0.5;

const VOLTAGE_MIN: f64 = 8.0;
const VOLTAGE_MAX: f64 = 16.0;
const RESISTANCE_MIN_OHMS: f64 = 0.01;
const RESISTANCE_MAX_OHMS: f64 = 100.0;
const YEAR_MIN: f64 = 1990.0;
const YEAR_MAX: f64 = 2024.0;

/// Makes with dedicated one-hot slots; everything else folds into `MAKE_OTHER`.
const COMMON_MAKES: [&str; 5] = ["ford", "chevrolet", "toyota", "honda", "nissan"];

/// Keyword groups behind the symptom flag slots, in slot order.
const SYMPTOM_KEYWORDS: [&[&str]; 6] = [
    &["battery", "dead", "weak", "won't start", "wont start"],
    &["charging", "alternator", "voltage"],
    &["starting", "starter", "crank", "turn over"],
    &["lights", "headlight", "dim", "flicker"],
    &["intermittent", "sometimes", "occasionally", "random"],
    &["electrical", "power", "fuse", "blown", "short"],
];

const DTC_PREFIXES: [char; 4] = ['P', 'B', 'C', 'U'];

/// Fixed-length numeric encoding of a diagnostic profile.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_LEN],
}

impl FeatureVector {
    pub fn values(&self) -> &[f64; FEATURE_LEN] {
        &self.values
    }

    pub fn slot(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

/// Encode a profile into the fixed feature layout.
///
/// Continuous fields scale linearly into [0, 1] and clamp out-of-range
/// readings; ground resistance uses a log10 scale because faults span
/// milliohms to full opens. Missing values encode as `NEUTRAL` so absence
/// never reads as evidence.
pub fn encode(profile: &DiagnosticProfile) -> FeatureVector {
    let mut values = [0.0; FEATURE_LEN];

    values[slot::BATTERY_VOLTAGE] =
        scaled_or_neutral(profile.measurements.battery_voltage, VOLTAGE_MIN, VOLTAGE_MAX);
    values[slot::ALTERNATOR_OUTPUT] =
        scaled_or_neutral(profile.measurements.alternator_output, VOLTAGE_MIN, VOLTAGE_MAX);
    values[slot::GROUND_RESISTANCE] = log_scaled_or_neutral(profile.measurements.ground_resistance);
    values[slot::MODEL_YEAR] =
        scaled_or_neutral(profile.vehicle.year.map(f64::from), YEAR_MIN, YEAR_MAX);

    let make_slot = COMMON_MAKES
        .iter()
        .position(|make| *make == profile.vehicle.make)
        .map(|index| slot::MAKE_FORD + index)
        .unwrap_or(slot::MAKE_OTHER);
    values[make_slot] = 1.0;

    for (offset, keywords) in SYMPTOM_KEYWORDS.iter().enumerate() {
        if keywords.iter().any(|keyword| profile.mentions(keyword)) {
            values[slot::SYMPTOM_BATTERY + offset] = 1.0;
        }
    }

    for (offset, prefix) in DTC_PREFIXES.iter().enumerate() {
        if profile.has_code_prefix(*prefix) {
            values[slot::DTC_POWERTRAIN + offset] = 1.0;
        }
    }

    FeatureVector { values }
}

fn scaled_or_neutral(value: Option<f64>, min: f64, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => ((v - min) / (max - min)).clamp(0.0, 1.0),
        _ => NEUTRAL,
    }
}

fn log_scaled_or_neutral(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => {
            let clamped = v.clamp(RESISTANCE_MIN_OHMS, RESISTANCE_MAX_OHMS);
            (clamped.log10() - RESISTANCE_MIN_OHMS.log10())
                / (RESISTANCE_MAX_OHMS.log10() - RESISTANCE_MIN_OHMS.log10())
        }
        _ => NEUTRAL,
    }
}
