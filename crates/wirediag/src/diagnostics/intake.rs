use super::domain::{DiagnosticInput, Measurements, VehicleInfo};

/// Reasons a submission is refused before any analysis runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("submission is empty: no symptoms, trouble codes, measurements, or vehicle details")]
    EmptySubmission,
    #[error("symptom text exceeds {max} characters (found {found})")]
    SymptomsTooLong { max: usize, found: usize },
    #[error("trouble-code text exceeds {max} characters (found {found})")]
    TroubleCodesTooLong { max: usize, found: usize },
}

const DEFAULT_MAX_SYMPTOM_CHARS: usize = 4_000;
const DEFAULT_MAX_CODE_CHARS: usize = 500;

/// Length caps applied to free-text fields during intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakePolicy {
    max_symptom_chars: usize,
    max_code_chars: usize,
}

impl IntakePolicy {
    pub fn new(max_symptom_chars: usize, max_code_chars: usize) -> Self {
        Self {
            max_symptom_chars: max_symptom_chars.max(1),
            max_code_chars: max_code_chars.max(1),
        }
    }

    pub fn max_symptom_chars(&self) -> usize {
        self.max_symptom_chars
    }

    pub fn max_code_chars(&self) -> usize {
        self.max_code_chars
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            max_symptom_chars: DEFAULT_MAX_SYMPTOM_CHARS,
            max_code_chars: DEFAULT_MAX_CODE_CHARS,
        }
    }
}

/// Gate between raw submissions and the analysis pipeline.
///
/// Everything downstream (encoder, rules) assumes text has been normalized
/// and trouble codes canonicalized, so profiles are only built here.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    pub fn profile_from_input(
        &self,
        input: DiagnosticInput,
    ) -> Result<DiagnosticProfile, IntakeViolation> {
        let symptoms = normalize_text(&input.symptoms);
        let found = symptoms.chars().count();
        if found > self.policy.max_symptom_chars {
            return Err(IntakeViolation::SymptomsTooLong {
                max: self.policy.max_symptom_chars,
                found,
            });
        }

        let raw_codes = normalize_text(&input.dtc_codes);
        let found = raw_codes.chars().count();
        if found > self.policy.max_code_chars {
            return Err(IntakeViolation::TroubleCodesTooLong {
                max: self.policy.max_code_chars,
                found,
            });
        }

        let vehicle = VehicleInfo {
            year: input.vehicle.year,
            make: normalize_text(&input.vehicle.make),
            model: normalize_text(&input.vehicle.model),
            mileage: input.vehicle.mileage,
        };
        let vehicle_present = vehicle.year.is_some()
            || vehicle.mileage.is_some()
            || !vehicle.make.is_empty()
            || !vehicle.model.is_empty();

        if symptoms.is_empty()
            && raw_codes.is_empty()
            && !input.measurements.any_present()
            && !vehicle_present
        {
            return Err(IntakeViolation::EmptySubmission);
        }

        Ok(DiagnosticProfile {
            vehicle,
            symptoms,
            trouble_codes: extract_codes(&raw_codes),
            measurements: input.measurements,
        })
    }
}

/// Sanitized view of a submission, the only input the analysis layers accept.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticProfile {
    pub vehicle: VehicleInfo,
    pub symptoms: String,
    pub trouble_codes: Vec<String>,
    pub measurements: Measurements,
}

impl DiagnosticProfile {
    pub fn mentions(&self, needle: &str) -> bool {
        self.symptoms.contains(needle)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.trouble_codes.iter().any(|c| c == code)
    }

    pub fn has_code_prefix(&self, prefix: char) -> bool {
        self.trouble_codes.iter().any(|c| c.starts_with(prefix))
    }
}

/// Strip byte-order marks and zero-width characters, collapse whitespace
/// runs to single spaces, and lowercase.
fn normalize_text(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '\u{feff}' | '\u{200b}' | '\u{200c}' | '\u{200d}'))
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Scan normalized text for five-character OBD-II trouble codes:
/// a system letter (P, B, C, U), a digit 0-3, then three hex digits.
/// Matches are canonicalized to uppercase and deduplicated, keeping
/// first-seen order.
fn extract_codes(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut codes: Vec<String> = Vec::new();
    let mut i = 0;

    while i + 5 <= bytes.len() {
        if code_at(bytes, i) {
            let code = text[i..i + 5].to_ascii_uppercase();
            if !codes.contains(&code) {
                codes.push(code);
            }
            i += 5;
        } else {
            i += 1;
        }
    }

    codes
}

fn code_at(bytes: &[u8], i: usize) -> bool {
    matches!(bytes[i].to_ascii_uppercase(), b'P' | b'B' | b'C' | b'U')
        && (b'0'..=b'3').contains(&bytes[i + 1])
        && bytes[i + 2..i + 5].iter().all(u8::is_ascii_hexdigit)
}
