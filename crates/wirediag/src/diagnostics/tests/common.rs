use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::diagnostics::classifier::{ClassifierHandle, HeuristicClassifier};
use crate::diagnostics::domain::{DiagnosticInput, Measurements, VehicleInfo};
use crate::diagnostics::intake::{DiagnosticProfile, IntakeGuard};
use crate::diagnostics::{diagnosis_router, DiagnosisService};

pub(super) fn battery_input() -> DiagnosticInput {
    DiagnosticInput {
        vehicle: VehicleInfo {
            year: Some(2015),
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            mileage: Some(82_000),
        },
        symptoms: "Engine won't start, dead battery after sitting overnight".to_string(),
        dtc_codes: String::new(),
        measurements: Measurements::default(),
    }
}

pub(super) fn ground_input() -> DiagnosticInput {
    DiagnosticInput {
        vehicle: VehicleInfo {
            year: Some(2011),
            make: "Ford".to_string(),
            model: "F-150".to_string(),
            mileage: Some(146_000),
        },
        symptoms: "Corrosion visible on ground strap, intermittent electrical issues".to_string(),
        dtc_codes: String::new(),
        measurements: Measurements {
            ground_resistance: Some(1.2),
            ..Measurements::default()
        },
    }
}

pub(super) fn vehicle_only_input() -> DiagnosticInput {
    DiagnosticInput {
        vehicle: VehicleInfo {
            year: Some(2019),
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            mileage: Some(41_000),
        },
        symptoms: String::new(),
        dtc_codes: String::new(),
        measurements: Measurements::default(),
    }
}

pub(super) fn profile(input: DiagnosticInput) -> DiagnosticProfile {
    IntakeGuard::default()
        .profile_from_input(input)
        .expect("profile builds")
}

pub(super) fn rule_only_service() -> DiagnosisService {
    DiagnosisService::new(ClassifierHandle::rule_only())
}

pub(super) fn hybrid_service() -> DiagnosisService {
    DiagnosisService::new(ClassifierHandle::preloaded(Arc::new(HeuristicClassifier)))
}

pub(super) fn diagnosis_router_with(service: DiagnosisService) -> axum::Router {
    diagnosis_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
