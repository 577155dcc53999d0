use crate::infra::{classifier_handle, demo_classifier_handle};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use wirediag::config::AppConfig;
use wirediag::diagnostics::{
    render_csv, DiagnosisError, DiagnosisReport, DiagnosisService, DiagnosticInput, Measurements,
    VehicleInfo,
};
use wirediag::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// Read the full submission from a JSON file instead of flags
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Free-text symptom description
    #[arg(long, default_value = "")]
    pub(crate) symptoms: String,
    /// Diagnostic trouble codes in free form (e.g. "P0562 B1000")
    #[arg(long, default_value = "")]
    pub(crate) dtc: String,
    /// Vehicle make
    #[arg(long, default_value = "")]
    pub(crate) make: String,
    /// Vehicle model
    #[arg(long, default_value = "")]
    pub(crate) model: String,
    /// Model year
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Odometer reading in miles
    #[arg(long)]
    pub(crate) mileage: Option<u32>,
    /// Battery voltage in volts
    #[arg(long)]
    pub(crate) battery_voltage: Option<f64>,
    /// Alternator output in volts
    #[arg(long)]
    pub(crate) alternator_output: Option<f64>,
    /// Ground circuit resistance in ohms
    #[arg(long)]
    pub(crate) ground_resistance: Option<f64>,
    /// Output format for the report
    #[arg(long, value_enum, default_value = "text")]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Use the classifier configured via APP_MODEL_PATH instead of the
    /// built-in demo heuristic
    #[arg(long)]
    pub(crate) use_configured_model: bool,
}

pub(crate) async fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let input = match submission_from_args(&args) {
        Ok(input) => input,
        Err(message) => {
            println!("Input rejected: {message}");
            return Ok(());
        }
    };

    let service = DiagnosisService::new(classifier_handle(&config));
    let report = match service.diagnose(input).await {
        Ok(report) => report,
        Err(err) => {
            println!("Submission rejected: {err}");
            return Ok(());
        }
    };

    match args.format {
        OutputFormat::Text => render_report(&report),
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Report serialization failed: {err}"),
        },
        OutputFormat::Csv => {
            let csv = render_csv(&report).map_err(DiagnosisError::from)?;
            print!("{csv}");
        }
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let classifier = if args.use_configured_model {
        let config = AppConfig::load()?;
        classifier_handle(&config)
    } else {
        demo_classifier_handle()
    };
    let service = DiagnosisService::new(classifier);

    println!("Electrical diagnosis demo");
    for (name, input) in demo_scenarios() {
        println!("\nScenario: {name}");
        match service.diagnose(input).await {
            Ok(report) => render_report(&report),
            Err(err) => println!("  Submission rejected: {err}"),
        }
    }

    Ok(())
}

fn submission_from_args(args: &DiagnoseArgs) -> Result<DiagnosticInput, String> {
    if let Some(path) = &args.input {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        return serde_json::from_str(&raw)
            .map_err(|err| format!("failed to parse {}: {err}", path.display()));
    }

    Ok(DiagnosticInput {
        vehicle: VehicleInfo {
            year: args.year,
            make: args.make.clone(),
            model: args.model.clone(),
            mileage: args.mileage,
        },
        symptoms: args.symptoms.clone(),
        dtc_codes: args.dtc.clone(),
        measurements: Measurements {
            battery_voltage: args.battery_voltage,
            alternator_output: args.alternator_output,
            ground_resistance: args.ground_resistance,
        },
    })
}

fn demo_scenarios() -> Vec<(&'static str, DiagnosticInput)> {
    vec![
        (
            "No-start with dead battery",
            DiagnosticInput {
                vehicle: VehicleInfo {
                    year: Some(2015),
                    make: "Toyota".to_string(),
                    model: "Camry".to_string(),
                    mileage: Some(98_000),
                },
                symptoms: "Engine won't start, battery dead after sitting overnight".to_string(),
                dtc_codes: "P0562".to_string(),
                measurements: Measurements {
                    battery_voltage: Some(11.4),
                    ..Measurements::default()
                },
            },
        ),
        (
            "Corroded ground strap",
            DiagnosticInput {
                vehicle: VehicleInfo {
                    year: Some(2011),
                    make: "Ford".to_string(),
                    model: "F-150".to_string(),
                    mileage: Some(161_000),
                },
                symptoms: "Corrosion visible on the ground strap, intermittent electrical issues"
                    .to_string(),
                dtc_codes: String::new(),
                measurements: Measurements {
                    ground_resistance: Some(1.2),
                    ..Measurements::default()
                },
            },
        ),
        (
            "Flickering headlights with codes",
            DiagnosticInput {
                vehicle: VehicleInfo {
                    year: Some(2019),
                    make: "Honda".to_string(),
                    model: "Civic".to_string(),
                    mileage: Some(44_000),
                },
                symptoms: "Headlights flicker and dim at idle".to_string(),
                dtc_codes: "P0562 B1000".to_string(),
                measurements: Measurements {
                    battery_voltage: Some(11.8),
                    alternator_output: Some(13.1),
                    ground_resistance: None,
                },
            },
        ),
    ]
}

fn render_report(report: &DiagnosisReport) {
    println!(
        "Generated {} | mode {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.mode.label()
    );

    if report.is_empty() {
        println!("No fault identified from the supplied data.");
        return;
    }

    for (rank, diagnosis) in report.diagnoses.iter().enumerate() {
        let sources = diagnosis
            .sources
            .iter()
            .map(|source| source.label())
            .collect::<Vec<_>>()
            .join("+");
        println!(
            "{}. {} ({:.0}% confidence, via {})",
            rank + 1,
            diagnosis.label.label(),
            diagnosis.confidence * 100.0,
            sources
        );
        println!("   {}", diagnosis.description);
        if !diagnosis.probable_causes.is_empty() {
            println!("   Probable causes:");
            for cause in &diagnosis.probable_causes {
                println!("     - {cause}");
            }
        }
        if !diagnosis.recommended_actions.is_empty() {
            println!("   Recommended actions:");
            for action in &diagnosis.recommended_actions {
                println!("     - {action}");
            }
        }
        if !diagnosis.wiring_sections.is_empty() {
            println!(
                "   Wiring sections: {}",
                diagnosis.wiring_sections.join(", ")
            );
        }
    }
}
