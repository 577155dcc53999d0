use super::domain::DiagnosisReport;

/// Errors raised while rendering a report for download.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv rendering failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv rendering produced invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Separator for list columns, since commas already delimit fields.
const LIST_SEPARATOR: &str = "; ";

/// Render a report as CSV, one row per ranked diagnosis. Quoting and
/// escaping are left entirely to the csv writer.
pub fn render_csv(report: &DiagnosisReport) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "rank",
        "fault",
        "confidence",
        "description",
        "probable_causes",
        "recommended_actions",
        "wiring_sections",
    ])?;

    for (index, diagnosis) in report.diagnoses.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            diagnosis.label.label().to_string(),
            format!("{:.3}", diagnosis.confidence),
            diagnosis.description.to_string(),
            diagnosis.probable_causes.join(LIST_SEPARATOR),
            diagnosis.recommended_actions.join(LIST_SEPARATOR),
            diagnosis.wiring_sections.join(LIST_SEPARATOR),
        ])?;
    }

    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::Io(error.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
