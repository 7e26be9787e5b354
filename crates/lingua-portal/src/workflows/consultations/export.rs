use super::domain::Consultation;

const HEADER: [&str; 14] = [
    "id",
    "kind",
    "status",
    "name",
    "email",
    "phone",
    "company",
    "job_title",
    "training_needs",
    "participants",
    "requirements",
    "assignee",
    "notes",
    "created_at",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid utf-8")]
    Encoding,
}

/// Render consultations as CSV with a header row.
pub fn render_csv(records: &[Consultation]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for record in records {
        let participants = record
            .participants
            .map(|count| count.to_string())
            .unwrap_or_default();
        let training_needs = record.training_needs.join("; ");
        let created_at = record.created_at.to_rfc3339();

        writer.write_record([
            record.id.0.as_str(),
            record.kind.label(),
            record.status.label(),
            record.name.as_str(),
            record.email.as_str(),
            record.phone.as_str(),
            record.company.as_deref().unwrap_or_default(),
            record.job_title.as_deref().unwrap_or_default(),
            training_needs.as_str(),
            participants.as_str(),
            record.requirements.as_deref().unwrap_or_default(),
            record.assignee.as_deref().unwrap_or_default(),
            record.notes.as_deref().unwrap_or_default(),
            created_at.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}
