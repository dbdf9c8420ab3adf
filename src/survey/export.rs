//! Flattens the response collection into one row per (response, area) for
//! spreadsheet export.

use crate::survey::domain::{AreaAnswer, AreaCatalog, SurveyResponse};
use std::fmt;

/// Spreadsheet tools sniff the charset from this prefix.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const EXPORT_HEADERS: [&str; 6] = [
    "Date",
    "Collaborator",
    "Area",
    "Instructor",
    "InstructorRating",
    "Comment",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub date: String,
    pub collaborator: String,
    pub area: String,
    pub instructor: String,
    pub instructor_rating: u32,
    pub comment: String,
}

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Csv(err) => write!(f, "failed to write csv: {err}"),
            ExportError::Io(err) => write!(f, "failed to flush csv buffer: {err}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Csv(err) => Some(err),
            ExportError::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

/// Full Cartesian expansion: responses in their given order, areas in
/// catalog order. The date column renders the submission timestamp as
/// `DD/MM/YYYY`; the respondent-declared session date is not exported.
/// Missing instructor or comment become empty strings, a missing rating
/// becomes 0.
pub fn to_rows(responses: &[SurveyResponse], catalog: &AreaCatalog) -> Vec<ExportRow> {
    let empty = AreaAnswer::default();
    let mut rows = Vec::with_capacity(responses.len() * catalog.len());

    for response in responses {
        let date = response.created_at.format("%d/%m/%Y").to_string();
        for area in catalog.areas() {
            let answer = response.answer(&area.key).unwrap_or(&empty);
            rows.push(ExportRow {
                date: date.clone(),
                collaborator: response.name.clone(),
                area: area.label.clone(),
                instructor: answer.instructor_name.clone(),
                instructor_rating: answer.instructor_rating,
                comment: answer.comment.clone().unwrap_or_default(),
            });
        }
    }

    rows
}

/// Renders the full export: UTF-8 BOM, header row, then one record per
/// (response, area). Text fields are quoted with doubled-quote escaping;
/// numeric fields stay bare.
pub fn render_csv(
    responses: &[SurveyResponse],
    catalog: &AreaCatalog,
) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(UTF8_BOM);

    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::NonNumeric)
            .from_writer(&mut buf);

        writer.write_record(EXPORT_HEADERS)?;
        for row in to_rows(responses, catalog) {
            writer.write_record(&[
                row.date,
                row.collaborator,
                row.area,
                row.instructor,
                row.instructor_rating.to_string(),
                row.comment,
            ])?;
        }
        writer.flush()?;
    }

    Ok(buf)
}
