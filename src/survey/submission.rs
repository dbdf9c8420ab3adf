//! Completeness checks applied when a survey is created.
//!
//! This is the form layer's responsibility: a payload that passes here is
//! "complete" in the §data-model sense. The aggregation engine itself never
//! re-validates and degrades whatever it finds to defaults instead.

use crate::survey::domain::{AreaAnswer, AreaCatalog};
use crate::survey::score::ContentRating;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Survey payload as submitted; ids and the submission timestamp are
/// assigned by the store on creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSurvey {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub answers: HashMap<String, AreaAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    MissingName,
    MissingArea { area: String },
    UnknownContent { area: String },
    MissingInstructor { area: String },
    InstructorNotInRoster { area: String, name: String },
    RatingOutOfRange { area: String, rating: u32 },
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::MissingName => write!(f, "respondent name is required"),
            SubmissionError::MissingArea { area } => {
                write!(f, "area '{area}' was not answered")
            }
            SubmissionError::UnknownContent { area } => {
                write!(f, "area '{area}' needs one of the fixed content answers")
            }
            SubmissionError::MissingInstructor { area } => {
                write!(f, "area '{area}' needs an instructor")
            }
            SubmissionError::InstructorNotInRoster { area, name } => {
                write!(f, "'{name}' is not on the roster for area '{area}'")
            }
            SubmissionError::RatingOutOfRange { area, rating } => {
                write!(f, "area '{area}' rating must be 1-5, got {rating}")
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

/// Checks the payload against the catalog the form was rendered from.
/// Stops at the first problem, mirroring how the form walks its fields.
pub fn validate_submission(survey: &NewSurvey, catalog: &AreaCatalog) -> Result<(), SubmissionError> {
    if survey.name.trim().is_empty() {
        return Err(SubmissionError::MissingName);
    }

    for area in catalog.areas() {
        let answer = survey
            .answers
            .get(&area.key)
            .ok_or_else(|| SubmissionError::MissingArea {
                area: area.key.clone(),
            })?;

        if ContentRating::from_label(&answer.content).is_none() {
            return Err(SubmissionError::UnknownContent {
                area: area.key.clone(),
            });
        }

        if answer.instructor_name.trim().is_empty() {
            return Err(SubmissionError::MissingInstructor {
                area: area.key.clone(),
            });
        }

        if !area.instructors.contains(&answer.instructor_name) {
            return Err(SubmissionError::InstructorNotInRoster {
                area: area.key.clone(),
                name: answer.instructor_name.clone(),
            });
        }

        if !(1..=5).contains(&answer.instructor_rating) {
            return Err(SubmissionError::RatingOutOfRange {
                area: area.key.clone(),
                rating: answer.instructor_rating,
            });
        }
    }

    Ok(())
}
