//! Projects a single survey into its per-area scorecard.

use crate::survey::domain::{AreaAnswer, AreaCatalog, SurveyResponse};
use crate::survey::score::{content_score, instructor_score};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AreaScore {
    pub area_key: String,
    pub area_label: String,
    pub color: String,
    pub content_score: u8,
    pub instructor_score: f64,
    pub instructor_name: String,
    pub instructor_rating: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub per_area: Vec<AreaScore>,
    pub overall_average: u32,
}

/// Scorecard for one response, one entry per configured area in catalog
/// order.
///
/// The overall average is the mean of `(content + instructor) / 2` across
/// all areas, rounded to the nearest integer. An area the respondent left
/// untouched scores 0 on both axes and still counts toward the mean; that
/// is the fixed policy, incomplete areas are not excluded.
pub fn build_report(response: &SurveyResponse, catalog: &AreaCatalog) -> SurveyReport {
    let empty = AreaAnswer::default();

    let per_area: Vec<AreaScore> = catalog
        .areas()
        .iter()
        .map(|area| {
            let answer = response.answer(&area.key).unwrap_or(&empty);
            AreaScore {
                area_key: area.key.clone(),
                area_label: area.label.clone(),
                color: area.color.clone(),
                content_score: content_score(&answer.content),
                instructor_score: instructor_score(answer.instructor_rating),
                instructor_name: answer.instructor_name.clone(),
                instructor_rating: answer.instructor_rating,
                comment: answer.comment.clone(),
            }
        })
        .collect();

    let overall_average = if per_area.is_empty() {
        0
    } else {
        let sum: f64 = per_area
            .iter()
            .map(|score| (f64::from(score.content_score) + score.instructor_score) / 2.0)
            .sum();
        (sum / per_area.len() as f64).round() as u32
    };

    SurveyReport {
        per_area,
        overall_average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::domain::{AreaDefinition, SurveyResponse};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn catalog() -> AreaCatalog {
        AreaCatalog::new(vec![
            AreaDefinition {
                key: "safety".to_string(),
                label: "Segurança".to_string(),
                color: "blue".to_string(),
                instructors: vec!["Carlos".to_string()],
            },
            AreaDefinition {
                key: "quality".to_string(),
                label: "Qualidade".to_string(),
                color: "yellow".to_string(),
                instructors: vec!["Julia".to_string()],
            },
        ])
    }

    fn base_response(answers: HashMap<String, AreaAnswer>) -> SurveyResponse {
        SurveyResponse {
            id: "r1".to_string(),
            name: "Colaborador".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 14).expect("valid date"),
            created_at: "2024-03-15T10:00:00Z".parse().expect("valid timestamp"),
            answers,
        }
    }

    #[test]
    fn scorecard_follows_catalog_order() {
        let mut answers = HashMap::new();
        answers.insert(
            "quality".to_string(),
            AreaAnswer {
                content: "Parcialmente".to_string(),
                instructor_name: "Julia".to_string(),
                instructor_rating: 4,
                comment: Some("Boa didática".to_string()),
            },
        );
        answers.insert(
            "safety".to_string(),
            AreaAnswer {
                content: "Sim, muito claro".to_string(),
                instructor_name: "Carlos".to_string(),
                instructor_rating: 5,
                comment: None,
            },
        );

        let report = build_report(&base_response(answers), &catalog());
        assert_eq!(report.per_area.len(), 2);
        assert_eq!(report.per_area[0].area_key, "safety");
        assert_eq!(report.per_area[0].content_score, 100);
        assert_eq!(report.per_area[0].instructor_score, 100.0);
        assert_eq!(report.per_area[1].area_key, "quality");
        assert_eq!(report.per_area[1].content_score, 60);
        assert_eq!(report.per_area[1].instructor_score, 80.0);
        assert_eq!(
            report.per_area[1].comment.as_deref(),
            Some("Boa didática")
        );

        // (100 + 70) / 2 = 85
        assert_eq!(report.overall_average, 85);
    }

    #[test]
    fn unanswered_area_scores_zero_and_stays_in_mean() {
        let mut answers = HashMap::new();
        answers.insert(
            "safety".to_string(),
            AreaAnswer {
                content: "Sim, muito claro".to_string(),
                instructor_name: "Carlos".to_string(),
                instructor_rating: 5,
                comment: None,
            },
        );

        let report = build_report(&base_response(answers), &catalog());
        assert_eq!(report.per_area[1].content_score, 0);
        assert_eq!(report.per_area[1].instructor_score, 0.0);
        assert_eq!(report.per_area[1].instructor_name, "");
        assert_eq!(report.overall_average, 50);
    }

    #[test]
    fn empty_catalog_averages_to_zero() {
        let report = build_report(&base_response(HashMap::new()), &AreaCatalog::default());
        assert!(report.per_area.is_empty());
        assert_eq!(report.overall_average, 0);
    }
}
