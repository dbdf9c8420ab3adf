//! Folds a snapshot of responses into the instructor leaderboard.

use crate::survey::domain::{AreaCatalog, SurveyResponse};
use serde::Serialize;
use std::collections::HashMap;

/// Leaderboard entry, derived and never persisted.
///
/// Stats are scoped to one area: the same instructor name appearing in two
/// areas produces two entries, and merging them is a caller decision.
#[derive(Debug, Clone, Serialize)]
pub struct InstructorStat {
    pub name: String,
    pub area_key: String,
    pub area_label: String,
    pub color: String,
    pub total: u32,
    pub count: usize,
    pub average: f64,
}

/// Accepts only `YYYY-MM`. The filter is compared textually at year-month
/// granularity, so the shape has to be exact.
pub fn is_year_month(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    if !bytes[..4].iter().all(u8::is_ascii_digit) {
        return false;
    }
    matches!(&raw[5..7], "01" | "02" | "03" | "04" | "05" | "06" | "07" | "08" | "09" | "10" | "11" | "12")
}

/// Builds the leaderboard for the given snapshot.
///
/// With `month` set (`YYYY-MM`), responses are kept only when their
/// *submission* timestamp falls in that calendar month; the respondent's
/// declared session date never participates. Per response and configured
/// area, an unrated or instructor-less answer is skipped. Accumulation is
/// keyed by `(instructor, area)`; ordering is average descending, then
/// rating count descending, then first-seen order.
pub fn rank(
    responses: &[SurveyResponse],
    catalog: &AreaCatalog,
    month: Option<&str>,
) -> Vec<InstructorStat> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut stats: Vec<InstructorStat> = Vec::new();

    for response in responses {
        if let Some(month) = month {
            if response.created_at.format("%Y-%m").to_string() != month {
                continue;
            }
        }

        for area in catalog.areas() {
            let Some(answer) = response.answer(&area.key) else {
                continue;
            };
            if answer.instructor_name.is_empty() || answer.instructor_rating == 0 {
                continue;
            }

            let key = (answer.instructor_name.clone(), area.key.clone());
            let slot = *index.entry(key).or_insert_with(|| {
                stats.push(InstructorStat {
                    name: answer.instructor_name.clone(),
                    area_key: area.key.clone(),
                    area_label: area.label.clone(),
                    color: area.color.clone(),
                    total: 0,
                    count: 0,
                    average: 0.0,
                });
                stats.len() - 1
            });

            stats[slot].total += answer.instructor_rating;
            stats[slot].count += 1;
        }
    }

    for stat in &mut stats {
        stat.average = round_one_decimal(f64::from(stat.total) / stat.count as f64);
    }

    // sort_by is stable, so exact ties keep first-seen order.
    stats.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.count.cmp(&a.count))
    });

    stats
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::domain::{AreaAnswer, AreaCatalog, AreaDefinition, SurveyResponse};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn two_area_catalog() -> AreaCatalog {
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

    fn response(id: &str, created: &str, answers: &[(&str, &str, u32)]) -> SurveyResponse {
        let mut map = HashMap::new();
        for (area, instructor, rating) in answers {
            map.insert(
                area.to_string(),
                AreaAnswer {
                    content: "Sim, muito claro".to_string(),
                    instructor_name: instructor.to_string(),
                    instructor_rating: *rating,
                    comment: None,
                },
            );
        }
        SurveyResponse {
            id: id.to_string(),
            name: "Colaborador".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 14).expect("valid date"),
            created_at: created.parse().expect("valid timestamp"),
            answers: map,
        }
    }

    #[test]
    fn empty_snapshot_yields_empty_leaderboard() {
        let catalog = two_area_catalog();
        assert!(rank(&[], &catalog, None).is_empty());
    }

    #[test]
    fn ratings_accumulate_per_instructor() {
        let catalog = two_area_catalog();
        let responses = vec![
            response("r1", "2024-03-15T10:00:00Z", &[("safety", "Carlos", 5)]),
            response("r2", "2024-03-16T10:00:00Z", &[("safety", "Carlos", 3)]),
        ];

        let stats = rank(&responses, &catalog, None);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total, 8);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].average, 4.0);
        assert_eq!(stats[0].area_label, "Segurança");
    }

    #[test]
    fn same_name_in_two_areas_stays_two_entries() {
        let catalog = two_area_catalog();
        let responses = vec![response(
            "r1",
            "2024-03-15T10:00:00Z",
            &[("safety", "Carlos", 5), ("quality", "Carlos", 3)],
        )];

        let stats = rank(&responses, &catalog, None);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].area_key, "safety");
        assert_eq!(stats[1].area_key, "quality");
    }

    #[test]
    fn month_filter_uses_submission_timestamp() {
        let catalog = two_area_catalog();
        let responses = vec![response(
            "r1",
            "2024-03-15T10:00:00Z",
            &[("safety", "Carlos", 5)],
        )];

        assert_eq!(rank(&responses, &catalog, Some("2024-03")).len(), 1);
        assert!(rank(&responses, &catalog, Some("2024-04")).is_empty());
    }

    #[test]
    fn unrated_and_unnamed_answers_are_skipped() {
        let catalog = two_area_catalog();
        let responses = vec![
            response("r1", "2024-03-15T10:00:00Z", &[("safety", "", 5)]),
            response("r2", "2024-03-15T11:00:00Z", &[("quality", "Julia", 0)]),
        ];

        assert!(rank(&responses, &catalog, None).is_empty());
    }

    #[test]
    fn ties_on_average_break_by_count() {
        let catalog = two_area_catalog();
        let responses = vec![
            response("r1", "2024-03-15T10:00:00Z", &[("safety", "Carlos", 4)]),
            response("r2", "2024-03-16T10:00:00Z", &[("quality", "Julia", 4)]),
            response("r3", "2024-03-17T10:00:00Z", &[("quality", "Julia", 4)]),
        ];

        let stats = rank(&responses, &catalog, None);
        assert_eq!(stats[0].name, "Julia");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[1].name, "Carlos");
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let catalog = two_area_catalog();
        let responses = vec![
            response("r1", "2024-03-15T10:00:00Z", &[("safety", "Carlos", 4)]),
            response("r2", "2024-03-16T10:00:00Z", &[("safety", "Carlos", 4)]),
            response("r3", "2024-03-17T10:00:00Z", &[("safety", "Carlos", 5)]),
        ];

        let stats = rank(&responses, &catalog, None);
        assert_eq!(stats[0].average, 4.3);
    }

    #[test]
    fn month_shape_validation() {
        assert!(is_year_month("2024-03"));
        assert!(is_year_month("1999-12"));
        assert!(!is_year_month("2024-13"));
        assert!(!is_year_month("2024-3"));
        assert!(!is_year_month("24-03"));
        assert!(!is_year_month("2024/03"));
    }
}
