use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One topic area of the onboarding program.
///
/// `key` is a stable identifier chosen at setup and never renamed;
/// administrators only touch `label`, `color`, and the instructor roster.
/// `color` is a presentation tag the engine carries through opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaDefinition {
    pub key: String,
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub instructors: Vec<String>,
}

/// Ordered, immutable snapshot of the configured areas.
///
/// Administrators edit the configuration elsewhere and re-push it whole;
/// the engine only ever reads one version. Display order is the order of
/// the `areas` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCatalog {
    areas: Vec<AreaDefinition>,
}

impl AreaCatalog {
    pub fn new(areas: Vec<AreaDefinition>) -> Self {
        Self { areas }
    }

    /// The stock catalog the service starts with before an administrator
    /// pushes their own.
    pub fn standard() -> Self {
        let area = |key: &str, label: &str, color: &str, instructors: &[&str]| AreaDefinition {
            key: key.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            instructors: instructors.iter().map(|name| name.to_string()).collect(),
        };

        Self::new(vec![
            area(
                "safety",
                "Segurança do Trabalho",
                "blue",
                &["Carlos Segurança", "Ana Prevenção"],
            ),
            area(
                "quality",
                "Qualidade",
                "yellow",
                &["Julia ISO", "Marcos Qualidade"],
            ),
            area(
                "people",
                "PEOPLE (RH)",
                "purple",
                &["Beatriz RH", "Ricardo Cultura"],
            ),
            area(
                "environment",
                "Meio Ambiente",
                "green",
                &["Lucas Verde", "Mariana Sustentável"],
            ),
            area(
                "tpm",
                "TPM (Manutenção)",
                "orange",
                &["Eng. Roberto", "Téc. Cláudia"],
            ),
        ])
    }

    pub fn areas(&self) -> &[AreaDefinition] {
        &self.areas
    }

    pub fn get(&self, key: &str) -> Option<&AreaDefinition> {
        self.areas.iter().find(|area| area.key == key)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

/// Per-area answers carried by a submitted survey.
///
/// Defaults degrade missing fields to "no answer" rather than failing:
/// the engine renders a best-effort view of whatever reached the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaAnswer {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub instructor_name: String,
    #[serde(default)]
    pub instructor_rating: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One submitted survey, immutable once created.
///
/// `date` is the session date the respondent declared on the form and is
/// captured but unused by the engine; ordering, month filtering, and export
/// dates all use `created_at`, the server-assigned submission timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: HashMap<String, AreaAnswer>,
}

impl SurveyResponse {
    pub fn answer(&self, area_key: &str) -> Option<&AreaAnswer> {
        self.answers.get(area_key)
    }
}
