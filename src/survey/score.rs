//! Normalizes heterogeneous per-area answers onto a common 0-100 scale.

use serde::{Deserialize, Serialize};

/// The four content answers the form offers. A closed set: anything the
/// store holds outside these labels normalizes to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentRating {
    VeryClear,
    Partial,
    Doubts,
    NotUnderstood,
}

impl ContentRating {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::VeryClear,
            Self::Partial,
            Self::Doubts,
            Self::NotUnderstood,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryClear => "Sim, muito claro",
            Self::Partial => "Parcialmente",
            Self::Doubts => "Ficaram dúvidas",
            Self::NotUnderstood => "Não entendi nada",
        }
    }

    pub const fn score(self) -> u8 {
        match self {
            Self::VeryClear => 100,
            Self::Partial => 60,
            Self::Doubts => 30,
            Self::NotUnderstood => 0,
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|r| r.label() == raw)
    }
}

/// Content answer on the 0-100 scale; unrecognized or missing labels score 0.
pub fn content_score(label: &str) -> u8 {
    ContentRating::from_label(label).map_or(0, ContentRating::score)
}

/// Star rating on the 0-100 scale. Zero encodes "not rated". Out-of-range
/// input is not clamped; keeping ratings in 1..=5 is the store's contract.
pub fn instructor_score(rating: u32) -> f64 {
    f64::from(rating) / 5.0 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_labels_hit_fixed_scores() {
        assert_eq!(content_score("Sim, muito claro"), 100);
        assert_eq!(content_score("Parcialmente"), 60);
        assert_eq!(content_score("Ficaram dúvidas"), 30);
        assert_eq!(content_score("Não entendi nada"), 0);
    }

    #[test]
    fn unknown_or_missing_labels_score_zero() {
        assert_eq!(content_score(""), 0);
        assert_eq!(content_score("sim, muito claro"), 0);
        assert_eq!(content_score("Excelente"), 0);
    }

    #[test]
    fn star_ratings_scale_by_twenty() {
        for rating in 1..=5 {
            assert_eq!(instructor_score(rating), f64::from(rating) * 20.0);
        }
        assert_eq!(instructor_score(0), 0.0);
    }

    #[test]
    fn every_rating_round_trips_through_its_label() {
        for rating in ContentRating::ordered() {
            assert_eq!(ContentRating::from_label(rating.label()), Some(rating));
        }
    }
}
