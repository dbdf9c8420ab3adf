//! Response aggregation and scoring engine for onboarding training surveys.
//!
//! Everything in this module is a pure projection over snapshots handed in
//! by the caller: the ranking, the per-survey scorecard, and the tabular
//! export never mutate a response and are recomputed on every query.

pub mod domain;
pub mod export;
pub mod ranking;
pub mod report;
pub mod score;
pub mod store;
pub mod submission;

pub use domain::{AreaAnswer, AreaCatalog, AreaDefinition, SurveyResponse};
pub use export::{render_csv, to_rows, ExportRow};
pub use ranking::{is_year_month, rank, InstructorStat};
pub use report::{build_report, AreaScore, SurveyReport};
pub use score::{content_score, instructor_score, ContentRating};
pub use store::{InMemorySurveyStore, StoreError, SurveyStore};
pub use submission::{validate_submission, NewSurvey, SubmissionError};
