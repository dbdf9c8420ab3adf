//! Seam to the externally-owned datastore.
//!
//! The real deployment keeps configuration and responses in a remote store
//! with live updates; the engine only ever sees snapshots. `SurveyStore`
//! captures the three operations that store supports (read-all,
//! create-with-generated-id, full replace) and `InMemorySurveyStore` stands
//! in for it in the service and in tests.

use crate::survey::domain::{AreaCatalog, SurveyResponse};
use crate::survey::submission::NewSurvey;
use chrono::Utc;
use std::fmt;
use std::sync::Mutex;

#[derive(Debug)]
pub enum StoreError {
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend(message) => write!(f, "store backend failure: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub trait SurveyStore: Send + Sync {
    /// Current configuration snapshot.
    fn catalog(&self) -> Result<AreaCatalog, StoreError>;

    /// Replaces the configuration wholesale; there is no partial update.
    fn replace_catalog(&self, catalog: AreaCatalog) -> Result<(), StoreError>;

    /// All responses, newest submission first.
    fn responses(&self) -> Result<Vec<SurveyResponse>, StoreError>;

    /// Persists a validated submission, assigning the opaque id and the
    /// submission timestamp.
    fn create(&self, survey: NewSurvey) -> Result<SurveyResponse, StoreError>;

    fn fetch(&self, id: &str) -> Result<Option<SurveyResponse>, StoreError>;
}

struct StoreInner {
    catalog: AreaCatalog,
    responses: Vec<SurveyResponse>,
    next_id: u64,
}

pub struct InMemorySurveyStore {
    inner: Mutex<StoreInner>,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self::with_catalog(AreaCatalog::standard())
    }

    pub fn with_catalog(catalog: AreaCatalog) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                catalog,
                responses: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemorySurveyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyStore for InMemorySurveyStore {
    fn catalog(&self) -> Result<AreaCatalog, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.catalog.clone())
    }

    fn replace_catalog(&self, catalog: AreaCatalog) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.catalog = catalog;
        Ok(())
    }

    fn responses(&self) -> Result<Vec<SurveyResponse>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.responses.iter().rev().cloned().collect())
    }

    fn create(&self, survey: NewSurvey) -> Result<SurveyResponse, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let response = SurveyResponse {
            id: format!("resp-{:06}", guard.next_id),
            name: survey.name,
            date: survey.date,
            created_at: Utc::now(),
            answers: survey.answers,
        };
        guard.next_id += 1;
        guard.responses.push(response.clone());
        Ok(response)
    }

    fn fetch(&self, id: &str) -> Result<Option<SurveyResponse>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard
            .responses
            .iter()
            .find(|response| response.id == id)
            .cloned())
    }
}
