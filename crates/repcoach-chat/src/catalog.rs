//! Exercise catalog: the set of exercise names answers are grounded in.
//!
//! The catalog is fetched once per session from the catalog service and
//! normalized so that spellings differing only in case or separators
//! collapse to one entry.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use repcoach_core::config::CatalogConfig;
use repcoach_core::types::{normalize, Exercise};

use crate::error::ChatError;

// =============================================================================
// CatalogSource
// =============================================================================

/// Provider of raw exercise identifiers.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every exercise identifier known to the source.
    async fn fetch_names(&self) -> Result<Vec<String>, ChatError>;
}

#[derive(Debug, Deserialize)]
struct ListingBody {
    exercises: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// Catalog source backed by the `GET /list_all` endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn listing_url(&self) -> String {
        format!("{}/list_all", self.base_url)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn fetch_names(&self) -> Result<Vec<String>, ChatError> {
        let url = self.listing_url();
        let response = self.client.get(&url).send().await.map_err(|e| {
            ChatError::CatalogUnavailable(format!("cannot reach {}: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            // The service reports failures as {"message": ...}; fall back to
            // the bare status when the body is anything else.
            let detail = response
                .json::<MessageBody>()
                .await
                .map(|b| b.message)
                .unwrap_or_else(|_| "no details".to_string());
            return Err(ChatError::CatalogUnavailable(format!(
                "status {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let body: ListingBody = response.json().await.map_err(|e| {
            ChatError::CatalogUnavailable(format!("unreadable catalog listing: {}", e))
        })?;
        Ok(body.exercises)
    }
}

// =============================================================================
// ExerciseCatalog
// =============================================================================

/// Normalized, de-duplicated exercise catalog in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
}

impl ExerciseCatalog {
    /// Build a catalog from raw identifiers.
    ///
    /// Blank identifiers are skipped. When two identifiers normalize to the
    /// same key, the first one wins.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut exercises = Vec::new();
        for name in names {
            let exercise = Exercise::new(name.as_ref().trim());
            if exercise.key.is_empty() {
                continue;
            }
            if seen.insert(exercise.key.to_lowercase()) {
                exercises.push(exercise);
            } else {
                debug!(name = %exercise.name, key = %exercise.key, "Merged duplicate catalog entry");
            }
        }
        Self { exercises }
    }

    /// Fetch and normalize the catalog.
    ///
    /// Any source failure, and an empty listing, is `CatalogUnavailable`:
    /// a session cannot start without grounding.
    pub async fn load(source: &dyn CatalogSource) -> Result<Self, ChatError> {
        let names = source.fetch_names().await?;
        let catalog = Self::from_names(names);
        if catalog.is_empty() {
            return Err(ChatError::CatalogUnavailable(
                "catalog service listed no exercises".to_string(),
            ));
        }
        info!(count = catalog.len(), "Exercise catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }

    /// Look up an exercise by any spelling of its name.
    pub fn get(&self, name: &str) -> Option<&Exercise> {
        let key = normalize(name).to_lowercase();
        self.exercises.iter().find(|e| e.key.to_lowercase() == key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Comma-joined list of canonical names, in listing order.
    pub fn listing(&self) -> String {
        self.exercises
            .iter()
            .map(|e| e.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Tests
// =============================================================================
