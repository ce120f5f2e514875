//! Step image resolution.
//!
//! Every exercise has exactly two step images served by the media service.
//! [`MediaResolver`] builds their locators and fetches both concurrently;
//! a failed or slow image is dropped on its own without affecting the other
//! image or the text answer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use repcoach_core::config::MediaConfig;
use repcoach_core::types::{normalize, Exercise};

use crate::error::ChatError;

/// Number of step images per exercise.
pub const STEP_COUNT: u8 = 2;

/// Build the media path for one step image, or `None` for an out-of-range step.
///
/// `resource_path("Push_Up", 0)` is `/exercises/push_up/images/0.jpg`.
pub fn resource_path(exercise_name: &str, step: u8) -> Option<String> {
    if step >= STEP_COUNT {
        return None;
    }
    Some(format!(
        "/exercises/{}/images/{}.jpg",
        normalize(exercise_name).to_lowercase(),
        step
    ))
}

// =============================================================================
// MediaFetcher
// =============================================================================

/// Retrieves image bytes for a locator.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, ChatError>;
}

/// Media fetcher backed by the image-serving HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpMediaClient {
    client: Client,
}

impl HttpMediaClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpMediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaClient {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, ChatError> {
        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| ChatError::MediaFetch(format!("{}: {}", locator, e)))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(ChatError::MediaFetch(format!("{}: image not found", locator)))
            }
            status => {
                return Err(ChatError::MediaFetch(format!(
                    "{}: status {}",
                    locator,
                    status.as_u16()
                )))
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChatError::MediaFetch(format!("{}: {}", locator, e)))?;
        Ok(bytes.to_vec())
    }
}

// =============================================================================
// MediaResolver
// =============================================================================

/// One successfully fetched step image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
    /// Zero-based step index.
    pub step: u8,
    /// Absolute locator the image was fetched from.
    pub locator: String,
    /// Caption such as `Step 1 - Push Up`.
    pub caption: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Maps exercises to step image locators and fetches them.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    base_url: String,
    timeout: Duration,
}

impl MediaResolver {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute locator for one step image.
    pub fn locator(&self, exercise_name: &str, step: u8) -> Option<String> {
        resource_path(exercise_name, step).map(|path| format!("{}{}", self.base_url, path))
    }

    /// Fetch both step images concurrently.
    ///
    /// Returns zero, one or two images in step order.
    pub async fn resolve(&self, fetcher: &dyn MediaFetcher, exercise: &Exercise) -> Vec<ResolvedImage> {
        let (first, second) = tokio::join!(
            self.resolve_step(fetcher, exercise, 0),
            self.resolve_step(fetcher, exercise, 1)
        );
        first.into_iter().chain(second).collect()
    }

    async fn resolve_step(
        &self,
        fetcher: &dyn MediaFetcher,
        exercise: &Exercise,
        step: u8,
    ) -> Option<ResolvedImage> {
        let locator = self.locator(&exercise.key, step)?;
        match tokio::time::timeout(self.timeout, fetcher.fetch(&locator)).await {
            Ok(Ok(bytes)) => {
                debug!(locator = %locator, size = bytes.len(), "Step image fetched");
                Some(ResolvedImage {
                    step,
                    caption: format!("Step {} - {}", step + 1, exercise.display_name()),
                    locator,
                    bytes,
                })
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Step image unavailable");
                None
            }
            Err(_) => {
                warn!(locator = %locator, timeout_ms = self.timeout.as_millis() as u64, "Step image timed out");
                None
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// In-memory fetcher: locators missing from the map are 404s.
    struct MapFetcher {
        images: HashMap<String, Vec<u8>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl MediaFetcher for MapFetcher {
        async fn fetch(&self, locator: &str) -> Result<Vec<u8>, ChatError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.images
                .get(locator)
                .cloned()
                .ok_or_else(|| ChatError::MediaFetch(format!("{}: image not found", locator)))
        }
    }

    fn resolver() -> MediaResolver {
        MediaResolver::new(&MediaConfig {
            base_url: "http://media.test/".to_string(),
            timeout_secs: 5,
        })
    }

    // ---- resource_path ----

    #[test]
    fn test_resource_path_lowercases_normalized_name() {
        assert_eq!(
            resource_path("Push_Up", 0).as_deref(),
            Some("/exercises/push_up/images/0.jpg")
        );
        assert_eq!(
            resource_path("jumping jacks", 1).as_deref(),
            Some("/exercises/jumping_jacks/images/1.jpg")
        );
    }

    #[test]
    fn test_resource_path_rejects_out_of_range_step() {
        assert!(resource_path("Squats", 2).is_none());
        assert!(resource_path("Squats", u8::MAX).is_none());
    }

    #[test]
    fn test_locator_joins_base_url() {
        assert_eq!(
            resolver().locator("Squats", 1).as_deref(),
            Some("http://media.test/exercises/squats/images/1.jpg")
        );
    }

    // ---- resolve ----

    #[tokio::test]
    async fn test_resolve_both_images() {
        let exercise = Exercise::new("Push Up");
        let fetcher = MapFetcher {
            images: HashMap::from([
                ("http://media.test/exercises/push_up/images/0.jpg".to_string(), vec![1]),
                ("http://media.test/exercises/push_up/images/1.jpg".to_string(), vec![2]),
            ]),
            delay: None,
        };
        let images = resolver().resolve(&fetcher, &exercise).await;
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].step, 0);
        assert_eq!(images[0].caption, "Step 1 - Push Up");
        assert_eq!(images[0].bytes, vec![1]);
        assert_eq!(images[1].step, 1);
        assert_eq!(images[1].caption, "Step 2 - Push Up");
    }

    #[tokio::test]
    async fn test_resolve_missing_image_keeps_the_other() {
        let exercise = Exercise::new("Squats");
        let fetcher = MapFetcher {
            images: HashMap::from([(
                "http://media.test/exercises/squats/images/1.jpg".to_string(),
                vec![9],
            )]),
            delay: None,
        };
        let images = resolver().resolve(&fetcher, &exercise).await;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].step, 1);
    }

    #[tokio::test]
    async fn test_resolve_timeout_degrades_to_no_image() {
        let exercise = Exercise::new("Squats");
        let fetcher = MapFetcher {
            images: HashMap::from([
                ("http://media.test/exercises/squats/images/0.jpg".to_string(), vec![1]),
                ("http://media.test/exercises/squats/images/1.jpg".to_string(), vec![2]),
            ]),
            delay: Some(Duration::from_millis(200)),
        };
        let images = resolver()
            .with_timeout(Duration::from_millis(20))
            .resolve(&fetcher, &exercise)
            .await;
        assert!(images.is_empty());
    }

    // ---- HttpMediaClient ----

    #[tokio::test]
    async fn test_http_client_fetches_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exercises/squats/images/0.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF]),
            )
            .mount(&server)
            .await;

        let bytes = HttpMediaClient::new()
            .fetch(&format!("{}/exercises/squats/images/0.jpg", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_http_client_not_found_is_media_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exercises/squats/images/1.jpg"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"message": "Image not found."})),
            )
            .mount(&server)
            .await;

        let err = HttpMediaClient::new()
            .fetch(&format!("{}/exercises/squats/images/1.jpg", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MediaFetch(_)));
        assert!(err.to_string().contains("image not found"));
    }

    #[tokio::test]
    async fn test_resolve_over_http_with_one_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exercises/plank/images/0.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/exercises/plank/images/1.jpg"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({"message": "Internal server error."})),
            )
            .mount(&server)
            .await;

        let resolver = MediaResolver::new(&MediaConfig {
            base_url: server.uri(),
            timeout_secs: 2,
        });
        let images = resolver
            .resolve(&HttpMediaClient::new(), &Exercise::new("Plank"))
            .await;
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].step, 0);
        assert_eq!(images[0].bytes, vec![7]);
    }
}
