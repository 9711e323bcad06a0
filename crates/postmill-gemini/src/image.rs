// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cover image producer: prompt, generate, upload.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use postmill_core::{CoverImageProducer, ImageUploader, PostmillError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::client::{GeminiClient, first_inline_image};
use crate::templates::{CoverPlan, detect_mood};

pub struct CoverImageAgent {
    client: GeminiClient,
    uploader: Arc<dyn ImageUploader>,
    rng: Mutex<StdRng>,
}

impl CoverImageAgent {
    pub fn new(client: GeminiClient, uploader: Arc<dyn ImageUploader>) -> Self {
        Self {
            client,
            uploader,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic template selection for tests.
    pub fn with_seed(client: GeminiClient, uploader: Arc<dyn ImageUploader>, seed: u64) -> Self {
        Self {
            client,
            uploader,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn plan(&self, title: &str, excerpt: &str) -> Result<CoverPlan, PostmillError> {
        let mood = detect_mood(title, excerpt);
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| PostmillError::Internal("image agent rng poisoned".into()))?;
        Ok(CoverPlan::choose(mood, &mut *rng))
    }
}

#[async_trait]
impl CoverImageProducer for CoverImageAgent {
    async fn produce_cover(&self, title: &str, excerpt: &str) -> Result<String, PostmillError> {
        let plan = self.plan(title, excerpt)?;
        info!(
            model = self.client.model(),
            mood = %plan.mood,
            category = %plan.category,
            scene = plan.scene,
            include_product = plan.include_product,
            "generating cover image"
        );

        let response = self.client.generate(&plan.prompt(title)).await?;
        let image = first_inline_image(&response)?;
        self.uploader
            .upload_image(image.bytes, &image.mime_type)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingUploader {
        seen: Mutex<Vec<(Vec<u8>, String)>>,
    }

    #[async_trait]
    impl ImageUploader for RecordingUploader {
        async fn upload_image(
            &self,
            bytes: Vec<u8>,
            mime_type: &str,
        ) -> Result<String, PostmillError> {
            self.seen
                .lock()
                .unwrap()
                .push((bytes, mime_type.to_string()));
            Ok("https://cdn.example.com/cover.webp".into())
        }
    }

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new("k", "img-model", server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn uploads_decoded_image_and_returns_url() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "here you go"},
                    {"inlineData": {"mimeType": "image/webp", "data": STANDARD.encode(b"RIFFwebp")}}
                ]}
            }]
        });
        Mock::given(method("POST"))
            .and(path("/models/img-model:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let uploader = Arc::new(RecordingUploader::default());
        let agent = CoverImageAgent::with_seed(client(&server), uploader.clone(), 1);
        let url = agent
            .produce_cover("Beeswax and slow mornings", "A short excerpt")
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.example.com/cover.webp");
        let seen = uploader.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, b"RIFFwebp");
        assert_eq!(seen[0].1, "image/webp");
    }

    #[tokio::test]
    async fn text_only_response_never_uploads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "sorry"}]}}]
            })))
            .mount(&server)
            .await;

        let uploader = Arc::new(RecordingUploader::default());
        let agent = CoverImageAgent::with_seed(client(&server), uploader.clone(), 1);
        let err = agent.produce_cover("t", "e").await.unwrap_err();

        assert!(matches!(err, PostmillError::NoImageReturned));
        assert!(uploader.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let agent = CoverImageAgent::with_seed(
            client(&server),
            Arc::new(RecordingUploader::default()),
            1,
        );
        let err = agent.produce_cover("t", "e").await.unwrap_err();
        assert!(err.to_string().contains("overloaded"));
    }
}
