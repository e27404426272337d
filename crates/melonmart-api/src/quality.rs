//! Image-quality analyzer backed by a Gemini-style REST endpoint.
//!
//! Sends the image inline (base64) together with a grading instruction and
//! asks for a JSON response. Failures here are ordinary errors; the
//! application layer substitutes `QualityAssessment::fallback()` so a dead
//! analyzer never blocks a seller submission.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use melonmart_core::{MartError, QualityAnalyzer, QualityAssessment, Result};

use crate::storefront::api_error;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const GRADING_PROMPT: &str = "Analyze this image of a melon (or fruit). \
Act as an agricultural quality expert. Assess the visible quality, ripeness \
based on skin color and texture, and potential defects. Estimate the \
sweetness (Brix) from visual indicators of the variety. If the image is not \
a fruit or melon, reject it in the grade. Respond with JSON: {\"grade\": \
\"A\"|\"B\"|\"C\"|\"Rejected\", \"ripenessScore\": number 0-100, \
\"sweetnessPrediction\": number, \"defects\": [string], \"reasoning\": string}.";

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
struct InlineDataPayload {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}

/// [`QualityAnalyzer`] talking to a Gemini-compatible HTTP API.
#[derive(Clone)]
pub struct GeminiQualityAnalyzer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiQualityAnalyzer {
    /// Creates an analyzer with the provided API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the endpoint origin (used against local stands-ins).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body(image: &[u8], mime: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineDataPayload {
                            mime_type: mime.to_string(),
                            data: BASE64_STANDARD.encode(image),
                        },
                    },
                    Part::Text {
                        text: GRADING_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    pub(crate) fn parse_assessment(text: &str) -> Result<QualityAssessment> {
        Ok(serde_json::from_str(text)?)
    }
}

#[async_trait]
impl QualityAnalyzer for GeminiQualityAnalyzer {
    async fn analyze(&self, image: &[u8], mime: &str) -> Result<QualityAssessment> {
        if image.is_empty() {
            return Err(MartError::validation("image is empty"));
        }
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );
        let response = self
            .client
            .post(url)
            .json(&Self::request_body(image, mime))
            .send()
            .await
            .map_err(|err| MartError::network(format!("analysis request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body, "Image analysis failed"));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| MartError::network(format!("analysis response unreadable: {err}")))?;
        let text = parsed
            .first_text()
            .ok_or_else(|| MartError::internal("analysis response contained no text"))?;
        debug!(bytes = image.len(), "image graded");
        Self::parse_assessment(&text)
    }
}
