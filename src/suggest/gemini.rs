//! Gemini Image Analysis
//!
//! `generateContent` call with the photo as inline data and a JSON response
//! schema constraining the answer to [`Suggestion`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    parse_suggestion, strip_data_url, ImageAnalyzer, SuggestError, Suggestion, ANALYSIS_PROMPT,
    MAX_TITLE_CHARS,
};
use crate::config::GeminiConfig;
use crate::domain::Priority;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Image analyzer backed by the Gemini API
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, SuggestError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| SuggestError::Transport(e.to_string()))?;
        Ok(Self { config, http_client })
    }

    pub fn has_credentials(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(image: &str) -> GenerateRequest {
        let priorities: Vec<&str> = Priority::all().iter().map(|p| p.as_str()).collect();

        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: strip_data_url(image).to_string(),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(ANALYSIS_PROMPT.to_string()),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: json!({
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": format!("A short, concise title for the issue (max {} chars)", MAX_TITLE_CHARS)
                        },
                        "description": {
                            "type": "STRING",
                            "description": "A detailed technical description of the problem observed."
                        },
                        "priority": { "type": "STRING", "enum": priorities }
                    },
                    "required": ["title", "description", "priority"]
                }),
            },
        }
    }
}

#[async_trait]
impl ImageAnalyzer for GeminiClient {
    async fn analyze(&self, image: &str) -> Result<Suggestion, SuggestError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                return Err(SuggestError::NotConfigured(
                    "set GEMINI_API_KEY to enable image analysis".to_string(),
                ))
            }
        };

        let response = self
            .http_client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&Self::build_request(image))
            .send()
            .await
            .map_err(|e| SuggestError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::warn!("Image analysis failed with status {}", status);
            return Err(SuggestError::Api { status, body });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SuggestError::Malformed(e.to_string()))?;

        let text = body.first_text().ok_or(SuggestError::EmptyResponse)?;
        parse_suggestion(&text)
    }
}
