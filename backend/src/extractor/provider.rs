use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::ExtractError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One question about one image, answered as free-form text. The extraction
/// service only depends on this seam, so tests can script the answers.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn ask(&self, question: &str, image_png: &[u8]) -> Result<String, ExtractError>;
}

/// Client for the Generative Language `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    async fn ask(&self, question: &str, image_png: &[u8]) -> Result<String, ExtractError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart {
                        text: Some(question.to_string()),
                        inline_data: None,
                    },
                    RequestPart {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/png".to_string(),
                            data: STANDARD.encode(image_png),
                        }),
                    },
                ],
            }],
        };

        let response = self.http_client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await?;
            return Err(ExtractError::Api { status, detail });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or(ExtractError::EmptyResponse)?;

        Ok(text)
    }
}

/// Scripted provider for tests: pops one canned outcome per call and records
/// the questions it was asked.
#[cfg(test)]
pub struct ScriptedProvider {
    answers: std::sync::Mutex<std::collections::VecDeque<Result<String, String>>>,
    pub questions_seen: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl ScriptedProvider {
    pub fn new(answers: Vec<Result<&str, &str>>) -> Self {
        Self {
            answers: std::sync::Mutex::new(
                answers
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            questions_seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn calls_made(&self) -> usize {
        self.questions_seen.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl VisionProvider for ScriptedProvider {
    async fn ask(&self, question: &str, _image_png: &[u8]) -> Result<String, ExtractError> {
        self.questions_seen
            .lock()
            .unwrap()
            .push(question.to_string());
        match self.answers.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(detail)) => Err(ExtractError::Api {
                status: 503,
                detail,
            }),
            None => Err(ExtractError::EmptyResponse),
        }
    }
}
