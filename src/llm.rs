use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeminiConfig;

/// Text generation backend used by the query router.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer for `prompt`, optionally grounded in `context`.
    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<String>;
}

/// Prepend the context block the way the model expects it.
pub fn compose_prompt(prompt: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => format!(
            "Using the following information as context:\n\n{}\n\n{}",
            ctx, prompt
        ),
        _ => prompt.to_string(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// `{base}/models/{model}:generateContent`
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Single-turn, non-streaming generation.
    pub async fn generate_content(&self, text: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
            },
        };

        debug!(model = %self.config.model, prompt_len = text.len(), "Sending Gemini request");

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            warn!(%status, "Gemini API error");
            return Err(anyhow!("Gemini API error: {} - {}", status, text));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let answer = extract_text(parsed)?;
        debug!(answer_len = answer.len(), "Received Gemini response");
        Ok(answer)
    }
}

/// Concatenated text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(anyhow!("Gemini returned no text"));
    }
    Ok(text)
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<String> {
        self.generate_content(&compose_prompt(prompt, context)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_compose_prompt_with_context() {
        let composed = compose_prompt("Q?", Some("ctx"));
        assert_eq!(
            composed,
            "Using the following information as context:\n\nctx\n\nQ?"
        );
    }

    #[test]
    fn test_compose_prompt_without_context() {
        assert_eq!(compose_prompt("Q?", None), "Q?");
        assert_eq!(compose_prompt("Q?", Some("")), "Q?");
    }

    #[test]
    fn test_endpoint() {
        let mut cfg = config();
        cfg.base_url = "https://example.test/v1beta/".to_string();
        let client = GeminiClient::new(cfg).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 1024,
                temperature: 0.2,
                top_p: 0.95,
                top_k: 40,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(json["generationConfig"]["topK"], 40);
    }

    #[test]
    fn test_extract_text() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "Hello world");

        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(extract_text(blocked).is_err());
    }
}
