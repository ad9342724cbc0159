/// Gemini provider (Generative Language API)
///
/// Sends `generateContent` requests with a JSON response schema so the model
/// answers with structured output instead of prose.
use crate::{
    error::{AppError, AppResult},
    models::GeminiResponse,
    services::providers::GenerativeClient,
};
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f64,
}

impl GeminiClient {
    pub fn new(api_key: String, api_url: String, model: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Request body for a schema-constrained generation
    fn request_body(&self, prompt: &str, schema: &Value) -> Value {
        json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
                "temperature": self.temperature
            }
        })
    }
}

#[async_trait::async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_json(&self, prompt: &str, schema: &Value) -> AppResult<String> {
        tracing::debug!(model = %self.model, "Sending generation request");

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(prompt, schema))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                model = %self.model,
                "Gemini request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let generated: GeminiResponse = response.json().await?;

        generated
            .text()
            .ok_or_else(|| AppError::EmptyResponse("Gemini returned no candidates".to_string()))
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
