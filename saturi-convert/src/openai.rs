//! OpenAI-compatible REST client for chat completions and speech synthesis.

use async_trait::async_trait;
use saturi_common::config::Config;
use saturi_common::error::Error;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::provider::{ChatMessage, SpeechSynthesizer, SynthesizedAudio, TextGenerator};

/// Client for an OpenAI-compatible API.
///
/// One instance is built at startup and shared by every request.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    chat_endpoint: String,
    speech_endpoint: String,
    chat_model: String,
    tts_model: String,
    tts_voice: String,
}

impl OpenAiClient {
    /// Create a client from the application configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.openai_api_key.clone(),
            chat_endpoint: config.openai_endpoint("chat/completions"),
            speech_endpoint: config.openai_endpoint("audio/speech"),
            chat_model: config.chat_model.clone(),
            tts_model: config.tts_model.clone(),
            tts_voice: config.tts_voice.clone(),
        }
    }

    /// Chat completions endpoint.
    pub fn chat_endpoint(&self) -> &str {
        &self.chat_endpoint
    }

    /// Speech synthesis endpoint.
    pub fn speech_endpoint(&self) -> &str {
        &self.speech_endpoint
    }

    /// POST a JSON body and fail on non-success statuses.
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<reqwest::Response, Error> {
        let response = self
            .http
            .post(endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::api(endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(endpoint, status.as_u16(), body));
        }

        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    #[instrument(level = "debug", name = "chat_completion", skip(self, messages), fields(model = %self.chat_model))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, Error> {
        let endpoint = self.chat_endpoint();
        debug!(endpoint = %endpoint, messages = messages.len(), "Calling chat completions API");

        let request = ChatCompletionRequest {
            model: &self.chat_model,
            messages,
        };

        let response = self.post_json(endpoint, &request).await?;
        let status = response.status();

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            Error::api(
                endpoint,
                status.as_u16(),
                format!("Failed to parse response: {}", e),
            )
        })?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiClient {
    #[instrument(level = "debug", name = "speech_synthesis", skip(self, input), fields(model = %self.tts_model, voice = %self.tts_voice))]
    async fn synthesize(&self, input: &str) -> Result<SynthesizedAudio, Error> {
        let endpoint = self.speech_endpoint();
        debug!(endpoint = %endpoint, input_len = input.len(), "Calling speech API");

        let request = SpeechRequest {
            model: &self.tts_model,
            voice: &self.tts_voice,
            input,
        };

        let response = self.post_json(endpoint, &request).await?;
        let status = response.status();

        let bytes = response.bytes().await.map_err(|e| {
            Error::api(
                endpoint,
                status.as_u16(),
                format!("Failed to read audio body: {}", e),
            )
        })?;

        if bytes.is_empty() {
            return Err(Error::api(endpoint, status.as_u16(), "No audio content returned from API"));
        }

        Ok(SynthesizedAudio::mpeg(bytes.to_vec()))
    }
}

// =============================================================================
// API Request/Response Types
// =============================================================================

/// Chat completions request.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Ordered conversation
    pub messages: &'a [ChatMessage],
}

/// Chat completions response. Only the fields we read are modelled.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Candidate completions
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One candidate completion.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatChoiceMessage,
}

/// Message inside a completion; content may be null.
#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    /// Generated text
    #[serde(default)]
    pub content: Option<String>,
}

/// Speech synthesis request.
#[derive(Debug, Serialize)]
pub struct SpeechRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Voice identifier
    pub voice: &'a str,
    /// Text to narrate
    pub input: &'a str,
}
