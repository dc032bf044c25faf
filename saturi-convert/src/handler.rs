//! Conversion handler for the dialect narration service.
//!
//! This module provides the `ConvertHandler` struct and parameter types for the
//! validate → prompt → translate → synthesize → deliver pipeline. The two
//! provider calls run strictly in sequence, and any failure discards the
//! request's earlier work.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use saturi_common::config::Config;
use saturi_common::error::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::dialect::Dialect;
use crate::openai::OpenAiClient;
use crate::prompt::build_messages;
use crate::provider::{SpeechSynthesizer, SynthesizedAudio, TextGenerator};
use crate::storage::{AudioStore, StoredAudio};

/// Message returned when text or dialect is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "텍스트와 방언을 모두 입력해주세요.";

/// How the synthesized audio is handed back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// Base64 data URI embedded in the response.
    #[default]
    Inline,
    /// File written to the audio directory; the response carries its URL.
    File,
}

impl Delivery {
    /// Parse a delivery name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "inline" => Some(Delivery::Inline),
            "file" => Some(Delivery::File),
            _ => None,
        }
    }
}

/// Raw conversion request as received over HTTP.
///
/// Every field is optional at this stage so that missing values surface as
/// validation errors rather than parse failures.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConvertParams {
    /// Text to translate and narrate.
    #[serde(default)]
    pub text: Option<String>,

    /// Dialect key (`jeju`, `gyeongsang`, `jeolla`, `gangwon`).
    #[serde(default)]
    pub dialect: Option<String>,

    /// `inline` (default) or `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<String>,
}

/// Validation error details for conversion parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A validated conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    /// Text exactly as submitted.
    pub text: String,
    /// Target dialect.
    pub dialect: Dialect,
    /// Delivery mode.
    pub delivery: Delivery,
}

impl ConvertParams {
    /// Create parameters for the given text and dialect key.
    pub fn new(text: impl Into<String>, dialect: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            dialect: Some(dialect.into()),
            delivery: None,
        }
    }

    /// Request a specific delivery mode.
    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = Some(
            match delivery {
                Delivery::Inline => "inline",
                Delivery::File => "file",
            }
            .to_string(),
        );
        self
    }

    /// Validate the parameters.
    ///
    /// Missing or blank text/dialect is reported first, as a single error
    /// carrying [`MISSING_FIELDS_MESSAGE`].
    pub fn validate(&self) -> Result<ConvertRequest, ValidationError> {
        let text = self.text.as_deref().filter(|t| !t.trim().is_empty());
        let dialect_key = self.dialect.as_deref().filter(|d| !d.trim().is_empty());

        let (Some(text), Some(dialect_key)) = (text, dialect_key) else {
            let field = match (text, dialect_key) {
                (None, None) => "text, dialect",
                (None, _) => "text",
                _ => "dialect",
            };
            return Err(ValidationError {
                field: field.to_string(),
                message: MISSING_FIELDS_MESSAGE.to_string(),
            });
        };

        let dialect = Dialect::from_key(dialect_key).ok_or_else(|| ValidationError {
            field: "dialect".to_string(),
            message: format!(
                "지원하지 않는 방언입니다: '{}'. 사용 가능한 방언: {}",
                dialect_key,
                Dialect::valid_keys()
            ),
        })?;

        let delivery = match self.delivery.as_deref() {
            None => Delivery::default(),
            Some(value) => Delivery::parse(value).ok_or_else(|| ValidationError {
                field: "delivery".to_string(),
                message: format!(
                    "지원하지 않는 전달 방식입니다: '{}'. 사용 가능한 방식: inline, file",
                    value
                ),
            })?,
        };

        Ok(ConvertRequest {
            text: text.to_string(),
            dialect,
            delivery,
        })
    }
}

// =============================================================================
// Result Types
// =============================================================================

/// Audio encoded for inline delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAudio {
    /// Base64-encoded audio data
    pub data: String,
    /// MIME type of the audio
    pub mime_type: String,
}

impl GeneratedAudio {
    /// Base64-encode synthesized audio.
    pub fn encode(audio: &SynthesizedAudio) -> Self {
        Self {
            data: BASE64.encode(&audio.bytes),
            mime_type: audio.mime_type.clone(),
        }
    }

    /// Render as a `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Delivered audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutput {
    /// Base64-encoded audio data
    Inline(GeneratedAudio),
    /// File written to the audio directory
    Stored(StoredAudio),
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertResult {
    /// The text that was narrated: the dialect translation, or the original
    /// input when the model returned nothing.
    pub converted_text: String,
    /// The narration.
    pub audio: AudioOutput,
}

/// Conversion handler.
///
/// Holds the provider clients (shared for the life of the process) and the
/// audio store.
pub struct ConvertHandler {
    text: Arc<dyn TextGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    store: AudioStore,
}

impl ConvertHandler {
    /// Create a handler backed by the OpenAI-compatible client.
    pub fn new(config: &Config) -> Self {
        let client = Arc::new(OpenAiClient::new(config));
        Self::with_deps(client.clone(), client, AudioStore::from_config(config))
    }

    /// Create a handler with explicit dependencies.
    pub fn with_deps(
        text: Arc<dyn TextGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
        store: AudioStore,
    ) -> Self {
        Self {
            text,
            speech,
            store,
        }
    }

    /// The audio store used for file delivery.
    pub fn store(&self) -> &AudioStore {
        &self.store
    }

    /// Translate text into a dialect and narrate it.
    ///
    /// # Returns
    /// * `Ok(ConvertResult)` - Converted text with inline audio or a stored file
    /// * `Err(Error)` - If validation fails, a provider call fails, or storage fails
    #[instrument(level = "info", name = "convert", skip(self, params))]
    pub async fn convert(&self, params: ConvertParams) -> Result<ConvertResult, Error> {
        let request = params
            .validate()
            .map_err(|e| Error::validation(e.message))?;

        info!(
            dialect = %request.dialect,
            text_len = request.text.chars().count(),
            delivery = ?request.delivery,
            "Starting translation"
        );

        let messages = build_messages(request.dialect, &request.text);
        let completion = self.text.complete(&messages).await?;

        let converted_text = match completion.filter(|c| !c.trim().is_empty()) {
            Some(text) => {
                info!(converted_len = text.chars().count(), "Translation completed");
                text
            }
            None => {
                info!("Model returned no content, narrating the original text");
                request.text.clone()
            }
        };
        debug!(converted_text = %converted_text, "Converted text");

        info!("Starting speech synthesis");
        let audio = self.speech.synthesize(&converted_text).await?;
        info!(bytes = audio.bytes.len(), "Speech synthesis completed");

        let audio = self.handle_output(audio, request.delivery).await?;

        Ok(ConvertResult {
            converted_text,
            audio,
        })
    }

    /// Hand the audio back inline or via the store.
    async fn handle_output(
        &self,
        audio: SynthesizedAudio,
        delivery: Delivery,
    ) -> Result<AudioOutput, Error> {
        match delivery {
            Delivery::Inline => Ok(AudioOutput::Inline(GeneratedAudio::encode(&audio))),
            Delivery::File => Ok(AudioOutput::Stored(self.store.save(&audio.bytes).await?)),
        }
    }
}
