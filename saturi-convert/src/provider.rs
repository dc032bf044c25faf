//! Provider seam for text generation and speech synthesis.
//!
//! The conversion handler only talks to these traits, so the concrete
//! OpenAI-compatible client can be swapped for fakes in tests.

use async_trait::async_trait;
use saturi_common::error::Error;
use serde::{Deserialize, Serialize};

/// MIME type of synthesized speech.
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instruction that frames the conversation.
    System,
    /// End-user request.
    User,
}

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Raw audio returned by a speech provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// Encoded audio bytes
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`
    pub mime_type: String,
}

impl SynthesizedAudio {
    /// Wrap MPEG audio bytes.
    pub fn mpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: AUDIO_MIME_TYPE.to_string(),
        }
    }
}

/// Chat completion provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `messages` and return the first completion's text.
    ///
    /// `Ok(None)` means the provider answered but produced no content.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, Error>;
}

/// Text-to-speech provider.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Narrate `input` and return the encoded audio.
    async fn synthesize(&self, input: &str) -> Result<SynthesizedAudio, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_serialize_lowercase() {
        let messages = [ChatMessage::system("s"), ChatMessage::user("u")];
        let value = serde_json::to_value(messages).unwrap();
        assert_eq!(value[0]["role"], "system");
        assert_eq!(value[1]["role"], "user");
    }

    #[test]
    fn test_only_request_roles_are_modelled() {
        assert!(serde_json::from_str::<Role>("\"assistant\"").is_err());
    }
}
