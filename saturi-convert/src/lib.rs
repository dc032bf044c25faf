//! Saturi Convert Library
//!
//! Rewrites text in a Korean regional dialect with a chat completion model,
//! narrates the result with a speech synthesis model, and serves both over HTTP.

pub mod dialect;
pub mod handler;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod server;
pub mod storage;

pub use dialect::{Dialect, DialectProfile};
pub use handler::{AudioOutput, ConvertHandler, ConvertParams, ConvertResult, Delivery};
pub use openai::OpenAiClient;
pub use provider::{ChatMessage, SpeechSynthesizer, SynthesizedAudio, TextGenerator};
pub use server::ConvertServer;
pub use storage::{AudioStore, StoredAudio};
