//! Prompt construction for dialect translation.

use crate::dialect::{Dialect, DialectProfile};
use crate::provider::ChatMessage;

/// System instruction framing the model as a regional dialect expert.
pub const SYSTEM_PROMPT: &str = "당신은 한국의 지역 방언을 자연스럽게 구사하는 전문가입니다.";

/// Render the user message for one translation.
///
/// `text` is embedded verbatim between double quotes.
pub fn user_prompt(profile: &DialectProfile, text: &str) -> String {
    format!(
        "다음 텍스트를 방언으로 번역해주세요:\n\n\
         설명: {}\n\n\
         예시:\n\
         입력: {}\n\
         출력: {}\n\n\
         번역할 텍스트: \"{}\"",
        profile.description, profile.example.input, profile.example.output, text
    )
}

/// Build the system + user message pair sent to the chat model.
pub fn build_messages(dialect: Dialect, text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt(dialect.profile(), text)),
    ]
}
