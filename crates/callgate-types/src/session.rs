//! Voice session configuration and provider handles.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MODEL: &str = "fixie-ai/ultravox";
pub const DEFAULT_VOICE: &str = "Mark";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Who opens the conversation once the media stream is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FirstSpeaker {
    /// The voice agent greets the caller.
    #[default]
    #[serde(rename = "FIRST_SPEAKER_AGENT", alias = "agent")]
    Agent,
    /// The agent waits for the caller to speak.
    #[serde(rename = "FIRST_SPEAKER_USER", alias = "user")]
    User,
}

/// Transport medium the voice provider should expect audio on.
///
/// Serialized externally tagged, so `Twilio {}` becomes `{"twilio": {}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Twilio {},
}

impl Default for Medium {
    fn default() -> Self {
        Medium::Twilio {}
    }
}

/// Parameters submitted to the voice provider to start one session.
///
/// Built fresh for every call attempt from a template via
/// [`SessionConfig::with_system_prompt`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Instruction script for the voice agent.
    pub system_prompt: String,
    pub model: String,
    pub voice: String,
    pub temperature: f64,
    pub first_speaker: FirstSpeaker,
    pub medium: Medium,
}

impl SessionConfig {
    /// Creates a configuration with the default model, voice, temperature
    /// and an agent-speaks-first policy.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            first_speaker: FirstSpeaker::Agent,
            medium: Medium::Twilio {},
        }
    }

    /// Returns a copy of this template carrying `system_prompt`.
    pub fn with_system_prompt(&self, system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            ..self.clone()
        }
    }
}

/// Opaque URL identifying a live voice session.
///
/// This is the only piece of state that travels from session creation to
/// the bridge markup. It is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinHandle(String);

impl JoinHandle {
    /// Wraps a join URL, returning `None` when it is blank.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier the telephony provider assigns to a placed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallReference(pub String);

impl fmt::Display for CallReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_config_wire_shape() {
        let config = SessionConfig::new("Be helpful.");
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(
            value,
            json!({
                "systemPrompt": "Be helpful.",
                "model": "fixie-ai/ultravox",
                "voice": "Mark",
                "temperature": 0.3,
                "firstSpeaker": "FIRST_SPEAKER_AGENT",
                "medium": { "twilio": {} }
            })
        );
    }

    #[test]
    fn with_system_prompt_keeps_template_settings() {
        let mut template = SessionConfig::new("template");
        template.voice = "Jessica".to_string();
        template.first_speaker = FirstSpeaker::User;

        let config = template.with_system_prompt("dynamic");

        assert_eq!(config.system_prompt, "dynamic");
        assert_eq!(config.voice, "Jessica");
        assert_eq!(config.first_speaker, FirstSpeaker::User);
        assert_eq!(template.system_prompt, "template");
    }

    #[test]
    fn first_speaker_accepts_short_aliases() {
        let agent: FirstSpeaker = serde_json::from_str("\"agent\"").unwrap();
        let user: FirstSpeaker = serde_json::from_str("\"FIRST_SPEAKER_USER\"").unwrap();

        assert_eq!(agent, FirstSpeaker::Agent);
        assert_eq!(user, FirstSpeaker::User);
    }

    #[test]
    fn blank_join_handle_is_rejected() {
        assert!(JoinHandle::parse("   ").is_none());
        assert_eq!(
            JoinHandle::parse(" wss://voice.example/s/abc ").unwrap().as_str(),
            "wss://voice.example/s/abc"
        );
    }

    #[test]
    fn default_medium_is_twilio() {
        assert_eq!(Medium::default(), Medium::Twilio {});
        assert_eq!(
            serde_json::to_value(Medium::default()).unwrap(),
            json!({ "twilio": {} })
        );
    }
}
