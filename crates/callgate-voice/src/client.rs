use crate::config::VoiceConfig;
use crate::error::VoiceError;
use crate::SessionCreator;
use async_trait::async_trait;
use callgate_types::{JoinHandle, SessionConfig};
use serde::Deserialize;
use tracing::{debug, info};

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCallResponse {
    join_url: Option<String>,
    call_id: Option<String>,
}

/// HTTP client for the hosted voice provider's call-creation endpoint.
///
/// Holds one `reqwest::Client` for the life of the process so connections
/// are pooled across calls.
#[derive(Debug, Clone)]
pub struct UltravoxClient {
    config: VoiceConfig,
    http: reqwest::Client,
}

impl UltravoxClient {
    pub fn new(config: VoiceConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("callgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }
}

#[async_trait]
impl SessionCreator for UltravoxClient {
    async fn create_session(&self, config: &SessionConfig) -> Result<JoinHandle, VoiceError> {
        debug!(
            model = %config.model,
            voice = %config.voice,
            prompt_len = config.system_prompt.len(),
            "creating voice session"
        );

        let response = self
            .http
            .post(&self.config.api_url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(config)
            .send()
            .await
            .map_err(VoiceError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(VoiceError::Transport)?;

        let handle = parse_create_call(status.as_u16(), status.is_success(), body)?;
        info!(join_url = %handle, "voice session created");
        Ok(handle)
    }
}

/// Extracts the join handle from a call-creation response.
fn parse_create_call(status: u16, success: bool, body: String) -> Result<JoinHandle, VoiceError> {
    if !success {
        return Err(VoiceError::Provider {
            status,
            reason: "session creation rejected".to_string(),
            body,
        });
    }

    let parsed: CreateCallResponse = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Err(VoiceError::Provider {
                status,
                reason: format!("response is not a call object: {}", e),
                body,
            })
        }
    };

    if let Some(call_id) = &parsed.call_id {
        debug!(%call_id, "voice provider assigned call id");
    }

    match parsed.join_url.as_deref().and_then(JoinHandle::parse) {
        Some(handle) => Ok(handle),
        None => Err(VoiceError::Provider {
            status,
            reason: "response has no joinUrl".to_string(),
            body,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_is_extracted() {
        let handle = parse_create_call(
            201,
            true,
            r#"{"callId":"c-1","joinUrl":"wss://voice.example/s/abc"}"#.to_string(),
        )
        .unwrap();
        assert_eq!(handle.as_str(), "wss://voice.example/s/abc");
    }

    #[test]
    fn missing_join_url_is_provider_error() {
        let err = parse_create_call(201, true, r#"{"callId":"c-1"}"#.to_string()).unwrap_err();

        match err {
            VoiceError::Provider { reason, body, .. } => {
                assert!(reason.contains("joinUrl"));
                assert_eq!(body, r#"{"callId":"c-1"}"#);
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn empty_join_url_is_provider_error() {
        let err = parse_create_call(201, true, r#"{"joinUrl":""}"#.to_string()).unwrap_err();
        assert!(matches!(err, VoiceError::Provider { .. }));
    }

    #[test]
    fn non_json_body_is_provider_error() {
        let err = parse_create_call(200, true, "<html>gateway</html>".to_string()).unwrap_err();
        assert_eq!(err.raw_body(), Some("<html>gateway</html>"));
    }

    #[test]
    fn rejected_status_is_provider_error_with_body() {
        let err = parse_create_call(401, false, r#"{"detail":"bad key"}"#.to_string()).unwrap_err();

        match err {
            VoiceError::Provider { status, body, .. } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }
}
