use crate::config::TwilioConfig;
use crate::error::TelephonyError;
use crate::{CallPlacer, OutboundCall};
use async_trait::async_trait;
use callgate_types::CallReference;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct CreateCallResponse {
    sid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<u64>,
    message: Option<String>,
}

/// REST client for placing calls on a telephony provider account.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    config: TwilioConfig,
    http: reqwest::Client,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("callgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }
}

#[async_trait]
impl CallPlacer for TwilioClient {
    async fn place_call(&self, call: &OutboundCall) -> Result<CallReference, TelephonyError> {
        let response = self
            .http
            .post(self.config.calls_endpoint())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", call.to.as_str()),
                ("From", call.from.as_str()),
                ("Url", call.callback.as_str()),
                ("Method", "POST"),
            ])
            .send()
            .await
            .map_err(TelephonyError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(TelephonyError::Transport)?;

        let reference = parse_create_call(status.as_u16(), status.is_success(), body)?;
        info!(call_sid = %reference, to = %call.to, "outbound call placed");
        Ok(reference)
    }
}

fn parse_create_call(
    status: u16,
    success: bool,
    body: String,
) -> Result<CallReference, TelephonyError> {
    if !success {
        let reason = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(ErrorResponse {
                code: Some(code),
                message: Some(message),
            }) => format!("{} (code {})", message, code),
            Ok(ErrorResponse {
                message: Some(message),
                ..
            }) => message,
            _ => "call placement rejected".to_string(),
        };
        return Err(TelephonyError::Provider {
            status,
            reason,
            body,
        });
    }

    match serde_json::from_str::<CreateCallResponse>(&body) {
        Ok(CreateCallResponse { sid: Some(sid) }) if !sid.trim().is_empty() => {
            Ok(CallReference(sid))
        }
        Ok(_) => Err(TelephonyError::Provider {
            status,
            reason: "response has no call sid".to_string(),
            body,
        }),
        Err(e) => Err(TelephonyError::Provider {
            status,
            reason: format!("response is not a call object: {}", e),
            body,
        }),
    }
}
