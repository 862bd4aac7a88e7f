//! Webhooks the telephony edge calls to get control markup.

use crate::error::{markup, CallError};
use crate::AppState;
use axum::{
    extract::{rejection::FormRejection, rejection::QueryRejection, Extension, Form, Query},
    http::StatusCode,
    response::Response,
};
use callgate_prompt::compose_inbound;
use callgate_telephony::{twiml, JOIN_URL_PARAM};
use callgate_types::JoinHandle;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Form fields posted by the telephony edge when a call comes in.
#[derive(Debug, Default, Deserialize)]
pub struct IncomingCallForm {
    /// Caller's number.
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TwimlQuery {
    #[serde(rename = "joinUrl")]
    pub join_url: Option<String>,
}

/// Handler for `POST /incoming`.
///
/// Opens a voice session scripted for the caller and bridges the call into
/// it. Any failure is answered with the spoken apology and a 200, so the
/// edge plays it instead of its own error message.
pub async fn incoming_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<IncomingCallForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable incoming call form");
            IncomingCallForm::default()
        }
    };

    let caller = form.from.as_deref().map(str::trim).unwrap_or_default();
    match bridge_inbound(&state, caller).await {
        Ok(markup_body) => markup(StatusCode::OK, markup_body),
        Err(err) => {
            error!(
                caller,
                call_sid = form.call_sid.as_deref().unwrap_or_default(),
                error = %err,
                raw_body = err.raw_body().unwrap_or_default(),
                "failed to bridge incoming call"
            );
            markup(StatusCode::OK, twiml::apology())
        }
    }
}

async fn bridge_inbound(state: &AppState, caller: &str) -> Result<String, CallError> {
    if caller.is_empty() {
        return Err(CallError::MissingInput("From"));
    }

    let contact = state.directory.lookup(caller);
    info!(caller, known = contact.is_some(), "incoming call");

    let prompt = compose_inbound(caller, contact.as_ref());
    let config = state.session_template.with_system_prompt(prompt);
    let handle = state.voice.create_session(&config).await?;

    info!(caller, join_url = %handle, "bridging incoming call");
    Ok(twiml::bridge(&handle))
}

/// Handler for `/twiml` (any method).
///
/// Fetched by the edge once an outbound call connects; bridges the call into
/// the session named by the `joinUrl` query parameter.
///
/// Rendering the bridge cannot fail, so a missing or blank `joinUrl` (400) is
/// the only error this route produces. Any other [`CallError`] rendered with
/// [`CallError::markup_response`] would answer 500 with the spoken apology.
pub async fn twiml_handler(query: Result<Query<TwimlQuery>, QueryRejection>) -> Response {
    let join_url = match query {
        Ok(Query(query)) => query.join_url,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable callback query");
            None
        }
    };

    match join_url.as_deref().and_then(JoinHandle::parse) {
        Some(handle) => {
            info!(join_url = %handle, "bridging outbound call");
            markup(StatusCode::OK, twiml::bridge(&handle))
        }
        None => {
            warn!("callback without {JOIN_URL_PARAM}");
            CallError::MissingInput(JOIN_URL_PARAM).markup_response()
        }
    }
}
