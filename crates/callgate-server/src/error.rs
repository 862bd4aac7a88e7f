//! Gateway error taxonomy and its two renderings.
//!
//! JSON endpoints answer with `{"error": message}`; webhook endpoints answer
//! with control markup, because whatever they return is acted on by the
//! telephony edge mid-call.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use callgate_dispatch::DispatchError;
use callgate_telephony::{twiml, TelephonyError};
use callgate_voice::VoiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallError {
    /// A provider could not be reached or the exchange broke off.
    #[error("{service} unreachable: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    /// A provider answered with an error or an unusable payload.
    #[error("{service} rejected the request: {message}")]
    Provider {
        service: &'static str,
        message: String,
        body: String,
    },

    #[error("No drivers available in the directory.")]
    NoContacts,

    #[error("Driver {phone_number} at roster position {position} is no longer in the directory.")]
    ContactNotFound {
        phone_number: String,
        position: usize,
    },

    /// A required request parameter was absent or blank.
    #[error("Missing {0}")]
    MissingInput(&'static str),
}

impl CallError {
    /// 400 for conditions the caller can fix, 500 for everything else.
    pub fn status(&self) -> StatusCode {
        match self {
            CallError::NoContacts
            | CallError::ContactNotFound { .. }
            | CallError::MissingInput(_) => StatusCode::BAD_REQUEST,
            CallError::Transport { .. } | CallError::Provider { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Raw provider body, for logging.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            CallError::Provider { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Renders as `{"error": message}` with [`CallError::status`].
    pub fn json_response(&self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }

    /// Renders for the telephony edge.
    ///
    /// A missing parameter is answered in plain text with 400; any other
    /// failure speaks the apology with the error's status.
    pub fn markup_response(&self) -> Response {
        match self {
            CallError::MissingInput(_) => (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                self.to_string(),
            )
                .into_response(),
            _ => markup(self.status(), twiml::apology()),
        }
    }
}

impl IntoResponse for CallError {
    fn into_response(self) -> Response {
        self.json_response()
    }
}

/// Wraps control markup in a response with the markup content type.
pub fn markup(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, twiml::CONTENT_TYPE)], body).into_response()
}

impl From<VoiceError> for CallError {
    fn from(err: VoiceError) -> Self {
        const SERVICE: &str = "voice provider";
        match err {
            VoiceError::Transport(e) => CallError::Transport {
                service: SERVICE,
                message: e.to_string(),
            },
            VoiceError::Provider {
                status,
                reason,
                body,
            } => CallError::Provider {
                service: SERVICE,
                message: format!("status {status}: {reason}"),
                body,
            },
        }
    }
}

impl From<TelephonyError> for CallError {
    fn from(err: TelephonyError) -> Self {
        const SERVICE: &str = "telephony provider";
        match err {
            TelephonyError::Transport(e) => CallError::Transport {
                service: SERVICE,
                message: e.to_string(),
            },
            TelephonyError::Provider {
                status,
                reason,
                body,
            } => CallError::Provider {
                service: SERVICE,
                message: format!("status {status}: {reason}"),
                body,
            },
        }
    }
}

impl From<DispatchError> for CallError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::NoContacts => CallError::NoContacts,
            DispatchError::ContactNotFound {
                phone_number,
                position,
            } => CallError::ContactNotFound {
                phone_number,
                position,
            },
            DispatchError::Voice(e) => e.into(),
            DispatchError::Telephony(e) => e.into(),
        }
    }
}
