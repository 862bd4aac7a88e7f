use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    /// The exchange itself failed: connection refused, TLS, reset mid-body.
    #[error("voice provider transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered, but not with a usable session.
    #[error("voice provider error (status {status}): {reason}")]
    Provider {
        status: u16,
        reason: String,
        body: String,
    },
}

impl VoiceError {
    /// Raw response body, when the provider sent one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            VoiceError::Transport(_) => None,
            VoiceError::Provider { body, .. } => Some(body),
        }
    }
}
