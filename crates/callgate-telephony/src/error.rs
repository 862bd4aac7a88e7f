use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelephonyError {
    #[error("telephony transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("telephony provider error (status {status}): {reason}")]
    Provider {
        status: u16,
        reason: String,
        body: String,
    },
}

impl TelephonyError {
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            TelephonyError::Transport(_) => None,
            TelephonyError::Provider { body, .. } => Some(body),
        }
    }
}
