//! Voice session client for the callgate gateway.
//!
//! Starting a session is one request/response exchange with the
//! conversational-voice provider: the serialized [`SessionConfig`] goes up,
//! a [`JoinHandle`] comes back. Nothing is retried; a failure is terminal for
//! that call attempt and carries enough detail (status and raw body) to
//! diagnose from the logs.

pub mod client;
pub mod config;
pub mod error;

pub use client::UltravoxClient;
pub use config::{VoiceConfig, DEFAULT_API_URL};
pub use error::VoiceError;

use async_trait::async_trait;
use callgate_types::{JoinHandle, SessionConfig};

/// Creates remote voice sessions.
#[async_trait]
pub trait SessionCreator: Send + Sync {
    /// Submits `config` and returns the join handle of the new session.
    async fn create_session(&self, config: &SessionConfig) -> Result<JoinHandle, VoiceError>;
}
