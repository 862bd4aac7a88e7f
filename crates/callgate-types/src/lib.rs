//! Shared types for the callgate voice-call gateway.
//!
//! This crate provides the foundational types passed between the directory,
//! prompt, voice, telephony and dispatch crates: the contact record loaded
//! from the roster spreadsheet, the session configuration submitted to the
//! voice provider, and the opaque handles that come back from the providers.
//!
//! No crate in the workspace depends on anything *except* `callgate-types`
//! for cross-cutting type definitions.

pub mod contact;
pub mod session;

pub use contact::{ContactRecord, ContactRecordBuilder};
pub use session::{CallReference, FirstSpeaker, JoinHandle, Medium, SessionConfig};

/// Name attached to every media stream opened towards a voice session.
pub const STREAM_NAME: &str = "ultravox";
