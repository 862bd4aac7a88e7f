//! Outbound call dispatcher.
//!
//! Each dispatch takes the next phone number from a round-robin roster,
//! resolves its contact record, composes a script, opens a voice session and
//! asks the telephony provider to dial the contact with a callback URL that
//! carries the session's join handle.

pub mod dispatcher;
pub mod error;
pub mod state;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::DispatchError;
pub use state::DispatcherState;
