use crate::error::DispatchError;
use crate::state::DispatcherState;
use callgate_directory::ContactDirectory;
use callgate_prompt::compose;
use callgate_telephony::{callback_url, CallPlacer, OutboundCall};
use callgate_types::{CallReference, SessionConfig};
use callgate_voice::SessionCreator;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};
use url::Url;

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    /// Reference the telephony provider assigned to the call.
    pub call_sid: CallReference,
    /// Number dialled.
    pub phone_number: String,
    /// Roster position the number was taken from.
    pub position: usize,
}

/// Coordinates outbound calls over a round-robin roster.
///
/// The cursor lives in a [`DispatcherState`] behind a `std::sync::Mutex`.
/// Taking a roster slot is one locked step that never spans an `.await`, so
/// concurrent dispatches each get a distinct slot in arrival order. The
/// network steps that follow run outside the lock.
pub struct Dispatcher {
    directory: Arc<dyn ContactDirectory>,
    voice: Arc<dyn SessionCreator>,
    telephony: Arc<dyn CallPlacer>,
    template: SessionConfig,
    callback_base: Url,
    origin_number: String,
    state: Mutex<DispatcherState>,
}

impl Dispatcher {
    /// Creates a dispatcher and snapshots the directory's current roster.
    ///
    /// `template` supplies the voice settings for every session; its script
    /// is replaced per call. `callback_base` is the public base URL of this
    /// gateway and `origin_number` the number calls are placed from.
    pub fn new(
        directory: Arc<dyn ContactDirectory>,
        voice: Arc<dyn SessionCreator>,
        telephony: Arc<dyn CallPlacer>,
        template: SessionConfig,
        callback_base: Url,
        origin_number: impl Into<String>,
    ) -> Self {
        let state = DispatcherState::new(directory.phone_numbers());
        Self {
            directory,
            voice,
            telephony,
            template,
            callback_base,
            origin_number: origin_number.into(),
            state: Mutex::new(state),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DispatcherState> {
        // The guarded section cannot panic halfway through an update, so a
        // poisoned lock still holds a consistent state.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current roster snapshot and cursor.
    pub fn state(&self) -> DispatcherState {
        self.lock_state().clone()
    }

    /// Re-snapshots the roster from the directory and rewinds the cursor.
    ///
    /// Returns the new roster size.
    pub fn reload_roster(&self) -> usize {
        let roster = self.directory.phone_numbers();
        let count = roster.len();
        *self.lock_state() = DispatcherState::new(roster);
        info!(count, "dispatcher roster reloaded");
        count
    }

    /// Places the next outbound call.
    ///
    /// The roster slot is consumed as soon as it is taken: a dispatch that
    /// fails at a later step does not rewind the cursor, and the next
    /// dispatch moves on to the following contact. Nothing is retried.
    pub async fn dispatch_next(&self) -> Result<DispatchOutcome, DispatchError> {
        let (position, phone_number) = self
            .lock_state()
            .advance()
            .ok_or(DispatchError::NoContacts)?;

        info!(position, %phone_number, "dispatching outbound call");

        let contact = self.directory.lookup(&phone_number).ok_or_else(|| {
            error!(
                position,
                %phone_number,
                "roster entry is missing from the directory"
            );
            DispatchError::ContactNotFound {
                phone_number: phone_number.clone(),
                position,
            }
        })?;

        let config = self.template.with_system_prompt(compose(Some(&contact)));

        let handle = self.voice.create_session(&config).await.map_err(|e| {
            error!(
                position,
                %phone_number,
                error = %e,
                raw_body = e.raw_body().unwrap_or(""),
                "voice session creation failed"
            );
            e
        })?;

        let call = OutboundCall {
            to: phone_number.clone(),
            from: self.origin_number.clone(),
            callback: callback_url(&self.callback_base, &handle),
        };

        let call_sid = self.telephony.place_call(&call).await.map_err(|e| {
            error!(
                position,
                %phone_number,
                error = %e,
                raw_body = e.raw_body().unwrap_or(""),
                "outbound call placement failed"
            );
            e
        })?;

        info!(position, %phone_number, %call_sid, "outbound call dispatched");

        Ok(DispatchOutcome {
            call_sid,
            phone_number,
            position,
        })
    }
}
