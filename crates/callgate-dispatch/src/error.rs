use callgate_telephony::TelephonyError;
use callgate_voice::VoiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No drivers available in the directory.")]
    NoContacts,

    /// The roster snapshot names a number the directory no longer holds.
    #[error("Driver {phone_number} at roster position {position} is no longer in the directory.")]
    ContactNotFound {
        phone_number: String,
        position: usize,
    },

    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    Telephony(#[from] TelephonyError),
}
