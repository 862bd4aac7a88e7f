//! Telephony edge integration.
//!
//! Two directions:
//! - **Control markup** ([`twiml`]): the XML documents returned from webhooks
//!   that tell the telephony edge to bridge a call into a voice session or
//!   to apologise and hang up.
//! - **Call placement** ([`TwilioClient`]): the REST request that dials an
//!   outbound call and points it at a callback URL carrying the join handle.

pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod twiml;

pub use callback::{callback_url, CALLBACK_PATH, JOIN_URL_PARAM};
pub use client::TwilioClient;
pub use config::{TwilioConfig, DEFAULT_API_BASE};
pub use error::TelephonyError;

use async_trait::async_trait;
use callgate_types::CallReference;
use url::Url;

/// An outbound call to place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCall {
    /// Destination number.
    pub to: String,
    /// Origin number owned by the account.
    pub from: String,
    /// URL the provider fetches control markup from once the call connects.
    pub callback: Url,
}

/// Places outbound calls through the telephony provider.
#[async_trait]
pub trait CallPlacer: Send + Sync {
    async fn place_call(&self, call: &OutboundCall) -> Result<CallReference, TelephonyError>;
}
