use serde::{Deserialize, Serialize};
use std::fmt;

/// Base of the telephony provider's REST API.
pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Account credentials and origin number for the telephony provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub account_sid: String,
    #[serde(default, skip_serializing)]
    pub auth_token: String,
    /// Number outbound calls are placed from.
    #[serde(default)]
    pub phone_number: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            account_sid: String::new(),
            auth_token: String::new(),
            phone_number: String::new(),
        }
    }
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("api_base", &self.api_base)
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

impl TwilioConfig {
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty() && !self.phone_number.is_empty()
    }

    /// Endpoint for creating calls on this account.
    pub fn calls_endpoint(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}
