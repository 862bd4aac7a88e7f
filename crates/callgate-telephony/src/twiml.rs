//! Telephony control markup.
//!
//! Both documents are rendered as compact XML with no inter-element
//! whitespace, so the bridge markup for a given join handle is byte-identical
//! whether it is produced for an inbound webhook or an outbound callback.

use callgate_types::{JoinHandle, STREAM_NAME};
use quick_xml::escape::escape;

/// Content type the telephony edge expects for control markup.
pub const CONTENT_TYPE: &str = "text/xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Spoken to the caller when a call cannot be bridged.
pub const APOLOGY: &str = "Sorry, there was an error connecting your call.";

/// Opens a bidirectional media stream from the call to `handle`.
pub fn bridge(handle: &JoinHandle) -> String {
    format!(
        r#"{XML_DECLARATION}<Response><Connect><Stream url="{}" name="{}"/></Connect></Response>"#,
        escape(handle.as_str()),
        escape(STREAM_NAME),
    )
}

/// Speaks [`APOLOGY`] and lets the call end.
pub fn apology() -> String {
    say(APOLOGY)
}

/// Speaks `text` to the caller.
pub fn say(text: &str) -> String {
    format!(
        "{XML_DECLARATION}<Response><Say>{}</Say></Response>",
        escape(text)
    )
}
