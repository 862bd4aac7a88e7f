use callgate_types::JoinHandle;
use url::Url;

/// Route the provider calls back once an outbound call connects.
pub const CALLBACK_PATH: &str = "twiml";
/// Query parameter carrying the join handle on the callback URL.
pub const JOIN_URL_PARAM: &str = "joinUrl";

/// Builds `{base}/twiml?joinUrl=<handle>`.
///
/// Any path on `base` is kept, so a gateway mounted under a prefix still
/// receives its callbacks. Existing query parameters on `base` are dropped.
pub fn callback_url(base: &Url, handle: &JoinHandle) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(CALLBACK_PATH);
    }
    url.query_pairs_mut()
        .append_pair(JOIN_URL_PARAM, handle.as_str());
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(value: &str) -> JoinHandle {
        JoinHandle::parse(value).unwrap()
    }

    #[test]
    fn join_handle_is_percent_encoded() {
        let base = Url::parse("https://gateway.example").unwrap();
        let url = callback_url(&base, &handle("wss://voice.example/s/abc?token=x&y=1"));

        assert_eq!(
            url.as_str(),
            "https://gateway.example/twiml?joinUrl=wss%3A%2F%2Fvoice.example%2Fs%2Fabc%3Ftoken%3Dx%26y%3D1"
        );
    }

    #[test]
    fn handle_survives_round_trip_through_query() {
        let base = Url::parse("https://gateway.example/").unwrap();
        let original = handle("wss://voice.example/s/abc?token=x&y=1");
        let url = callback_url(&base, &original);

        let (_, value) = url
            .query_pairs()
            .find(|(key, _)| key == JOIN_URL_PARAM)
            .unwrap();
        assert_eq!(value, original.as_str());
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let base = Url::parse("https://gateway.example/voice/").unwrap();
        let url = callback_url(&base, &handle("wss://v/s/1"));

        assert_eq!(url.path(), "/voice/twiml");
    }
}
