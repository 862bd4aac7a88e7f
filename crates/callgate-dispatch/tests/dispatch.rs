use async_trait::async_trait;
use callgate_directory::{ContactDirectory, MemoryDirectory};
use callgate_dispatch::{DispatchError, Dispatcher};
use callgate_telephony::{CallPlacer, OutboundCall, TelephonyError, JOIN_URL_PARAM};
use callgate_types::{CallReference, ContactRecord, JoinHandle, SessionConfig};
use callgate_voice::{SessionCreator, VoiceError};
use std::sync::{Arc, Mutex};
use url::Url;

/// Voice provider fake: records every config and hands out numbered handles.
#[derive(Default)]
struct FakeVoice {
    configs: Mutex<Vec<SessionConfig>>,
    fail: bool,
}

#[async_trait]
impl SessionCreator for FakeVoice {
    async fn create_session(&self, config: &SessionConfig) -> Result<JoinHandle, VoiceError> {
        // Let a concurrent dispatch run between slot selection and placement.
        tokio::task::yield_now().await;
        let mut configs = self.configs.lock().unwrap();
        configs.push(config.clone());
        if self.fail {
            return Err(VoiceError::Provider {
                status: 500,
                reason: "boom".to_string(),
                body: "{\"error\":\"boom\"}".to_string(),
            });
        }
        Ok(JoinHandle::parse(&format!("wss://voice.example/s/{}", configs.len())).unwrap())
    }
}

#[derive(Default)]
struct FakeTelephony {
    calls: Mutex<Vec<OutboundCall>>,
    fail: bool,
}

#[async_trait]
impl CallPlacer for FakeTelephony {
    async fn place_call(&self, call: &OutboundCall) -> Result<CallReference, TelephonyError> {
        tokio::task::yield_now().await;
        let mut calls = self.calls.lock().unwrap();
        calls.push(call.clone());
        if self.fail {
            return Err(TelephonyError::Provider {
                status: 400,
                reason: "Invalid 'To' Phone Number".to_string(),
                body: "{}".to_string(),
            });
        }
        Ok(CallReference(format!("CA{}", calls.len())))
    }
}

struct Harness {
    directory: Arc<MemoryDirectory>,
    voice: Arc<FakeVoice>,
    telephony: Arc<FakeTelephony>,
    dispatcher: Dispatcher,
}

fn harness_with(records: Vec<ContactRecord>, voice: FakeVoice, telephony: FakeTelephony) -> Harness {
    let directory = Arc::new(MemoryDirectory::new(records));
    let voice = Arc::new(voice);
    let telephony = Arc::new(telephony);
    let dispatcher = Dispatcher::new(
        directory.clone(),
        voice.clone(),
        telephony.clone(),
        SessionConfig::new("template"),
        Url::parse("https://gateway.example").unwrap(),
        "+15550001111",
    );
    Harness {
        directory,
        voice,
        telephony,
        dispatcher,
    }
}

fn harness(records: Vec<ContactRecord>) -> Harness {
    harness_with(records, FakeVoice::default(), FakeTelephony::default())
}

fn contacts(numbers: &[&str]) -> Vec<ContactRecord> {
    numbers
        .iter()
        .map(|n| ContactRecord::builder(*n).build())
        .collect()
}

#[tokio::test]
async fn round_robin_visits_each_contact_once_then_wraps() {
    let numbers = ["+15550000001", "+15550000002", "+15550000003"];
    let h = harness(contacts(&numbers));

    let mut dialled = Vec::new();
    for _ in 0..numbers.len() {
        dialled.push(h.dispatcher.dispatch_next().await.unwrap().phone_number);
    }
    assert_eq!(dialled, numbers);

    let wrapped = h.dispatcher.dispatch_next().await.unwrap();
    assert_eq!(wrapped.phone_number, numbers[0]);
    assert_eq!(wrapped.position, 0);
}

#[tokio::test]
async fn dispatch_composes_personal_script_and_dials_contact() {
    let acme = ContactRecord::builder("+15551112222")
        .name(Some("Acme"))
        .equipment(Some("Reefer"))
        .build();
    let h = harness(vec![acme]);

    let outcome = h.dispatcher.dispatch_next().await.unwrap();
    assert_eq!(outcome.phone_number, "+15551112222");
    assert_eq!(outcome.call_sid, CallReference("CA1".to_string()));

    let configs = h.voice.configs.lock().unwrap();
    let script = &configs[0].system_prompt;
    assert!(script.contains("Reefer"));
    assert!(!script.contains("Ask what type of equipment they run"));
    assert_eq!(configs[0].model, "fixie-ai/ultravox");

    let calls = h.telephony.calls.lock().unwrap();
    assert_eq!(calls[0].to, "+15551112222");
    assert_eq!(calls[0].from, "+15550001111");
    assert_eq!(calls[0].callback.path(), "/twiml");
    let join_url = calls[0]
        .callback
        .query_pairs()
        .find(|(key, _)| key == JOIN_URL_PARAM)
        .map(|(_, value)| value.into_owned());
    assert_eq!(join_url.as_deref(), Some("wss://voice.example/s/1"));
}

#[tokio::test]
async fn empty_roster_fails_with_no_contacts() {
    let h = harness(Vec::new());

    let err = h.dispatcher.dispatch_next().await.unwrap_err();
    assert!(matches!(err, DispatchError::NoContacts));
    assert_eq!(err.to_string(), "No drivers available in the directory.");
    assert!(h.voice.configs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn vanished_contact_fails_and_still_consumes_slot() {
    let h = harness(contacts(&["+15550000001", "+15550000002"]));
    h.directory.replace(contacts(&["+15550000002"]));

    let err = h.dispatcher.dispatch_next().await.unwrap_err();
    match err {
        DispatchError::ContactNotFound {
            phone_number,
            position,
        } => {
            assert_eq!(phone_number, "+15550000001");
            assert_eq!(position, 0);
        }
        other => panic!("expected contact-not-found, got {:?}", other),
    }
    assert_eq!(h.dispatcher.state().position(), 1);

    let next = h.dispatcher.dispatch_next().await.unwrap();
    assert_eq!(next.phone_number, "+15550000002");
}

#[tokio::test]
async fn voice_failure_propagates_without_placing_call() {
    let h = harness_with(
        contacts(&["+15550000001", "+15550000002"]),
        FakeVoice {
            fail: true,
            ..FakeVoice::default()
        },
        FakeTelephony::default(),
    );

    let err = h.dispatcher.dispatch_next().await.unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Voice(VoiceError::Provider { status: 500, .. })
    ));
    assert!(h.telephony.calls.lock().unwrap().is_empty());
    assert_eq!(h.dispatcher.state().position(), 1);
}

#[tokio::test]
async fn telephony_failure_propagates() {
    let h = harness_with(
        contacts(&["+15550000001"]),
        FakeVoice::default(),
        FakeTelephony {
            fail: true,
            ..FakeTelephony::default()
        },
    );

    let err = h.dispatcher.dispatch_next().await.unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Telephony(TelephonyError::Provider { status: 400, .. })
    ));
}

#[tokio::test]
async fn concurrent_dispatches_on_single_entry_roster_dial_it_twice() {
    let h = harness(contacts(&["+15551112222"]));

    let (first, second) = tokio::join!(h.dispatcher.dispatch_next(), h.dispatcher.dispatch_next());
    let first = first.unwrap();
    let second = second.unwrap();

    // Both dispatches wrap onto the only contact; the cursor stays in range.
    assert_eq!(first.phone_number, "+15551112222");
    assert_eq!(second.phone_number, "+15551112222");
    assert_eq!(first.position, 0);
    assert_eq!(second.position, 0);
    assert_eq!(h.dispatcher.state().position(), 0);
    assert_eq!(h.telephony.calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_dispatches_take_distinct_slots() {
    let h = harness(contacts(&["+15550000001", "+15550000002"]));

    let (first, second) = tokio::join!(h.dispatcher.dispatch_next(), h.dispatcher.dispatch_next());
    let mut dialled = vec![first.unwrap().phone_number, second.unwrap().phone_number];
    dialled.sort();

    assert_eq!(dialled, ["+15550000001", "+15550000002"]);
    assert_eq!(h.dispatcher.state().position(), 0);
}

#[tokio::test]
async fn reload_roster_picks_up_directory_changes() {
    let h = harness(contacts(&["+15550000001", "+15550000002"]));
    h.dispatcher.dispatch_next().await.unwrap();

    h.directory.replace(contacts(&["+15550000009"]));
    assert_eq!(h.dispatcher.reload_roster(), 1);
    assert_eq!(h.dispatcher.state().roster(), ["+15550000009"]);
    assert_eq!(h.dispatcher.state().position(), 0);
    assert_eq!(h.directory.len(), 1);

    let outcome = h.dispatcher.dispatch_next().await.unwrap();
    assert_eq!(outcome.phone_number, "+15550000009");
}
