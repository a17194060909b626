use std::io::Cursor;
use std::sync::{Arc, Mutex};

use clap::Parser;
use old2new::cli::{exit_code, run, Cli};
use old2new_core::contract::MockYamlCodec;
use serde_json::{json, Value};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("old2new").chain(args.iter().copied()))
        .expect("valid arguments")
}

#[test]
fn run_converts_json_stream() {
    let input = Cursor::new(r#"{"nodes":[{"bmc_fqdn":"bmc07.cluster.example","groups":"io"}]}"#);
    let mut output = Vec::new();
    let summary = run(&cli(&[]), input, &mut output, None).expect("run succeeds");

    assert_eq!(summary.bmcs, 1);
    assert_eq!(summary.nodes_linked, 1);
    let parsed: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        parsed,
        json!({
            "bmcs": [{"xname": "bmc07", "fqdn": "bmc07.cluster.example"}],
            "nodes": [{"groups": ["io"], "bmc": "bmc07"}]
        })
    );
}

#[test]
fn run_writes_nothing_on_schema_error() {
    let mut output = Vec::new();
    let err = run(&cli(&[]), Cursor::new("{\"nodes\": 5}"), &mut output, None).unwrap_err();
    assert_eq!(exit_code(&err), 2);
    assert!(output.is_empty());
}

#[test]
fn run_without_yaml_codec_reports_capability() {
    let mut output = Vec::new();
    let err = run(&cli(&["-o", "yaml"]), Cursor::new("{\"nodes\": []}"), &mut output, None)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<old2new_core::Error>(),
        Some(old2new_core::Error::Capability(_))
    ));
    assert_eq!(exit_code(&err), 2);
    assert!(output.is_empty());
}

#[test]
fn run_matches_detected_yaml_format() {
    let mut codec = MockYamlCodec::new();
    codec
        .expect_parse()
        .times(1)
        .returning(|_| Ok(json!({"nodes": [{"xname": "x5c0s0b0n3"}]})));
    codec
        .expect_render()
        .times(1)
        .withf(|doc| doc["nodes"][0]["bmc"] == json!("x5c0s0b0"))
        .returning(|_| Ok("yaml out\n".to_string()));

    let mut output = Vec::new();
    run(&cli(&[]), Cursor::new("nodes:\n- xname: x5c0s0b0n3\n"), &mut output, Some(&codec))
        .expect("run succeeds");
    assert_eq!(output, b"yaml out\n");
}

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{event:?}"));
    }
}

#[test]
fn run_emits_start_and_written_events() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut output = Vec::new();
    run(&cli(&[]), Cursor::new("{\"nodes\": []}"), &mut output, None).unwrap();

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("Starting conversion")),
        "Expected a 'Starting conversion' event, got: {:?}",
        event_msgs
    );
    assert!(event_msgs.iter().any(|msg| msg.contains("Conversion written")));
}
