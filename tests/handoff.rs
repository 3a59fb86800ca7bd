// SPDX-License-Identifier: MIT OR Apache-2.0

//! A request hands its context to a queued job, which runs on another thread.
#![cfg(not(target_arch = "wasm32"))]

use contextwise::context::{ContextDehydrating, PAYLOAD_KEY, Repository};
use contextwise::dispatch::{DispatcherExt, EventDispatcher};
use contextwise::{ContextConfig, Fields, InMemoryWriter, Logger, Structured, Value, fields};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Structured)]
struct Tenant {
    id: u64,
    plan: String,
}

fn config() -> Arc<ContextConfig> {
    Arc::new(ContextConfig::new().register::<Tenant>())
}

#[test]
fn job_on_another_thread_logs_with_request_context() {
    let events = EventDispatcher::shared();
    let tenant = Tenant {
        id: 4,
        plan: "pro".into(),
    };

    let mut request = Repository::with_config(events.clone(), config());
    request
        .add("request_id", "abc")
        .add("tenant", Value::object(&tenant).unwrap())
        .add_hidden("token", "secret");
    request.push("breadcrumbs", ["login", "checkout"]).unwrap();

    let mut payload = serde_json::Map::new();
    payload.insert("job".into(), "SendReceipt".into());
    assert!(request.attach_to(&mut payload).unwrap());
    let wire = serde_json::to_string(&payload).unwrap();
    assert!(wire.contains(PAYLOAD_KEY));

    let writer = Arc::new(InMemoryWriter::new());
    let worker_writer = writer.clone();
    std::thread::spawn(move || {
        let payload: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&wire).unwrap();
        let mut job = Repository::with_config(events, config());
        job.hydrate_from(&payload).unwrap();
        assert_eq!(job.get_hidden("token"), Some(&Value::from("secret")));
        assert_eq!(
            job.get("tenant").unwrap().to_object::<Tenant>().unwrap(),
            Tenant {
                id: 4,
                plan: "pro".into()
            }
        );

        let _guard = job.enter();
        Logger::new(worker_writer).info("receipt sent", Fields::new());
    })
    .join()
    .unwrap();

    let record = writer.drain().remove(0);
    assert_eq!(record.context["request_id"], Value::from("abc"));
    assert_eq!(
        record.context["breadcrumbs"],
        Value::from(vec!["login", "checkout"])
    );
    assert!(!record.context.contains_key("token"));
}

#[test]
fn dehydrating_listener_scrubs_only_the_outgoing_copy() {
    let events = EventDispatcher::shared();
    events.listen::<ContextDehydrating>(|event| {
        event.context.forget("internal_only");
        event.context.add("origin", "web");
    });

    let mut request = Repository::new(events.clone());
    request.add("internal_only", 1).add("request_id", "abc");

    let snapshot = request.dehydrate().unwrap().unwrap();
    assert!(request.has("internal_only"));
    assert!(!request.has("origin"));

    let mut job = Repository::new(events);
    job.hydrate(Some(&snapshot)).unwrap();
    assert_eq!(
        job.all(),
        &fields! {"origin" => "web", "request_id" => "abc"}
    );
}

#[test]
fn worker_without_registration_recovers_with_a_placeholder() {
    let events = EventDispatcher::shared();
    let mut request = Repository::with_config(events.clone(), config());
    request.add(
        "tenant",
        Value::object(&Tenant {
            id: 1,
            plan: "free".into(),
        })
        .unwrap(),
    );
    let snapshot = request.dehydrate().unwrap();

    let mut job = Repository::new(events);
    job.handle_decode_errors_using(|failure| {
        fields! {"undecodable" => failure.key}.into()
    });
    job.hydrate(snapshot.as_ref()).unwrap();
    assert_eq!(
        job.get("tenant"),
        Some(&Value::from(fields! {"undecodable" => "tenant"}))
    );
}
