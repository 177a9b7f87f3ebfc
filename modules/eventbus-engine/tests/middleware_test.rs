//! Middleware composition order and the stock middlewares.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use eventbus_engine::middleware::{guard, logging};
use eventbus_engine::{
    use_event_handler_middleware, Dispatcher, EventHandlerFunc, EventHandlerMiddleware,
    MiddlewareError,
};
use eventbus_events::{DataId, DataType, Event, EventType, Payload};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Note {
    text: String,
}

impl Payload for Note {
    fn id(&self) -> DataId {
        DataId::new(self.text.clone())
    }

    fn data_type(&self) -> DataType {
        DataType::from("note")
    }
}

type Log = Arc<Mutex<Vec<String>>>;

fn tagged(name: &'static str, log: &Log) -> EventHandlerMiddleware {
    let log = Arc::clone(log);
    Box::new(move |next: EventHandlerFunc| {
        let log = Arc::clone(&log);
        EventHandlerFunc::new(move |event| {
            log.lock().unwrap().push(format!("{name}:before"));
            let result = next.call(event);
            log.lock().unwrap().push(format!("{name}:after"));
            result
        })
    })
}

fn recording_base(log: &Log) -> EventHandlerFunc {
    let log = Arc::clone(log);
    EventHandlerFunc::new(move |_| {
        log.lock().unwrap().push("base".to_string());
        Ok(())
    })
}

fn note_event(event_type: &str) -> Event {
    Event::new(
        event_type,
        Note {
            text: "hello".to_string(),
        },
        0,
    )
}

#[test]
fn first_middleware_is_outermost() {
    let log: Log = Arc::default();
    let handler = use_event_handler_middleware(
        recording_base(&log),
        vec![tagged("a", &log), tagged("b", &log)],
    );

    handler.call(&note_event("create")).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["a:before", "b:before", "base", "b:after", "a:after"]
    );
}

#[test]
fn no_middleware_leaves_handler_as_is() {
    let log: Log = Arc::default();
    let handler = use_event_handler_middleware(recording_base(&log), Vec::new());

    handler.call(&note_event("create")).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["base"]);
}

#[test]
fn wrapped_handler_registers_with_dispatcher() {
    let log: Log = Arc::default();
    let dispatcher = Dispatcher::new();
    dispatcher
        .add_handler(
            use_event_handler_middleware(recording_base(&log), vec![logging(), tagged("a", &log)]),
            ["create"],
        )
        .unwrap();

    dispatcher.handle_event(&note_event("create")).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["a:before", "base", "a:after"]);
}

#[test]
fn logging_passes_errors_through() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let handler = use_event_handler_middleware(
        EventHandlerFunc::new(|_| Err(anyhow!("disk full"))),
        vec![logging()],
    );

    let err = handler.call(&note_event("create")).unwrap_err();
    assert_eq!(err.to_string(), "disk full");
}

#[test]
fn guard_rejects_without_calling_inner_handler() {
    let log: Log = Arc::default();
    let handler = use_event_handler_middleware(
        recording_base(&log),
        vec![guard(|event| event.event_type().as_str() != "delete", "deletes are not allowed")],
    );

    handler.call(&note_event("create")).unwrap();
    let err = handler.call(&note_event("delete")).unwrap_err();

    assert_eq!(*log.lock().unwrap(), vec!["base"]);
    assert_eq!(
        err.downcast_ref::<MiddlewareError>(),
        Some(&MiddlewareError::Rejected {
            event_type: EventType::from("delete"),
            reason: "deletes are not allowed".to_string(),
        })
    );
}
