#![forbid(unsafe_code)]
#![cfg(feature = "tracing")]

//! Structured logging integration tests.
//!
//!   cargo test -p boxtree-layout --features tracing --test tracing_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use boxtree_core::geometry::Region;
use boxtree_core::host::FixedGeometry;
use boxtree_layout::{AreaOptions, ViewportLayout};
use boxtree_style::RuleSheet;
use tracing_subscriber::layer::SubscriberExt;

/// One captured event: target, message and fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    level: tracing::Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map(String::as_str).unwrap_or("")
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(HashMap::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            level: *event.metadata().level(),
            fields: visitor.0,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

#[test]
fn load_and_resize_are_logged() {
    let events = with_captured_events(|| {
        let geometry = FixedGeometry::new(Region::from_size(1000, 800));
        let mut app = ViewportLayout::new("app", &geometry, RuleSheet::new());
        app.add_row(AreaOptions::new("header").size(0.2)).unwrap();
        app.add_row(AreaOptions::new("body")).unwrap();
        app.on_load().unwrap();
        geometry.set_viewport(Region::from_size(1000, 900));
        app.on_resize().unwrap();
    });

    let init = events
        .iter()
        .find(|e| e.target == "boxtree.layout" && e.message() == "initialized")
        .expect("initialize event");
    assert_eq!(init.fields.get("nodes").map(String::as_str), Some("3"));

    assert!(
        events
            .iter()
            .any(|e| e.target == "boxtree.root" && e.message() == "load")
    );
    let resize = events
        .iter()
        .find(|e| e.target == "boxtree.root" && e.message() == "resize")
        .expect("resize event");
    assert_eq!(resize.fields.get("dy").map(String::as_str), Some("100"));
    assert_eq!(resize.fields.get("height").map(String::as_str), Some("900"));
}

#[test]
fn rounding_correction_is_traced() {
    let events = with_captured_events(|| {
        let geometry = FixedGeometry::new(Region::from_size(300, 101));
        let mut app = ViewportLayout::new("app", &geometry, RuleSheet::new());
        for name in ["a", "b", "c"] {
            app.add_row(AreaOptions::new(name)).unwrap();
        }
        app.on_load().unwrap();
    });

    let correction = events
        .iter()
        .find(|e| e.message() == "rounding_correction")
        .expect("rounding correction event");
    assert_eq!(correction.level, tracing::Level::TRACE);
    assert_eq!(correction.fields.get("fill").map(String::as_str), Some("c"));
    assert_eq!(correction.fields.get("delta").map(String::as_str), Some("1"));
}

#[test]
fn overflow_is_a_warning() {
    let events = with_captured_events(|| {
        let geometry = FixedGeometry::new(Region::from_size(100, 100));
        let mut app = ViewportLayout::new("app", &geometry, RuleSheet::new());
        app.add_row(AreaOptions::new("big").size(500.0)).unwrap();
        app.add_row(AreaOptions::new("rest")).unwrap();
        app.on_load().unwrap();
    });

    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::WARN && e.target == "boxtree.layout")
    );
}
