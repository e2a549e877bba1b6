//! In-memory event capture for log assertions
//!
//! `Logger::capturing` pairs a [`TestCaptureLayer`] with the [`TestCapture`]
//! handle that reads what it recorded.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use recon_core_types::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

type Shared = Arc<Mutex<Vec<CapturedEvent>>>;

/// One recorded event, every field rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }
}

/// Numbers and bools fall through to `record_debug`, which renders them
/// the same as `Display`.
struct TextFields(BTreeMap<String, String>);

impl Visit for TextFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

pub struct TestCaptureLayer {
    events: Shared,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let events: Shared = Arc::default();
        (
            Self {
                events: Arc::clone(&events),
            },
            TestCapture { events },
        )
    }
}

impl<S: Subscriber> Layer<S> for TestCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = TextFields(BTreeMap::new());
        event.record(&mut visitor);
        if let Ok(mut events) = self.events.lock() {
            events.push(CapturedEvent {
                level: *event.metadata().level(),
                fields: visitor.0,
            });
        }
    }
}

/// Read side of a capturing logger; clones share the same buffer
#[derive(Clone)]
pub struct TestCapture {
    events: Shared,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events of one operation and phase, in emission order
    pub fn find(&self, op: &str, event: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op() == Some(op) && e.event() == Some(event))
            .collect()
    }

    /// # Panics
    ///
    /// When no event of `op` and `event` was captured.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let seen: Vec<String> = self
            .events()
            .iter()
            .map(|e| format!("{}/{}", e.op().unwrap_or("-"), e.event().unwrap_or("-")))
            .collect();
        assert!(
            !self.find(op, event).is_empty(),
            "Expected event op={} event={}; captured [{}]",
            op,
            event,
            seen.join(", ")
        );
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(op: &str, phase: &str) -> CapturedEvent {
        let fields = [(FIELD_OP, op), (FIELD_EVENT, phase), ("run_id", "r-1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CapturedEvent {
            level: Level::INFO,
            fields,
        }
    }

    #[test]
    fn test_accessors_read_canonical_fields() {
        let e = event("compare", "start");
        assert_eq!(e.op(), Some("compare"));
        assert_eq!(e.event(), Some("start"));
        assert_eq!(e.component(), None);
        assert_eq!(e.field("run_id"), Some("r-1"));
    }

    #[test]
    fn test_find_and_clear() {
        let (layer, capture) = TestCaptureLayer::new();
        if let Ok(mut events) = layer.events.lock() {
            events.push(event("sort_records", "anomaly"));
            events.push(event("sort_records", "end"));
        }
        assert_eq!(capture.find("sort_records", "anomaly").len(), 1);
        capture.clear();
        assert!(capture.events().is_empty());
    }
}
