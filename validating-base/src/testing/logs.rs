//! Log capture for asserting on emitted `tracing` events.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// One captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    /// The event level.
    pub level: Level,
    /// The formatted message.
    pub message: String,
}

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}

/// A layer that stores every event it sees.
#[derive(Debug, Clone, Default)]
pub struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    /// Creates an empty capture layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events captured so far.
    #[must_use]
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// Returns the messages captured at `level`.
    #[must_use]
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
        });
    }
}

/// Runs `f` with a capturing subscriber installed on the current thread.
///
/// Returns `f`'s output and every event emitted while it ran.
pub fn capture_events<T>(f: impl FnOnce() -> T) -> (T, Vec<CapturedEvent>) {
    let layer = CaptureLayer::new();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let output = tracing::subscriber::with_default(subscriber, f);
    (output, layer.events())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, warn};

    #[test]
    fn test_capture_events() {
        let ((), events) = capture_events(|| {
            debug!("first {}", 1);
            warn!("second");
        });

        assert_eq!(
            events,
            vec![
                CapturedEvent {
                    level: Level::DEBUG,
                    message: "first 1".to_string()
                },
                CapturedEvent {
                    level: Level::WARN,
                    message: "second".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_messages_at_filters_by_level() {
        let layer = CaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        tracing::subscriber::with_default(subscriber, || {
            debug!("quiet");
            warn!("loud");
            warn!("louder");
        });

        assert_eq!(layer.messages_at(Level::WARN), vec!["loud", "louder"]);
        assert_eq!(layer.messages_at(Level::DEBUG), vec!["quiet"]);
        assert!(layer.messages_at(Level::ERROR).is_empty());
    }
}
