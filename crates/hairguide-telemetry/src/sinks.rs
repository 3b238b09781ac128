//! Pluggable event sinks.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::events::GuideEvent;

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Receives one event.
    fn handle(&mut self, event: &GuideEvent);

    /// Called when the bus is finalized.
    fn finalize(&mut self) {}

    /// Sink name for diagnostics.
    fn name(&self) -> &str;
}

/// Records events into a log shared with whoever created the sink, so the
/// events stay inspectable after the sink is boxed into a bus.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<GuideEvent>>>,
}

impl VecSink {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<GuideEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<GuideEvent> {
        self.lock().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forgets every recorded event.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &GuideEvent) {
        self.lock().push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to `tracing`. Discards and unpins go out as warnings,
/// everything else at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// A sink logging at the default levels.
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &GuideEvent) {
        use crate::events::EventKind;
        match &event.kind {
            EventKind::CurveDiscarded { .. }
            | EventKind::RootUnpinned { .. }
            | EventKind::MotionWarning { .. } => {
                tracing::warn!(step = event.step, event = ?event.kind, "guide_event");
            }
            EventKind::MeshReloaded { .. } | EventKind::Custom { .. } => {
                tracing::info!(step = event.step, event = ?event.kind, "guide_event");
            }
            _ => {
                tracing::debug!(step = event.step, event = ?event.kind, "guide_event");
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
