//! # hairguide-telemetry
//!
//! Event bus for simulation telemetry. The scene emits structured events
//! (step timing, discarded curves, unpinned roots, contacts, mesh reloads)
//! that pluggable sinks consume.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, GuideEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
