//! Listener registration and serial dispatch of sensor readings.
//!
//! The platform delivers readings for one sensor at a time; `DispatchSource`
//! mirrors that contract in-process. Listeners are owned by the source while
//! subscribed and dropped on unsubscribe, so detector state never outlives an
//! armed period.

use crate::sensor::types::{SensorKind, SensorReading};
use std::collections::HashMap;

/// Consumer of a sensor reading stream.
///
/// Called serially, one reading at a time, while subscribed. Implementations
/// must never panic: on a real device this callback has no recovery path.
pub trait SensorListener: Send {
    fn on_reading(&mut self, reading: SensorReading);
}

/// Opaque handle identifying an active subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// Source of sensor readings that listeners can subscribe to.
pub trait SensorSource {
    /// Register a listener for readings from the given sensor.
    fn subscribe(
        &mut self,
        kind: SensorKind,
        listener: Box<dyn SensorListener>,
    ) -> SubscriptionHandle;

    /// Remove a subscription. Unknown or already-removed handles are a no-op.
    fn unsubscribe(&mut self, handle: SubscriptionHandle);
}

/// In-process sensor source fed by the agent's event loop.
///
/// Readings pushed via [`dispatch`](DispatchSource::dispatch) are delivered
/// serially to every listener subscribed to the matching sensor.
pub struct DispatchSource {
    listeners: HashMap<u64, (SensorKind, Box<dyn SensorListener>)>,
    next_handle: u64,
}

impl DispatchSource {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Deliver a reading to all listeners subscribed to `kind`.
    pub fn dispatch(&mut self, kind: SensorKind, reading: SensorReading) {
        for (listener_kind, listener) in self.listeners.values_mut() {
            if *listener_kind == kind {
                listener.on_reading(reading);
            }
        }
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for DispatchSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for DispatchSource {
    fn subscribe(
        &mut self,
        kind: SensorKind,
        listener: Box<dyn SensorListener>,
    ) -> SubscriptionHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.listeners.insert(handle, (kind, listener));
        SubscriptionHandle(handle)
    }

    fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.listeners.remove(&handle.0);
    }
}
