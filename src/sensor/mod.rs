//! Sensor stream abstractions for the doze gesture agent.
//!
//! Readings come from the host platform's sensor dispatcher; this module
//! models that as a subscribe/unsubscribe source delivering timestamped
//! samples to registered listeners.

pub mod source;
pub mod types;

// Re-export commonly used types
pub use source::{DispatchSource, SensorListener, SensorSource, SubscriptionHandle};
pub use types::{ms_to_ns, SensorKind, SensorReading, FAR_CODE, NEAR_CODE, PICKUP_CODE};
