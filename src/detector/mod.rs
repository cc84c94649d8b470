//! Gesture detectors: the timing state machines behind doze gestures.
//!
//! Each detector consumes one sensor stream while the screen is off and
//! decides autonomously when to request a pulse. Detector state lives for a
//! single armed period; the gate constructs fresh detectors on every arm.

pub mod pickup;
pub mod pocket;

pub use pickup::{PickupDetector, MIN_PULSE_INTERVAL_NS};
pub use pocket::{PocketDetector, HANDWAVE_MAX_DELTA_NS, POCKET_MIN_DELTA_NS};
