//! Sensor reading types for the doze gesture agent.
//!
//! Readings are single numeric samples from a proximity or motion sensor,
//! stamped with a monotonic nanosecond timestamp supplied by the platform.

use serde::{Deserialize, Serialize};

/// Discrete code reported by the pickup sensor for "face up, just picked up".
pub const PICKUP_CODE: f32 = 1.0;

/// Proximity value meaning an object is near (sensor covered).
pub const NEAR_CODE: f32 = 1.0;

/// Proximity value meaning nothing is near (sensor uncovered).
pub const FAR_CODE: f32 = 0.0;

/// Which physical sensor a reading or subscription refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// Motion sensor reporting pickup gesture codes.
    Pickup,
    /// Proximity sensor reporting near/far.
    Pocket,
}

/// A single timestamped sensor sample.
///
/// The timestamp is monotonic (nanoseconds since an arbitrary boot epoch),
/// never wall-clock time. All gesture timing math is done on these values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Raw sample value. Semantically boolean-like (near/far) or a discrete
    /// gesture code, depending on the sensor.
    pub value: f32,
    /// Monotonic timestamp in nanoseconds.
    pub timestamp_ns: u64,
}

impl SensorReading {
    pub fn new(value: f32, timestamp_ns: u64) -> Self {
        Self {
            value,
            timestamp_ns,
        }
    }

    /// A "near" proximity reading at the given timestamp.
    pub fn near(timestamp_ns: u64) -> Self {
        Self::new(NEAR_CODE, timestamp_ns)
    }

    /// A "far" proximity reading at the given timestamp.
    pub fn far(timestamp_ns: u64) -> Self {
        Self::new(FAR_CODE, timestamp_ns)
    }

    /// Whether this reading indicates an object covering the sensor.
    pub fn is_near(&self) -> bool {
        self.value == NEAR_CODE
    }

    /// Whether this reading is an unambiguous "far".
    ///
    /// Unknown codes are neither near nor far; they update covered tracking
    /// but never drive a gesture decision.
    pub fn is_far(&self) -> bool {
        self.value == FAR_CODE
    }
}

/// Convert milliseconds to the nanosecond scale readings use.
pub const fn ms_to_ns(ms: u64) -> u64 {
    ms * 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_far_classification() {
        assert!(SensorReading::near(0).is_near());
        assert!(!SensorReading::near(0).is_far());
        assert!(SensorReading::far(0).is_far());
        assert!(!SensorReading::far(0).is_near());
    }

    #[test]
    fn test_unknown_code_is_neither() {
        let odd = SensorReading::new(3.0, 100);
        assert!(!odd.is_near());
        assert!(!odd.is_far());
    }

    #[test]
    fn test_ms_to_ns() {
        assert_eq!(ms_to_ns(2500), 2_500_000_000);
    }
}
