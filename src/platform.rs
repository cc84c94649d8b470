//! Platform capability table: which gesture sensors exist on each board.
//!
//! Sensor names differ per platform and some boards lack a sensor entirely.
//! The table is resolved once at startup into a read-only
//! [`SensorCapabilities`] value; an absent sensor is a permanent "disabled",
//! never an error.

use crate::sensor::SensorKind;

/// Sensor names available on the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorCapabilities {
    pickup: Option<&'static str>,
    pocket: Option<&'static str>,
}

impl SensorCapabilities {
    /// Capabilities with no sensors at all (unknown platform).
    pub const fn none() -> Self {
        Self {
            pickup: None,
            pocket: None,
        }
    }

    /// Name of the pickup sensor, if this platform has one.
    pub fn pickup_sensor(&self) -> Option<&'static str> {
        self.pickup
    }

    /// Name of the pocket proximity sensor, if this platform has one.
    pub fn pocket_sensor(&self) -> Option<&'static str> {
        self.pocket
    }

    /// Sensor name for a given kind.
    pub fn sensor(&self, kind: SensorKind) -> Option<&'static str> {
        match kind {
            SensorKind::Pickup => self.pickup,
            SensorKind::Pocket => self.pocket,
        }
    }

    /// Whether any gesture sensor exists on this platform.
    pub fn any(&self) -> bool {
        self.pickup.is_some() || self.pocket.is_some()
    }
}

/// Resolve the capability table for a board platform name.
pub fn sensor_capabilities(platform: &str) -> SensorCapabilities {
    match platform {
        "msm8994" | "msm8996" => SensorCapabilities {
            pickup: Some("com.oneplus.sensor.pickup"),
            pocket: Some("com.oneplus.sensor.pocket"),
        },
        "msm8998" => SensorCapabilities {
            pickup: Some("tilt"),
            pocket: Some("proximity"),
        },
        "sdm845" => SensorCapabilities {
            pickup: Some("oneplus.sensor.pickup"),
            pocket: Some("oneplus.sensor.pocket"),
        },
        // sm8150 has a motion-detect sensor but no pocket sensor.
        "sm8150" => SensorCapabilities {
            pickup: Some("oneplus.sensor.op_motion_detect"),
            pocket: None,
        },
        _ => SensorCapabilities::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_platform() {
        let caps = sensor_capabilities("sdm845");
        assert_eq!(caps.pickup_sensor(), Some("oneplus.sensor.pickup"));
        assert_eq!(caps.pocket_sensor(), Some("oneplus.sensor.pocket"));
        assert!(caps.any());
    }

    #[test]
    fn test_partial_platform() {
        let caps = sensor_capabilities("sm8150");
        assert!(caps.pickup_sensor().is_some());
        assert!(caps.pocket_sensor().is_none());
        assert!(caps.any());
    }

    #[test]
    fn test_unknown_platform_has_no_sensors() {
        let caps = sensor_capabilities("exynos9820");
        assert!(!caps.any());
        assert_eq!(caps.sensor(SensorKind::Pickup), None);
        assert_eq!(caps.sensor(SensorKind::Pocket), None);
    }
}
