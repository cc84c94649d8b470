//! Pocket/hand-wave gesture detector.
//!
//! Tracks the covered state of the proximity sensor and, on the
//! covered→uncovered transition, decides from the cover duration whether the
//! motion was a deliberate hand-wave (short cover), a pocket removal (long
//! cover), or noise. Independently of that decision, every reading's
//! covered/uncovered value is offered to the proximity mirror sink.

use crate::config::GestureConfig;
use crate::mirror::ProximityMirror;
use crate::pulse::PulseTrigger;
use crate::sensor::types::{ms_to_ns, SensorReading};
use crate::sensor::SensorListener;
use std::sync::Arc;

/// Maximum cover duration for a hand-wave: 1 s.
pub const HANDWAVE_MAX_DELTA_NS: u64 = ms_to_ns(1000);

/// Minimum cover duration before the device counts as pocketed: 2 s.
pub const POCKET_MIN_DELTA_NS: u64 = ms_to_ns(2000);

/// Covered-state tracker with cover-duration trigger policy.
pub struct PocketDetector {
    is_covered: bool,
    covered_since_ns: u64,
    config: Arc<dyn GestureConfig>,
    trigger: Arc<dyn PulseTrigger>,
    mirror: Option<Arc<dyn ProximityMirror>>,
}

impl PocketDetector {
    pub fn new(
        config: Arc<dyn GestureConfig>,
        trigger: Arc<dyn PulseTrigger>,
        mirror: Option<Arc<dyn ProximityMirror>>,
    ) -> Self {
        Self {
            is_covered: false,
            covered_since_ns: 0,
            config,
            trigger,
            mirror,
        }
    }

    /// Whether the sensor is currently covered.
    pub fn is_covered(&self) -> bool {
        self.is_covered
    }

    fn evaluate_uncover(&self, timestamp_ns: u64) {
        let delta = timestamp_ns.saturating_sub(self.covered_since_ns);
        let handwave = self.config.is_handwave_enabled();
        let pocket = self.config.is_pocket_removal_enabled();

        if handwave && pocket {
            // Combined mode: either gesture qualifies, any uncover fires.
            self.trigger.fire();
        } else if handwave {
            if delta < HANDWAVE_MAX_DELTA_NS {
                self.trigger.fire();
            }
        } else if pocket {
            if delta >= POCKET_MIN_DELTA_NS {
                self.trigger.fire();
            }
        }
        // Neither enabled: the detector should not be armed, but an armed
        // instance must still be a harmless observer.
    }
}

impl SensorListener for PocketDetector {
    fn on_reading(&mut self, reading: SensorReading) {
        let near = reading.is_near();

        // Policy runs only on the covered→uncovered transition, and only on
        // an unambiguous "far" code. Before the first "near" there is no
        // covered state to leave, so nothing can fire.
        if self.is_covered && !near && reading.is_far() {
            self.evaluate_uncover(reading.timestamp_ns);
        }

        if near != self.is_covered {
            self.is_covered = near;
            self.covered_since_ns = reading.timestamp_ns;
        }

        // Mirror the live state on every reading, regardless of policy.
        if let Some(ref mirror) = self.mirror {
            if mirror.is_enabled() && mirror.is_writable() {
                let _ = mirror.write(if self.is_covered { "1" } else { "0" });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticGestures;
    use crate::mirror::MemoryMirror;
    use crate::pulse::CountingPulse;

    fn detector(
        handwave: bool,
        pocket: bool,
        mirror: Option<Arc<MemoryMirror>>,
    ) -> (PocketDetector, Arc<CountingPulse>) {
        let pulse = CountingPulse::shared();
        let config = StaticGestures {
            handwave,
            pocket,
            ..Default::default()
        };
        let sink: Option<Arc<dyn ProximityMirror>> = match mirror {
            Some(m) => Some(m),
            None => None,
        };
        (
            PocketDetector::new(Arc::new(config), pulse.clone(), sink),
            pulse,
        )
    }

    #[test]
    fn test_handwave_fires_on_short_cover() {
        let (mut detector, pulse) = detector(true, false, None);
        detector.on_reading(SensorReading::near(0));
        detector.on_reading(SensorReading::far(ms_to_ns(500)));
        assert_eq!(pulse.fires(), 1);
    }

    #[test]
    fn test_handwave_ignores_long_cover() {
        let (mut detector, pulse) = detector(true, false, None);
        detector.on_reading(SensorReading::near(0));
        detector.on_reading(SensorReading::far(ms_to_ns(1500)));
        assert_eq!(pulse.fires(), 0);
    }

    #[test]
    fn test_pocket_fires_on_long_cover() {
        let (mut detector, pulse) = detector(false, true, None);
        detector.on_reading(SensorReading::near(0));
        detector.on_reading(SensorReading::far(ms_to_ns(2500)));
        assert_eq!(pulse.fires(), 1);
    }

    #[test]
    fn test_pocket_ignores_short_cover() {
        let (mut detector, pulse) = detector(false, true, None);
        detector.on_reading(SensorReading::near(0));
        detector.on_reading(SensorReading::far(ms_to_ns(500)));
        assert_eq!(pulse.fires(), 0);
    }

    #[test]
    fn test_combined_mode_fires_for_any_duration() {
        let (mut detector, pulse) = detector(true, true, None);
        detector.on_reading(SensorReading::near(0));
        detector.on_reading(SensorReading::far(ms_to_ns(10)));
        detector.on_reading(SensorReading::near(ms_to_ns(20)));
        detector.on_reading(SensorReading::far(ms_to_ns(10_020)));
        assert_eq!(pulse.fires(), 2);
    }

    #[test]
    fn test_neither_enabled_never_fires() {
        let (mut detector, pulse) = detector(false, false, None);
        detector.on_reading(SensorReading::near(0));
        detector.on_reading(SensorReading::far(ms_to_ns(1500)));
        assert_eq!(pulse.fires(), 0);
    }

    #[test]
    fn test_first_far_reading_is_inert() {
        let mirror = Arc::new(MemoryMirror::new(true));
        let (mut detector, pulse) = detector(true, true, Some(mirror.clone()));
        detector.on_reading(SensorReading::far(ms_to_ns(100)));
        assert_eq!(pulse.fires(), 0);
        assert!(!detector.is_covered());
        // The mirror reflects the observed uncovered state, never a phantom "1".
        assert_eq!(mirror.writes(), vec!["0"]);
    }

    #[test]
    fn test_repeated_near_does_not_reset_cover_clock() {
        let (mut detector, pulse) = detector(false, true, None);
        detector.on_reading(SensorReading::near(0));
        detector.on_reading(SensorReading::near(ms_to_ns(1900)));
        // Cover started at t=0; 2.1 s total is a pocket removal.
        detector.on_reading(SensorReading::far(ms_to_ns(2100)));
        assert_eq!(pulse.fires(), 1);
    }

    #[test]
    fn test_mirror_writes_on_every_reading_even_when_policy_suppresses() {
        let mirror = Arc::new(MemoryMirror::new(true));
        let (mut detector, pulse) = detector(false, true, Some(mirror.clone()));
        detector.on_reading(SensorReading::near(0));
        // Short cover: pocket policy suppresses the pulse, mirror still sees it.
        detector.on_reading(SensorReading::far(ms_to_ns(500)));
        assert_eq!(pulse.fires(), 0);
        assert_eq!(mirror.writes(), vec!["1", "0"]);
    }

    #[test]
    fn test_disabled_mirror_sees_nothing() {
        let mirror = Arc::new(MemoryMirror::new(false));
        let (mut detector, _pulse) = detector(true, false, Some(mirror.clone()));
        detector.on_reading(SensorReading::near(0));
        detector.on_reading(SensorReading::far(ms_to_ns(500)));
        assert!(mirror.writes().is_empty());
    }

    #[test]
    fn test_unknown_code_updates_tracking_without_firing() {
        let (mut detector, pulse) = detector(true, true, None);
        detector.on_reading(SensorReading::near(0));
        // Ambiguous code: leaves the covered state conservatively, no pulse.
        detector.on_reading(SensorReading::new(3.0, ms_to_ns(500)));
        assert_eq!(pulse.fires(), 0);
        assert!(!detector.is_covered());
    }
}
