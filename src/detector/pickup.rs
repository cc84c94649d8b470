//! Pickup gesture detector.
//!
//! The motion sensor reports discrete codes; only the "face up, just picked
//! up" code is actionable. Hardware pickup sensors chatter several events per
//! physical gesture, so accepted samples are debounced. The debounce clock
//! resets on every sample, not only on fired pulses, which also damps
//! false-positive storms from non-pickup codes.

use crate::config::GestureConfig;
use crate::pulse::PulseTrigger;
use crate::sensor::types::{ms_to_ns, SensorReading, PICKUP_CODE};
use crate::sensor::SensorListener;
use std::sync::Arc;

/// Minimum interval between two accepted samples: 2.5 s.
pub const MIN_PULSE_INTERVAL_NS: u64 = ms_to_ns(2500);

/// Debounced pickup detector.
pub struct PickupDetector {
    // None until the first sample, so the first event is never suppressed.
    last_trigger_ns: Option<u64>,
    config: Arc<dyn GestureConfig>,
    trigger: Arc<dyn PulseTrigger>,
}

impl PickupDetector {
    pub fn new(config: Arc<dyn GestureConfig>, trigger: Arc<dyn PulseTrigger>) -> Self {
        Self {
            last_trigger_ns: None,
            config,
            trigger,
        }
    }
}

impl SensorListener for PickupDetector {
    fn on_reading(&mut self, reading: SensorReading) {
        if let Some(last) = self.last_trigger_ns {
            let delta = reading.timestamp_ns.saturating_sub(last);
            if delta < MIN_PULSE_INTERVAL_NS {
                return;
            }
        }
        self.last_trigger_ns = Some(reading.timestamp_ns);

        if reading.value == PICKUP_CODE {
            if self.config.is_pickup_wake() {
                self.trigger.wake();
            } else {
                self.trigger.fire();
            }
        }
    }
}
