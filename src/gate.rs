//! Screen-state gate: arms and disarms the gesture detectors.
//!
//! Detectors only run while the screen is off. On each screen-off event the
//! gate re-reads the gesture configuration and subscribes a fresh detector
//! for every gesture that is both enabled and backed by a sensor on this
//! platform; on screen-on it unsubscribes everything. Disarming is
//! unconditional and idempotent.

use crate::config::{GestureConfig, SharedSettings};
use crate::detector::{PickupDetector, PocketDetector};
use crate::mirror::ProximityMirror;
use crate::platform::SensorCapabilities;
use crate::pulse::PulseTrigger;
use crate::sensor::{SensorKind, SensorSource, SubscriptionHandle};
use std::sync::Arc;

/// Screen power transition, as delivered by the host notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPowerEvent {
    ScreenOn,
    ScreenOff,
}

/// Whether the gate currently has detectors subscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Armed,
}

/// Arms/disarms detectors on screen power transitions.
pub struct ScreenStateGate {
    state: GateState,
    caps: SensorCapabilities,
    settings: SharedSettings,
    trigger: Arc<dyn PulseTrigger>,
    mirror: Option<Arc<dyn ProximityMirror>>,
    pickup_sub: Option<SubscriptionHandle>,
    pocket_sub: Option<SubscriptionHandle>,
}

impl ScreenStateGate {
    pub fn new(
        caps: SensorCapabilities,
        settings: SharedSettings,
        trigger: Arc<dyn PulseTrigger>,
        mirror: Option<Arc<dyn ProximityMirror>>,
    ) -> Self {
        Self {
            state: GateState::Idle,
            caps,
            settings,
            trigger,
            mirror,
            pickup_sub: None,
            pocket_sub: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Process a screen power transition.
    pub fn handle_event(&mut self, event: ScreenPowerEvent, source: &mut dyn SensorSource) {
        match event {
            ScreenPowerEvent::ScreenOff => self.arm(source),
            ScreenPowerEvent::ScreenOn => self.disarm(source),
        }
    }

    /// Subscribe detectors for every enabled, available gesture.
    ///
    /// Configuration is re-read here, not cached across armed periods, and
    /// each detector starts from fresh state.
    fn arm(&mut self, source: &mut dyn SensorSource) {
        let config: Arc<dyn GestureConfig> = Arc::new(self.settings.clone());

        if self.pickup_sub.is_none()
            && config.is_pickup_enabled()
            && self.caps.pickup_sensor().is_some()
        {
            let detector = PickupDetector::new(config.clone(), self.trigger.clone());
            self.pickup_sub = Some(source.subscribe(SensorKind::Pickup, Box::new(detector)));
        }

        if self.pocket_sub.is_none()
            && (config.is_handwave_enabled() || config.is_pocket_removal_enabled())
            && self.caps.pocket_sensor().is_some()
        {
            let detector =
                PocketDetector::new(config.clone(), self.trigger.clone(), self.mirror.clone());
            self.pocket_sub = Some(source.subscribe(SensorKind::Pocket, Box::new(detector)));
        }

        // A gate with nothing to arm stays passively idle.
        if self.pickup_sub.is_some() || self.pocket_sub.is_some() {
            self.state = GateState::Armed;
        }
    }

    /// Unsubscribe everything. Safe to call at any time, in any state.
    pub fn disarm(&mut self, source: &mut dyn SensorSource) {
        if let Some(handle) = self.pickup_sub.take() {
            source.unsubscribe(handle);
        }
        if let Some(handle) = self.pocket_sub.take() {
            source.unsubscribe(handle);
        }
        self.state = GateState::Idle;
    }
}
