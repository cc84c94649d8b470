//! End-to-end tests for the gate/detector pipeline.
//!
//! Drives the public API the way the agent's event loop does: screen events
//! into the gate, sensor readings into the dispatch source, with a counting
//! trigger and an in-memory mirror standing in for the platform.

use doze_sensor_agent::{
    config::{Config, PickupMode, SharedSettings},
    gate::{GateState, ScreenPowerEvent, ScreenStateGate},
    mirror::{MemoryMirror, ProximityMirror},
    platform::sensor_capabilities,
    pulse::CountingPulse,
    sensor::{ms_to_ns, DispatchSource, SensorKind, SensorReading, PICKUP_CODE},
};
use std::sync::Arc;

struct Harness {
    source: DispatchSource,
    gate: ScreenStateGate,
    pulse: Arc<CountingPulse>,
    mirror: Arc<MemoryMirror>,
}

fn harness(configure: impl FnOnce(&mut Config)) -> Harness {
    let mut config = Config::default();
    configure(&mut config);

    let pulse = CountingPulse::shared();
    let mirror = Arc::new(MemoryMirror::new(config.proximity_mirror));
    let sink: Arc<dyn ProximityMirror> = mirror.clone();
    let gate = ScreenStateGate::new(
        sensor_capabilities(&config.platform),
        SharedSettings::new(config),
        pulse.clone(),
        Some(sink),
    );

    Harness {
        source: DispatchSource::new(),
        gate,
        pulse,
        mirror,
    }
}

impl Harness {
    fn screen_off(&mut self) {
        self.gate
            .handle_event(ScreenPowerEvent::ScreenOff, &mut self.source);
    }

    fn screen_on(&mut self) {
        self.gate
            .handle_event(ScreenPowerEvent::ScreenOn, &mut self.source);
    }

    fn pocket(&mut self, value: f32, t_ms: u64) {
        self.source
            .dispatch(SensorKind::Pocket, SensorReading::new(value, ms_to_ns(t_ms)));
    }

    fn pickup(&mut self, value: f32, t_ms: u64) {
        self.source
            .dispatch(SensorKind::Pickup, SensorReading::new(value, ms_to_ns(t_ms)));
    }
}

#[test]
fn test_handwave_scenario_fires_once_with_mirror_sequence() {
    let mut h = harness(|c| {
        c.gesture_hand_wave = true;
        c.proximity_mirror = true;
    });

    h.screen_off();
    assert_eq!(h.gate.state(), GateState::Armed);

    h.pocket(1.0, 0);
    h.pocket(0.0, 500);

    assert_eq!(h.pulse.fires(), 1);
    assert_eq!(h.mirror.writes(), vec!["1", "0"]);
}

#[test]
fn test_pocket_removal_scenario_fires_after_long_cover() {
    let mut h = harness(|c| c.gesture_pocket = true);

    h.screen_off();
    h.pocket(1.0, 0);
    h.pocket(0.0, 2600);

    assert_eq!(h.pulse.fires(), 1);
}

#[test]
fn test_pocket_removal_scenario_ignores_short_cover() {
    let mut h = harness(|c| c.gesture_pocket = true);

    h.screen_off();
    h.pocket(1.0, 0);
    h.pocket(0.0, 1200);

    assert_eq!(h.pulse.fires(), 0);
}

#[test]
fn test_handwave_ignores_slow_uncover() {
    let mut h = harness(|c| c.gesture_hand_wave = true);

    h.screen_off();
    h.pocket(1.0, 0);
    h.pocket(0.0, 1800);

    assert_eq!(h.pulse.fires(), 0);
}

#[test]
fn test_combined_mode_fires_at_extremes() {
    let mut h = harness(|c| {
        c.gesture_hand_wave = true;
        c.gesture_pocket = true;
    });

    h.screen_off();
    h.pocket(1.0, 0);
    h.pocket(0.0, 10);
    h.pocket(1.0, 20);
    h.pocket(0.0, 10_020);

    assert_eq!(h.pulse.fires(), 2);
}

#[test]
fn test_mirror_tracks_state_while_policy_suppresses() {
    let mut h = harness(|c| {
        c.gesture_pocket = true;
        c.proximity_mirror = true;
    });

    h.screen_off();
    h.pocket(1.0, 0);
    h.pocket(0.0, 500); // too short for pocket removal

    assert_eq!(h.pulse.fires(), 0);
    assert_eq!(h.mirror.writes(), vec!["1", "0"]);
}

#[test]
fn test_first_far_reading_is_inert() {
    let mut h = harness(|c| {
        c.gesture_hand_wave = true;
        c.gesture_pocket = true;
        c.proximity_mirror = true;
    });

    h.screen_off();
    h.pocket(0.0, 100);

    assert_eq!(h.pulse.fires(), 0);
    assert_eq!(h.mirror.writes(), vec!["0"]);
}

#[test]
fn test_pickup_debounce_across_burst() {
    let mut h = harness(|c| c.pickup_mode = PickupMode::Pulse);

    h.screen_off();
    h.pickup(PICKUP_CODE, 100);
    h.pickup(PICKUP_CODE, 200);
    h.pickup(PICKUP_CODE, 2400);

    assert_eq!(h.pulse.fires(), 1);

    h.pickup(PICKUP_CODE, 2700);
    assert_eq!(h.pulse.fires(), 2);
}

#[test]
fn test_pickup_wake_mode() {
    let mut h = harness(|c| c.pickup_mode = PickupMode::Wake);

    h.screen_off();
    h.pickup(PICKUP_CODE, 100);

    assert_eq!(h.pulse.fires(), 0);
    assert_eq!(h.pulse.wakes(), 1);
}

#[test]
fn test_detector_state_resets_between_arm_periods() {
    let mut h = harness(|c| c.gesture_pocket = true);

    h.screen_off();
    h.pocket(1.0, 0);
    h.screen_on();

    // New armed period: the old covered state must not leak; the far reading
    // is this detector's first and fires nothing.
    h.screen_off();
    h.pocket(0.0, 5000);

    assert_eq!(h.pulse.fires(), 0);
}

#[test]
fn test_readings_while_disarmed_are_ignored() {
    let mut h = harness(|c| c.gesture_pocket = true);

    h.pocket(1.0, 0);
    h.pocket(0.0, 2600);

    assert_eq!(h.pulse.fires(), 0);
    assert!(h.mirror.writes().is_empty());
}

#[test]
fn test_disarm_without_arm_does_not_fault() {
    let mut h = harness(|c| c.gesture_pocket = true);

    h.screen_on();
    h.screen_on();
    assert_eq!(h.gate.state(), GateState::Idle);
}

#[test]
fn test_platform_without_pocket_sensor_never_arms_pocket() {
    let mut h = harness(|c| {
        c.platform = "sm8150".to_string();
        c.gesture_hand_wave = true;
        c.gesture_pocket = true;
    });

    h.screen_off();
    h.pocket(1.0, 0);
    h.pocket(0.0, 500);

    assert_eq!(h.pulse.fires(), 0);
}
