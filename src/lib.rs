//! Doze Sensor Agent - background wake-gesture detection for doze/AOD.
//!
//! The agent watches proximity/motion sensor streams while the screen is off
//! and fires a doze pulse when it recognizes a wake gesture: a pickup, a
//! short hand-wave over the proximity sensor, or the device leaving a pocket.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Doze Sensor Agent                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │ screen on/off ──▶ ┌────────────────┐                         │
//! │                   │ ScreenStateGate │ arm / disarm           │
//! │                   └───────┬────────┘                         │
//! │                           ▼                                  │
//! │ readings ──▶ ┌──────────────┐  ┌─────────────────┐           │
//! │              │ PickupDetector│  │ PocketDetector  │           │
//! │              └──────┬───────┘  └───────┬─────┬───┘           │
//! │                     ▼                  ▼     ▼               │
//! │               ┌───────────┐     ┌───────────┐ ┌────────────┐ │
//! │               │PulseTrigger│     │PulseTrigger│ │ProxMirror  │ │
//! │               └───────────┘     └───────────┘ └────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Detectors are armed only while the screen is off and their gesture is both
//! enabled in the configuration and backed by a sensor on this platform.
//! Each armed period starts from fresh detector state.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use doze_sensor_agent::config::{Config, SharedSettings};
//! use doze_sensor_agent::gate::{ScreenPowerEvent, ScreenStateGate};
//! use doze_sensor_agent::platform::sensor_capabilities;
//! use doze_sensor_agent::pulse::CountingPulse;
//! use doze_sensor_agent::sensor::{DispatchSource, SensorKind, SensorReading};
//!
//! let mut config = Config::default();
//! config.gesture_hand_wave = true;
//!
//! let pulse = CountingPulse::shared();
//! let mut source = DispatchSource::new();
//! let mut gate = ScreenStateGate::new(
//!     sensor_capabilities("sdm845"),
//!     SharedSettings::new(config),
//!     pulse.clone(),
//!     None,
//! );
//!
//! gate.handle_event(ScreenPowerEvent::ScreenOff, &mut source);
//! source.dispatch(SensorKind::Pocket, SensorReading::near(0));
//! source.dispatch(SensorKind::Pocket, SensorReading::far(500_000_000));
//! assert_eq!(pulse.fires(), 1);
//! ```

pub mod config;
pub mod detector;
pub mod gate;
pub mod mirror;
pub mod platform;
pub mod pulse;
pub mod sensor;
pub mod stats;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, GestureConfig, PickupMode, SharedSettings};
pub use detector::{PickupDetector, PocketDetector};
pub use gate::{GateState, ScreenPowerEvent, ScreenStateGate};
pub use mirror::{FileMirror, MemoryMirror, ProximityMirror};
pub use platform::{sensor_capabilities, SensorCapabilities};
pub use pulse::{CommandPulse, CountingPulse, PulseTrigger};
pub use sensor::{
    DispatchSource, SensorKind, SensorListener, SensorReading, SensorSource, SubscriptionHandle,
};
pub use stats::{create_shared_stats, SessionStats, SharedStats, StatsSnapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
