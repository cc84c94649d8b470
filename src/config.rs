//! Configuration for the doze gesture agent.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Pickup gesture behavior. Mirrors the three-way device setting:
/// disabled, doze pulse, or full wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupMode {
    Off,
    Pulse,
    Wake,
}

/// Main configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Master doze switch; the agent only runs when doze is enabled.
    pub doze_enabled: bool,

    /// Whether always-on display is active. AOD supersedes pulse gestures,
    /// so the agent yields when it is on.
    pub always_on_display: bool,

    /// Pickup gesture mode.
    pub pickup_mode: PickupMode,

    /// Hand-wave gesture (short cover-then-uncover).
    pub gesture_hand_wave: bool,

    /// Pocket-removal gesture (long cover, then uncover).
    pub gesture_pocket: bool,

    /// Mirror the live covered/uncovered state to `mirror_node`.
    pub proximity_mirror: bool,

    /// Node the proximity state is mirrored to (fingerprint sensor control).
    pub mirror_node: PathBuf,

    /// Board platform name, used to resolve sensor availability.
    pub platform: String,

    /// External command invoked to request a doze pulse.
    pub pulse_command: Option<String>,

    /// External command invoked to request a full wake. Falls back to
    /// `pulse_command` when unset.
    pub wake_command: Option<String>,

    /// Path for storing session stats.
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("doze-sensor-agent");

        Self {
            doze_enabled: true,
            always_on_display: false,
            pickup_mode: PickupMode::Off,
            gesture_hand_wave: false,
            gesture_pocket: false,
            proximity_mirror: false,
            mirror_node: PathBuf::from("/sys/devices/soc/soc:fpc_fpc1020/proximity_state"),
            platform: String::from("sdm845"),
            pulse_command: None,
            wake_command: None,
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("doze-sensor-agent")
            .join("config.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Whether any wake/pulse gesture is currently enabled.
    pub fn gestures_enabled(&self) -> bool {
        self.pickup_mode != PickupMode::Off || self.gesture_hand_wave || self.gesture_pocket
    }

    /// Whether the agent should be running at all: doze on, at least one
    /// gesture enabled, and always-on display off.
    pub fn should_run(&self) -> bool {
        self.doze_enabled && self.gestures_enabled() && !self.always_on_display
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read-only snapshot queries for gesture enablement.
///
/// Detectors query this at policy-evaluation time on every transition and
/// never cache the answers, so settings changes take effect immediately.
pub trait GestureConfig: Send + Sync {
    fn is_pickup_enabled(&self) -> bool;
    fn is_pickup_wake(&self) -> bool;
    fn is_handwave_enabled(&self) -> bool;
    fn is_pocket_removal_enabled(&self) -> bool;
}

/// Live shared view of the configuration.
///
/// The run loop refreshes this from disk; detectors and the screen-state gate
/// hold clones and always see the latest values. Reads never panic: a
/// poisoned lock degrades to "everything disabled".
#[derive(Clone)]
pub struct SharedSettings {
    inner: Arc<RwLock<Config>>,
}

impl SharedSettings {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Replace the current configuration.
    pub fn replace(&self, config: Config) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = config;
        }
    }

    /// Clone out the current configuration.
    pub fn snapshot(&self) -> Config {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl GestureConfig for SharedSettings {
    fn is_pickup_enabled(&self) -> bool {
        self.inner
            .read()
            .map(|c| c.pickup_mode != PickupMode::Off)
            .unwrap_or(false)
    }

    fn is_pickup_wake(&self) -> bool {
        self.inner
            .read()
            .map(|c| c.pickup_mode == PickupMode::Wake)
            .unwrap_or(false)
    }

    fn is_handwave_enabled(&self) -> bool {
        self.inner
            .read()
            .map(|c| c.gesture_hand_wave)
            .unwrap_or(false)
    }

    fn is_pocket_removal_enabled(&self) -> bool {
        self.inner
            .read()
            .map(|c| c.gesture_pocket)
            .unwrap_or(false)
    }
}

/// Fixed gesture flags, mainly useful for tests and one-shot evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGestures {
    pub pickup: bool,
    pub pickup_wake: bool,
    pub handwave: bool,
    pub pocket: bool,
}

impl GestureConfig for StaticGestures {
    fn is_pickup_enabled(&self) -> bool {
        self.pickup
    }

    fn is_pickup_wake(&self) -> bool {
        self.pickup_wake
    }

    fn is_handwave_enabled(&self) -> bool {
        self.handwave
    }

    fn is_pocket_removal_enabled(&self) -> bool {
        self.pocket
    }
}
