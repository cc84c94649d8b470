//! Proximity state mirroring.
//!
//! Some fingerprint sensor drivers expose a `proximity_state` node; writing
//! "1" while the device is covered keeps the capacitive sensor from reacting
//! inside a pocket. Mirroring is best effort and completely independent of
//! the gesture trigger policy.

use crate::config::SharedSettings;
use crate::stats::SharedStats;
use std::path::PathBuf;
use std::sync::Mutex;

/// External sink for the live covered/uncovered state.
///
/// `write` receives `"1"` on covered and `"0"` on uncovered, once per sensor
/// reading. Failures are ignored by callers; implementations must not block
/// beyond a single write attempt and must not panic.
pub trait ProximityMirror: Send + Sync {
    /// Whether mirroring is currently switched on.
    fn is_enabled(&self) -> bool;

    /// Whether the sink can currently accept writes.
    fn is_writable(&self) -> bool;

    /// Write the state, returning whether the write succeeded.
    fn write(&self, state: &str) -> bool;
}

/// Mirror writing to a sysfs-style node path.
///
/// Enablement tracks the live `proximity_mirror` config flag, so toggling the
/// setting takes effect on the next reading without re-arming.
pub struct FileMirror {
    node: PathBuf,
    settings: SharedSettings,
    stats: Option<SharedStats>,
}

impl FileMirror {
    pub fn new(node: PathBuf, settings: SharedSettings) -> Self {
        Self {
            node,
            settings,
            stats: None,
        }
    }

    /// Record successful writes into session stats.
    pub fn with_stats(mut self, stats: SharedStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

impl ProximityMirror for FileMirror {
    fn is_enabled(&self) -> bool {
        self.settings.snapshot().proximity_mirror
    }

    fn is_writable(&self) -> bool {
        self.node
            .metadata()
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false)
    }

    fn write(&self, state: &str) -> bool {
        let ok = std::fs::write(&self.node, state).is_ok();
        if ok {
            if let Some(ref stats) = self.stats {
                stats.record_mirror_write();
            }
        }
        ok
    }
}

/// In-memory mirror recording every write. Used in tests and dry runs.
#[derive(Debug)]
pub struct MemoryMirror {
    enabled: bool,
    writes: Mutex<Vec<String>>,
}

impl MemoryMirror {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// All states written so far, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }
}

impl ProximityMirror for MemoryMirror {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn write(&self, state: &str) -> bool {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(state.to_string());
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_mirror_records_in_order() {
        let mirror = MemoryMirror::new(true);
        assert!(mirror.is_enabled());
        assert!(mirror.is_writable());

        mirror.write("1");
        mirror.write("0");
        assert_eq!(mirror.writes(), vec!["1", "0"]);
    }

    #[test]
    fn test_disabled_memory_mirror_reports_disabled() {
        let mirror = MemoryMirror::new(false);
        assert!(!mirror.is_enabled());
    }

    #[test]
    fn test_file_mirror_missing_node_not_writable() {
        let settings = SharedSettings::new(crate::config::Config::default());
        let mirror = FileMirror::new(PathBuf::from("/nonexistent/proximity_state"), settings);
        assert!(!mirror.is_writable());
        assert!(!mirror.write("1"));
    }
}
