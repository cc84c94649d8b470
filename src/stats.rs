//! Session statistics for the running agent.
//!
//! Counts readings, fired pulses, mirror writes and arm cycles so
//! `doze-sensor status` can report what a background agent has been doing.
//! Counters are atomics; the log is shared across the event loop and the
//! trigger/mirror implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for the current agent session.
#[derive(Debug)]
pub struct SessionStats {
    readings_seen: AtomicU64,
    pulses_fired: AtomicU64,
    wakes_fired: AtomicU64,
    mirror_writes: AtomicU64,
    arm_cycles: AtomicU64,
    session_start: DateTime<Utc>,
    persist_path: Option<PathBuf>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            readings_seen: AtomicU64::new(0),
            pulses_fired: AtomicU64::new(0),
            wakes_fired: AtomicU64::new(0),
            mirror_writes: AtomicU64::new(0),
            arm_cycles: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a stats log persisted at the given path.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut stats = Self::new();
        stats.persist_path = Some(path);

        if let Err(e) = stats.load() {
            eprintln!("Note: could not load previous stats: {e}");
        }

        stats
    }

    pub fn record_reading(&self) {
        self.readings_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pulse(&self) {
        self.pulses_fired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_wake(&self) {
        self.wakes_fired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mirror_write(&self) {
        self.mirror_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_arm_cycle(&self) {
        self.arm_cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            readings_seen: self.readings_seen.load(Ordering::Relaxed),
            pulses_fired: self.pulses_fired.load(Ordering::Relaxed),
            wakes_fired: self.wakes_fired.load(Ordering::Relaxed),
            mirror_writes: self.mirror_writes.load(Ordering::Relaxed),
            arm_cycles: self.arm_cycles.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Human-readable summary for the status command.
    pub fn summary(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "Session statistics:\n\
             - Sensor readings processed: {}\n\
             - Doze pulses fired: {}\n\
             - Wakes requested: {}\n\
             - Proximity mirror writes: {}\n\
             - Arm cycles (screen-off periods): {}\n\
             - Session duration: {} seconds",
            snapshot.readings_seen,
            snapshot.pulses_fired,
            snapshot.wakes_fired,
            snapshot.mirror_writes,
            snapshot.arm_cycles,
            snapshot.session_duration_secs
        )
    }

    /// Save counters to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let snapshot = self.snapshot();
            let persisted = PersistedStats {
                readings_seen: snapshot.readings_seen,
                pulses_fired: snapshot.pulses_fired,
                wakes_fired: snapshot.wakes_fired,
                mirror_writes: snapshot.mirror_writes,
                arm_cycles: snapshot.arm_cycles,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load counters from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.readings_seen
                    .store(persisted.readings_seen, Ordering::Relaxed);
                self.pulses_fired
                    .store(persisted.pulses_fired, Ordering::Relaxed);
                self.wakes_fired
                    .store(persisted.wakes_fired, Ordering::Relaxed);
                self.mirror_writes
                    .store(persisted.mirror_writes, Ordering::Relaxed);
                self.arm_cycles
                    .store(persisted.arm_cycles, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.readings_seen.store(0, Ordering::Relaxed);
        self.pulses_fired.store(0, Ordering::Relaxed);
        self.wakes_fired.store(0, Ordering::Relaxed);
        self.mirror_writes.store(0, Ordering::Relaxed);
        self.arm_cycles.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of session counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub readings_seen: u64,
    pub pulses_fired: u64,
    pub wakes_fired: u64,
    pub mirror_writes: u64,
    pub arm_cycles: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Counter format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    readings_seen: u64,
    pulses_fired: u64,
    wakes_fired: u64,
    mirror_writes: u64,
    arm_cycles: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared stats log.
pub type SharedStats = Arc<SessionStats>;

/// Create a new shared stats log.
pub fn create_shared_stats() -> SharedStats {
    Arc::new(SessionStats::new())
}

/// Create a new shared stats log with persistence.
pub fn create_shared_stats_with_persistence(path: PathBuf) -> SharedStats {
    Arc::new(SessionStats::with_persistence(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_counting() {
        let stats = SessionStats::new();

        stats.record_reading();
        stats.record_reading();
        stats.record_pulse();
        stats.record_arm_cycle();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.readings_seen, 2);
        assert_eq!(snapshot.pulses_fired, 1);
        assert_eq!(snapshot.arm_cycles, 1);
        assert_eq!(snapshot.mirror_writes, 0);
    }

    #[test]
    fn test_stats_reset() {
        let stats = SessionStats::new();
        stats.record_pulse();
        stats.record_mirror_write();
        stats.reset();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.pulses_fired, 0);
        assert_eq!(snapshot.mirror_writes, 0);
    }

    #[test]
    fn test_summary_format() {
        let stats = SessionStats::new();
        stats.record_pulse();
        let summary = stats.summary();

        assert!(summary.contains("Doze pulses fired: 1"));
        assert!(summary.contains("Sensor readings processed"));
        assert!(summary.contains("Arm cycles"));
    }
}
