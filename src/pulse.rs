//! Doze pulse trigger: how a detected gesture reaches the display subsystem.

use crate::stats::SharedStats;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Requests a doze/AOD pulse from the display subsystem.
///
/// Fire-and-forget: implementations must not block, must not panic, and must
/// tolerate concurrent or rapidly repeated invocation (a doubled pulse is a
/// benign glitch, not a fault).
pub trait PulseTrigger: Send + Sync {
    /// Request a doze pulse.
    fn fire(&self);

    /// Request a full wake. Defaults to a pulse for triggers that cannot
    /// distinguish the two.
    fn wake(&self) {
        self.fire();
    }
}

/// Trigger that invokes configured external commands.
///
/// This is the broadcast analog: on-device the pulse request is a system
/// broadcast, here it is whatever command the deployment wires up. Spawn
/// failures are swallowed.
pub struct CommandPulse {
    pulse_command: Option<String>,
    wake_command: Option<String>,
    stats: Option<SharedStats>,
}

impl CommandPulse {
    pub fn new(pulse_command: Option<String>, wake_command: Option<String>) -> Self {
        Self {
            pulse_command,
            wake_command,
            stats: None,
        }
    }

    /// Record fired pulses into session stats.
    pub fn with_stats(mut self, stats: SharedStats) -> Self {
        self.stats = Some(stats);
        self
    }

    fn run(command: &str) {
        let mut parts = command.split_whitespace();
        if let Some(program) = parts.next() {
            // Detached, best effort. The child's exit status is not our concern.
            let _ = std::process::Command::new(program)
                .args(parts)
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .spawn();
        }
    }
}

impl PulseTrigger for CommandPulse {
    fn fire(&self) {
        if let Some(ref stats) = self.stats {
            stats.record_pulse();
        }
        match self.pulse_command {
            Some(ref command) => Self::run(command),
            None => println!("[pulse] doze pulse requested"),
        }
    }

    fn wake(&self) {
        if let Some(ref stats) = self.stats {
            stats.record_wake();
        }
        match self.wake_command.as_ref().or(self.pulse_command.as_ref()) {
            Some(command) => Self::run(command),
            None => println!("[pulse] wake requested"),
        }
    }
}

/// Trigger that only counts invocations. Used in tests and dry runs.
#[derive(Debug, Default)]
pub struct CountingPulse {
    fires: AtomicU64,
    wakes: AtomicU64,
}

impl CountingPulse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of pulse requests observed.
    pub fn fires(&self) -> u64 {
        self.fires.load(Ordering::SeqCst)
    }

    /// Number of wake requests observed.
    pub fn wakes(&self) -> u64 {
        self.wakes.load(Ordering::SeqCst)
    }
}

impl PulseTrigger for CountingPulse {
    fn fire(&self) {
        self.fires.fetch_add(1, Ordering::SeqCst);
    }

    fn wake(&self) {
        self.wakes.fetch_add(1, Ordering::SeqCst);
    }
}
