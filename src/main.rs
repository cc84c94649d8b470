//! Doze Sensor Agent CLI
//!
//! Background wake-gesture detection for doze/AOD.

use clap::{Parser, Subcommand};
use crossbeam_channel::{bounded, Receiver, Sender};
use doze_sensor_agent::{
    config::{Config, PickupMode, SharedSettings},
    gate::{GateState, ScreenPowerEvent, ScreenStateGate},
    mirror::{FileMirror, ProximityMirror},
    platform::sensor_capabilities,
    pulse::{CommandPulse, PulseTrigger},
    sensor::{ms_to_ns, DispatchSource, SensorKind, SensorReading},
    stats::{create_shared_stats_with_persistence, SessionStats},
    VERSION,
};
use serde::Deserialize;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "doze-sensor")]
#[command(version = VERSION)]
#[command(about = "Background doze gesture agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent, consuming screen and sensor events
    Run {
        /// Read events from a JSONL file instead of stdin
        #[arg(long)]
        replay: Option<PathBuf>,
    },

    /// Enable a gesture (pickup, pickup-wake, handwave, pocket, mirror)
    Enable {
        /// Gesture name
        gesture: String,
    },

    /// Disable a gesture (pickup, handwave, pocket, mirror)
    Disable {
        /// Gesture name
        gesture: String,
    },

    /// Show gesture configuration and session statistics
    Status,

    /// Show configuration
    Config,

    /// Fire a single doze pulse through the configured trigger
    Pulse,
}

/// Wire format for the agent's input stream, one JSON object per line.
///
/// ```json
/// {"event":"screen_off"}
/// {"event":"reading","sensor":"pocket","value":1.0,"t_ms":0}
/// {"event":"reading","sensor":"pocket","value":0.0,"t_ms":500}
/// {"event":"screen_on"}
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum AgentEvent {
    ScreenOn,
    ScreenOff,
    Reading {
        sensor: SensorKind,
        value: f32,
        t_ms: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { replay } => cmd_run(replay),
        Commands::Enable { gesture } => cmd_set_gesture(&gesture, true),
        Commands::Disable { gesture } => cmd_set_gesture(&gesture, false),
        Commands::Status => cmd_status(),
        Commands::Config => cmd_config(),
        Commands::Pulse => cmd_pulse(),
    }
}

fn cmd_run(replay: Option<PathBuf>) {
    println!("Doze Sensor Agent v{VERSION}");
    println!();

    let config = Config::load().unwrap_or_default();
    if !config.should_run() {
        if !config.doze_enabled {
            eprintln!("Doze is disabled; nothing to do.");
        } else if config.always_on_display {
            eprintln!("Always-on display is active; pulse gestures are redundant.");
        } else {
            eprintln!("No gestures enabled.");
            eprintln!("Enable one first, e.g.: doze-sensor enable handwave");
        }
        std::process::exit(1);
    }
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: could not create directories: {e}");
    }

    let caps = sensor_capabilities(&config.platform);
    println!("Platform: {}", config.platform);
    println!(
        "  Pickup sensor: {}",
        caps.pickup_sensor().unwrap_or("not available")
    );
    println!(
        "  Pocket sensor: {}",
        caps.pocket_sensor().unwrap_or("not available")
    );
    println!("  Pickup gesture: {:?}", config.pickup_mode);
    println!("  Hand-wave gesture: {}", config.gesture_hand_wave);
    println!("  Pocket gesture: {}", config.gesture_pocket);
    println!("  Proximity mirror: {}", config.proximity_mirror);
    if !caps.any() {
        eprintln!("Warning: no gesture sensors on this platform; the agent will stay idle.");
    }
    println!();

    let stats = create_shared_stats_with_persistence(config.data_path.join("stats.json"));
    let settings = SharedSettings::new(config.clone());

    let trigger: Arc<dyn PulseTrigger> = Arc::new(
        CommandPulse::new(config.pulse_command.clone(), config.wake_command.clone())
            .with_stats(stats.clone()),
    );
    let mirror: Arc<dyn ProximityMirror> = Arc::new(
        FileMirror::new(config.mirror_node.clone(), settings.clone()).with_stats(stats.clone()),
    );

    let mut source = DispatchSource::new();
    let mut gate = ScreenStateGate::new(caps, settings.clone(), trigger, Some(mirror));

    // Feed events from the replay file or stdin on a separate thread; the
    // event loop below is the single place that touches gate and source.
    let (sender, receiver) = bounded::<AgentEvent>(1024);
    let feeder = match replay {
        Some(path) => spawn_file_feeder(path, sender),
        None => spawn_stdin_feeder(sender),
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        eprintln!("Warning: could not install signal handler: {e}");
    }

    run_loop(&running, &receiver, &mut gate, &mut source, &settings, &stats);

    gate.disarm(&mut source);
    if let Err(e) = stats.save() {
        eprintln!("Warning: could not save stats: {e}");
    }
    // The feeder may be blocked on a read; it exits with the process.
    drop(feeder);

    println!();
    println!("{}", stats.summary());
}

fn run_loop(
    running: &AtomicBool,
    receiver: &Receiver<AgentEvent>,
    gate: &mut ScreenStateGate,
    source: &mut DispatchSource,
    settings: &SharedSettings,
    stats: &SessionStats,
) {
    let mut last_config_check = std::time::Instant::now();

    while running.load(Ordering::SeqCst) {
        // Reload config periodically so `doze-sensor enable/disable` from
        // another process acts on the running agent.
        if last_config_check.elapsed() >= Duration::from_secs(1) {
            if let Ok(config) = Config::load() {
                let stop = !config.should_run();
                settings.replace(config);
                if stop && gate.state() == GateState::Armed {
                    println!("Gestures disabled; disarming.");
                    gate.disarm(source);
                }
            }
            last_config_check = std::time::Instant::now();
        }

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(AgentEvent::ScreenOff) => {
                if settings.snapshot().should_run() {
                    let was_idle = gate.state() == GateState::Idle;
                    gate.handle_event(ScreenPowerEvent::ScreenOff, source);
                    if was_idle && gate.state() == GateState::Armed {
                        stats.record_arm_cycle();
                    }
                }
            }
            Ok(AgentEvent::ScreenOn) => {
                gate.handle_event(ScreenPowerEvent::ScreenOn, source);
            }
            Ok(AgentEvent::Reading { sensor, value, t_ms }) => {
                stats.record_reading();
                source.dispatch(sensor, SensorReading::new(value, ms_to_ns(t_ms)));
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                // Input stream finished (replay EOF or closed stdin).
                break;
            }
        }
    }
}

fn spawn_file_feeder(path: PathBuf, sender: Sender<AgentEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error opening replay file {}: {e}", path.display());
                return;
            }
        };
        feed_lines(std::io::BufReader::new(file), &sender);
    })
}

fn spawn_stdin_feeder(sender: Sender<AgentEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        feed_lines(std::io::stdin().lock(), &sender);
    })
}

fn feed_lines<R: BufRead>(reader: R, sender: &Sender<AgentEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AgentEvent>(&line) {
            Ok(event) => {
                if sender.send(event).is_err() {
                    break;
                }
            }
            Err(e) => eprintln!("Warning: skipping malformed event line: {e}"),
        }
    }
}

fn cmd_set_gesture(gesture: &str, enable: bool) {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    match gesture {
        "pickup" => {
            config.pickup_mode = if enable {
                PickupMode::Pulse
            } else {
                PickupMode::Off
            }
        }
        "pickup-wake" => {
            config.pickup_mode = if enable {
                PickupMode::Wake
            } else {
                PickupMode::Off
            }
        }
        "handwave" => config.gesture_hand_wave = enable,
        "pocket" => config.gesture_pocket = enable,
        "mirror" => config.proximity_mirror = enable,
        other => {
            eprintln!("Unknown gesture: {other}");
            eprintln!("Expected one of: pickup, pickup-wake, handwave, pocket, mirror");
            std::process::exit(1);
        }
    }

    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }

    println!(
        "{} {}",
        gesture,
        if enable { "enabled" } else { "disabled" }
    );
    if !config.should_run() {
        println!("Note: the agent will not arm (doze off, AOD on, or no gestures enabled).");
    }
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();
    let caps = sensor_capabilities(&config.platform);

    println!("Doze Sensor Agent v{VERSION}");
    println!();
    println!("Platform: {}", config.platform);
    println!(
        "  Pickup sensor: {}",
        caps.pickup_sensor().unwrap_or("not available")
    );
    println!(
        "  Pocket sensor: {}",
        caps.pocket_sensor().unwrap_or("not available")
    );
    println!();
    println!("Gestures:");
    println!("  Pickup: {:?}", config.pickup_mode);
    println!("  Hand-wave: {}", config.gesture_hand_wave);
    println!("  Pocket removal: {}", config.gesture_pocket);
    println!("  Proximity mirror: {}", config.proximity_mirror);
    println!(
        "  Agent would run: {}",
        if config.should_run() { "yes" } else { "no" }
    );
    println!();

    let stats = SessionStats::with_persistence(config.data_path.join("stats.json"));
    println!("{}", stats.summary());
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing config: {e}"),
    }
    println!();
    println!("Config file: {}", Config::config_path().display());
}

fn cmd_pulse() {
    let config = Config::load().unwrap_or_default();
    let trigger = CommandPulse::new(config.pulse_command.clone(), config.wake_command.clone());
    trigger.fire();
    println!("Pulse requested.");
}
