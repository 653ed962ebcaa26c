//! Replays a scripted walk of a local object and prints every sink call.
//!
//! Usage:
//!   geosync [--config sync.json] [--ticks 20] [--tick-ms 250] [--identity FirstPersonCharacter_0]
//!
//! Sink calls are written to stdout as JSON lines; logs go to stderr
//! (filter with RUST_LOG).

use std::env;
use std::io;

use anyhow::Context;
use geosync::{
    ConfigurationManager, HeadingPitchRoll, JsonLinesSink, LocalPose, ObjectSyncEmitter,
    SyncConfig, SyncedObject, TickThrottle,
};
use nalgebra::Vector3;
use tracing::info;

struct Args {
    config_path: Option<String>,
    ticks: u32,
    tick_ms: u64,
    identity: String,
}

fn parse_args() -> Args {
    let mut parsed = Args {
        config_path: None,
        ticks: 20,
        tick_ms: 250,
        identity: "FirstPersonCharacter_0".to_string(),
    };
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                parsed.config_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--ticks" if i + 1 < args.len() => {
                parsed.ticks = args[i + 1].parse().unwrap_or(parsed.ticks);
                i += 2;
            }
            "--tick-ms" if i + 1 < args.len() => {
                parsed.tick_ms = args[i + 1].parse().unwrap_or(parsed.tick_ms);
                i += 2;
            }
            "--identity" if i + 1 < args.len() => {
                parsed.identity = args[i + 1].clone();
                i += 2;
            }
            _ => i += 1,
        }
    }
    parsed
}

fn load_config(path: Option<&str>) -> anyhow::Result<SyncConfig> {
    match path {
        Some(path) => {
            let manager = ConfigurationManager::from_file(path)
                .with_context(|| format!("loading config from {}", path))?;
            Ok(manager.config().clone())
        }
        None => Ok(SyncConfig::default()),
    }
}

/// Circle of 20 m radius walked once over the run, facing along the path
fn scripted_pose(step: u32, total: u32, meters_per_unit: f64) -> LocalPose {
    let angle = std::f64::consts::TAU * f64::from(step) / f64::from(total.max(1));
    let radius = 20.0 / meters_per_unit;
    LocalPose::new(
        Vector3::new(radius * angle.cos(), radius * angle.sin(), 0.0),
        HeadingPitchRoll::new(angle.to_degrees() + 90.0, 0.0, 0.0),
    )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args();
    let config = load_config(args.config_path.as_deref())?;
    let origin = config.origin();
    info!(
        lat = origin.latitude,
        lon = origin.longitude,
        alt = origin.altitude,
        interval_ms = config.tick_interval_ms,
        "starting sync replay"
    );

    let sink = JsonLinesSink::new(io::stdout().lock());
    let mut emitter = ObjectSyncEmitter::from_config(sink, &config);
    let mut throttle = TickThrottle::new(config.tick_interval_ms);
    let mut object = SyncedObject::local(args.identity, config.object_type_tag.clone());

    for step in 0..args.ticks {
        let now_ms = u64::from(step) * args.tick_ms;
        let pose = scripted_pose(step, args.ticks, config.meters_per_scene_unit);

        if throttle.should_sync(now_ms) {
            emitter.on_tick(&mut object, &pose);
        }
        if step == args.ticks / 2 {
            emitter.on_fire(&object, &pose.position);
        }
    }
    emitter.on_destroy(&mut object);

    let stats = emitter.stats();
    info!(
        updates = stats.updates_sent,
        messages = stats.messages_sent,
        removals = stats.removals_sent,
        failures = stats.sink_failures,
        "replay finished"
    );
    Ok(())
}
