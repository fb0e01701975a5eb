// Application configuration types
//
// This module contains:
// - Fixed constants (event log size, proxy port, frame rate bounds)
// - The four brain regions rendered by the neuron pool
// - Command line arguments and the config structs built from them

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::scene::{Region, Rgb, Vec3};
use crate::stream::{endpoint_url, SessionConfig};

// ============================================================================
// Constants
// ============================================================================

/// Number of events kept in the journal
pub const EVENT_LOG_CAPACITY: usize = 50;

/// Upstream brain port the proxy forwards to
pub const UPSTREAM_PORT: u16 = 9001;

/// Proxy host used when none is given
pub const DEFAULT_HOST: &str = "localhost:5000";

/// Neurons per region
pub const NEURONS_PER_REGION: usize = 256;

/// Default render rate in frames per second
pub const DEFAULT_FPS: u32 = 60;

/// Frame rate bounds accepted on the command line
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

/// Frame time threshold for flagging a slow frame
pub const FRAME_TIME_THRESHOLD_MS: u128 = 100;

/// Consecutive slow frames before the status bar warns
pub const SLOW_FRAME_COUNT_THRESHOLD: u32 = 5;

// ============================================================================
// Regions
// ============================================================================

/// The four fixed brain regions: encoder, decoder, memory, cognitive
///
/// Order matters: it matches the activation arrays of `BrainState`.
pub fn brain_regions() -> Vec<Region> {
    [
        ("Encoder", 0x3b82f6, Vec3::new(-20.0, 10.0, 0.0)),
        ("Decoder", 0x8b5cf6, Vec3::new(20.0, 10.0, 0.0)),
        ("Memory", 0x10b981, Vec3::new(-20.0, -10.0, 0.0)),
        ("Cognitive", 0xf59e0b, Vec3::new(20.0, -10.0, 0.0)),
    ]
    .into_iter()
    .map(|(name, hex, origin)| Region {
        name,
        base_color: Rgb::from_hex(hex),
        neuron_count: NEURONS_PER_REGION,
        origin,
    })
    .collect()
}

// ============================================================================
// Command line
// ============================================================================

/// Rejects `--fps` values outside `MIN_FPS..=MAX_FPS`
fn fps_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32)
        .range(i64::from(MIN_FPS)..=i64::from(MAX_FPS))
}

/// Terminal 3D view of a streaming brain-activation feed
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Host (and port) of the dashboard proxy
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Upstream brain port, reached through /proxy/<port>
    #[arg(long, default_value_t = UPSTREAM_PORT)]
    pub port: u16,

    /// Render rate; scene rotation speed follows it
    #[arg(long, default_value_t = DEFAULT_FPS, value_parser = fps_parser())]
    pub fps: u32,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Apply `state` messages to the neuron pool instead of ignoring them
    #[arg(long, default_value_t = false)]
    pub accept_state: bool,
}

impl Cli {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            endpoint: endpoint_url(&self.host, self.port),
            accept_state_messages: self.accept_state,
            event_capacity: EVENT_LOG_CAPACITY,
        }
    }

    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig::new(self.fps)
    }
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Render cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    pub fps: u32,
}

impl FrameConfig {
    /// Create a FrameConfig, clamping to the supported range
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.clamp(MIN_FPS, MAX_FPS),
        }
    }

    /// Time budget of one frame, also the event wait timeout
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}
