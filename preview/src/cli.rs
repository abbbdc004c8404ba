use std::path::PathBuf;

use clap::{Parser, Subcommand};
use myrtio_light_sequencer::{Rgb, color::rgb_from_u32};

#[derive(Parser, Debug)]
#[command(
    name = "myrtio-light-sequencer-preview",
    about = "Preview light sequences on a terminal strip"
)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of LEDs on the simulated strip
    #[arg(long)]
    pub leds: Option<usize>,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Loop a JSON pattern command until Enter is pressed
    Pattern {
        /// Command file, or `-` for stdin
        command: PathBuf,

        /// Show each keyframe without fading
        #[arg(long)]
        hold: bool,
    },
    /// Follow a simulated playback of one analysed track
    Sync {
        /// Seconds-based analysis JSON file
        analysis: PathBuf,

        /// Color at the start of a beat fade (RRGGBB)
        #[arg(long, default_value = "ff0040", value_parser = parse_color)]
        start: Rgb,

        /// Color at the end of a beat fade and during calm beats (RRGGBB)
        #[arg(long, default_value = "0028ff", value_parser = parse_color)]
        end: Rgb,

        /// Position to start playback from, in milliseconds
        #[arg(long, default_value_t = 0)]
        offset_ms: u64,
    },
}

fn parse_color(value: &str) -> Result<Rgb, String> {
    let hex = value.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("expected RRGGBB, got `{value}`"));
    }
    u32::from_str_radix(hex, 16)
        .map(rgb_from_u32)
        .map_err(|err| format!("bad color `{value}`: {err}"))
}
