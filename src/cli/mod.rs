//! CLI Module
//!
//! Command-line interface for wavsplice.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::EncodeOptions;
use crate::error::SpliceError;

/// wavsplice - trim, join and split WAV audio
#[derive(Parser, Debug)]
#[command(name = "wavsplice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory the result files are written to
    #[arg(short, long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Write interleaved sample data instead of per-channel blocks
    #[arg(long, global = true)]
    pub interleaved: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Encoder settings selected on the command line
    pub fn encode_options(&self) -> EncodeOptions {
        if self.interleaved {
            EncodeOptions::interleaved()
        } else {
            EncodeOptions::default()
        }
    }
}

/// Text shown to the user when a command fails: error code, message and
/// one line per recovery suggestion.
pub fn failure_report(err: &SpliceError) -> String {
    let mut report = format!("[{}] {}", err.error_code(), err.friendly_message());
    for suggestion in err.recovery_suggestions() {
        report.push_str("\n  - ");
        report.push_str(suggestion);
    }
    report
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Keep only the audio between two times
    #[command(name = "trim")]
    Trim {
        /// Input audio file
        input: PathBuf,

        /// Start time in seconds
        #[arg(short, long)]
        start: f64,

        /// End time in seconds
        #[arg(short, long)]
        end: f64,

        /// Fit the range to the audio length instead of failing
        #[arg(long)]
        clamp: bool,
    },

    /// Join files end to end
    #[command(name = "join")]
    Join {
        /// Input audio files, in playback order
        inputs: Vec<PathBuf>,

        /// Also append every .wav file found under this directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Split a file at one or more times
    #[command(name = "split")]
    Split {
        /// Input audio file
        input: PathBuf,

        /// Split point in seconds (repeatable)
        #[arg(short, long = "at", required = true)]
        at: Vec<f64>,
    },

    /// Print format and length of a file
    #[command(name = "info")]
    Info {
        /// Input audio file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
