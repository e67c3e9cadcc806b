//! wavsplice CLI - PCM editing tool
//!
//! Command-line interface for trimming, joining and splitting WAV audio.

use anyhow::anyhow;
use clap::Parser;
use env_logger::Env;
use log::debug;

use wavsplice::cli::{commands, failure_report, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("wavsplice v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(ref cmd) => handle_command(&cli, cmd),
        None => {
            println!("wavsplice v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cli: &Cli, cmd: &Commands) -> anyhow::Result<()> {
    let options = cli.encode_options();
    let output_dir = cli.output_dir.as_path();

    let result = match cmd {
        Commands::Trim {
            input,
            start,
            end,
            clamp,
        } => commands::trim_file(input, *start, *end, *clamp, output_dir, &options).map(|_| ()),
        Commands::Join { inputs, dir } => {
            commands::join_files(inputs, dir.as_deref(), output_dir, &options).map(|_| ())
        }
        Commands::Split { input, at } => {
            commands::split_file(input, at, output_dir, &options).map(|_| ())
        }
        Commands::Info { input, json } => commands::show_info(input, *json).map(|_| ()),
    };

    // Reported once, by main's error return
    result.map_err(|err| anyhow!("{} command failed: {}", cmd_name(cmd), failure_report(&err)))
}

fn cmd_name(cmd: &Commands) -> &'static str {
    match cmd {
        Commands::Trim { .. } => "trim",
        Commands::Join { .. } => "join",
        Commands::Split { .. } => "split",
        Commands::Info { .. } => "info",
    }
}
