//! Artillery CLI - Generate and inspect battlefield terrain

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{drop, generate, preview};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "artillery")]
#[command(about = "Procedural terrain tools for a 2D tank artillery game", long_about = None)]
#[command(version)]
struct Cli {
    /// Log generation details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate terrain and print a summary
    Generate {
        /// Path to terrain config (TOML with a [terrain] table)
        config: String,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Render generated terrain to a PNG image
    Preview {
        /// Path to terrain config
        config: String,

        /// Output image path
        #[arg(short, long, default_value = "terrain.png")]
        output: String,

        /// Image width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "480")]
        height: u32,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Drop a test body onto the generated ground
    Drop {
        /// Path to terrain config
        config: String,

        /// World x to drop at (defaults to the middle of the terrain)
        #[arg(long)]
        x: Option<f32>,

        /// Simulated time in seconds
        #[arg(long, default_value = "3.0")]
        seconds: f32,

        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            config,
            seed,
            format,
        } => generate::run(&config, seed, &format),
        Commands::Preview {
            config,
            output,
            width,
            height,
            seed,
        } => preview::run(preview::PreviewArgs {
            config,
            output,
            width,
            height,
            seed,
        }),
        Commands::Drop {
            config,
            x,
            seconds,
            seed,
        } => drop::run(drop::DropArgs {
            config,
            x,
            seconds,
            seed,
        }),
    }
}
