//! camlapse CLI: build Dropcam time-lapses from the command line.
//!
//! Usage:
//!   camlapse login                 Log in and cache the session
//!   camlapse logout                Forget the cached session
//!   camlapse cameras               List owned and subscribed cameras
//!   camlapse events <CAMERA>       List a camera's events
//!   camlapse snapshot <CAMERA> <PATH>  Save one still image
//!   camlapse timelapse <CAMERA>    Build a time-lapse video
//!   camlapse check                 Check encoder and session state

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use camlapse_common::clock::{parse_epoch, EpochSecs};
use camlapse_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "camlapse",
    about = "Build time-lapse videos from Dropcam snapshots and motion events",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dropcam username (prompted for when needed)
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Dropcam password (prompted for when needed)
    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Configuration file (defaults to the XDG config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and cache the session token
    Login,

    /// Delete the cached session token
    Logout,

    /// List cameras visible to the account
    Cameras {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List a camera's events
    Events {
        /// Camera UUID or title
        camera: String,

        /// Range start (epoch seconds or RFC 3339)
        #[arg(long, value_parser = parse_time)]
        start: Option<EpochSecs>,

        /// Range end (epoch seconds or RFC 3339)
        #[arg(long, value_parser = parse_time)]
        end: Option<EpochSecs>,

        /// Only show motion events eligible for a time-lapse
        #[arg(long)]
        motion_only: bool,

        /// Show at most this many events
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Save a single still image
    Snapshot {
        /// Camera UUID or title
        camera: String,

        /// Output file path
        path: PathBuf,

        /// Image time (epoch seconds or RFC 3339); defaults to live
        #[arg(long, value_parser = parse_time)]
        time: Option<EpochSecs>,

        /// Image width
        #[arg(long)]
        width: Option<u32>,
    },

    /// Build a time-lapse video
    Timelapse {
        /// Camera UUID or title
        camera: String,

        /// Output base name (writes <NAME>.mjpeg and the final video)
        #[arg(short, long)]
        filename: Option<String>,

        /// Range start (epoch seconds or RFC 3339); defaults to the first event
        #[arg(long, value_parser = parse_time)]
        start: Option<EpochSecs>,

        /// Range end (epoch seconds or RFC 3339); defaults to the last event
        #[arg(long, value_parser = parse_time)]
        end: Option<EpochSecs>,

        /// Only use events with this category (e.g. humans, cars)
        #[arg(long)]
        category: Option<String>,

        /// Frames requested per event clip
        #[arg(long)]
        frames_per_event: Option<u32>,

        /// Maximum number of events (0 = no limit)
        #[arg(long)]
        max_events: Option<usize>,

        /// Still frames per hour of real time
        #[arg(long)]
        frames_per_hour: Option<u32>,

        /// Image width
        #[arg(long)]
        width: Option<u32>,

        /// Fetch requests kept in flight
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Check encoder availability and session state
    Check {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write_config: bool,
    },
}

fn parse_time(value: &str) -> Result<EpochSecs, String> {
    parse_epoch(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(camlapse_common::config::config_file_path);
    let mut config = AppConfig::load_from(&config_path)?;

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    camlapse_common::logging::init_logging(&config.logging);
    tracing::debug!(path = %config_path.display(), "Configuration loaded");

    let ctx = commands::Context {
        config,
        config_path,
        username: cli.username,
        password: cli.password,
    };

    match cli.command {
        Commands::Login => commands::login::run(&ctx).await,
        Commands::Logout => commands::login::logout(&ctx),
        Commands::Cameras { json } => commands::cameras::run(&ctx, json).await,
        Commands::Events {
            camera,
            start,
            end,
            motion_only,
            limit,
            json,
        } => commands::events::run(&ctx, camera, start, end, motion_only, limit, json).await,
        Commands::Snapshot {
            camera,
            path,
            time,
            width,
        } => commands::snapshot::run(&ctx, camera, path, time, width).await,
        Commands::Timelapse {
            camera,
            filename,
            start,
            end,
            category,
            frames_per_event,
            max_events,
            frames_per_hour,
            width,
            concurrency,
        } => {
            commands::timelapse::run(
                &ctx,
                commands::timelapse::TimelapseArgs {
                    camera,
                    filename,
                    start,
                    end,
                    category,
                    frames_per_event,
                    max_events,
                    frames_per_hour,
                    width,
                    concurrency,
                },
            )
            .await
        }
        Commands::Check { write_config } => commands::check::run(&ctx, write_config).await,
    }
}
