// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use viewfinder::app::state::LensFacing;
use viewfinder::backends::{self, camera::v4l2};
use viewfinder::config::Config;
use viewfinder::constants::APP_NAME;
use viewfinder::{permissions, storage};

mod cli;

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Terminal camera viewfinder with zoom, lens switching and photo capture")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Use synthetic test-pattern cameras instead of V4L2 devices
    #[arg(long = "virtual", global = true)]
    use_virtual: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available lenses
    List,

    /// Take a photo
    Photo {
        /// Lens to use: back or front (default: from config)
        #[arg(short, long)]
        lens: Option<LensFacing>,

        /// Output file or directory (default: picture directory, <millis>.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The viewfinder owns the screen, so its logs go to a file
    init_logging(cli.command.is_none());

    let config = Config::load();
    let backend = backends::create_backend(&config, cli.use_virtual);
    let photo_dir = storage::photo_directory(config.photo_directory.as_deref());
    info!(backend = backend.name(), photo_dir = %photo_dir.display(), "Starting");

    match cli.command {
        Some(Commands::List) => cli::list_lenses(backend.as_ref()),
        Some(Commands::Photo { lens, output }) => {
            let target_dir = match output.as_deref() {
                Some(path) if !path.is_dir() => path.parent().unwrap_or(Path::new(".")),
                Some(dir) => dir,
                None => photo_dir.as_path(),
            };
            permission_gate(cli.use_virtual, target_dir);
            let lens = lens.unwrap_or(config.initial_lens);
            cli::take_photo(backend.as_ref(), &config, lens, output, photo_dir)
        }
        None => {
            permission_gate(cli.use_virtual, &photo_dir);
            viewfinder::terminal::run(backend, &config, photo_dir)
        }
    }
}

/// Refuse to start without camera and storage access
fn permission_gate(use_virtual: bool, photo_dir: &Path) {
    let nodes = if use_virtual {
        Vec::new()
    } else {
        v4l2::device_nodes()
    };

    if let Err(e) = permissions::check(&nodes, photo_dir) {
        warn!(error = %e, "Permission check failed");
        eprintln!("{}", permissions::PERMISSION_DENIED_MESSAGE);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(to_file: bool) {
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=viewfinder=debug, RUST_LOG=info
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true);

    if !to_file {
        builder.init();
        return;
    }

    match open_log_file() {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(std::io::sink).init(),
    }
}

fn open_log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join(APP_NAME);
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{}.log", APP_NAME)))
        .ok()
}
