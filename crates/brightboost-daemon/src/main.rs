//! brightboost daemon
//!
//! Watches the panel backlight and raises it to the configured maximum when
//! it sits between the trigger threshold and 90% of that maximum.
//!
//! Startup sequence:
//! 1. Resolve the module directory (defaults to the executable's directory)
//! 2. Install console and service log output
//! 3. Locate the backlight register
//! 4. Run the boost loop until SIGINT or SIGTERM

use anyhow::{Context, Result};
use brightboost_config::{ConfigError, ConfigSnapshot, ConfigStore, DefaultLevels, ModulePaths};
use brightboost_engine::{BoostCycle, BoostService};
use brightboost_hal::SysfsBacklight;
use brightboost_storage::service_log_layer;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "brightboost")]
#[command(about = "Raise panel brightness when it drops to a threshold")]
#[command(version)]
struct Cli {
    /// Module directory holding CONFIG.prop, yule/ and the service log
    #[arg(long, global = true)]
    module_dir: Option<PathBuf>,

    /// Backlight brightness file (auto-detected when omitted)
    #[arg(long, global = true)]
    brightness_path: Option<PathBuf>,

    /// Enable debug output on the console
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the boost loop (default)
    Run,
    /// Print the configuration and effective levels, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let module_dir = cli.module_dir.clone().unwrap_or_else(default_module_dir);
    let mut paths = ModulePaths::new(&module_dir);
    if let Some(path) = &cli.brightness_path {
        paths = paths.with_brightness(path);
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(paths, cli.verbose).await,
        Commands::CheckConfig => check_config(&paths),
    }
}

/// Directory containing the executable, or `.` when it cannot be resolved
fn default_module_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Setup logging to console and the service log
fn setup_logging(service_log: &Path, verbose: bool) {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .with(service_log_layer(service_log).with_filter(LevelFilter::INFO))
        .init();
}

async fn run(paths: ModulePaths, verbose: bool) -> Result<()> {
    setup_logging(&paths.service_log, verbose);

    info!(
        "brightboost {} starting in {}",
        env!("CARGO_PKG_VERSION"),
        paths.module_dir.display()
    );

    if !nix::unistd::geteuid().is_root() {
        warn!("Not running as root, backlight writes may be refused");
    }

    let backlight = match &paths.brightness {
        Some(path) => SysfsBacklight::new(path),
        None => SysfsBacklight::detect(),
    };
    match backlight.max_brightness() {
        Some(max) => info!(
            "Backlight at {} (hardware max {})",
            backlight.path().display(),
            max
        ),
        None => info!("Backlight at {}", backlight.path().display()),
    }

    let service = BoostService::new(BoostCycle::new(paths, backlight));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(()) => {
                info!("Received shutdown signal");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => error!("Signal handling unavailable: {:#}", e),
        }
    });

    service.run(shutdown_rx).await;
    Ok(())
}

/// Resolve on SIGINT or SIGTERM
async fn wait_for_shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("Failed to listen for SIGINT")?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

fn check_config(paths: &ModulePaths) -> Result<()> {
    println!("{}", render_config(paths)?);
    Ok(())
}

/// Configuration as the running daemon would see it, rendered as TOML
fn render_config(paths: &ModulePaths) -> Result<String> {
    let store = ConfigStore::new(&paths.config_file);
    let (snapshot, source) = match store.load() {
        Ok(snapshot) => (snapshot, store.path().display().to_string()),
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            (ConfigSnapshot::default(), "(file missing, defaults)".to_string())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", store.path().display()));
        }
    };
    let defaults = DefaultLevels::load(paths);
    let levels = snapshot.effective_levels(&defaults);

    let rendered = snapshot
        .to_toml()
        .context("Failed to render configuration")?;

    let mut out = format!("# {}\n", source);
    out.push_str(rendered.trim_end());
    out.push_str("\n\n[effective]\n");
    out.push_str(&format!("threshold = {}\n", levels.threshold));
    out.push_str(&format!("max = {}\n", levels.max));
    out.push_str(&format!("ceiling = {}\n", levels.ceiling()));
    out.push_str(&format!(
        "step_delta = {}",
        levels.step_delta(snapshot.step_count)
    ));
    Ok(out)
}
