use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use habitd::{config::HabitdConfig, habit::HabitModel, rest, store::DateStore, AppContext};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "habitd",
    about = "habitd — always-on habit tracking daemon",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port
    #[arg(long, env = "HABITD_PORT")]
    port: Option<u16>,

    /// Data directory for the date file and config.toml
    #[arg(long, env = "HABITD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HABITD_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "HABITD_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,

    /// Bind address for the HTTP server (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "HABITD_BIND")]
    bind_address: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the daemon server (default when no subcommand given).
    ///
    /// Runs habitd in the foreground.
    ///
    /// Examples:
    ///   habitd serve
    ///   habitd
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        None | Some(Command::Serve) => {
            run_server(
                args.port,
                args.data_dir,
                args.log,
                args.log_file,
                args.bind_address,
            )
            .await?;
        }
    }

    Ok(())
}

async fn run_server(
    port: Option<u16>,
    data_dir: Option<std::path::PathBuf>,
    log: Option<String>,
    log_file: Option<std::path::PathBuf>,
    bind_address: Option<String>,
) -> Result<()> {
    let config = HabitdConfig::new(port, data_dir, log, log_file, bind_address);

    let _log_guard = setup_logging(&config.log, config.log_file.as_deref(), &config.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        port = config.port,
        "starting habitd"
    );

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("could not create data dir {}", config.data_dir.display()))?;

    let store = DateStore::new(&config.data_file);
    let habit = HabitModel::load(store)
        .await
        .context("could not load the habit date file")?;

    let ctx = Arc::new(AppContext {
        config: Arc::new(config),
        habit: Arc::new(habit),
        started_at: std::time::Instant::now(),
    });

    rest::start_rest_server(ctx).await
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("habitd.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            // Fall back to stdout-only — don't panic on a bad log path.
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}
