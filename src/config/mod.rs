use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::error;

const DEFAULT_PORT: u16 = 4310;
const DEFAULT_DATA_FILE: &str = "meditation.csv";
const DEFAULT_MAX_HISTORY_DAYS: i64 = 3650;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `[server]` section of config.toml.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct ServerSection {
    /// HTTP server port (default: 4310).
    port: Option<u16>,
    /// Bind address (default: "127.0.0.1"; use "0.0.0.0" for LAN access).
    bind_address: Option<String>,
}

/// `[storage]` section of config.toml.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct StorageSection {
    /// Date file name or path. Relative paths resolve under the data dir.
    /// Default: "meditation.csv".
    data_file: Option<PathBuf>,
}

/// `[limits]` section of config.toml.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct LimitsSection {
    /// Largest `count` the history endpoint accepts (default: 3650).
    max_history_days: Option<i64>,
}

/// `[log]` section of config.toml.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct LogSection {
    /// Log level filter string, e.g. "debug", "info,habitd=trace" (default: "info").
    level: Option<String>,
    /// Output format: "pretty" (default, human-readable) | "json" (for log aggregators).
    format: Option<String>,
    /// Write logs to this file (rotated daily) in addition to stdout.
    file: Option<PathBuf>,
}

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    storage: StorageSection,
    #[serde(default)]
    limits: LimitsSection,
    #[serde(default)]
    log: LogSection,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── HabitdConfig ─────────────────────────────────────────────────────────────

/// Resolved daemon configuration, shared read-only via `AppContext`.
#[derive(Debug, Clone)]
pub struct HabitdConfig {
    pub port: u16,
    pub bind_address: String,
    pub data_dir: PathBuf,
    /// Absolute path of the flat date file.
    pub data_file: PathBuf,
    /// Hard cap on the history `count` query parameter.
    pub max_history_days: i64,
    pub log: String,
    /// "pretty" | "json".
    pub log_format: String,
    pub log_file: Option<PathBuf>,
}

impl HabitdConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        log_file: Option<PathBuf>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // TOML is the lowest-priority override layer.
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.server.port).unwrap_or(DEFAULT_PORT);
        let bind_address = bind_address
            .or(toml.server.bind_address)
            .unwrap_or_else(default_bind_address);

        let data_file = toml
            .storage
            .data_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        let data_file = if data_file.is_absolute() {
            data_file
        } else {
            data_dir.join(data_file)
        };

        let max_history_days = toml
            .limits
            .max_history_days
            .unwrap_or(DEFAULT_MAX_HISTORY_DAYS);

        let log = log.or(toml.log.level).unwrap_or_else(|| "info".to_string());
        let log_format = std::env::var("HABITD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log.format)
            .unwrap_or_else(|| "pretty".to_string());
        let log_file = log_file.or(toml.log.file);

        Self {
            port,
            bind_address,
            data_dir,
            data_file,
            max_history_days,
            log,
            log_format,
            log_file,
        }
    }
}

fn default_data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".habitd");
    }
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("habitd");
        }
    }
    // Fallback
    PathBuf::from(".habitd")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let tmp = TempDir::new().unwrap();
        let cfg = HabitdConfig::new(None, Some(tmp.path().to_path_buf()), None, None, None);

        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.bind_address, "127.0.0.1");
        assert_eq!(cfg.data_file, tmp.path().join("meditation.csv"));
        assert_eq!(cfg.max_history_days, DEFAULT_MAX_HISTORY_DAYS);
        assert_eq!(cfg.log, "info");
        assert_eq!(cfg.log_format, "pretty");
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
port = 9000
bind_address = "0.0.0.0"

[storage]
data_file = "habits/running.csv"

[limits]
max_history_days = 30

[log]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        let cfg = HabitdConfig::new(None, Some(tmp.path().to_path_buf()), None, None, None);
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.bind_address, "0.0.0.0");
        assert_eq!(cfg.data_file, tmp.path().join("habits").join("running.csv"));
        assert_eq!(cfg.max_history_days, 30);
        assert_eq!(cfg.log, "debug");
        assert_eq!(cfg.log_format, "json");
    }

    #[test]
    fn test_cli_beats_toml() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "[server]\nport = 9000\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let cfg = HabitdConfig::new(
            Some(4444),
            Some(tmp.path().to_path_buf()),
            Some("warn".to_string()),
            None,
            None,
        );
        assert_eq!(cfg.port, 4444);
        assert_eq!(cfg.log, "warn");
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("config.toml"), "[server\nport = oops").unwrap();

        let cfg = HabitdConfig::new(None, Some(tmp.path().to_path_buf()), None, None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn test_absolute_data_file_is_kept() {
        let tmp = TempDir::new().unwrap();
        let abs = if cfg!(windows) {
            "C:\\\\data\\\\meditation.csv"
        } else {
            "/data/meditation.csv"
        };
        std::fs::write(
            tmp.path().join("config.toml"),
            format!("[storage]\ndata_file = \"{abs}\"\n"),
        )
        .unwrap();

        let cfg = HabitdConfig::new(None, Some(tmp.path().to_path_buf()), None, None, None);
        assert!(cfg.data_file.is_absolute());
    }
}
