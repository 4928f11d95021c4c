// enginetune - Unreal Engine settings manager
// Browse, edit and export Engine.ini settings from a terminal UI.

mod exit_codes;
mod tui;
mod util;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env, Target};

use enginetune_config::settings::default_log_path;
use enginetune_config::AppSettings;
use enginetune_core::HardwareProbe;
use enginetune_io::{SqliteStore, SysinfoProbe};

use exit_codes::{EXIT_ERROR, EXIT_STORAGE, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "enginetune")]
#[command(about = "Interactive manager for Unreal Engine Engine.ini settings")]
#[command(version)]
struct Cli {
    /// Delete the settings database and re-seed it with the defaults
    #[arg(long)]
    recreate: bool,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_STORAGE, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Send log output to `path` so it does not draw over the TUI.
/// `RUST_LOG` wins over the configured level.
fn init_logging(path: &Path, level: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CliError::error(format!("{}: {}", parent.display(), e)))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CliError::error(format!("{}: {}", path.display(), e)))?;

    Builder::from_env(Env::default().default_filter_or(level))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| CliError::error(format!("failed to initialize logging: {}", e)))
}

/// Log a config problem found before the logger existed. Also printed,
/// since the TUI has not taken over the terminal yet.
fn report_config_warning(warning: Option<&str>) {
    if let Some(warning) = warning {
        eprintln!("warning: {}", warning);
        log::warn!("{}", warning);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let (settings, config_warning) = AppSettings::load();
    init_logging(&default_log_path(), &settings.log_level)?;
    log::info!("enginetune {} starting", env!("CARGO_PKG_VERSION"));
    log::debug!("config: {}", AppSettings::config_path_display());
    report_config_warning(config_warning.as_deref());

    let db_path = &settings.database_path;
    let store = if cli.recreate {
        log::info!("recreating settings database");
        SqliteStore::open_fresh(db_path)
    } else {
        SqliteStore::open(db_path)
    }
    .map_err(|e| {
        CliError::storage(format!("{}: {}", db_path.display(), e))
            .with_hint("run with --recreate to rebuild the settings database")
    })?;

    let system = SysinfoProbe::new().probe();

    let app = tui::TuiApp::new(
        store,
        system,
        settings.engine_ini_path.clone(),
        settings.backup_existing,
    );
    tui::run(app).map_err(CliError::error)?;
    log::info!("exiting");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_recreate_flag() {
        assert!(!Cli::try_parse_from(["enginetune"]).unwrap().recreate);
        assert!(Cli::try_parse_from(["enginetune", "--recreate"]).unwrap().recreate);
        let err = Cli::try_parse_from(["enginetune", "--bogus"]).err().unwrap();
        assert_eq!(err.exit_code(), i32::from(exit_codes::EXIT_USAGE));
    }

    #[test]
    fn test_config_warning_reaches_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.json");
        fs::write(&config, r#"{ "log.level": "#).unwrap();

        let (settings, warning) = AppSettings::load_at(&config);
        assert_eq!(settings, AppSettings::default());

        let log_path = dir.path().join("logs").join("enginetune.log");
        init_logging(&log_path, "info").unwrap();
        report_config_warning(warning.as_deref());
        log::logger().flush();

        let text = fs::read_to_string(&log_path).unwrap();
        assert!(text.contains("Error parsing"), "{text}");
        assert!(text.contains("WARN"), "{text}");
    }

    #[test]
    fn test_storage_error_carries_hint() {
        let err = CliError::storage("locked").with_hint("retry");
        assert_eq!(err.code, EXIT_STORAGE);
        assert_eq!(err.hint.as_deref(), Some("retry"));
    }
}
