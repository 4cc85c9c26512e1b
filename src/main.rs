use anyhow::{Context, Result};
use azure_inventory::{config, Inventory, InventoryError, InventoryOptions, TaskOutput};
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Resolve inventory targets from Azure virtual machines
#[derive(Parser, Debug)]
#[command(name = "azure-inventory", version, about, long_about = None)]
struct Args {
    /// Read options from a JSON or YAML file instead of stdin
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// stdout carries the task output, so logs go to stderr or a file.
/// `RUST_LOG`, when set, overrides `--log-level`.
fn setup_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let filter = match (EnvFilter::try_from_default_env(), level.to_tracing_level()) {
        (Ok(filter), _) => filter,
        (Err(_), Some(tracing_level)) => EnvFilter::new(tracing_level.as_str()),
        (Err(_), None) => return Ok(None),
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("azure-inventory started with log level: {:?}", level);

    Ok(Some(guard))
}

fn load_options(params: Option<&Path>) -> Result<InventoryOptions> {
    let Some(path) = params else {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read options from stdin")?;
        return InventoryOptions::from_json(&input).context("Failed to parse options JSON");
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        InventoryOptions::from_yaml(&content).context("Failed to parse options YAML")
    } else {
        InventoryOptions::from_json(&content).context("Failed to parse options JSON")
    }
}

fn usage_error(err: &anyhow::Error) -> TaskOutput {
    TaskOutput::Error {
        error: InventoryError::validation(format!("{:#}", err)).to_task_error(),
    }
}

async fn run(params: Option<&Path>) -> TaskOutput {
    let opts = match load_options(params) {
        Ok(opts) => opts,
        Err(err) => {
            tracing::error!("{:#}", err);
            return usage_error(&err);
        }
    };

    match Inventory::new() {
        Ok(inventory) => inventory.run(&opts, config::process_env).await,
        Err(err) => TaskOutput::Error {
            error: err.to_task_error(),
        },
    }
}

/// Set up logging, then run discovery. Every failure ends up in the output.
async fn execute(args: &Args) -> (TaskOutput, Option<WorkerGuard>) {
    match setup_logging(args.log_level, args.log_file.as_deref()) {
        Ok(guard) => (run(args.params.as_deref()).await, guard),
        Err(err) => (usage_error(&err), None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (output, log_guard) = execute(&args).await;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    // Flush pending log lines before exiting
    drop(log_guard);

    if output.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[tokio::test]
    async fn test_unopenable_log_file_is_reported_as_output() {
        // A directory cannot be opened for appending
        let dir = std::env::temp_dir();
        let args = Args::parse_from([
            OsString::from("azure-inventory"),
            OsString::from("--log-level"),
            OsString::from("info"),
            OsString::from("--log-file"),
            dir.into_os_string(),
        ]);

        let (output, guard) = execute(&args).await;
        assert!(guard.is_none());

        let TaskOutput::Error { error } = output else {
            panic!("expected an error output");
        };
        assert_eq!(error.kind, "bolt.plugin/validation-error");
        assert!(error.msg.starts_with("Failed to open log file"));

        let rendered = serde_json::to_value(TaskOutput::Error { error }).unwrap();
        assert!(rendered.get("_error").is_some());
    }

    #[test]
    fn test_logging_off_ignores_log_file() {
        let dir = std::env::temp_dir();
        if std::env::var_os("RUST_LOG").is_none() {
            let guard = setup_logging(LogLevel::Off, Some(dir.as_path())).unwrap();
            assert!(guard.is_none());
        }
    }
}
