use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use cpuorb::{app::App, config::Settings, error, simple, util::units, CpuOrbError, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Parallel CPU benchmark with a comparison chart
#[derive(Debug, Parser)]
#[command(name = "cpuorb", version, about)]
struct Args {
    /// Skip the TUI and print the result to stdout
    #[arg(long)]
    plain: bool,

    /// Print the result as JSON (implies --plain)
    #[arg(long)]
    json: bool,

    /// Settings file to use instead of the standard location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Iterations per workload unit
    #[arg(long, value_name = "N")]
    workload_size: Option<u64>,

    /// Duration the reference machine takes, e.g. 2s or 1500ms
    #[arg(long, value_name = "DUR", value_parser = units::parse_duration)]
    reference_duration: Option<Duration>,

    /// Score awarded for matching the reference duration
    #[arg(long, value_name = "N")]
    reference_score: Option<u64>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,
}

impl Args {
    fn plain_mode(&self) -> bool {
        self.plain || self.json
    }

    fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(size) = self.workload_size {
            settings.benchmark = settings.benchmark.with_workload_size(size);
        }
        if let Some(duration) = self.reference_duration {
            settings.benchmark = settings.benchmark.with_reference_duration(duration);
        }
        if let Some(score) = self.reference_score {
            settings.benchmark = settings.benchmark.with_reference_score(score);
        }
        settings
    }
}

/// Log to stderr in plain mode, otherwise to a file so the TUI stays intact
fn init_logging(plain: bool) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if plain {
        let _ = builder.with_writer(std::io::stderr).try_init();
        return Ok(None);
    }

    let log_dir = dirs::cache_dir()
        .ok_or_else(|| CpuOrbError::ConfigError("Unable to determine cache directory".to_string()))?
        .join(cpuorb::APP_NAME);
    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join(cpuorb::LOG_FILE);
    let file = File::options().create(true).append(true).open(&log_path)?;

    let _ = builder
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(Some(log_path))
}

async fn run(args: Args) -> Result<()> {
    let log_path = init_logging(args.plain_mode())?;
    if let Some(path) = &log_path {
        tracing::debug!(path = %path.display(), "logging to file");
    }

    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let settings = args.apply_overrides(settings);
    settings.validate()?;

    if args.save_config {
        match &args.config {
            Some(path) => {
                settings.save_to(path)?;
                tracing::info!(path = %path.display(), "saved settings");
            }
            None => {
                let path = settings.save()?;
                tracing::info!(path = %path.display(), "saved settings");
            }
        }
    }

    if args.plain_mode() {
        simple::run_plain(&settings, args.json).await?;
        return Ok(());
    }

    let mut app = App::new(settings)?;
    app.init()?;
    app.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(err) = run(args).await {
        tracing::error!(error = %err, "cpuorb exited with an error");
        eprintln!("{}", error::user_friendly_message(&err));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_implies_plain() {
        let args = Args::parse_from(["cpuorb", "--json"]);
        assert!(args.plain_mode());
        assert!(!Args::parse_from(["cpuorb"]).plain_mode());
    }

    #[test]
    fn test_overrides_replace_loaded_values() {
        let args = Args::parse_from([
            "cpuorb",
            "--workload-size",
            "5000",
            "--reference-duration",
            "1500ms",
            "--reference-score",
            "1000",
        ]);
        let settings = args.apply_overrides(Settings::default());

        assert_eq!(settings.benchmark.workload_size, 5_000);
        assert_eq!(settings.benchmark.reference_duration, Duration::from_millis(1500));
        assert_eq!(settings.benchmark.reference_score, 1_000);
    }

    #[test]
    fn test_reference_duration_accepts_bare_seconds() {
        let args = Args::parse_from(["cpuorb", "--reference-duration", "2.5"]);
        assert_eq!(args.reference_duration, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        assert!(Args::try_parse_from(["cpuorb", "--reference-duration", "soon"]).is_err());
        assert!(Args::try_parse_from(["cpuorb", "--reference-duration", "1e20"]).is_err());
    }
}
