//! UnaVista converter - CLI tool turning MiFIR transaction report XML into CSV.

use clap::Parser;
use std::io::stderr;
use std::path::PathBuf;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};
use unavista_mifid2::{
    config::ClientConfig, mifid_format::MapperConfig, BatchDriver, BatchPolicy, ClientMode, Error,
    OutputTarget, Result,
};

#[derive(Parser)]
#[command(name = "unavista_xml2csv")]
#[command(about = "Convert MiFIR transaction report XML files into UnaVista CSV", long_about = None)]
struct Cli {
    /// Input XML files, converted in the order given
    #[arg(short, long, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    /// Output CSV file
    #[arg(short, long, conflicts_with = "output_dir", required_unless_present = "output_dir")]
    output: Option<PathBuf>,

    /// Output directory; the file name is derived from the executing entity
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Client configuration table (.csv)
    #[arg(long = "client-config")]
    client_config: Option<PathBuf>,

    /// Client mode (nnip, standard), overrides the configuration table
    #[arg(long = "client-mode")]
    client_mode: Option<String>,

    /// Write a diagnostic per invalid file and go on with the next one
    #[arg(long = "keep-going")]
    keep_going: bool,

    /// Report progress and warnings (default)
    #[arg(long, conflicts_with = "no_warn")]
    warn: bool,

    /// Report errors only
    #[arg(long = "no-warn")]
    no_warn: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level")]
    log_level: Option<String>,
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every input file was converted.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_deref() {
        Some(level) => parse_log_level(level),
        None if cli.no_warn && !cli.warn => LevelFilter::ERROR,
        None => LevelFilter::INFO,
    };
    setup_logging(level);

    let client_mode = resolve_client_mode(&cli)?;
    let target = match (cli.output, cli.output_dir) {
        (Some(file), _) => OutputTarget::File(file),
        (None, Some(dir)) => OutputTarget::Directory(dir),
        (None, None) => return Err(Error::MissingField("--output or --output-dir".to_string())),
    };
    let policy = if cli.keep_going {
        BatchPolicy::Continue
    } else {
        BatchPolicy::FailFast
    };

    let driver = BatchDriver::new(MapperConfig::new(client_mode), policy);
    let summary = driver.run(&cli.input, &target)?;

    Ok(summary.failed_files.is_empty())
}

fn resolve_client_mode(cli: &Cli) -> Result<ClientMode> {
    let config = match cli.client_config {
        Some(ref path) => ClientConfig::from_path(path)?,
        None => ClientConfig::default(),
    };

    let mode = match cli.client_mode {
        Some(ref mode) => mode.parse::<ClientMode>()?,
        None => config.mode(),
    };
    info!(client = config.client(), mode = mode.as_str(), "Client configuration");
    Ok(mode)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    // CSV output may go to a redirected stdout, so logs go to stderr
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(terminal_log).init();
}
