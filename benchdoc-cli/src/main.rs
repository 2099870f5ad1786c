use benchdoc::{BenchdocConfig, BenchdocError, ReadmeUpdater, Result, UpdateSummary};
use clap::{Parser, ValueEnum};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "benchdoc", version)]
#[command(about = "Benchdoc - refresh the README benchmark table from solution timings")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Document to update (default: README.md)
    #[arg(long)]
    document: Option<PathBuf>,
    /// Parse saved benchmark output instead of running the command ("-" for stdin)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Kill the benchmark command after this long (e.g. "10m", "90s")
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,
    /// Print the rendered table instead of writing the document
    #[arg(long)]
    dry_run: bool,
    /// Print a JSON summary instead of progress lines
    #[arg(long)]
    json: bool,
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(e) = run(&cli) {
        tracing::error!(error = %e, "Benchmark table update failed");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    // Logs go to stderr; stdout carries progress lines or the JSON summary.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let updater = ReadmeUpdater::from_config(&config)?.with_progress(!cli.json);

    let summary = match (&cli.input, cli.dry_run) {
        (Some(input), true) => updater.preview(&read_input(input)?),
        (Some(input), false) => updater.update_from_output(&read_input(input)?)?,
        (None, true) => updater.run_dry()?,
        (None, false) => updater.run()?,
    };

    report(&mut std::io::stdout().lock(), cli, &summary)
}

fn load_config(cli: &Cli) -> Result<BenchdocConfig> {
    let mut config = match &cli.config {
        Some(path) => BenchdocConfig::load_from_file(path)?,
        None => BenchdocConfig::default(),
    };

    if let Some(document) = &cli.document {
        config.document.path = document.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.command.timeout = Some(timeout);
    }

    config.validate()?;
    Ok(config)
}

/// Read saved benchmark output from a file, or from stdin for "-"
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return read_output_from(std::io::stdin().lock(), path);
    }

    let file = std::fs::File::open(path).map_err(|source| BenchdocError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    read_output_from(file, path)
}

fn read_output_from<R: Read>(mut reader: R, path: &Path) -> Result<String> {
    let mut output = String::new();
    reader
        .read_to_string(&mut output)
        .map_err(|source| BenchdocError::Document {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(output)
}

fn report<W: Write>(out: &mut W, cli: &Cli, summary: &UpdateSummary) -> Result<()> {
    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
    } else if cli.dry_run {
        writeln!(out, "{}", summary.table)?;
    }
    Ok(())
}
