//! CLI entrypoint for toolflow
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use toolflow_application::{
    ExecuteBatchUseCase, ExecutionProgressNotifier, NoExecutionProgress, RunBatchUseCase,
};
use toolflow_domain::{InvocationRequest, ToolLookup};
use toolflow_infrastructure::{
    ConfigLoader, FileConfig, HttpToolDispatcher, StaticToolRegistry, TracingMetricsSink,
};
use toolflow_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, parse_batch,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting toolflow");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    if let Command::ShowConfig = cli.command {
        println!("Configuration sources (lowest to highest priority):");
        for source in ConfigLoader::config_sources(cli.config.as_deref()) {
            println!("  {}", source);
        }
        return Ok(());
    }

    let issues = config.validate();
    for issue in &issues {
        warn!("Configuration issue: {}", issue);
    }
    if !issues.is_empty() {
        bail!(
            "Configuration is invalid ({} issue(s)); run with -v for details",
            issues.len()
        );
    }

    // === Dependency Injection ===
    let registry = Arc::new(StaticToolRegistry::from_config(&config)?);

    match cli.command {
        Command::Tools => {
            println!("{}", ConsoleFormatter::format_tools(&registry.tools()));
        }
        Command::Plan { batch } => {
            let requests = read_batch(&batch)?;
            let use_case = build_use_case(&config, registry, None, CancellationToken::new())?;
            let order = use_case.plan(&requests)?;
            println!("{}", ConsoleFormatter::format_order(&order));
        }
        Command::Run {
            batch,
            output,
            quiet,
        } => {
            let requests = read_batch(&batch)?;

            let progress: Arc<dyn ExecutionProgressNotifier> =
                if quiet || output == OutputFormat::Json {
                    Arc::new(NoExecutionProgress)
                } else {
                    Arc::new(ProgressReporter::new())
                };

            let token = CancellationToken::new();
            let ctrl_c_token = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling remaining invocations");
                    ctrl_c_token.cancel();
                }
            });

            let use_case = build_use_case(&config, registry, Some(progress), token)?;
            let report = use_case.run(requests).await?;

            let rendered = match output {
                OutputFormat::Text => ConsoleFormatter::format(&report),
                OutputFormat::Json => ConsoleFormatter::format_json(&report),
            };
            println!("{}", rendered);

            if report.has_errors() {
                std::process::exit(1);
            }
        }
        Command::ShowConfig => {}
    }

    Ok(())
}

/// Logs go to stderr unless a log file is given; the guard must outlive main.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let Some(file_name) = path.file_name() else {
        bail!("Log file path has no file name: {}", path.display());
    };
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn read_batch(path: &Path) -> Result<Vec<InvocationRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    parse_batch(&content).with_context(|| format!("Invalid batch file {}", path.display()))
}

fn build_use_case(
    config: &FileConfig,
    registry: Arc<StaticToolRegistry>,
    progress: Option<Arc<dyn ExecutionProgressNotifier>>,
    token: CancellationToken,
) -> Result<RunBatchUseCase<HttpToolDispatcher>> {
    let dispatcher = Arc::new(
        HttpToolDispatcher::new(&config.dispatch).context("Failed to build HTTP client")?,
    );
    let lookup: Arc<dyn ToolLookup> = registry;

    let mut executor = ExecuteBatchUseCase::new(Arc::clone(&lookup), dispatcher, config.retry_policy())
        .with_metrics(Arc::new(TracingMetricsSink))
        .with_cancellation(token);
    if let Some(progress) = progress {
        executor = executor.with_progress(progress);
    }

    Ok(RunBatchUseCase::new(lookup, executor))
}
