//! CLI entrypoint for docquorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use docquorum_application::{RunBenchmarkInput, RunBenchmarkUseCase};
use docquorum_domain::{DatasetKind, EndpointKind};
use docquorum_infrastructure::{
    ConfigLoader, FileConfig, JsonDatasetLoader, JsonResultStore, OpenAiCompatibleEndpoint,
    prepare_run_log,
};
use docquorum_presentation::{
    Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Command-line flags win over every config source
fn apply_cli_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(model) = &cli.model {
        config.endpoint.kind = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.endpoint.base_url = Some(base_url.clone());
    }
    if let Some(api_key) = &cli.api_key {
        config.endpoint.api_key = Some(api_key.clone());
    }
    if let Some(dataset) = &cli.dataset {
        config.run.dataset = dataset.clone();
    }
    if let Some(n) = cli.sample_num {
        config.run.sample_num = n;
    }
    if let Some(n) = cli.agent_num {
        config.council.agent_count = n;
    }
    if let Some(n) = cli.repetition_num {
        config.run.repetition_num = n;
    }
    if let Some(n) = cli.max_concurrency {
        config.council.max_concurrency = n;
    }
}

/// Route all tracing output to this run's log file
fn init_logging(
    cli: &Cli,
    config: &FileConfig,
    kind: EndpointKind,
    dataset: DatasetKind,
) -> Result<WorkerGuard> {
    let path = prepare_run_log(
        &config.run.logs_dir,
        kind.as_str(),
        dataset.as_str(),
        chrono::Local::now(),
    )
    .with_context(|| format!("Failed to create log directory {}", config.run.logs_dir.display()))?;
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    // HTTP client internals stay at warn regardless of verbosity
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace", // -vv or more
    };
    let filter = EnvFilter::new(format!("{level},reqwest=warn,hyper=warn,hyper_util=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&cli, &mut config);
    config.validate()?;

    let kind = config.endpoint.endpoint_kind()?;
    let dataset = config.run.dataset_kind()?;
    let profile = config.endpoint.profile()?;
    let _guard = init_logging(&cli, &config, kind, dataset)?;

    info!(
        "Starting docquorum: endpoint={} model={} dataset={} agents={} samples={} repetitions={}",
        kind,
        profile.model,
        dataset,
        config.council.agent_count,
        config.run.sample_num,
        config.run.repetition_num
    );

    // === Dependency Injection ===
    let endpoint = Arc::new(OpenAiCompatibleEndpoint::new(
        profile,
        config.endpoint.resolve_api_key(),
        config.endpoint.timeout(),
    )?);
    let loader = Arc::new(JsonDatasetLoader::new(dataset, &config.run.dataset_dir));
    let store = Arc::new(JsonResultStore::new(
        &config.run.results_dir,
        kind.as_str(),
        dataset.as_str(),
    ));

    let use_case = RunBenchmarkUseCase::new(endpoint, loader, store, config.council_params());
    let input = RunBenchmarkInput::new(config.run.sample_num, config.council.agent_count)
        .with_repetitions(config.run.repetition_num);

    let summaries = if cli.quiet {
        use_case.execute_with_progress(input, &SimpleProgress).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    let output = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format(&summaries),
        OutputFormat::Json => ConsoleFormatter::format_json(&summaries),
    };
    println!("{}", output);

    Ok(())
}
