//! CLI entrypoint for llm-ensemble
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use ensemble_application::{
    ConfigResolver, NoProgress, ProgressNotifier, RunEnsembleError, RunEnsembleInput,
    RunEnsembleUseCase,
};
use ensemble_domain::TaskInfo;
use ensemble_infrastructure::{
    BackendRegistry, ConfigLoader, FileConfig, FileConfigResolver, HttpBackendFactory,
};
use ensemble_presentation::{Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting llm-ensemble");

    // === Configuration ===
    let config: Arc<FileConfig> = if cli.no_config {
        ConfigLoader::install(ConfigLoader::load_defaults())
    } else {
        ConfigLoader::shared(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    for issue in config.ensure_valid()? {
        warn!("{}", issue.message);
    }

    let resolver = Arc::new(FileConfigResolver::new(Arc::clone(&config)));

    let Some(command) = cli.command else {
        bail!("No command given. Try: llm-ensemble solve --task qa \"Your question\"");
    };

    match command {
        Command::Tasks => {
            let tasks: Vec<TaskInfo> = resolver
                .list_tasks()
                .into_iter()
                .map(TaskInfo::describe)
                .collect();
            print!("{}", ConsoleFormatter::format_tasks(&tasks));
        }
        Command::Solve {
            task,
            prompt,
            no_review,
            output,
        } => {
            // === Dependency Injection ===
            let factory = HttpBackendFactory::new(config.inference.clone())
                .context("Failed to set up inference client")?;
            let gateway = Arc::new(BackendRegistry::new(Arc::new(factory)));
            let use_case = RunEnsembleUseCase::new(gateway, resolver, config.to_params());

            // Ctrl-C cancels in-flight backend calls
            let cancellation = CancellationToken::new();
            let signal_token = cancellation.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted; cancelling ensemble run");
                    signal_token.cancel();
                }
            });

            let mut input = RunEnsembleInput::new(task, prompt).with_cancellation(cancellation);
            if no_review {
                input = input.without_review();
            }

            let progress: Box<dyn ProgressNotifier> = if cli.quiet {
                Box::new(NoProgress)
            } else {
                Box::new(ProgressReporter::new())
            };

            let result = match use_case
                .execute_with_progress(input, progress.as_ref())
                .await
            {
                Ok(result) => result,
                Err(RunEnsembleError::Cancelled { candidates }) => {
                    if !cli.quiet {
                        eprintln!("{}", ConsoleFormatter::format_interrupted(&candidates).trim_end());
                    }
                    bail!("Cancelled after collecting {} drafts", candidates.len());
                }
                Err(e) => return Err(e.into()),
            };

            let rendered = match output {
                OutputFormat::Answer => ConsoleFormatter::format_answer_only(&result),
                OutputFormat::Full => ConsoleFormatter::format(&result),
                OutputFormat::Json => ConsoleFormatter::format_json(&result),
            };
            println!("{}", rendered.trim_end());
        }
    }

    Ok(())
}
