//! CLI entrypoint for CustomAI Studio
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use studio_application::{
    ApiKey, AssistantService, ChatOrchestrator, LlmGateway, PromptGenerator, PromptLibrary,
    SecretStore, SessionContext,
};
use studio_domain::ModelCatalog;
use studio_infrastructure::{ConfigLoader, ConfigSecretStore, FileConfig, GroqLlmGateway};
use studio_presentation::{
    ChatRepl, Cli, ConsoleFormatter, ConsoleStreamSink, ProgressReporter, ReplConfig,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_ref())?;

    info!("Starting CustomAI Studio");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;

    if cli.list_models {
        let model = resolve_model(&cli, &config)?;
        println!("{}", ConsoleFormatter::models(model));
        return Ok(());
    }

    // === Dependency Injection ===
    let library: Arc<dyn PromptLibrary> = Arc::new(config.to_prompt_library());
    let secrets: Arc<dyn SecretStore> =
        Arc::new(ConfigSecretStore::from_env(config.api.api_key.clone()));
    let gateway: Arc<dyn LlmGateway> = Arc::new(GroqLlmGateway::new(config.to_groq_settings())?);

    let assistants = AssistantService::new(library.clone());
    let mut ctx = build_session(&cli, &config, &assistants)?;

    if cli.list_assistants {
        if let Some(registry) = ctx.assistants() {
            println!(
                "{}",
                ConsoleFormatter::assistants(registry, ctx.selected_assistant())
            );
        }
        return Ok(());
    }

    if let Some(input) = &cli.generate {
        let generator = PromptGenerator::new(gateway, secrets, library);
        let progress = ProgressReporter::new(!cli.quiet, "Generating prompt...");
        let result = generator.generate(&mut ctx, input).await;
        progress.finish();
        println!("{}", result?);
        return Ok(());
    }

    let chat = ChatOrchestrator::new(gateway.clone(), secrets.clone());

    // Single turn mode
    if let Some(prompt) = &cli.prompt {
        let sink = ConsoleStreamSink::new();
        if let Err(e) = chat.submit(&mut ctx, prompt, &sink).await {
            eprintln!("{}", ConsoleFormatter::chat_error(&e));
            bail!("chat turn failed");
        }
        return Ok(());
    }

    // Interactive mode
    let generator = PromptGenerator::new(gateway, secrets, library);
    let repl_config = ReplConfig {
        show_progress: config.repl.show_progress && !cli.quiet,
        history_file: config.repl.history_file.as_ref().map(PathBuf::from),
    };
    let mut repl = ChatRepl::new(chat, assistants, generator, ctx).with_config(repl_config);
    repl.run().await?;

    Ok(())
}

/// Install the tracing subscriber.
///
/// Verbosity picks the level; `RUST_LOG` is not consulted. With `--log-dir`
/// output goes to a daily rotating file instead of stderr.
fn init_logging(verbose: u8, log_dir: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "customai-studio.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        if let Some(path) = &cli.config
            && !path.exists()
        {
            bail!("Config file not found: {}", path.display());
        }
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// `--model` wins over `[chat] model`.
fn resolve_model(cli: &Cli, config: &FileConfig) -> Result<studio_domain::Model> {
    let model = match &cli.model {
        Some(id) => ModelCatalog::get(id).context("See --list-models for available models")?,
        None => config.chat.parse_model()?,
    };
    Ok(model)
}

/// Build the session from config and flags: key, model, budget, assistant.
fn build_session(
    cli: &Cli,
    config: &FileConfig,
    assistants: &AssistantService,
) -> Result<SessionContext> {
    let mut ctx = SessionContext::new();

    if let Some(key) = cli.api_key.clone().and_then(ApiKey::new) {
        ctx.set_api_key(key);
    }

    ctx.select_model(resolve_model(cli, config)?);
    if let Some(max_tokens) = cli.max_tokens.or(config.chat.max_tokens) {
        let budget = ctx.set_budget(max_tokens);
        if budget.get() != max_tokens {
            warn!(
                "max_tokens {} clamped to {} for {}",
                max_tokens,
                budget,
                ctx.model()
            );
        }
    }

    assistants.ensure_initialized(&mut ctx);
    if let Some(name) = &cli.assistant {
        assistants
            .select(&mut ctx, name)
            .context("See --list-assistants for available assistants")?;
    } else if let Some(name) = &config.chat.assistant
        && let Err(e) = assistants.select(&mut ctx, name)
    {
        warn!("Configured assistant unavailable, using the default: {}", e);
    }

    Ok(ctx)
}
