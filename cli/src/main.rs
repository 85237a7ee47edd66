//! CLI entrypoint for vote-ledger
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use ledger_application::{
    AcceptAnswerInput, ContentStore, DynLedgerService, LedgerService, SubmitVoteInput,
    VoteLedger, VoteStatusInput,
};
use ledger_domain::{ItemKind, ItemRef, OutputFormat};
use ledger_infrastructure::{ConfigLoader, DocumentStore, FileConfig, SeedData};
use ledger_presentation::dto::{
    AcceptResponse, ReconcileResponse, TallyResponse, VoteResponse, VoteStatusResponse,
};
use ledger_presentation::{AppState, Cli, Command, ConsoleFormatter, serve, shutdown_signal};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.directory.as_deref())?;

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    if !config.output.use_color(cli.no_color) {
        colored::control::set_override(false);
    }

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_config_issues(&issues));
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }

    let Some(command) = cli.command else {
        bail!("No command given. Run with --help for usage.");
    };

    let format = config.output.resolve_format(cli.output.map(OutputFormat::from));

    info!("Starting vote-ledger");

    // === Dependency Injection ===
    let store = Arc::new(DocumentStore::open(&config.store).await?);
    let ledger: Arc<dyn VoteLedger> = store.clone();
    let content: Arc<dyn ContentStore> = store.clone();
    let service: Arc<DynLedgerService> =
        Arc::new(LedgerService::new(ledger, content, config.ledger_params()));

    let result = run(command, &config, &store, service, format).await;

    if let Err(e) = store.close().await {
        warn!("Failed to close store cleanly: {}", e);
    }
    result
}

async fn run(
    command: Command,
    config: &FileConfig,
    store: &DocumentStore,
    service: Arc<DynLedgerService>,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Command::Serve { listen } => {
            let addr = listen.unwrap_or_else(|| config.server.listen_addr.clone());
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            let shutdown = CancellationToken::new();
            tokio::spawn(shutdown_signal(shutdown.clone()));
            serve(
                listener,
                AppState::new(service),
                config.reconcile.interval(),
                shutdown,
            )
            .await?;
        }

        Command::Vote {
            user_id,
            item_id,
            item_kind,
            value,
        } => {
            let input = SubmitVoteInput::new(user_id, item_id, item_kind, value);
            let (item, _) = input.validate()?;
            let response = VoteResponse::from(service.submit_vote(input).await?);
            emit(format, &response, |r| ConsoleFormatter::format_vote(&item, r));
        }

        Command::Status {
            user_id,
            item_id,
            item_kind,
        } => {
            let item = parse_item(&item_id, &item_kind)?;
            let input = VoteStatusInput::new(user_id, item_id, item_kind);
            let response = VoteStatusResponse::from(service.vote_status(input).await?);
            emit(format, &response, |r| ConsoleFormatter::format_status(&item, r));
        }

        Command::Accept {
            requesting_user_id,
            answer_id,
        } => {
            let input = AcceptAnswerInput::new(requesting_user_id, answer_id);
            let response = AcceptResponse::from(service.accept_answer(input).await?);
            emit(format, &response, ConsoleFormatter::format_accept);
        }

        Command::Reconcile {
            item_id: Some(item_id),
            item_kind: Some(item_kind),
        } => {
            let item = parse_item(&item_id, &item_kind)?;
            service.reconcile_item(&item).await?;
            let response = TallyResponse::new(&item, &service.tally(&item).await?);
            emit(format, &response, ConsoleFormatter::format_tally);
        }

        Command::Reconcile { .. } => {
            let report = service.reconcile().await?;
            let response = ReconcileResponse::from(&report);
            emit(format, &response, ConsoleFormatter::format_reconcile);
        }

        Command::Import { path } => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let seed: SeedData = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            let summary = store.import(seed).await?;
            emit(format, &summary, |s| {
                ConsoleFormatter::format_import(s.questions, s.answers, s.votes)
            });
        }
    }

    Ok(())
}

fn parse_item(item_id: &str, item_kind: &str) -> Result<ItemRef> {
    let kind: ItemKind = item_kind.parse()?;
    Ok(ItemRef::new(item_id, kind))
}

fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce(&T) -> String) {
    let output = match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => ConsoleFormatter::format_json(value),
    };
    println!("{}", output);
}

/// Initialize logging based on verbosity level, unless `RUST_LOG` is set.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// With `[logging].directory` set, a daily-rotated file receives the same
/// events.
fn init_logging(verbose: u8, directory: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(directory) = directory else {
        tracing_subscriber::registry()
            .with(filter())
            .with(console)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, "vote-ledger.log"));

    tracing_subscriber::registry()
        .with(filter())
        .with(console)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
    Ok(Some(guard))
}
