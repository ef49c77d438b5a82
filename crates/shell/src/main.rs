mod commands;
mod metrics;
mod render;
mod session;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfsync_core::{
    create_auth_provider, load_config, validate_config, AuthProvider, CatalogSearchClient,
    EngineDeps, GoogleBooksClient, GraphqlOwnedBooksStore, LocalSaveCache, OwnedBooksStore,
    ReconciliationEngine, SanitizedConfig, SaveError, SearchOutcome, SqliteSaveCache,
};

use commands::{parse, Command, HELP};
use session::{finish_session, until_interrupted};

/// How long to wait for the saved-id cache write on exit.
const PERSIST_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so they do not interleave with shell output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::env::var("SHELFSYNC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    info!("Configuration loaded: {}", sanitized);

    let auth: Arc<dyn AuthProvider> = Arc::from(
        create_auth_provider(&config.auth, config.store.user_id.clone())
            .context("Failed to create auth provider")?,
    );
    info!("Using auth provider: {}", auth.method_name());

    let catalog: Arc<dyn CatalogSearchClient> = Arc::new(
        GoogleBooksClient::new((&config.catalog).into())
            .context("Failed to create catalog client")?,
    );

    let store: Arc<dyn OwnedBooksStore> = Arc::new(
        GraphqlOwnedBooksStore::new((&config.store).into())
            .context("Failed to create owned-books store")?,
    );
    info!("Owned-books store at {}", config.store.endpoint);

    let cache: Arc<dyn LocalSaveCache> = Arc::new(
        SqliteSaveCache::new(&config.cache.path).context("Failed to open saved-id cache")?,
    );
    info!("Saved-id cache at {:?}", config.cache.path);

    let deps = EngineDeps {
        catalog,
        store,
        cache,
        auth,
    };
    let engine = ReconciliationEngine::new(deps, config.session.clone())
        .with_user_id(config.store.user_id.clone());
    engine.load_session().await;

    println!("{}", engine.result_heading());
    println!("Type 'help' for commands.");

    let outcome = repl(&engine).await;
    finish_session(engine, outcome, PERSIST_TIMEOUT).await
}

async fn repl(engine: &ReconciliationEngine) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let line = match until_interrupted(lines.next_line(), signal::ctrl_c()).await {
            Some(line) => line.context("Failed to read input")?,
            None => None,
        };
        let Some(line) = line else {
            println!();
            return Ok(());
        };

        let command = match parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        metrics::COMMANDS_TOTAL
            .with_label_values(&[command.name()])
            .inc();

        if command == Command::Quit {
            return Ok(());
        }
        if until_interrupted(execute(engine, command), signal::ctrl_c())
            .await
            .is_none()
        {
            println!();
            return Ok(());
        }
    }
}

async fn execute(engine: &ReconciliationEngine, command: Command) {
    match command {
        Command::Search(text) => {
            engine.set_query_input(text);
            match engine.submit_search().await {
                Ok(SearchOutcome::Applied { .. }) => show_page(engine),
                Ok(SearchOutcome::Ignored) => {}
                Ok(SearchOutcome::Superseded { .. }) => println!("A newer search replaced this one"),
                Err(e) => println!("{}", e),
            }
        }
        Command::Page(page) => {
            if page > engine.page_count() {
                println!("No page {} (there are {})", page, engine.page_count());
            } else {
                engine.set_page(page);
                show_page(engine);
            }
        }
        Command::Next => {
            let current = engine.current_page();
            if current < engine.page_count() {
                engine.set_page(current + 1);
            }
            show_page(engine);
        }
        Command::Prev => {
            engine.set_page(engine.current_page().saturating_sub(1));
            show_page(engine);
        }
        Command::Save(position) => {
            let Some(card) = card_at(engine, position) else {
                return;
            };
            match engine.save_result(&card.id).await {
                Ok(book) => println!("Saved '{}'", book.title),
                Err(SaveError::Unauthenticated) => {
                    println!("Please log in to save books (set auth.token)")
                }
                Err(e) => println!("{}", e),
            }
        }
        Command::More(position) => {
            let Some(card) = card_at(engine, position) else {
                return;
            };
            match engine.toggle_description(card.index) {
                Ok(_) => show_page(engine),
                Err(e) => println!("{}", e),
            }
        }
        Command::Owned => println!("{}", render::owned(&engine.owned_books())),
        Command::Stats => match metrics::encode_metrics() {
            Ok(text) => print!("{}", text),
            Err(e) => println!("{:#}", e),
        },
        Command::Help => println!("{}", HELP),
        Command::Quit | Command::Nothing => {}
    }
}

fn card_at(engine: &ReconciliationEngine, position: usize) -> Option<shelfsync_core::ResultView> {
    let card = engine.visible_results().into_iter().nth(position.saturating_sub(1));
    if card.is_none() {
        println!("No card {} on this page", position);
    }
    card
}

fn show_page(engine: &ReconciliationEngine) {
    println!(
        "{}",
        render::page(
            &engine.result_heading(),
            &engine.visible_results(),
            engine.current_page(),
            engine.page_count(),
        )
    );
}
