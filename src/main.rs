use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use postwatch::application::{EntityRegistry, NotificationDispatcher, SyncEngine, SyncScheduler};
use postwatch::domain::ports::{ContentFetcherPort, LocalStorePort};
use postwatch::domain::{Credential, Settings};
use postwatch::infrastructure::{
    AppConfig, CliArgs, Command, ConfigManager, DesktopNotificationService, FileStore,
    HttpContentFetcher, SystemClock, WebhookClient,
};

const CREDENTIAL_ENV: &str = "POSTWATCH_CREDENTIAL";

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match ConfigManager::new() {
        Ok(manager) => manager.load_config(args.config.as_deref())?,
        Err(e) => match &args.config {
            Some(path) => ConfigManager::with_dir(PathBuf::new()).load_config(Some(path))?,
            None => {
                eprintln!("{e}, using default configuration");
                AppConfig::default()
            }
        },
    };
    config.merge_with_args(args);
    Ok(config)
}

fn open_store(config: &AppConfig) -> Result<Arc<FileStore>> {
    let store = match config.data_dir.clone() {
        Some(dir) => FileStore::with_dir(dir),
        None => FileStore::new()?,
    };
    Ok(Arc::new(store))
}

/// Seeds the stored credential from the environment when none is stored.
fn seed_credential(store: &dyn LocalStorePort) -> Result<()> {
    let settings = store.settings()?;
    if settings.credential.is_some() {
        return Ok(());
    }

    if let Some(credential) = std::env::var(CREDENTIAL_ENV).ok().and_then(Credential::new) {
        info!(credential = %credential, "Seeding credential from environment");
        store.save_settings(&settings.with_credential(Some(credential)))?;
    }
    Ok(())
}

fn require_credential(settings: &Settings) -> Result<Credential> {
    settings
        .credential
        .clone()
        .ok_or_else(|| eyre!("no credential configured; set {CREDENTIAL_ENV}"))
}

async fn run_daemon(engine: Arc<SyncEngine>, refresh_now: bool) -> Result<()> {
    let scheduler = SyncScheduler::new(engine);
    let _subscription = scheduler
        .engine()
        .subscribers()
        .subscribe_fn(|| info!("Local store updated"));

    scheduler.start();
    if refresh_now {
        scheduler.force_refresh().await;
    }

    info!("Polling started, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    scheduler.stop();
    info!("Polling stopped");
    Ok(())
}

async fn track(
    store: Arc<FileStore>,
    fetcher: &dyn ContentFetcherPort,
    settings: &Settings,
    id: &str,
) -> Result<()> {
    let credential = require_credential(settings)?;
    let entity = fetcher
        .fetch_entity(id, &credential)
        .await?
        .ok_or_else(|| eyre!("entity {id} not found upstream"))?;

    let name = entity.display_name.clone();
    if EntityRegistry::new(store).add(entity)? {
        println!("Tracking {name} ({id})");
    } else {
        println!("{name} ({id}) is already tracked");
    }
    Ok(())
}

async fn search(fetcher: &dyn ContentFetcherPort, settings: &Settings, keyword: &str) -> Result<()> {
    let credential = require_credential(settings)?;
    let results = fetcher.search_entities(keyword, &credential).await?;

    if results.is_empty() {
        println!("No entities match \"{keyword}\"");
    }
    for entity in results {
        println!("{}\t{}", entity.id, entity.display_name);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = postwatch::VERSION, "Starting {}", postwatch::NAME);

    let store = open_store(&config)?;
    seed_credential(store.as_ref())?;

    let fetcher = Arc::new(HttpContentFetcher::with_base_url(config.api_base_url.clone())?);
    let dispatcher = NotificationDispatcher::new(
        Arc::new(DesktopNotificationService::new()),
        Arc::new(WebhookClient::new()?),
    );
    let engine = Arc::new(SyncEngine::new(
        fetcher.clone(),
        store.clone(),
        dispatcher,
        Arc::new(SystemClock),
    ));

    match args.command() {
        Command::Run { refresh_now } => run_daemon(engine, refresh_now).await?,
        Command::Refresh => {
            for outcome in [engine.run_post_sync().await, engine.run_comment_sync().await] {
                match outcome.report() {
                    Some(report) => {
                        println!(
                            "{}: {} new, {} failed",
                            report.cycle,
                            report.deltas.len(),
                            report.failures
                        );
                        if report.needs_attention {
                            println!("Credential rejected upstream; update it in the config file");
                        }
                    }
                    None => warn!(?outcome, "Cycle skipped"),
                }
            }
        }
        Command::Track { id } => {
            track(store, fetcher.as_ref(), &engine.current_settings(), &id).await?;
        }
        Command::Untrack { id } => {
            if EntityRegistry::new(store).remove(&id)? {
                println!("Stopped tracking {id}");
            } else {
                println!("{id} is not tracked");
            }
        }
        Command::List => {
            for entity in EntityRegistry::new(store).list()? {
                println!("{}\t{}", entity.id, entity.display_name);
            }
        }
        Command::Search { keyword } => {
            search(fetcher.as_ref(), &engine.current_settings(), &keyword).await?;
        }
        Command::MarkRead { id } => {
            if engine.read_tracker().mark_read_in_cache(&id)? {
                println!("Marked {id} read");
            } else {
                println!("{id} was already read");
            }
        }
    }

    Ok(())
}
