//! Command-line driver over `placenote_core`.
//!
//! # Responsibility
//! - Exercise the save/list/trigger pipeline against a local SQLite file.
//! - Stand in for the mobile UI and location service during manual checks.

use clap::{Parser, Subcommand};
use log::info;
use placenote_core::{
    core_version, init_logging_from_config, trigger_channel, CoreConfig, GeofenceManager,
    ListPhase, LocalReminderRepository, ReminderDraft, ReminderRepository,
    RemindersListController, SaveReminderController, SaveSignal, SimulatedLocationPlatform,
    SqliteReminderStore, Transition, TriggerDispatcher,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;

type Repo = LocalReminderRepository<SqliteReminderStore>;

#[derive(Parser)]
#[command(name = "placenote", about = "Location reminders", version)]
struct Cli {
    /// SQLite database file; overrides `db_path` from the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save a reminder and register its geofence.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        location: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        description: Option<String>,
    },
    /// List saved reminders.
    List,
    /// Show one reminder.
    Show { id: String },
    /// Delete every reminder.
    Clear,
    /// Register a reminder's geofence and simulate entering it.
    SimulateEnter { id: String },
    /// Print the core version.
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            CoreConfig::from_toml_str(&text).map_err(|err| err.to_string())?
        }
        None => CoreConfig::default(),
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging_from_config(&config)?;

    if let Command::Version = cli.command {
        println!("placenote_core version={}", core_version());
        return Ok(());
    }

    let store = SqliteReminderStore::open(&config.db_path).map_err(|err| err.to_string())?;
    let repo = Arc::new(LocalReminderRepository::new(Arc::new(store)));

    match cli.command {
        Command::Add {
            title,
            location,
            lat,
            lon,
            description,
        } => {
            let draft = ReminderDraft {
                id: None,
                title: Some(title),
                description,
                location: Some(location),
                latitude: Some(lat),
                longitude: Some(lon),
            };
            add(repo, &config, draft).await
        }
        Command::List => list(repo).await,
        Command::Show { id } => {
            let record = repo.get_by_id(&id).await.map_err(|err| err.message())?;
            println!("{record:#?}");
            Ok(())
        }
        Command::Clear => {
            repo.delete_all().await.map_err(|err| err.message())?;
            println!("cleared");
            Ok(())
        }
        Command::SimulateEnter { id } => simulate_enter(repo, &config, id).await,
        Command::Version => Ok(()),
    }
}

async fn add(repo: Arc<Repo>, config: &CoreConfig, draft: ReminderDraft) -> Result<(), String> {
    let platform = Arc::new(SimulatedLocationPlatform::new());
    let geofences = Arc::new(GeofenceManager::new(platform, config.geofence.clone()));
    let (controller, mut signals) = SaveReminderController::new(repo, geofences);

    let saved = controller.save_and_register(draft).await;
    drop(controller);

    let mut failure = None;
    while let Some(signal) = signals.recv().await {
        match signal {
            SaveSignal::Toast(message) => println!("{message}"),
            SaveSignal::Snackbar(err) => failure = Some(err.to_string()),
            SaveSignal::Error(message) => failure = Some(message),
            SaveSignal::NavigateBack => {}
        }
    }

    match (saved, failure) {
        (Some(record), None) => {
            println!("id={}", record.id);
            Ok(())
        }
        (_, Some(message)) => Err(message),
        (None, None) => Err("reminder was not saved".to_string()),
    }
}

async fn list(repo: Arc<Repo>) -> Result<(), String> {
    let controller = RemindersListController::new(repo);
    controller.load().await;

    match controller.phase.get() {
        ListPhase::Failed { message } => Err(message),
        _ if controller.show_no_data.get() => {
            println!("No Data");
            Ok(())
        }
        _ => {
            for item in controller.reminders.get() {
                println!(
                    "{}\t{}\t{}\t{},{}",
                    item.id, item.title, item.location, item.latitude, item.longitude
                );
            }
            Ok(())
        }
    }
}

async fn simulate_enter(repo: Arc<Repo>, config: &CoreConfig, id: String) -> Result<(), String> {
    let record = repo.get_by_id(&id).await.map_err(|err| err.message())?;

    let (trigger_tx, trigger_rx) = trigger_channel();
    let (presenter_tx, mut presenter_rx) = mpsc::unbounded_channel();
    let platform = Arc::new(SimulatedLocationPlatform::with_trigger_sender(trigger_tx));
    let manager = GeofenceManager::new(Arc::clone(&platform), config.geofence.clone());
    manager
        .register_geofence(&record)
        .await
        .map_err(|err| err.to_string())?;

    let dispatcher =
        TriggerDispatcher::new(Arc::clone(&repo), manager.registry(), trigger_rx, presenter_tx)
            .spawn();
    if !platform.fire(&record.id, Transition::Enter) {
        return Err(format!("geofence for {} did not fire", record.id));
    }
    drop(manager);
    drop(platform);

    while let Some(triggered) = presenter_rx.recv().await {
        info!(
            "event=cli_trigger module=cli status=ok reminder_id={}",
            triggered.id
        );
        match triggered.reminder {
            Some(reminder) => println!(
                "entered {} -> {} ({})",
                reminder.location, reminder.title, triggered.id
            ),
            None => println!("entered geofence {}", triggered.id),
        }
    }
    dispatcher.await.map_err(|err| err.to_string())
}
