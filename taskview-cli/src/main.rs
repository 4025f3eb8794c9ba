//! taskview - list and create tasks in a remote task store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use taskview_core::config::{ConfigLoader, TaskViewConfig};
use taskview_core::logging;
use taskview_domain::{
    decode_claims, Credential, CredentialSource, DefaultTaskViewService, FileCredentialStore, FilterCriteria,
    HttpTaskStore, Priority, Selection, StaticCredential, Task, TaskDraft, TaskStatus, TaskViewService,
    TaskViewState,
};
use tracing::{debug, warn};

mod render;

const TOKEN_ENV: &str = "TASKVIEW_TOKEN";
const EVENT_CAPACITY: usize = 32;

/// taskview - task list for a remote task store
#[derive(Parser, Debug)]
#[command(name = "taskview")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (replaces the system and user configuration)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the task list
    #[command(alias = "ls")]
    List {
        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Low, Medium, High or All
        #[arg(short, long, default_value = "All")]
        priority: Selection<Priority>,

        /// Pending, "In Progress", Completed or All
        #[arg(long, default_value = "All")]
        status: Selection<TaskStatus>,

        /// Also show outstanding counts for every owner
        #[arg(long)]
        by_owner: bool,

        /// Print the filtered rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a task
    Add {
        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: NaiveDate,

        #[arg(short, long, default_value = "Low")]
        priority: Priority,

        #[arg(long, default_value = "Pending")]
        status: TaskStatus,
    },

    /// Show the identity of the stored credential
    Whoami,

    /// Store a credential for later commands
    Login {
        /// Signed bearer token issued by the store
        #[arg(long)]
        token: String,
    },

    /// Remove the stored credential
    Logout,
}

fn load_config(cli: &Cli) -> Result<TaskViewConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("failed to load configuration")?,
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    Ok(config)
}

/// `TASKVIEW_TOKEN` wins over the credential file.
fn credential_source(config: &TaskViewConfig) -> Arc<dyn CredentialSource> {
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            debug!("Using credential from {}", TOKEN_ENV);
            Arc::new(StaticCredential::new(token))
        }
        _ => match FileCredentialStore::from_config(&config.credentials) {
            Some(store) => Arc::new(store),
            None => Arc::new(StaticCredential::none()),
        },
    }
}

fn file_store(config: &TaskViewConfig) -> Result<FileCredentialStore> {
    FileCredentialStore::from_config(&config.credentials)
        .context("credential file storage is disabled in the configuration ([credentials] file_path)")
}

fn build_service(config: &TaskViewConfig) -> Result<DefaultTaskViewService> {
    let store = HttpTaskStore::new(&config.store).context("failed to build the HTTP client")?;
    Ok(DefaultTaskViewService::new(Arc::new(store), credential_source(config), EVENT_CAPACITY))
}

/// A created task whose follow-up fetch failed still exits non-zero.
fn ensure_refreshed(task: &Task, state: &TaskViewState) -> Result<()> {
    match &state.last_error {
        Some(surfaced) => bail!(
            "task #{} was created, but the task list could not be refreshed: {}",
            task.id,
            surfaced.error
        ),
        None => Ok(()),
    }
}

async fn run(cli: Cli, config: TaskViewConfig) -> Result<()> {
    match cli.command {
        Commands::List { search, priority, status, by_owner, json } => {
            let service = build_service(&config)?;
            service.mount().await?;

            let criteria = FilterCriteria::new().with_search_term(search).with_priority(priority).with_status(status);
            let rows = service.rows(&criteria, Utc::now()).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            print!("{}", render::rows_table(&rows));
            match service.current_identity().await {
                Ok(identity) => {
                    let count = service.outstanding_for(identity.as_ref()).await;
                    println!("{}", render::outstanding_summary(identity.as_ref(), count));
                }
                Err(e) => warn!("Cannot determine the signed-in user: {}", e),
            }
            if by_owner {
                print!("{}", render::owners_table(&service.outstanding_by_owner().await));
            }
        }
        Commands::Add { title, description, due, priority, status } => {
            let service = build_service(&config)?;
            let draft = TaskDraft::new(title, due)
                .with_description(description)
                .with_priority(priority)
                .with_status(status);
            let task = service.submit_task(draft).await?;
            print!("{}", render::task_detail(&task));
            ensure_refreshed(&task, &service.snapshot().await)?;
        }
        Commands::Whoami => {
            let source = credential_source(&config);
            let Some(credential) = source.load_credential().await? else {
                bail!("not signed in; run `taskview login --token <TOKEN>`");
            };
            let claims = decode_claims(&credential)?;
            println!("user {}", claims.subject);
            if let Some(expires_at) = claims.expires_at {
                let note = if claims.is_expired_at(Utc::now()) { " (expired)" } else { "" };
                println!("expires {}{}", expires_at.to_rfc3339(), note);
            }
        }
        Commands::Login { token } => {
            let credential = Credential::new(token.trim());
            if credential.is_blank() {
                bail!("the token must not be empty");
            }
            let claims = decode_claims(&credential).context("the token is not a readable credential")?;
            let store = file_store(&config)?;
            store.store_credential(&credential)?;
            println!("signed in as user {} ({})", claims.subject, store.path().display());
        }
        Commands::Logout => {
            let store = file_store(&config)?;
            if store.clear_credential()? {
                println!("signed out");
            } else {
                println!("no stored credential");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            logging::init_minimal_logging();
            return Err(e);
        }
    };
    if let Err(e) = logging::initialize_logging(&config.logging) {
        logging::init_minimal_logging();
        warn!("Falling back to minimal logging: {}", e);
    }
    debug!(base_url = %config.store.base_url, "Configuration loaded");

    run(cli, config).await
}
