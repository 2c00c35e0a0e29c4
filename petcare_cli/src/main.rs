use clap::{Parser, Subcommand};
use petcare_core::{Dashboard, FileKv, KvCredentialStore};
use petcare_http::{ClientConfig, PetAction, PetId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "petcare")]
#[command(about = "Look after your virtual pets from the terminal")]
struct Cli {
    /// API base URL (defaults to PETCARE_API_URL, then saved config, then localhost)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Where the signed-in session is kept
    #[arg(long, global = true, env = "PETCARE_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    /// Log every request line
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in
    Register { username: String, password: String },
    /// Sign in
    Login { username: String, password: String },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user and their tier
    Whoami,
    /// List pets (all pets for administrators)
    List {
        /// Only show pets whose name, owner or species contains this
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Population summary
    Stats,
    /// Adopt a new pet
    Create {
        name: String,
        #[arg(default_value = "dog")]
        species: String,
    },
    /// Rename a pet or change its species
    Update {
        id: PetId,
        name: String,
        species: String,
    },
    /// Feed, play with, or put a pet to sleep
    Care { id: PetId, action: PetAction },
    /// Delete a pet
    Delete { id: PetId },
    /// Remember an API URL for later runs
    SetApi { url: String },
}

fn init_tracing(verbose: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default = if verbose {
        "petcare=debug,petcare_core=debug,petcare_http=debug,warn"
    } else {
        "petcare=info,petcare_core=info,petcare_http=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default.into());

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match petcare_common::init_structure() {
        Ok(root) => {
            let file_appender = tracing_appender::rolling::never(root.join("logs"), "petcare.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry().with(filter).with(stderr).init();
            tracing::warn!("File logging disabled: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose);

    let mut config = match &cli.api_url {
        Some(url) => ClientConfig::with_base_url(url),
        None => ClientConfig::default(),
    };
    config.enable_logging = cli.verbose;
    info!("Using API at {}", config.base_url);

    let kv = match cli.session_dir {
        Some(dir) => FileKv::new(dir),
        None => FileKv::default_location(),
    };
    let store = Arc::new(KvCredentialStore::new(kv));
    let dashboard = Dashboard::connect(config, store, Arc::new(commands::TerminalNavigator))?;

    match cli.command {
        Command::Register { username, password } => {
            commands::register(&dashboard, &username, &password).await
        }
        Command::Login { username, password } => {
            commands::login(&dashboard, &username, &password).await
        }
        Command::Logout => {
            dashboard.logout();
            Ok(())
        }
        Command::Whoami => commands::whoami(&dashboard),
        Command::List { search } => commands::list(&dashboard, search.as_deref()).await,
        Command::Stats => commands::stats(&dashboard).await,
        Command::Create { name, species } => commands::create(&dashboard, name, species).await,
        Command::Update { id, name, species } => {
            commands::update(&dashboard, id, name, species).await
        }
        Command::Care { id, action } => commands::care(&dashboard, id, action).await,
        Command::Delete { id } => commands::delete(&dashboard, id).await,
        Command::SetApi { url } => {
            petcare_common::save_api_url(&url)?;
            println!("API URL saved: {}", petcare_common::normalize_base_url(&url));
            Ok(())
        }
    }
}
