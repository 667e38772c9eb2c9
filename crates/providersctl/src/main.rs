// # providersctl - provider registry CLI
//
// This binary is a THIN caller of providers-core:
// - It reads store configuration from environment variables
// - It parses one sub-command and an actor id
// - It maps domain outcomes (validation, conflict, not found) to exit codes
//
// No normalization, validation or uniqueness logic lives here.
//
// ## Configuration
//
// ### Store
// - `PROVIDERS_STORE_TYPE`: Type of store (file, memory)
// - `PROVIDERS_STORE_PATH`: Path to the store file (for file store)
//
// ### Caller
// - `PROVIDERS_ACTOR_ID`: Actor id recorded on mutations (or `--actor`)
//
// ### Logging
// - `PROVIDERS_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export PROVIDERS_STORE_TYPE=file
// export PROVIDERS_STORE_PATH=/var/lib/providers/providers.json
//
// providersctl --actor 7 register "Ana Maria" Lopez 5551234 --email ana@example.com
// providersctl list
// providersctl --actor 9 delete 1
// ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use providers_core::{
    ActorId, Error, ProviderDraft, ProviderId, ProviderService, ProviderStore, ProvidersConfig,
    StoreConfig, StoreRegistry,
};
use serde_json::json;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible outcomes of one invocation
#[derive(Debug, Clone, Copy)]
enum CtlExitCode {
    /// The operation succeeded
    Success = 0,
    /// Configuration or startup failure
    ConfigError = 1,
    /// Store or other infrastructure failure
    RuntimeError = 2,
    /// Input failed validation
    Invalid = 3,
    /// Email or phone already used by another active provider
    Conflict = 4,
    /// No active provider with the given id
    NotFound = 5,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Manage provider records
#[derive(Parser, Debug)]
#[command(name = "providersctl", version, about)]
struct Cli {
    /// Actor id recorded on mutations; absent or non-numeric means 0
    #[arg(long, global = true, env = "PROVIDERS_ACTOR_ID")]
    actor: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new provider
    Register {
        first_name: String,
        last_name: String,
        phone: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Replace the fields of an active provider
    Update {
        id: ProviderId,
        first_name: String,
        last_name: String,
        phone: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Show one active provider
    Get { id: ProviderId },
    /// List active providers
    List,
    /// Soft-delete an active provider
    Delete { id: ProviderId },
}

/// Load configuration from environment variables
fn config_from_env() -> Result<ProvidersConfig> {
    load_config(|key| env::var(key).ok())
}

/// Build and validate a `ProvidersConfig` from a variable lookup
fn load_config(lookup: impl Fn(&str) -> Option<String>) -> Result<ProvidersConfig> {
    let store_type = lookup("PROVIDERS_STORE_TYPE").unwrap_or_else(|| "file".to_string());
    let store = match store_type.as_str() {
        "file" => match lookup("PROVIDERS_STORE_PATH") {
            Some(path) if !path.trim().is_empty() => StoreConfig::File { path },
            _ => anyhow::bail!(
                "PROVIDERS_STORE_PATH is required when PROVIDERS_STORE_TYPE=file. \
                Set it via: export PROVIDERS_STORE_PATH=/var/lib/providers/providers.json"
            ),
        },
        "memory" => StoreConfig::Memory,
        other => anyhow::bail!(
            "PROVIDERS_STORE_TYPE '{}' is not supported. \
            Supported types: file, memory",
            other
        ),
    };

    let mut config = ProvidersConfig::new(store);
    if let Some(level) = lookup("PROVIDERS_LOG_LEVEL") {
        config.log_level = level;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr so stdout stays machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.level().unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::RuntimeError.into();
        }
    };

    let actor = ActorId::parse_or_default(cli.actor.as_deref());
    let outcome = rt.block_on(run(&config, cli.command, actor));

    match outcome {
        Ok(()) => CtlExitCode::Success.into(),
        Err(e) => report(e).into(),
    }
}

/// Execute one sub-command against the configured store
async fn run(config: &ProvidersConfig, command: Command, actor: ActorId) -> Result<(), Error> {
    if config.store == StoreConfig::Memory {
        warn!("Memory store selected; records will not outlive this process");
    }

    let registry = StoreRegistry::with_builtin();
    let store: Arc<dyn ProviderStore> = Arc::from(registry.create_store(&config.store).await?);
    let service = ProviderService::new(store);

    match command {
        Command::Register {
            first_name,
            last_name,
            phone,
            email,
        } => {
            let draft = ProviderDraft {
                first_name,
                last_name,
                email,
                phone: Some(phone),
            };
            let created = service.register(draft, actor).await?;
            print_json(&created)?;
        }
        Command::Update {
            id,
            first_name,
            last_name,
            phone,
            email,
        } => {
            let draft = ProviderDraft {
                first_name,
                last_name,
                email,
                phone: Some(phone),
            };
            service.update(id, draft, actor).await?;
        }
        Command::Get { id } => {
            let provider = service.get_by_id(id).await?.ok_or(Error::NotFound(id))?;
            print_json(&provider)?;
        }
        Command::List => {
            print_json(&service.list().await?)?;
        }
        Command::Delete { id } => {
            service.soft_delete(id, actor).await?;
        }
    }

    info!("Done");
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a failed outcome and pick its exit code
///
/// Domain errors are written to stdout as JSON for the calling script;
/// infrastructure errors are logged.
fn report(err: Error) -> CtlExitCode {
    let (code, body) = match &err {
        Error::Validation(errors) => (
            CtlExitCode::Invalid,
            json!({ "message": "Provider validation failed", "errors": errors.to_map() }),
        ),
        Error::Conflict { field } => (
            CtlExitCode::Conflict,
            json!({ "error": err.to_string(), "field": field }),
        ),
        Error::NotFound(_) => (CtlExitCode::NotFound, json!({ "error": err.to_string() })),
        _ => {
            error!("{}", err);
            return CtlExitCode::RuntimeError;
        }
    };

    println!("{}", body);
    code
}
