//! wozsim command line
//!
//! 1. Loads configuration from the environment.
//! 2. Initializes logging.
//! 3. Builds the domain catalog and protocol constants.
//! 4. Runs the requested subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use wozsim::adapters::{
    HttpSuggestionConfig, HttpSuggestionProvider, InMemoryTranscriptStore,
    JsonFileTranscriptStore, QueryReminderObserver, ScriptedAgent,
};
use wozsim::application::handlers::{
    InvokeOperationCommand, InvokeOperationHandler, RunDialogueCommand, RunDialogueHandler,
};
use wozsim::config::{read_override, AppConfig};
use wozsim::domain::catalog::{load_schemas, DomainCatalog};
use wozsim::domain::dialogue::{Participants, RoleTasks};
use wozsim::domain::protocol::ProtocolConstants;
use wozsim::ports::TranscriptStore;

#[derive(Debug, Parser)]
#[command(name = "wozsim", about = "Wizard-of-Oz dialogue simulation engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Call a catalog operation and print the JSON response
    Query {
        /// Operation name or bare domain, e.g. `apartment_search` or `hotel`
        api: String,
        /// Constraint list, e.g. "[{'Level': 'atLeast(3)'}]"
        #[arg(default_value = "")]
        constraints: String,
        /// Fail on missing or invalid parameters instead of recovering
        #[arg(long)]
        strict: bool,
    },
    /// List domains and operations
    Catalog,
    /// Run a scripted session end to end and print its transcript
    Demo {
        /// Write the transcript here instead of the configured directory
        #[arg(long)]
        transcript_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --- 1. Load Configuration ---
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // --- 2. Initialize Logging ---
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.logging.env_filter())
        .with_writer(std::io::stderr);
    if config.logging.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    // --- 3. Build the catalog and constants ---
    let mut rng = match config.knowledge.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let catalog = match read_override(config.knowledge.schema_path.as_deref())? {
        Some(yaml) => {
            let schemas = load_schemas(&yaml)?;
            DomainCatalog::from_schemas(&schemas, config.knowledge.records_per_domain, &mut rng)?
        }
        None => DomainCatalog::standard(config.knowledge.records_per_domain, &mut rng)?,
    };
    let catalog = Arc::new(catalog);
    let constants = match read_override(config.protocol.constants_path.as_deref())? {
        Some(yaml) => ProtocolConstants::from_yaml(&yaml)?,
        None => ProtocolConstants::standard()?,
    };
    let constants = Arc::new(constants);

    // --- 4. Dispatch ---
    match cli.command {
        Command::Query {
            api,
            constraints,
            strict,
        } => {
            let handler = InvokeOperationHandler::new(catalog);
            let response = handler.handle(InvokeOperationCommand {
                api_name: api,
                constraints,
                strict,
                seed: config.knowledge.seed,
            })?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Catalog => {
            for domain in catalog.domains() {
                println!("{}", domain);
            }
            for operation in catalog.operation_names() {
                println!("  {}", operation);
            }
        }
        Command::Demo { transcript_dir } => {
            let store: Arc<dyn TranscriptStore> =
                match transcript_dir.or(config.storage.transcript_dir.clone()) {
                    Some(dir) => Arc::new(JsonFileTranscriptStore::new(dir)),
                    None => Arc::new(InMemoryTranscriptStore::new()),
                };
            let mut handler = RunDialogueHandler::new(catalog, constants, store)
                .with_settings(config.dialogue.settings());
            if let Some(endpoint) = config
                .suggestions
                .endpoint
                .as_ref()
                .filter(|_| config.suggestions.is_enabled())
            {
                let provider = HttpSuggestionProvider::new(
                    HttpSuggestionConfig::new(endpoint.as_str())
                        .with_timeout(config.suggestions.timeout()),
                )?;
                handler = handler.with_suggestions(Arc::new(provider));
            }

            let result = handler.handle(demo_command(config.knowledge.seed)).await?;
            info!(
                session_id = %result.session_id,
                completed = result.termination.is_completed(),
                events = result.transcript.events.len(),
                "demo session finished"
            );
            println!("{}", serde_json::to_string_pretty(&result.transcript)?);
        }
    }

    Ok(())
}

/// A short apartment-hunting exchange between two scripted workers.
fn demo_command(seed: Option<u64>) -> RunDialogueCommand {
    let user = ScriptedAgent::new(
        "demo-user",
        [
            "Hi! I'm looking for an apartment with a balcony.",
            "<complete>",
            "<done> {\"0\": true, \"1\": true, \"2\": true, \"3\": true}",
        ],
    );
    let wizard = ScriptedAgent::new(
        "demo-wizard",
        [
            "? {'constraints': [{'HasBalcony': True}], 'db': 'apartment'}",
            "I found a few apartments with a balcony. Shall I tell you more?",
            "<done> {\"0\": true, \"1\": true, \"2\": true, \"3\": true}",
        ],
    );
    RunDialogueCommand {
        domains: vec!["apartment".to_string()],
        tasks: RoleTasks {
            user: "Find an apartment with a balcony.".to_string(),
            wizard: "Help the user find an apartment using the knowledge base.".to_string(),
        },
        participants: Participants {
            user: Box::new(user),
            wizard: Box::new(wizard),
        },
        observers: vec![Box::new(QueryReminderObserver::new(
            3,
            "Remember to check the knowledge base before answering.",
        ))],
        seed,
    }
}
