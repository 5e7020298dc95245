//! # Document Q&A backend (`docqa`)
//!
//! Maintenance binary for the RAG document question-answering core: ask a
//! question against the indexed corpus, add or remove documents, rebuild the
//! vector index, and manage the admin capability set.
//!
//! ```bash
//! docqa ask "how do I configure retries?"
//! docqa add ./manual.pdf
//! docqa rebuild
//! docqa remove manual.pdf
//! docqa docs
//! docqa admin add 42
//! ```
//!
//! All service configuration comes from the environment (optionally a `.env`
//! file): model profiles via `LLM_*`, `GENERATION_MODEL`, `EMBEDDING_MODEL`;
//! the vector store via `QDRANT_*`; storage roots via `DOCS_DIR`, `INDEX_DIR`,
//! `ADMINS_FILE`.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use llm_service::config::default_config::{config_embedding, config_generation};
use llm_service::{LlmProfiles, telemetry};
use rag_pipeline::{AdminStore, RagPipeline, StorageProfile, config::index_config_from_env, corpus};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, filter, fmt};

#[derive(Parser)]
#[command(
    name = "docqa",
    about = "Question answering over a private document corpus",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question from the indexed corpus.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Copy a source file into the corpus and index it incrementally.
    Add {
        /// Path to the source document (PDF).
        file: PathBuf,
    },

    /// Rebuild the vector index from every document in the corpus.
    Rebuild,

    /// Remove a document from the corpus and bring the index in line.
    Remove {
        /// Document name as shown by `docs`.
        name: String,
    },

    /// List the documents in the corpus.
    Docs,

    /// Manage the admin capability set.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin capability to a user id.
    Add { user_id: i64 },
    /// Revoke the admin capability from a user id.
    Remove { user_id: i64 },
    /// Check whether a user id holds the admin capability.
    Check { user_id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A .env file is optional; real environments set variables directly.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    let profile = StorageProfile::from_env();
    profile.ensure_dirs()?;

    if let Commands::Admin { action } = &cli.command {
        let store = AdminStore::new(profile.admins_file.clone());
        match action {
            AdminAction::Add { user_id } => {
                store.add_admin(*user_id)?;
                println!("admin granted: {user_id}");
            }
            AdminAction::Remove { user_id } => {
                store.remove_admin(*user_id)?;
                println!("admin revoked: {user_id}");
            }
            AdminAction::Check { user_id } => {
                println!("{}", store.is_admin(*user_id));
            }
        }
        return Ok(());
    }

    let svc = Arc::new(LlmProfiles::new(config_generation()?, config_embedding()?)?);
    let index_cfg = index_config_from_env(&profile)?;
    let pipeline = RagPipeline::new(profile.clone(), index_cfg, svc);
    pipeline.load_index().await;

    match cli.command {
        Commands::Ask { question } => {
            let answer = pipeline.query(&question).await?;
            println!("{answer}");
        }
        Commands::Add { file } => {
            let (dest, copied) = corpus::import_document(&profile.docs_dir, &file)?;
            if pipeline.add_document(&dest).await {
                println!("indexed {}", dest.display());
            } else {
                if copied {
                    fs::remove_file(&dest)?;
                }
                return Err("failed to index document".into());
            }
        }
        Commands::Rebuild => {
            if pipeline.rebuild_index().await {
                println!("index rebuilt");
            } else {
                return Err("rebuild failed".into());
            }
        }
        Commands::Remove { name } => {
            if pipeline.remove_document(&name).await {
                println!("removed {name}");
            } else {
                return Err(format!("no such document: {name}").into());
            }
        }
        Commands::Docs => {
            for name in pipeline.list_documents()? {
                println!("{name}");
            }
        }
        Commands::Admin { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Composes the global subscriber: an application-wide fmt layer for
/// everything except `llm_service` targets, plus the library's own scoped
/// layer with its RFC3339 timestamps.
fn init_tracing() {
    let app_layer = fmt::layer().with_target(false).with_filter(filter::filter_fn(
        |meta| !meta.target().starts_with(telemetry::TARGET_PREFIX),
    ));

    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(app_layer)
        .with(telemetry::layer())
        .init();
}
