//! `pocketforge` — forge runnable project scaffolds from source fragments.
//!
//! `forge` ingests zips, loose files, and inline snippets, runs the
//! canonicalize/generate pipeline, and exports the artifact set as a zip.
//! `history` inspects and re-exports archived sessions.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use pocketforge_core::canonical::RuntimeTarget;
use pocketforge_core::session::Session;
use pocketforge_core::source::SourceFile;
use pocketforge_engine::archive;
use pocketforge_engine::forge::ForgeEngine;
use pocketforge_engine::history::HistoryStore;
use pocketforge_engine::ingest;
use pocketforge_llm::gemini::GeminiConfig;
use pocketforge_llm::GeminiReasoner;
use pocketforge_settings::get_settings;

#[derive(Debug, Parser)]
#[command(
    name = "pocketforge",
    about = "Forge runnable project scaffolds from source fragments"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest inputs, run the pipeline, and export the result.
    Forge(ForgeArgs),
    /// Inspect archived sessions.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Debug, Args)]
struct ForgeArgs {
    /// Input files: `.zip` archives are unpacked, everything else is
    /// ingested as a loose text file.
    inputs: Vec<PathBuf>,

    /// Target runtime: `python-fastapi`, `bun-http`, or `node-express`.
    #[arg(long)]
    runtime: RuntimeTarget,

    /// Session name (also seeds the export file name).
    #[arg(long, default_value = "untitled session")]
    name: String,

    /// Free-text instructions forwarded to both pipeline stages.
    #[arg(long)]
    instructions: Option<String>,

    /// Inline snippet, `NAME=TEXT`. Repeatable.
    #[arg(long = "snippet", value_name = "NAME=TEXT")]
    snippets: Vec<String>,

    /// Output zip path (defaults to a name derived from the session name).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum HistoryCommand {
    /// List archived sessions, newest first.
    List,
    /// Show one archived session's plan and artifacts.
    Show {
        /// Session ID (`sess_…`).
        id: String,
    },
    /// Re-export one archived session as a zip.
    Export {
        /// Session ID (`sess_…`).
        id: String,
        /// Output zip path.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Forge(args) => run_forge(args).await,
        Command::History { command } => match command {
            HistoryCommand::List => history_list(),
            HistoryCommand::Show { id } => history_show(&id),
            HistoryCommand::Export { id, out } => history_export(&id, out),
        },
    }
}

/// Resolve the data directory from settings.
fn data_dir() -> PathBuf {
    let settings = get_settings();
    settings
        .storage
        .data_dir
        .as_deref()
        .map_or_else(pocketforge_settings::default_data_dir, PathBuf::from)
}

fn open_history() -> Result<HistoryStore> {
    let dir = data_dir();
    HistoryStore::open_in_dir(&dir)
        .with_context(|| format!("open history in {}", dir.display()))
}

/// Parse one `--snippet NAME=TEXT` argument.
fn parse_snippet(raw: &str) -> Result<SourceFile> {
    let Some((name, text)) = raw.split_once('=') else {
        bail!("snippet '{raw}' is not NAME=TEXT");
    };
    if name.is_empty() {
        bail!("snippet '{raw}' has an empty name");
    }
    if text.is_empty() {
        bail!("snippet '{name}' has no content");
    }
    Ok(ingest::ingest_snippet(name, text))
}

/// Ingest one input path: zip archives unpack, everything else is a
/// loose text file named by its final component.
fn ingest_input(path: &Path) -> Result<Vec<SourceFile>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read input {}", path.display()))?;
    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        Ok(ingest::ingest_archive(&bytes)?)
    } else {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("input {} has no usable file name", path.display()))?;
        Ok(vec![ingest::ingest_file(name, &bytes)?])
    }
}

async fn run_forge(args: ForgeArgs) -> Result<()> {
    let settings = get_settings();
    let api_key = settings
        .reasoner
        .api_key
        .clone()
        .context("no API key configured; set POCKETFORGE_API_KEY or GEMINI_API_KEY")?;

    let config = GeminiConfig {
        model: settings.reasoner.model.clone(),
        api_key,
        base_url: settings.reasoner.base_url.clone(),
        canonicalize_max_output_tokens: settings.reasoner.canonicalize_max_output_tokens,
        generate_max_output_tokens: settings.reasoner.generate_max_output_tokens,
        thinking_budget: settings.reasoner.thinking_budget,
    };
    let reasoner = GeminiReasoner::new(config);
    let mut engine = ForgeEngine::new(reasoner, open_history()?, settings.digest.per_file_char_cap);

    let _ = engine.new_session(&args.name)?;
    let mut sources = Vec::new();
    for path in &args.inputs {
        sources.extend(ingest_input(path)?);
    }
    for raw in &args.snippets {
        sources.push(parse_snippet(raw)?);
    }
    if sources.is_empty() {
        bail!("no inputs: pass files, archives, or --snippet NAME=TEXT");
    }
    engine.add_sources(sources)?;

    let session = engine.forge(args.runtime, args.instructions.clone()).await?;
    print_plan_summary(session);

    let (derived_name, bytes) = engine.export()?;
    let out = args.out.unwrap_or_else(|| PathBuf::from(derived_name));
    std::fs::write(&out, bytes).with_context(|| format!("write {}", out.display()))?;
    println!("exported {}", out.display());
    Ok(())
}

fn print_plan_summary(session: &Session) {
    if let Some(canonical) = &session.canonical {
        println!(
            "{}: {} endpoint(s), {} flow(s), {} page(s) on {}",
            canonical.meta.name,
            canonical.api.endpoints.len(),
            canonical.logic.flows.len(),
            canonical.ui.pages.len(),
            canonical.meta.target.runtime
        );
    }
    println!("{} artifact(s) generated", session.artifacts.len());
}

fn history_list() -> Result<()> {
    let store = open_history()?;
    if store.entries().is_empty() {
        println!("no archived sessions");
        return Ok(());
    }
    println!(
        "{:<32} {:<24} {:<10} {:<25} {}",
        "ID", "NAME", "STATUS", "CREATED", "ARTIFACTS"
    );
    for session in store.entries() {
        println!(
            "{:<32} {:<24} {:<10} {:<25} {}",
            session.id,
            session.name,
            session.status,
            session.created_at,
            session.artifacts.len()
        );
    }
    Ok(())
}

fn find_session<'a>(store: &'a HistoryStore, id: &str) -> Result<&'a Session> {
    store
        .get(id)
        .with_context(|| format!("no archived session '{id}'"))
}

fn history_show(id: &str) -> Result<()> {
    let store = open_history()?;
    let session = find_session(&store, id)?;
    println!("{} ({}, created {})", session.name, session.id, session.created_at);
    if let Some(canonical) = &session.canonical {
        println!("runtime: {}", canonical.meta.target.runtime);
        println!("plan: {}", canonical.meta.description);
        for endpoint in &canonical.api.endpoints {
            println!("  {:?} {}", endpoint.method, endpoint.path);
        }
    }
    println!("artifacts:");
    for artifact in &session.artifacts {
        println!("  {} ({:?})", artifact.path, artifact.kind);
    }
    Ok(())
}

fn history_export(id: &str, out: Option<PathBuf>) -> Result<()> {
    let store = open_history()?;
    let session = find_session(&store, id)?;
    let (derived_name, bytes) = archive::export_zip(session)?;
    let out = out.unwrap_or_else(|| PathBuf::from(derived_name));
    std::fs::write(&out, bytes).with_context(|| format!("write {}", out.display()))?;
    println!("exported {}", out.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
