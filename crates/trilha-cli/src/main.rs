//! Trilha CLI
//!
//! Command-line interface for:
//! - Resolving recognized entity names into navigation answers
//! - Linting a relationship snapshot before it ships
//! - Inspecting one entity's place in the graph

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use trilha_core::{RecognizedEntities, Resolution, DEFAULT_TOP_WEIGHT};
use trilha_store::{CatalogStore, StoreConfig};

mod lint;

#[derive(Parser)]
#[command(name = "trilha")]
#[command(
    author,
    version,
    about = "Trilha: entity-relationship resolution for chat consultations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Snapshot locations shared by every subcommand.
#[derive(Args)]
struct CatalogArgs {
    /// Relationship rows (JSON array of entity/weight/parent)
    #[arg(long, default_value = "relations.json")]
    relations: PathBuf,

    /// Translation rows (JSON array of entity/word)
    #[arg(long, default_value = "translations.json")]
    translations: PathBuf,

    /// Phrasebook overriding the built-in pt-BR copy
    #[arg(long)]
    phrasebook: Option<PathBuf>,

    /// Weight marking whole-domain topic roots
    #[arg(long, default_value_t = DEFAULT_TOP_WEIGHT)]
    top_weight: u32,
}

impl CatalogArgs {
    fn open(&self) -> Result<CatalogStore> {
        CatalogStore::open(StoreConfig {
            relations_path: self.relations.clone(),
            translations_path: self.translations.clone(),
            phrasebook_path: self.phrasebook.clone(),
            top_weight: self.top_weight,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve recognized entity names into a path, a missing-dependency
    /// report, or a clarification question.
    Resolve {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Emit the answer as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Entity names, in recognition order
        #[arg(required = true)]
        entities: Vec<String>,
    },

    /// Report data-quality findings for a snapshot.
    Lint {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Exit zero even when findings include errors
        #[arg(long)]
        no_fail: bool,
    },

    /// Show one entity's record: weight, parents, children, translation.
    Show {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Entity name as it appears in the snapshot
        entity: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve {
            catalog,
            json,
            entities,
        } => cmd_resolve(&catalog, json, &entities),
        Commands::Lint {
            catalog,
            json,
            no_fail,
        } => cmd_lint(&catalog, json, no_fail),
        Commands::Show { catalog, entity } => cmd_show(&catalog, &entity),
    }
}

fn cmd_resolve(args: &CatalogArgs, json: bool, entities: &[String]) -> Result<()> {
    let store = args.open()?;
    let catalog = store.catalog();
    let answer = catalog.resolve(&RecognizedEntities::new(entities))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }
    match answer {
        Resolution::Resolved { path } => {
            println!("{} {}", "resolved".green().bold(), path.bold());
        }
        Resolution::MissingDependency { entity, missing } => match entity {
            Some(entity) => println!(
                "{} `{entity}` needs one of: {}",
                "incomplete".yellow().bold(),
                missing.join(", ")
            ),
            None => println!("{} no entities recognized", "incomplete".yellow().bold()),
        },
        Resolution::Ambiguous { prompt } => {
            println!("{} {prompt}", "clarify".cyan().bold());
        }
    }
    Ok(())
}

fn cmd_lint(args: &CatalogArgs, json: bool, no_fail: bool) -> Result<()> {
    let store = args.open()?;
    let catalog = store.catalog();
    let report = lint::run_lint(
        &catalog,
        &args.relations.display().to_string(),
        &args.translations.display().to_string(),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", lint::render_lint_report_text(&report));
    }

    if report.summary.error_count > 0 && !no_fail {
        return Err(anyhow!(
            "lint found {} error(s)",
            report.summary.error_count
        ));
    }
    Ok(())
}

fn cmd_show(args: &CatalogArgs, entity: &str) -> Result<()> {
    let store = args.open()?;
    let catalog = store.catalog();
    let record = catalog.index().record(entity)?;

    println!("{} {}", "entity".green().bold(), record.name.bold());
    println!("  weight: {}", record.weight);
    let word = catalog
        .translations()
        .word_for(&record.name)
        .unwrap_or("(none)");
    println!("  word: {word}");
    if record.parents.is_empty() {
        println!("  parents: (root)");
    } else {
        let parents: Vec<&str> = record.parents.iter().map(String::as_str).collect();
        println!("  parents: {}", parents.join(", "));
    }
    let children = catalog.index().children_of(&record.name);
    if !children.is_empty() {
        let names: Vec<&str> = children.iter().map(|r| r.name.as_str()).collect();
        println!("  children: {}", names.join(", "));
    }
    Ok(())
}
