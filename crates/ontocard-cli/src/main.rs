//! Ontocard CLI
//!
//! File-in, file-out front end for the schema-card pipeline:
//! - Aggregating per-chunk LLM proposals into one document proposal
//! - Merging a proposal into the running schema card
//! - Exporting cards, proposals, and instance proposals as RDF
//! - Extracting a schema card from an existing ontology file
//! - Managing the baseline ontology catalog

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use ontocard_catalog::{OntologyCatalog, RegisterRequest};
use ontocard_proposals::{aggregate_chunk_proposals, merge_schema_card, overlay_schema_cards};
use ontocard_rdf::{
    extract_schema_card, project_instances, project_proposal, project_schema_card,
    provenance_index, RdfFormat, RdfGraph, RdfSyntax, SophiaSyntax,
};
use ontocard_schema::{AggregatedProposal, ChunkRecord, InstanceProposal, Origin, SchemaCard};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;

use config::OntocardConfig;

#[derive(Parser)]
#[command(name = "ontocard")]
#[command(author, version, about = "Ontocard: schema cards from LLM proposals and baseline ontologies")]
struct Cli {
    /// Increase log detail (-v info, -vv debug with source locations)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file
    #[arg(long, global = true, env = "ONTOCARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate chunk proposals (JSON, JSON array, or JSONL) into one proposal
    Aggregate {
        /// Chunk proposal files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output aggregated proposal JSON (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Merge an aggregated proposal into the previous schema card
    BuildCard {
        /// Aggregated proposal JSON
        #[arg(long)]
        proposal: PathBuf,
        /// Previous schema card; missing file means an empty card
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Namespace override
        #[arg(long)]
        namespace: Option<String>,
        /// Card whose entries replace same-named entries after the merge
        #[arg(long)]
        overlay: Option<PathBuf>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Project a schema card (or an aggregated proposal) to RDF
    ExportSchema {
        /// Schema card JSON
        #[arg(long, conflicts_with = "proposal")]
        card: Option<PathBuf>,
        /// Aggregated proposal JSON
        #[arg(long)]
        proposal: Option<PathBuf>,
        /// Namespace for proposal export
        #[arg(long)]
        namespace: Option<String>,
        /// turtle | ntriples | rdfxml
        #[arg(long)]
        format: Option<RdfFormat>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Project instance proposals to RDF with mention provenance
    ExportInstances {
        /// Instance proposals (JSON array or JSONL)
        proposals: PathBuf,
        /// Chunk records carrying provenance (JSON array or JSONL)
        #[arg(long)]
        chunks: Option<PathBuf>,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long)]
        format: Option<RdfFormat>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Extract a schema card from an RDF/OWL file
    ExtractCard {
        input: PathBuf,
        /// Origin recorded on every extracted entry
        #[arg(long, default_value = "extracted")]
        origin: String,
        /// Namespace; inferred from the graph when omitted
        #[arg(long)]
        namespace: Option<String>,
        /// Input syntax; taken from the file extension when omitted
        #[arg(long)]
        format: Option<RdfFormat>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Baseline ontology catalog
    Catalog {
        /// Catalog directory (overrides config)
        #[arg(long)]
        dir: Option<PathBuf>,
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Register (or replace) a baseline ontology
    Register {
        input: PathBuf,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Inferred from the ontology when omitted
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Input syntax; taken from the file extension when omitted
        #[arg(long)]
        format: Option<RdfFormat>,
    },

    /// List registered ontologies
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a baseline's extracted card and counts
    Inspect {
        slug: String,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find classes by name or description
    SearchClasses { query: String },

    /// Find properties by name, domain, range, or description
    SearchProperties { query: String },

    /// Compose baselines into one seed card (first listed wins)
    Compose {
        #[arg(required = true)]
        slugs: Vec<String>,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = OntocardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Aggregate { inputs, out } => cmd_aggregate(&inputs, out.as_deref()),
        Commands::BuildCard {
            proposal,
            previous,
            namespace,
            overlay,
            out,
        } => cmd_build_card(
            &config,
            &proposal,
            previous.as_deref(),
            namespace.as_deref(),
            overlay.as_deref(),
            out.as_deref(),
        ),
        Commands::ExportSchema {
            card,
            proposal,
            namespace,
            format,
            out,
        } => {
            let format = config.format(format)?;
            let graph = match (card, proposal) {
                (Some(card), None) => project_schema_card(&read_json::<SchemaCard>(&card)?),
                (None, Some(proposal)) => project_proposal(
                    &read_json::<AggregatedProposal>(&proposal)?,
                    &config.namespace(namespace.as_deref()),
                ),
                _ => bail!("pass exactly one of --card or --proposal"),
            };
            emit_graph(&graph, format, out.as_deref())
        }
        Commands::ExportInstances {
            proposals,
            chunks,
            namespace,
            format,
            out,
        } => {
            let format = config.format(format)?;
            let namespace = config.namespace(namespace.as_deref());
            cmd_export_instances(&proposals, chunks.as_deref(), &namespace, format, out.as_deref())
        }
        Commands::ExtractCard {
            input,
            origin,
            namespace,
            format,
            out,
        } => {
            let format = input_format(&input, format)?;
            let text = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let graph = SophiaSyntax::new()
                .parse(&text, format)
                .with_context(|| format!("parsing {}", input.display()))?;
            let card = extract_schema_card(&graph, &Origin::from(origin), namespace.as_deref());
            emit_json(&card, out.as_deref())
        }
        Commands::Catalog { dir, command } => {
            let mut catalog_config = config.catalog.clone();
            if let Some(dir) = dir {
                catalog_config.root = dir;
            }
            cmd_catalog(&OntologyCatalog::new(catalog_config), &config, command)
        }
    }
}

/// Stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_file(verbose >= 2)
        .with_line_number(verbose >= 2)
        .init();
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_aggregate(inputs: &[PathBuf], out: Option<&Path>) -> Result<()> {
    let mut chunks = Vec::new();
    for input in inputs {
        chunks.extend(read_json_values(input)?);
    }
    let proposal = aggregate_chunk_proposals(&chunks);
    eprintln!(
        "{} {} chunk proposals → {} classes, {} datatype / {} object properties, {} events",
        "Aggregated".green().bold(),
        chunks.len(),
        proposal.classes.len(),
        proposal.datatype_properties.len(),
        proposal.object_properties.len(),
        proposal.events.len()
    );
    emit_json(&proposal, out)
}

fn cmd_build_card(
    config: &OntocardConfig,
    proposal: &Path,
    previous: Option<&Path>,
    namespace: Option<&str>,
    overlay: Option<&Path>,
    out: Option<&Path>,
) -> Result<()> {
    let proposal: AggregatedProposal = read_json(proposal)?;
    let previous = match previous {
        Some(path) if path.exists() => read_json::<SchemaCard>(path)?,
        missing => {
            if let Some(path) = missing {
                tracing::warn!(path = %path.display(), "previous card not found, starting empty");
            }
            // Leave the namespace unset so the configured default applies.
            SchemaCard {
                namespace: String::new(),
                ..Default::default()
            }
        }
    };

    let namespace = config.merge_namespace(namespace, &previous.namespace);
    let mut card = merge_schema_card(&previous, &proposal, Some(&namespace));
    if let Some(overlay) = overlay {
        card = overlay_schema_cards(&card, &read_json(overlay)?);
    }

    for warning in &card.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    eprintln!(
        "{} card {} ({} classes, {} warnings)",
        "ok".green().bold(),
        card.version,
        card.classes.len(),
        card.warnings.len()
    );
    emit_json(&card, out)
}

fn cmd_export_instances(
    proposals: &Path,
    chunks: Option<&Path>,
    namespace: &str,
    format: RdfFormat,
    out: Option<&Path>,
) -> Result<()> {
    let proposals: Vec<InstanceProposal> = read_records(proposals)?;
    let records: Vec<ChunkRecord> = match chunks {
        Some(path) => read_records(path)?,
        None => Vec::new(),
    };
    let graph = project_instances(namespace, &provenance_index(&records), &proposals);
    emit_graph(&graph, format, out)
}

fn cmd_catalog(
    catalog: &OntologyCatalog,
    config: &OntocardConfig,
    command: CatalogCommands,
) -> Result<()> {
    match command {
        CatalogCommands::Register {
            input,
            slug,
            label,
            description,
            namespace,
            tags,
            format,
        } => {
            let format = input_format(&input, format)?;
            let content = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let mut request = RegisterRequest::new(slug, content).format(format).tags(tags);
            request.label = label;
            request.description = description;
            request.namespace = namespace;
            let entry = catalog.register(request)?;
            eprintln!(
                "{} registered {} (namespace {})",
                "ok".green().bold(),
                entry.slug.bold(),
                entry.namespace
            );
        }
        CatalogCommands::List { json } => {
            let entries = catalog.list()?;
            if json {
                return emit_json(&entries, None);
            }
            if entries.is_empty() {
                eprintln!("{} catalog is empty", "info:".yellow().bold());
            }
            for e in entries {
                println!("{}  {}  {}", e.slug.bold(), e.label, e.namespace.dimmed());
            }
        }
        CatalogCommands::Inspect { slug, json } => {
            let report = catalog.inspect(&slug)?;
            if json {
                return emit_json(&report, None);
            }
            println!("{} {}", report.slug.bold(), report.label);
            println!("  namespace:            {}", report.namespace);
            println!("  classes:              {}", report.counts.classes);
            println!("  datatype properties:  {}", report.counts.datatype_properties);
            println!("  object properties:    {}", report.counts.object_properties);
        }
        CatalogCommands::SearchClasses { query } => {
            for hit in catalog.search_classes(&query)? {
                println!("{}:{}  {}", hit.ontology.dimmed(), hit.class.bold(), hit.description);
            }
        }
        CatalogCommands::SearchProperties { query } => {
            for hit in catalog.search_properties(&query)? {
                println!(
                    "{}:{}  {} → {}  {}",
                    hit.ontology.dimmed(),
                    hit.property.bold(),
                    hit.domain,
                    hit.range,
                    hit.description
                );
            }
        }
        CatalogCommands::Compose {
            slugs,
            namespace,
            out,
        } => {
            let namespace = config.namespace(namespace.as_deref());
            let card = catalog.compose(&slugs, Some(&namespace))?;
            for warning in &card.warnings {
                eprintln!("{} {}", "warning:".yellow().bold(), warning);
            }
            emit_json(&card, out.as_deref())?;
        }
    }
    Ok(())
}

// ============================================================================
// File helpers
// ============================================================================

fn input_format(path: &Path, explicit: Option<RdfFormat>) -> Result<RdfFormat> {
    explicit
        .or_else(|| RdfFormat::from_path(path))
        .ok_or_else(|| anyhow!("cannot infer RDF syntax of {}; pass --format", path.display()))
}

fn is_jsonl(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("jsonl")
}

/// Documents in a file: each line of a `.jsonl` file, each element of a
/// top-level JSON array, or the single top-level value.
fn read_json_values(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if is_jsonl(path) {
        return text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line)
                    .with_context(|| format!("parsing {} line {}", path.display(), n + 1))
            })
            .collect();
    }
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(match value {
        Value::Array(items) => items,
        other => vec![other],
    })
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    read_json_values(path)?
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            serde_json::from_value(v)
                .with_context(|| format!("record {} of {}", i + 1, path.display()))
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn emit_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    emit_text(&text, out)
}

fn emit_graph(graph: &RdfGraph, format: RdfFormat, out: Option<&Path>) -> Result<()> {
    let text = SophiaSyntax::new().serialize(graph, format)?;
    tracing::info!(triples = graph.len(), format = %format, "serialized graph");
    emit_text(&text, out)
}

fn emit_text(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            }
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_inputs_accept_object_array_and_lines() {
        let dir = tempdir().unwrap();
        let single = dir.path().join("one.json");
        let array = dir.path().join("many.json");
        let lines = dir.path().join("many.jsonl");
        fs::write(&single, r#"{"chunk_id":"c1"}"#).unwrap();
        fs::write(&array, r#"[{"chunk_id":"c1"},{"chunk_id":"c2"}]"#).unwrap();
        fs::write(&lines, "{\"chunk_id\":\"c1\"}\n\n{\"chunk_id\":\"c2\"}\n").unwrap();

        assert_eq!(read_json_values(&single).unwrap().len(), 1);
        assert_eq!(read_json_values(&array).unwrap().len(), 2);
        let records: Vec<InstanceProposal> = read_records(&lines).unwrap();
        assert_eq!(records[1].chunk_id, "c2");
    }

    #[test]
    fn bad_jsonl_line_is_reported_with_its_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{}\n{oops\n").unwrap();
        let err = read_json_values(&path).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn format_comes_from_flag_then_extension() {
        assert_eq!(input_format(Path::new("a.owl"), None).unwrap(), RdfFormat::RdfXml);
        assert_eq!(
            input_format(Path::new("a.owl"), Some(RdfFormat::Turtle)).unwrap(),
            RdfFormat::Turtle
        );
        assert!(input_format(Path::new("a.txt"), None).is_err());
    }
}
