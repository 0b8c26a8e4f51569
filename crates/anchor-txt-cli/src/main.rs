use anchor_txt_config::{Config, OutputFormat};
use anchor_txt_engine::{PlainSection, SectionTree, io, render_outline};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "anchor-txt")]
#[command(about = "Inspect the sections and attributes of markdown documents")]
#[command(version)]
struct Cli {
    /// Config file to read instead of ~/.config/anchor-txt/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the plain form of each document
    Dump {
        /// Files or directories, defaulting to the configured documents directory
        paths: Vec<PathBuf>,

        /// json or yaml
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// Print an indented outline of a document's sections
    Outline { path: PathBuf },
    /// Print the attributes of one section as YAML
    Attrs {
        path: PathBuf,

        /// Title path separated by `/`, e.g. `Goals/Milestones`. The root when omitted.
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Reload a plain-form dump and validate its structure
    Check { plain_file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));

    match cli.command {
        Commands::Dump { paths, format } => {
            let format = format.unwrap_or(config.format);
            print!("{}", dump(&config, paths, format)?);
        }
        Commands::Outline { path } => {
            print!("{}", render_outline(&load(&path)?));
        }
        Commands::Attrs { path, section } => {
            print!("{}", attrs(&path, section.as_deref())?);
        }
        Commands::Check { plain_file } => {
            let tree = check(&plain_file)?;
            println!(
                "{}: ok ({} sections)",
                plain_file.display(),
                tree.section_count()
            );
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
            .with_context(|| format!("Config file {} does not exist", path.display())),
        None => Ok(Config::load()
            .context("Failed to load config file")?
            .unwrap_or_default()),
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<SectionTree> {
    io::load_document(path).with_context(|| format!("Failed to load {}", path.display()))
}

/// A single document prints as its plain form, several as a map keyed by path.
fn dump(config: &Config, paths: Vec<PathBuf>, format: OutputFormat) -> Result<String> {
    let paths = if paths.is_empty() {
        let documents = config
            .documents
            .clone()
            .context("No paths given and no `documents` directory configured")?;
        vec![documents]
    } else {
        paths
    };

    let files = collect_documents(config, &paths)?;
    info!(files = files.len(), %format, "dumping documents");

    if let [file] = files.as_slice() {
        let tree = load(file)?;
        let text = match format {
            OutputFormat::Json => tree.to_json().map(|json| json + "\n"),
            OutputFormat::Yaml => tree.to_yaml(),
        };
        return Ok(text?);
    }

    let mut plains: BTreeMap<String, PlainSection> = BTreeMap::new();
    for file in &files {
        let tree = load(file)?;
        if format == OutputFormat::Json {
            tree.check_json_representable()
                .with_context(|| format!("Cannot dump {} as JSON", file.display()))?;
        }
        plains.insert(file.display().to_string(), tree.to_plain());
    }
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&plains)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(&plains)?,
    })
}

fn collect_documents(config: &Config, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let found = io::scan_markdown_files(path, &config.extensions)
            .with_context(|| format!("Failed to scan {}", path.display()))?;
        files.extend(found.into_iter().filter(|file| {
            let relative = file.strip_prefix(path).unwrap_or(file);
            let excluded = config.is_excluded(relative);
            if excluded {
                debug!(path = %file.display(), "excluded by config");
            }
            !excluded
        }));
    }
    Ok(files)
}

fn section_titles(selector: &str) -> Vec<&str> {
    selector.split('/').filter(|t| !t.is_empty()).collect()
}

fn attrs(path: &Path, section: Option<&str>) -> Result<String> {
    let tree = load(path)?;
    let titles = section.map(section_titles).unwrap_or_default();
    let target = if titles.is_empty() {
        tree.root()
    } else {
        tree.find_by_path(&titles).with_context(|| {
            format!(
                "No section `{}` in {}",
                titles.join(" > "),
                path.display()
            )
        })?
    };
    Ok(serde_yaml::to_string(target.attributes())?)
}

/// Files ending in `.json` are read as JSON, anything else as YAML.
fn check(path: &Path) -> Result<SectionTree> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = match path.extension() {
        Some(ext) if ext == "json" => SectionTree::from_json(&text),
        _ => SectionTree::from_yaml(&text),
    };
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let tree = parsed
        .with_context(|| format!("Invalid plain form in {}", path.display()))?
        .with_name(name);
    info!(sections = tree.section_count(), "plain form is valid");
    Ok(tree)
}
