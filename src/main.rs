use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use antora_resolve::project::AntoraProject;
use antora_resolve::resolution::prefix::leading_prefix_len;
use antora_resolve::types::Family;
use tracing_subscriber::EnvFilter;

/// Resolve Antora resource references in a documentation project.
#[derive(Parser)]
#[command(
    name = "antora-resolve",
    about = "Resolve Antora component:module:family$ references"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// Resolve a reference as written in a document
    Resolve {
        /// Reference, e.g. `compB:mod1:image$bar.png`
        key: String,
        /// Document the reference appears in
        #[arg(short, long)]
        file: String,
        /// Family assumed when the reference has no `family$` tag
        #[arg(long, value_parser = parse_family)]
        family: Option<Family>,
        /// Project root (default: current directory)
        #[arg(short, long)]
        root: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Print the module directory enclosing a document
    Module {
        /// Document or directory
        file: String,
        /// Project root (default: current directory)
        #[arg(short, long)]
        root: Option<String>,
    },
    /// Print a family directory for a document
    FamilyDir {
        /// Document or directory
        file: String,
        /// Family to look up
        #[arg(long, value_parser = parse_family)]
        family: Family,
        /// Print the path relative to the document's directory
        #[arg(long)]
        relative: bool,
        /// Project root (default: current directory)
        #[arg(short, long)]
        root: Option<String>,
    },
    /// List the prefixes available to a document
    Prefixes {
        /// Document or directory
        file: String,
        /// Partially typed reference; only matching prefixes are listed
        #[arg(short, long)]
        typed: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
        /// Project root (default: current directory)
        #[arg(short, long)]
        root: Option<String>,
    },
    /// Print the Spring REST Docs snippets directory for a document
    Snippets {
        /// Document or directory
        file: String,
        /// Project root (default: current directory)
        #[arg(short, long)]
        root: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Runs a command; `Ok(false)` means the lookup found nothing.
fn run(cli: Cli) -> antora_resolve::errors::Result<bool> {
    match cli.command {
        Commands::Init { path } => {
            let project_path = resolve_path(path);
            AntoraProject::init(&project_path)?;
            println!("Initialized antora-resolve at {}", project_path.display());
        }
        Commands::Resolve {
            key,
            file,
            family,
            root,
            json,
        } => {
            let project = AntoraProject::open(&resolve_path(root))?;
            let file = absolute(&file);
            if json {
                let target = project.resolve(&file, &key, family);
                let value = serde_json::json!({
                    "key": key,
                    "resolved": target.is_some(),
                    "path": target.as_ref().map(|t| t.to_path_string()).unwrap_or_else(|| key.clone()),
                    "family": target.as_ref().map(|t| t.family.as_str()),
                    "module_dir": target.as_ref().map(|t| t.module_dir.display().to_string()),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", project.replace_prefix(&file, &key, family));
            }
        }
        Commands::Module { file, root } => {
            let project = AntoraProject::open(&resolve_path(root))?;
            match project.module_for(&absolute(&file)) {
                Some(dir) => println!("{}", dir.display()),
                None => {
                    eprintln!("No Antora module encloses '{}'", file);
                    return Ok(false);
                }
            }
        }
        Commands::FamilyDir {
            file,
            family,
            relative,
            root,
        } => {
            let project = AntoraProject::open(&resolve_path(root))?;
            let file = absolute(&file);
            let found = if relative {
                project.family_dir_relative(&file, family)
            } else {
                project
                    .family_dir(&file, family)
                    .map(|d| d.display().to_string())
            };
            match found {
                Some(dir) => println!("{}", dir),
                None => {
                    eprintln!("No {} directory found", family.dir_name());
                    return Ok(false);
                }
            }
        }
        Commands::Prefixes {
            file,
            typed,
            json,
            root,
        } => {
            let project = AntoraProject::open(&resolve_path(root))?;
            let mut prefixes = project.collect_prefixes(&absolute(&file));
            if let Some(typed) = typed {
                // Only the part that already looks like a prefix narrows the list.
                let typed = &typed[..leading_prefix_len(&typed).unwrap_or(0)];
                prefixes.retain(|p| p.prefix.starts_with(typed));
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&prefixes)?);
            } else if prefixes.is_empty() {
                println!("No prefixes found");
            } else {
                for p in &prefixes {
                    match &p.title {
                        Some(title) => println!("{} ({})", p.prefix, title),
                        None => println!("{}", p.prefix),
                    }
                }
            }
        }
        Commands::Snippets { file, root } => {
            let project = AntoraProject::open(&resolve_path(root))?;
            match project.rest_docs_snippets(&absolute(&file)) {
                Some(dir) => println!("{}", dir.display()),
                None => {
                    eprintln!("No generated-snippets directory found");
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

fn parse_family(s: &str) -> Result<Family, String> {
    Family::from_str(s).ok_or_else(|| {
        let known: Vec<&str> = Family::ALL.iter().map(Family::as_str).collect();
        format!("unknown family '{}' (expected one of: {})", s, known.join(", "))
    })
}

/// Resolves an optional path argument to an absolute `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => absolute(&p),
        None => absolute("."),
    }
}

/// Canonical form of a path so it compares equal to paths under the root.
fn absolute(path: &str) -> PathBuf {
    std::fs::canonicalize(Path::new(path)).unwrap_or_else(|_| PathBuf::from(path))
}
