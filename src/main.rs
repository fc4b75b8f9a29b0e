use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use doc2tooltip::batch::{BatchOutcome, BatchProcessor};
use doc2tooltip::config::{get_config_path, load_config, save_config, ToolConfig};
use doc2tooltip::errors::{Result, TooltipError};
use doc2tooltip::types::*;

/// Generates Unity tooltips from the comments above C# fields.
#[derive(Parser)]
#[command(
    name = "doc2tooltip",
    about = "Generates Unity tooltips from the comments above C# fields"
)]
struct Cli {
    /// Log every processed file
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration for a project
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Add or update tooltips in a file, or in every C# file under a folder
    Process {
        /// File or folder to process (default: current directory)
        path: Option<String>,
        /// Project whose configuration applies (default: current directory)
        #[arg(short, long)]
        project: Option<String>,
        /// Comment kinds to parse, comma separated
        /// (single-line-documentation, delimited-documentation, single-line, all)
        #[arg(short, long, value_delimiter = ',')]
        kinds: Option<Vec<String>>,
        /// Which fields get a tooltip (public-or-serialized or any)
        #[arg(short, long)]
        eligibility: Option<String>,
        /// Write [UnityEngine.Tooltip(..)] instead of [Tooltip(..)]
        #[arg(long)]
        qualified: bool,
        /// Report the files that would change without writing them
        #[arg(long)]
        dry_run: bool,
        /// Like --dry-run, but exit with status 1 if any file would change
        #[arg(long)]
        check: bool,
    },
    /// Show the effective configuration
    Config {
        /// Project path (default: current directory)
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Init { path, force } => {
            let project_path = resolve_path(path);
            let config_path = get_config_path(&project_path);
            if config_path.exists() && !force {
                return Err(TooltipError::Config {
                    message: format!(
                        "'{}' already exists; pass --force to overwrite it",
                        config_path.display()
                    ),
                });
            }
            save_config(&project_path, &ToolConfig::default())?;
            println!("Wrote {}", config_path.display());
        }
        Commands::Process {
            path,
            project,
            kinds,
            eligibility,
            qualified,
            dry_run,
            check,
        } => {
            let target = resolve_path(path);
            let mut config = load_config(&resolve_path(project))?;
            if let Some(names) = kinds {
                let selected = CommentKind::from_names(names.iter().map(String::as_str))
                    .map_err(|name| TooltipError::Config {
                        message: format!("unknown comment kind '{}'", name),
                    })?;
                config.set_comment_kinds(selected);
            }
            if let Some(name) = eligibility {
                config.eligibility = parse_eligibility(&name)?;
            }
            if qualified {
                config.annotation_style = AnnotationStyle::Qualified;
            }

            let kinds = config.comment_kinds();
            let batch = BatchProcessor::new(config);
            let files = batch.collect_files(&target)?;
            let result = match batch.process_paths(&files, kinds, |_| false)? {
                BatchOutcome::NoFileToProcess => {
                    println!("No file to process under {}", target.display());
                    return Ok(0);
                }
                BatchOutcome::NoCommentKindSelected => {
                    println!("No comment kind selected; nothing to do");
                    return Ok(0);
                }
                BatchOutcome::Completed(result) => result,
            };

            for failure in &result.failures {
                warn!("{}: {}", failure.path.display(), failure.message);
            }
            if dry_run || check {
                for modification in &result.modified_files {
                    println!(
                        "{} ({} tooltips)",
                        modification.path.display(),
                        modification.annotations
                    );
                }
                println!(
                    "{} of {} files would change, {} failed, in {}ms",
                    result.modified_files.len(),
                    result.total_files,
                    result.failures.len(),
                    result.duration_ms
                );
                if check && !result.modified_files.is_empty() {
                    return Ok(1);
                }
            } else {
                let written = result.commit()?;
                info!(
                    written,
                    total = result.total_files,
                    failed = result.failures.len(),
                    duration_ms = result.duration_ms,
                    "processing complete"
                );
                println!(
                    "Updated {} of {} files, {} failed, in {}ms",
                    written,
                    result.total_files,
                    result.failures.len(),
                    result.duration_ms
                );
            }
        }
        Commands::Config { path, json } => {
            let project_path = resolve_path(path);
            let config = load_config(&project_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("doc2tooltip configuration");
                println!("  Comment kinds: {}", config.comment_kinds().names().join(", "));
                println!("  Eligibility:   {}", config.eligibility.as_str());
                println!("  Style:         {:?}", config.annotation_style);
                println!("  Line ending:   {:?}", config.line_ending);
                println!("  On error:      {:?}", config.on_error);
                println!("  Include:       {}", config.include.join(", "));
                println!("  Exclude:       {}", config.exclude.join(", "));
                println!("  Max file size: {} bytes", config.max_file_size);
            }
        }
    }
    Ok(0)
}

fn parse_eligibility(name: &str) -> Result<FieldEligibility> {
    match name {
        "public-or-serialized" => Ok(FieldEligibility::PublicOrSerialized),
        "any" => Ok(FieldEligibility::Any),
        other => Err(TooltipError::Config {
            message: format!("unknown eligibility '{}'", other),
        }),
    }
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
