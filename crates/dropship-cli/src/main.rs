//! Dropship - drop-document distribution CLI
//!
//! The `dropship` command distributes fenced code blocks from a markdown
//! drop document into the working tree, reconciling every artifact against
//! what is already on disk before it writes anything.
//!
//! ## Commands
//!
//! - `run`: distribute the document (interactive; destructive steps are
//!   confirmed with a non-destructive default)
//! - `plan`: show what a run would distribute, without writing anything

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tracing::error;

use dropship_core::{
    classify, extract, init_tracing, is_marked, CommandDisposition, ContentDigest,
    DistributeConfig, DistributionReport, Distributor, FileDisposition, Strategy,
    DEFAULT_DOCUMENT,
};
use dropship_io::{FsTree, ShellRunner, TerminalGate, TreeStore};

#[derive(Parser)]
#[command(name = "dropship")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Distribute drop-document code blocks with semantic conflict resolution", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON: log lines, the plan, and the final report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distribute the drop document into the target tree
    Run {
        /// Drop document, relative to the tree root
        #[arg(default_value = DEFAULT_DOCUMENT)]
        document: String,

        /// Target tree root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Parse and classify only; write nothing, run nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show what a run would distribute, without writing anything
    Plan {
        /// Drop document, relative to the tree root
        #[arg(default_value = DEFAULT_DOCUMENT)]
        document: String,

        /// Target tree root
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json, cli.verbose);

    let result = match &cli.command {
        Commands::Run {
            document,
            root,
            dry_run: false,
        } => cmd_run(document, root, cli.json).await,
        Commands::Run {
            document,
            root,
            dry_run: true,
        }
        | Commands::Plan { document, root } => cmd_plan(document, root, cli.json).await,
    };

    // Single top-level boundary: log, exit non-zero, never mark the
    // document on the way out.
    if let Err(e) = result {
        error!(error = %e, "dropship run failed");
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn cmd_run(document: &str, root: &Path, json: bool) -> Result<()> {
    let gate = TerminalGate;
    let tree = FsTree::new(root);
    let runner = ShellRunner::in_dir(root);
    let distributor = Distributor::new(&gate, &tree, &runner, DistributeConfig::default());

    let report = distributor.run(document).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &DistributionReport) {
    if report.aborted {
        println!("{}", "Distribution aborted; no changes made.".yellow());
        return;
    }

    for file in &report.files {
        match &file.disposition {
            FileDisposition::Written => {
                println!("{} {}", "wrote".green(), file.path);
            }
            FileDisposition::Merged => {
                println!("{} {}", "merged".cyan(), file.path);
            }
            FileDisposition::Unchanged => {
                println!("{} {}", "unchanged".dimmed(), file.path);
            }
            FileDisposition::Skipped => {
                println!("{} {}", "skipped".yellow(), file.path);
            }
            FileDisposition::WriteFailed { error } => {
                println!("{} {}: {}", "write failed".red(), file.path, error);
            }
        }
    }

    for command in &report.commands {
        let label = first_line(&command.command);
        match &command.disposition {
            CommandDisposition::Ran { exit_code: 0 } => {
                println!("{} {}", "ran".green(), label);
            }
            CommandDisposition::Ran { exit_code } => {
                println!("{} {} (exit {})", "failed".red(), label, exit_code);
            }
            CommandDisposition::Declined => {
                println!("{} {}", "declined".dimmed(), label);
            }
            CommandDisposition::Pruned => {
                println!("{} {}", "pruned".yellow(), label);
            }
            CommandDisposition::Halted => {
                println!("{} {}", "halted".red(), label);
            }
        }
    }

    println!(
        "\n{} file(s) materialised, {} command(s) succeeded.",
        report.written_count(),
        report.commands_succeeded()
    );
    if report.command_failed() {
        println!(
            "{}",
            "A command failed; the document was left unmarked so the run can be retried.".red()
        );
    } else if report.marked {
        println!("{} {}", "marked".green(), report.document);
    }
}

/// One plan line per would-be artifact.
#[derive(Debug, Serialize)]
struct PlanEntry {
    path: String,
    strategy: Strategy,
    digest: String,
    exists: bool,
}

#[derive(Debug, Serialize)]
struct Plan {
    document: String,
    already_marked: bool,
    files: Vec<PlanEntry>,
    commands: Vec<String>,
}

async fn cmd_plan(document: &str, root: &Path, json: bool) -> Result<()> {
    let tree = FsTree::new(root);
    let config = DistributeConfig::default();

    let doc = tree
        .read(document)
        .await?
        .ok_or_else(|| anyhow!("drop document not found: {document}"))?;

    let manifest = extract(&doc, &config);

    let mut files = Vec::new();
    for artifact in &manifest.files {
        files.push(PlanEntry {
            strategy: classify(artifact, &config),
            digest: ContentDigest::from_bytes(artifact.code.as_bytes())
                .short()
                .to_string(),
            exists: tree.exists(&artifact.path).await?,
            path: artifact.path.clone(),
        });
    }

    let plan = Plan {
        document: document.to_string(),
        already_marked: is_marked(&doc),
        files,
        commands: manifest.commands,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("serializing plan")?
        );
        return Ok(());
    }

    if plan.already_marked {
        println!(
            "{}",
            "Document is already marked complete; a run will ask before re-distributing.".yellow()
        );
    }
    for entry in &plan.files {
        let strategy = match entry.strategy {
            Strategy::Denied => "denied".red(),
            Strategy::SchemaStructural => "schema".cyan(),
            Strategy::ExportAwareMerge => "exports".cyan(),
            Strategy::PassThrough => "pass-through".normal(),
        };
        let state = if entry.exists { "update" } else { "create" };
        println!("{:<12} {} {} ({})", strategy, entry.path, entry.digest.dimmed(), state);
    }
    for command in &plan.commands {
        println!("{:<12} {}", "command".normal(), first_line(command));
    }
    println!(
        "\n{} file(s), {} command(s).",
        plan.files.len(),
        plan.commands.len()
    );
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}
