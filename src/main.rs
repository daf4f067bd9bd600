use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use jskill::{
    discover, load_rules, render, write_default_ignore, AutoApprove, Config, Prompter,
    PurgeOutcome, PurgeReport, Purger, TerminalPrompter,
};

#[derive(Parser, Debug)]
#[command(
    name = "jskill",
    author,
    version,
    about = "Find and remove compiled JavaScript output, honoring a .jskillignore file",
    long_about = None
)]
struct Cli {
    /// Project root (defaults to current directory)
    #[arg(short = 'C', long = "directory", default_value = ".", global = true)]
    directory: PathBuf,

    /// Directory holding the cached ignore list
    #[arg(long, env = "JSKILL_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    purge: PurgeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Debug)]
struct PurgeArgs {
    /// Re-parse the ignore file even if it is unchanged
    #[arg(long)]
    no_cache: bool,

    /// Ignore .jskillignore entirely and consider every directory
    #[arg(long)]
    no_ignore: bool,

    /// File extension to offer for removal (repeatable)
    #[arg(short = 'e', long = "ext", default_values_t = vec![String::from("js")])]
    extensions: Vec<String>,

    /// Offer every file regardless of extension
    #[arg(long, conflicts_with = "extensions")]
    all: bool,

    /// Approve every file and every confirmation without prompting
    #[arg(long, short)]
    yes: bool,

    /// Show what would be removed, but don't remove anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add the default .jskillignore to the project
    Init {
        /// Overwrite an existing .jskillignore
        #[arg(long, short)]
        force: bool,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Config {
    let mut config = Config::new(&cli.directory);
    if let Some(cache_dir) = &cli.cache_dir {
        config = config.with_cache_dir(cache_dir);
    }
    config.use_cache = !cli.purge.no_cache;
    config.apply_ignore = !cli.purge.no_ignore;
    if !cli.purge.all {
        config = config.with_extensions(cli.purge.extensions.iter().cloned());
    }
    config
}

fn init(config: &Config, force: bool) -> Result<()> {
    write_default_ignore(&config.ignore_file, force)?;
    println!(
        "{} {}",
        "Created".green().bold(),
        config.ignore_file.display()
    );
    Ok(())
}

fn purge(config: &Config, args: &PurgeArgs) -> Result<()> {
    let rules = load_rules(config)?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message(format!("Scanning {}", config.root.display()));

    let discovery = discover(config, &rules.rules);
    progress.finish_and_clear();
    let discovery = discovery?;

    if discovery.candidates.is_empty() {
        println!("No compiled files found.");
        return Ok(());
    }

    println!("{}", config.root.display().to_string().bold());
    for line in render(&discovery.candidates) {
        println!("{}", line);
    }
    println!(
        "{}",
        format!("{} candidate file(s)", discovery.candidates.len()).green()
    );
    println!();

    let mut prompter: Box<dyn Prompter> = if args.yes {
        Box::new(AutoApprove)
    } else {
        Box::new(TerminalPrompter::new())
    };

    let report = Purger::new(&config.root)
        .dry_run(args.dry_run)
        .run(&discovery, prompter.as_mut())?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &PurgeReport) {
    if report.outcome.is_abort() {
        println!(
            "{}",
            "Stopped at your request; nothing beyond what you approved was removed.".yellow()
        );
    }

    match report.outcome {
        PurgeOutcome::NothingToPurge => println!("No compiled files found."),
        PurgeOutcome::NothingSelected => println!("Nothing selected."),
        PurgeOutcome::FilesDeclined => println!("Aborted: no files were deleted."),
        PurgeOutcome::DryRun => {
            for file in &report.selected {
                println!("Would remove: {}", file.display());
            }
            for dir in &report.empty_directories {
                println!("Would remove directory: {}/", dir.display());
            }
            println!("Dry run mode: No files were deleted.");
        }
        PurgeOutcome::DirectoriesDeclined | PurgeOutcome::Completed => {
            for failure in &report.failed {
                println!(
                    "{} {}: {}",
                    "Failed:".red(),
                    failure.path.display(),
                    failure.error
                );
            }
            for dir in &report.removed_directories {
                println!("Removed directory: {}/", dir.display());
            }
            if report.outcome == PurgeOutcome::DirectoriesDeclined {
                println!("Kept {} emptied directories.", report.empty_directories.len());
            }
            println!("========================================");
            println!(
                "Removed {} of {} selected file(s)",
                report.removed_files.len(),
                report.selected.len()
            );
            println!(
                "Total Size Removed: {}",
                format_size(report.removed_bytes, BINARY).bold().red()
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli);

    match &cli.command {
        Some(Commands::Init { force }) => init(&config, *force),
        None => purge(&config, &cli.purge),
    }
}
