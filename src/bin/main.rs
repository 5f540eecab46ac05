use anyhow::{Context, Result};
use changelog_lint::{
    Changelog, LintConfig, ParseMode, ValidationOptions, parse_file_with_mode, render_markdown,
    validate_changelog,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "changelog-lint")]
#[command(version, about = "parse, lint and validate keep-a-changelog files", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// output format (json or human)
    #[arg(short, long, default_value = "human", global = true)]
    format: OutputFormat,

    /// configuration file (defaults to ./changelog-lint.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!(
                "invalid output format: {}, use 'json' or 'human'",
                s
            )),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// parse a changelog strictly and print it
    Parse {
        /// path to the changelog file
        file: PathBuf,
    },

    /// parse a changelog, recovering from malformed lines, and print it
    Lint {
        /// path to the changelog file
        file: PathBuf,
    },

    /// validate a changelog against the keep-a-changelog rules
    Validate {
        /// path to the changelog file
        file: PathBuf,

        /// parser to use (lint or strict), overrides the configuration file
        #[arg(short, long)]
        mode: Option<ParseMode>,

        #[command(flatten)]
        allow: AllowFlags,
    },
}

#[derive(Args, Debug, Default)]
struct AllowFlags {
    /// allow version without entries
    #[arg(long)]
    allow_empty_version: bool,

    /// allow version without release date
    #[arg(long)]
    allow_missing_release_date: bool,

    /// allow section with invalid change type
    #[arg(long)]
    allow_invalid_change_type: bool,

    /// allow section with invalid change type ordering
    #[arg(long)]
    allow_invalid_change_type_order: bool,
}

impl AllowFlags {
    fn to_options(&self) -> ValidationOptions {
        ValidationOptions::new()
            .allow_empty_version(self.allow_empty_version)
            .allow_missing_release_date(self.allow_missing_release_date)
            .allow_invalid_change_type(self.allow_invalid_change_type)
            .allow_invalid_change_type_order(self.allow_invalid_change_type_order)
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    // stdout is reserved for command output
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<LintConfig> {
    match path {
        Some(path) => LintConfig::load_from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(LintConfig::load_or_default(".")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { file } => {
            handle_print(&file, &cli.format, ParseMode::Strict)?;
        }
        Commands::Lint { file } => {
            handle_print(&file, &cli.format, ParseMode::Lint)?;
        }
        Commands::Validate { file, mode, allow } => {
            let mode = mode.unwrap_or(config.mode);
            let options = config.validation.merge(allow.to_options());
            handle_validate(&file, &cli.format, mode, &options)?;
        }
    }

    Ok(())
}

fn read_changelog(file: &Path, mode: ParseMode) -> Result<Changelog> {
    parse_file_with_mode(file, mode)
        .with_context(|| format!("failed to parse changelog {}", file.display()))
}

fn handle_print(file: &Path, format: &OutputFormat, mode: ParseMode) -> Result<()> {
    let changelog = read_changelog(file, mode)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&changelog)?);
        }
        OutputFormat::Human => {
            print!("{}", render_markdown(&changelog));
        }
    }

    Ok(())
}

fn handle_validate(
    file: &Path,
    format: &OutputFormat,
    mode: ParseMode,
    options: &ValidationOptions,
) -> Result<()> {
    let changelog = read_changelog(file, mode)?;

    let issues = match validate_changelog(&changelog, options) {
        Ok(()) => Vec::new(),
        Err(err) => err.issues,
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "issues": issues });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for issue in &issues {
                println!("{}", issue);
            }
        }
    }

    if !issues.is_empty() {
        // return error to cause non-zero exit code
        anyhow::bail!("validation failed with {} issue(s)", issues.len());
    }

    Ok(())
}
