use clap::{Parser, ValueEnum};
use globset::{Glob, GlobSet, GlobSetBuilder};
use scaffold::{MatchMode, Result, Scaffold, ScaffoldError};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const LONG_HELP: &str = r#"
Token definitions (scaffold.toml at the template root):
  [[token]]
  name = "{{name}}"           - text replaced in paths and contents
  value = "default"           - literal value
  token = "{{other}}"         - inherit the resolved value of another token
  key = "project"             - overlay key for --set (defaults to name)
  modifiers = ["slug"]        - transforms applied in order
  localize = ["src/api"]      - only substitute under these paths
  priority = 2                - higher priorities are substituted first

Built-in modifiers:
  lower, upper, slug, snake, camel, pascal, title, plural, singular

Examples:
  # Generate a new tree
  scaffold templates/service out/billing --set '{{name}}=billing'
  # Preview paths without writing anything
  scaffold templates/service out/billing --set '{{name}}=billing' --dry-run
  # Show resolved token values
  scaffold templates/service --list=detailed --set '{{name}}=billing'
  # Output as JSON for scripting
  scaffold templates/service --list=json
  # Skip files from the template
  scaffold templates/service out/billing -x '*.orig' -x 'target'
"#;

/// Generate project trees from token-annotated templates.
#[derive(Parser, Debug)]
#[command(
    name = "scaffold",
    version,
    about = "Generate project trees from token-annotated templates.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Template directory containing scaffold.toml
    #[arg(value_name = "TEMPLATE", env = "SCAFFOLD_TEMPLATE_DIR")]
    template: PathBuf,

    /// Destination directory for the generated tree
    #[arg(value_name = "DEST", required_unless_present = "list")]
    destination: Option<PathBuf>,

    /// Token value overriding the definition (repeatable)
    #[arg(short, long = "set", value_name = "NAME=VALUE", action = clap::ArgAction::Append)]
    set: Vec<String>,

    /// How token names are matched (defaults to the template's setting)
    #[arg(short, long, value_enum)]
    match_mode: Option<CliMatchMode>,

    /// Exclude glob patterns (repeatable). Patterns are relative to the template directory
    #[arg(short = 'x', long = "exclude", value_name = "GLOB", action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Show what would be generated without writing anything
    #[arg(long, conflicts_with = "list")]
    dry_run: bool,

    /// List resolved tokens (optionally with format: plain, detailed, json)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "plain", conflicts_with = "dry_run")]
    list: Option<ListFormat>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliMatchMode {
    /// Exact substring matching
    Literal,
    /// Token names are regular expressions
    Pattern,
}

impl From<CliMatchMode> for MatchMode {
    fn from(mode: CliMatchMode) -> Self {
        match mode {
            CliMatchMode::Literal => Self::Literal,
            CliMatchMode::Pattern => Self::Pattern,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum ListFormat {
    /// NAME=VALUE per line
    Plain,
    /// Value, priority and scope of each token
    Detailed,
    /// JSON output for scripting
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut scaffold = Scaffold::init(&cli.template)?;

    if let Some(mode) = cli.match_mode {
        scaffold = scaffold.with_match_mode(mode.into());
    }
    if !cli.exclude.is_empty() {
        scaffold = scaffold.with_exclude(build_exclude(&cli.exclude)?);
    }
    for assignment in &cli.set {
        let (name, value) = parse_assignment(assignment)?;
        scaffold.register_token_value(name, value);
    }

    if let Some(format) = cli.list {
        return list_tokens(&scaffold, format);
    }

    let Some(destination) = &cli.destination else {
        // clap enforces DEST unless --list is given
        return Ok(());
    };

    if cli.dry_run {
        dry_run(&scaffold, destination)
    } else {
        make(scaffold, destination, cli.quiet)
    }
}

fn build_exclude(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(ScaffoldError::InvalidAssignment {
            assignment: assignment.to_string(),
        }),
    }
}

fn make(mut scaffold: Scaffold, destination: &Path, quiet: bool) -> Result<()> {
    if !quiet {
        scaffold.on_make(|path| println!("{}", path.display()));
    }

    let generated = scaffold.make(destination)?;
    tracing::info!(
        files = generated.len(),
        destination = %destination.display(),
        "generation complete"
    );
    Ok(())
}

fn dry_run(scaffold: &Scaffold, destination: &Path) -> Result<()> {
    let planned = scaffold.plan()?;

    for entry in &planned {
        let suffix = if entry.is_dir { "/" } else { "" };
        println!(
            "{}{suffix} -> {}{suffix}",
            entry.source.display(),
            destination.join(&entry.destination).display()
        );
    }

    let files = planned.iter().filter(|e| !e.is_dir).count();
    println!(
        "\nSummary: {} directories, {files} files",
        planned.len() - files
    );
    Ok(())
}

fn list_tokens(scaffold: &Scaffold, format: ListFormat) -> Result<()> {
    let resolved = scaffold.resolve();

    match format {
        ListFormat::Plain => {
            for token in &resolved {
                println!("{}={}", token.name, token.value);
            }
        }
        ListFormat::Detailed => {
            for token in &resolved {
                println!("Token: {}", token.name);
                println!("  Value: {}", token.value);
                println!("  Priority: {}", token.priority);
                match &token.scope {
                    Some(prefixes) => println!("  Scope: {}", prefixes.join(", ")),
                    None => println!("  Scope: global"),
                }
                println!();
            }
        }
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&resolved)?;
            println!("{json}");
        }
    }

    Ok(())
}
