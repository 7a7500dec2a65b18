use amalgamate::{
    AmalgamationConfig, FeatureFlags, FixedRevision, GitRevision, InclusionPlan, Plans, Result,
    RevisionSource, amalgamate, check,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LONG_HELP: &str = r#"
Outputs:
  <SOURCE>                      - Amalgamated source
  dirname(<SOURCE>)/<INCLUDE>   - Amalgamated header

Examples:
  # Amalgamate into dist/arbiter.cpp and dist/arbiter.hpp
  arbiter-amalgamate
  # Run from outside the Arbiter checkout
  arbiter-amalgamate --top-dir ~/src/arbiter -s vendor/arbiter.cpp
  # Rely on an external jsoncpp and link against curl
  arbiter-amalgamate --no-json --curl
  # Nest everything in an outer namespace
  arbiter-amalgamate --namespace pdal
  # Verify every planned input exists without writing
  arbiter-amalgamate --check
  # Show the inclusion plans as JSON
  arbiter-amalgamate --list=json

Logging:
  RUST_LOG overrides the level chosen by -v / -q.
"#;

/// Amalgamate the Arbiter library into a single header and source file.
#[derive(Parser, Debug)]
#[command(
    name = "arbiter-amalgamate",
    version,
    about = "Generate a single amalgamated source and header file from the Arbiter sources.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Output .cpp source path
    #[arg(short, long = "source", value_name = "PATH", default_value = "dist/arbiter.cpp")]
    source: PathBuf,

    /// Header include path. Used to include the header from the amalgamated source file
    #[arg(short, long = "include", value_name = "PATH", default_value = "arbiter.hpp")]
    include: String,

    /// Source top-directory [default: current directory]
    #[arg(short, long, value_name = "DIR", env = "ARBITER_TOP_DIR")]
    top_dir: Option<PathBuf>,

    /// Don't bundle the JSON library; define ARBITER_EXTERNAL_JSON instead
    #[arg(long)]
    no_json: bool,

    /// Don't bundle the XML library; define ARBITER_EXTERNAL_XML instead
    #[arg(long)]
    no_xml: bool,

    /// Define ARBITER_CURL to enable the curl transport
    #[arg(long)]
    curl: bool,

    /// Wrap the library in this outer namespace (ARBITER_CUSTOM_NAMESPACE)
    #[arg(long, value_name = "NAMESPACE")]
    namespace: Option<String>,

    /// Revision to embed instead of reading it from .git
    #[arg(long, value_name = "REV")]
    revision: Option<String>,

    /// Verify that every planned input exists, without writing anything
    #[arg(long, conflicts_with = "list")]
    check: bool,

    /// Print the inclusion plans (optionally with format: plain, json)
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "plain", conflicts_with = "check")]
    list: Option<ListFormat>,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum ListFormat {
    /// One line per file
    Plain,
    /// JSON output for scripting
    Json,
}

#[derive(Serialize)]
struct ListedEntry<'a> {
    path: &'a str,
    gate: amalgamate::Gate,
    wrap_in_comment: bool,
    enabled: bool,
}

#[derive(Serialize)]
struct ListedPlans<'a> {
    license: &'a str,
    flags: &'a FeatureFlags,
    header: Vec<ListedEntry<'a>>,
    source: Vec<ListedEntry<'a>>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let plans = Plans::arbiter();

    let result = if cli.check {
        run_check(&config, &plans, cli.quiet)
    } else if let Some(list_format) = cli.list {
        list_plans(&config, &plans, list_format)
    } else {
        run_amalgamate(&cli, &config, &plans)
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(cli: &Cli) -> Result<AmalgamationConfig> {
    let top_dir = match &cli.top_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    Ok(AmalgamationConfig {
        top_dir,
        target_source_path: cli.source.clone(),
        header_include_path: cli.include.clone(),
        flags: FeatureFlags {
            bundled_json: !cli.no_json,
            bundled_xml: !cli.no_xml,
            curl: cli.curl,
            custom_namespace: cli.namespace.clone(),
        },
        ..AmalgamationConfig::default()
    })
}

fn run_amalgamate(cli: &Cli, config: &AmalgamationConfig, plans: &Plans) -> Result<()> {
    let revision: Box<dyn RevisionSource> = match &cli.revision {
        Some(rev) => Box::new(FixedRevision::new(rev.clone())),
        None => Box::new(GitRevision::new(&config.top_dir)),
    };

    let report = amalgamate(config, plans, revision.as_ref())?;
    info!(
        header = %report.header_path.display(),
        header_files = report.header_files,
        source = %report.source_path.display(),
        source_files = report.source_files,
        "Amalgamation complete"
    );

    if !cli.quiet {
        println!("Source successfully amalgamated");
    }
    Ok(())
}

fn run_check(config: &AmalgamationConfig, plans: &Plans, quiet: bool) -> Result<()> {
    info!(top_dir = %config.top_dir.display(), "Checking planned inputs...");
    let missing = check(config, plans);

    if !quiet {
        for path in &missing {
            println!("  ✗ {path}");
        }
    }

    if missing.is_empty() {
        if !quiet {
            println!("All planned inputs present");
        }
        Ok(())
    } else {
        eprintln!("{} planned input(s) missing", missing.len());
        std::process::exit(1);
    }
}

fn listed<'a>(plan: &'a InclusionPlan, flags: &FeatureFlags) -> Vec<ListedEntry<'a>> {
    plan.entries()
        .iter()
        .map(|entry| ListedEntry {
            path: &entry.path,
            gate: entry.gate,
            wrap_in_comment: entry.wrap_in_comment,
            enabled: entry.gate.is_open(flags),
        })
        .collect()
}

fn list_plans(config: &AmalgamationConfig, plans: &Plans, format: ListFormat) -> Result<()> {
    let listing = ListedPlans {
        license: &config.license_path,
        flags: &config.flags,
        header: listed(&plans.header, &config.flags),
        source: listed(&plans.source, &config.flags),
    };

    match format {
        ListFormat::Plain => {
            println!("license: {}", listing.license);
            for (name, entries) in [("header", &listing.header), ("source", &listing.source)] {
                println!("{name}:");
                for entry in entries {
                    let mark = if entry.enabled { "+" } else { "-" };
                    println!("  {mark} {}", entry.path);
                }
            }
        }
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&listing)?;
            println!("{json}");
        }
    }

    Ok(())
}
