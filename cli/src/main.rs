//! rewire CLI: driving adapter for the rewire rewriting engine.
//!
//! Subcommands:
//! - `rewrite <files>... [--context <file>] [--format json|yaml]`: rewrite manifests into
//!   routing entries
//! - `detect <files>... [--context <file>]`: show which rewriter claims each manifest
//! - `check <file>`: validate a context file loads without errors
//! - `info`: print registered rewriters

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rewire::{Manifest, RewriteContext, RewriterRegistry, RoutingEntry};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Rewrite ingress manifests into proxy routing entries.
#[derive(Parser, Debug)]
#[command(name = "rewire", version)]
struct Cli {
    /// Log at debug level (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite every manifest and print the aggregated routing entries
    Rewrite {
        /// Manifest files (YAML may hold several documents)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Rewrite context file (`config` + `services`)
        #[arg(long, short = 'c')]
        context: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },

    /// Print which rewriter matches each manifest
    Detect {
        /// Manifest files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Rewrite context file
        #[arg(long, short = 'c')]
        context: Option<PathBuf>,
    },

    /// Validate a context file
    Check {
        /// Rewrite context file
        file: PathBuf,
    },

    /// Print registered rewriters in dispatch order
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins, otherwise `warn` (`debug` with `-v`).
fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Rewrite {
            files,
            context,
            format,
        } => cmd_rewrite(&files, context.as_deref(), format),
        Command::Detect { files, context } => cmd_detect(&files, context.as_deref()),
        Command::Check { file } => cmd_check(&file),
        Command::Info => {
            cmd_info();
            Ok(())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_rewrite(files: &[PathBuf], context: Option<&Path>, format: Format) -> Result<()> {
    let ctx = load_context(context)?;
    let manifests = load_manifests(files)?;
    let registry = build_registry();

    let entries = registry
        .rewrite_all(&manifests, &ctx)
        .context("rewrite failed")?;
    debug!(
        manifests = manifests.len(),
        entries = entries.len(),
        "rewrite complete"
    );

    print!("{}", render(&entries, format)?);
    Ok(())
}

fn cmd_detect(files: &[PathBuf], context: Option<&Path>) -> Result<()> {
    let ctx = load_context(context)?;
    let manifests = load_manifests(files)?;
    let registry = build_registry();

    for manifest in &manifests {
        let rewriter = registry.find(manifest, &ctx).map_or("-", |r| r.name());
        println!("{}\t{rewriter}", manifest.display_name());
    }
    Ok(())
}

fn cmd_check(file: &Path) -> Result<()> {
    let ctx = load_context(Some(file))?;
    println!(
        "Context valid ({} ingress type(s), {} service alias(es))",
        ctx.ingress_types().len(),
        ctx.services.aliases.len()
    );
    Ok(())
}

fn cmd_info() {
    let registry = build_registry();

    println!("Registered rewriters:");
    for name in registry.names() {
        println!("  {name}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry assembly (composition root)
// ═══════════════════════════════════════════════════════════════════════════════

fn build_registry() -> RewriterRegistry {
    let builder = rewire::RewriterRegistryBuilder::new();
    rewire_traefik::register(builder).build()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════════════════

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read \"{}\"", path.display()))
}

fn load_context(path: Option<&Path>) -> Result<RewriteContext> {
    let Some(path) = path else {
        return Ok(RewriteContext::default());
    };
    parse_context(&read(path)?, is_json(path))
        .with_context(|| format!("invalid context \"{}\"", path.display()))
}

fn parse_context(content: &str, json: bool) -> Result<RewriteContext> {
    if json {
        Ok(RewriteContext::from_json(content)?)
    } else {
        // Default to YAML (handles .yaml and .yml)
        Ok(RewriteContext::from_yaml(content)?)
    }
}

fn load_manifests(paths: &[PathBuf]) -> Result<Vec<Manifest>> {
    let mut manifests = Vec::new();
    for path in paths {
        let found = parse_manifests(&read(path)?, is_json(path))
            .with_context(|| format!("invalid manifest \"{}\"", path.display()))?;
        debug!(file = %path.display(), documents = found.len(), "loaded manifests");
        manifests.extend(found);
    }
    Ok(manifests)
}

fn parse_manifests(content: &str, json: bool) -> Result<Vec<Manifest>> {
    if json {
        Ok(vec![Manifest::from_json(content)?])
    } else {
        Ok(Manifest::from_yaml_multi(content)?)
    }
}

fn render(entries: &[RoutingEntry], format: Format) -> Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(entries)? + "\n",
        Format::Yaml => serde_yaml::to_string(entries)?,
    })
}
