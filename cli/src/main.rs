use std::fs;
use std::path::{Path, PathBuf};

use api_decl_gen::{
    Diagnostics, DocLinkResolver, GenContext, OutputFormat, format_declarations, format_report,
    generate,
};
use api_decl_store::{GeneratorConfig, ManualOverrideStore, load_schema};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "api-decl")]
#[command(about = "Synthesize typed declarations from a runtime API schema")]
#[command(version)]
struct Cli {
    /// Log per-entity synthesis progress.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate declarations from a schema document and manual overrides.
    Generate(GenerateArgs),
    /// Load and validate a schema document, overrides and configuration.
    Validate(InputArgs),
    /// Print the documentation URL of one or more references.
    ResolveLink(ResolveLinkArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Schema document (runtime-api.json).
    #[arg(long)]
    schema: PathBuf,
    /// Override file or directory. Repeat to add fallbacks; the first source
    /// that loads wins.
    #[arg(long)]
    overrides: Vec<PathBuf>,
    /// Generator configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output file (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "declarations")]
    format: OutputFormat,
    /// Write a generation report to this path.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Report format.
    #[arg(long, default_value = "json")]
    report_format: OutputFormat,
    /// Exit with an error when any advisory diagnostic was recorded.
    #[arg(long)]
    deny_advisories: bool,
}

#[derive(Debug, Args)]
struct ResolveLinkArgs {
    /// Schema document the references are resolved against.
    #[arg(long)]
    schema: PathBuf,
    /// Generator configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// References such as `LuaEntity`, `LuaEntity::health` or `defines.direction`.
    #[arg(required = true)]
    references: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
        Command::ResolveLink(args) => run_resolve_link(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, String> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn load_overrides(paths: &[PathBuf]) -> Result<ManualOverrideStore, String> {
    match paths {
        [] => Ok(ManualOverrideStore::empty()),
        [path] if path.is_dir() => ManualOverrideStore::from_dir(path)
            .map_err(|e| format!("Failed to load overrides '{}': {e}", path.display())),
        [path] => ManualOverrideStore::from_file(path)
            .map_err(|e| format!("Failed to load overrides '{}': {e}", path.display())),
        paths => {
            let builder = paths
                .iter()
                .fold(ManualOverrideStore::builder(), |builder, path| {
                    if path.is_dir() {
                        builder.from_dir(path)
                    } else {
                        builder.from_file(path)
                    }
                });
            builder.build().map_err(|e| e.to_string())
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    fs::write(path, contents).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let schema = load_schema(&args.input.schema).map_err(|e| {
        format!(
            "Failed to load schema '{}': {e}",
            args.input.schema.display()
        )
    })?;
    let overrides = load_overrides(&args.input.overrides)?;
    let config = load_config(args.input.config.as_deref())?;

    let run = generate(&schema, &overrides, &config).map_err(|e| e.to_string())?;
    let raw = match args.format {
        OutputFormat::Declarations => run.printed.clone(),
        format => format_declarations(&run.declarations, format)?,
    };

    match &args.output {
        Some(path) => {
            write_file(path, &raw)?;
            println!(
                "Wrote {} declaration(s) to '{}'.",
                run.declarations.len(),
                path.display()
            );
        }
        None => print!("{raw}"),
    }

    if let Some(path) = &args.report {
        let report = format_report(&run.report, args.report_format)?;
        write_file(path, &report)?;
    }

    let advisories = run.report.advisories.len();
    if advisories > 0 {
        let breakdown: Vec<String> = run
            .report
            .advisory_summary
            .iter()
            .map(|(code, count)| format!("{count} {code}"))
            .collect();
        eprintln!("{advisories} advisory diagnostic(s): {}", breakdown.join(", "));
        if args.deny_advisories {
            return Err("advisory diagnostics denied by --deny-advisories".to_string());
        }
    }

    Ok(())
}

fn run_validate(args: InputArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)
        .map_err(|e| format!("Failed to load schema '{}': {e}", args.schema.display()))?;
    let overrides = load_overrides(&args.overrides)?;
    load_config(args.config.as_deref())?;

    println!(
        "Validated schema for API {}: {} builtin(s), {} class(es), {} concept(s), {} event(s), {} constants root(s), {} global(s); {} override(s).",
        if schema.application_version.is_empty() {
            "(unknown version)"
        } else {
            schema.application_version.as_str()
        },
        schema.builtin_types.len(),
        schema.classes.len(),
        schema.concepts.len(),
        schema.events.len(),
        schema.defines.len(),
        schema.global_objects.len(),
        overrides.len()
    );
    Ok(())
}

fn run_resolve_link(args: ResolveLinkArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)
        .map_err(|e| format!("Failed to load schema '{}': {e}", args.schema.display()))?;
    let config = load_config(args.config.as_deref())?;
    let overrides = ManualOverrideStore::empty();
    let ctx = GenContext::new(&schema, &overrides, &config);
    let links = DocLinkResolver::new(&ctx);

    let mut diagnostics = Diagnostics::new();
    for reference in &args.references {
        let url = links.resolve(&mut diagnostics, "resolve-link", reference);
        println!("{reference}\t{url}");
    }

    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(format!("{} reference(s) did not resolve", diagnostics.len()))
    }
}
