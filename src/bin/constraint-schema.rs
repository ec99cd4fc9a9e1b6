//! Constraint Schema CLI
//!
//! Command-line interface for generating JSON Schemas from validation rule records.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use constraint_schema::{
    generate_schemas, is_builtin, load_options, load_records, SchemaOptions, BUILTIN_KINDS,
};

#[derive(Parser)]
#[command(name = "constraint-schema")]
#[command(about = "Generate JSON Schemas from class validation rules")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one schema per class from a rule record file
    Generate {
        /// JSON file containing an array of rule records
        records: PathBuf,

        /// JSON options file (refPointerPrefix, skipMissingProperties, additionalConverters)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Prefix for $ref pointers (overrides the options file)
        #[arg(long)]
        ref_prefix: Option<String>,

        /// Only require properties marked isDefined (overrides the options file)
        #[arg(long, conflicts_with = "no_skip_missing_properties")]
        skip_missing_properties: bool,

        /// Require every property not marked isOptional (overrides the options file)
        #[arg(long)]
        no_skip_missing_properties: bool,

        /// Wrap output as {"definitions": {...}}
        #[arg(long)]
        definitions: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List rule kinds with a built-in converter, or check a single kind
    Kinds {
        /// Rule kind to check (exit code 1 if it has no built-in converter)
        kind: Option<String>,

        /// Output as a JSON array
        #[arg(long, conflicts_with = "kind")]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            records,
            options,
            ref_prefix,
            skip_missing_properties,
            no_skip_missing_properties,
            definitions,
            output,
            pretty,
        } => run_generate(GenerateArgs {
            records,
            options,
            ref_prefix,
            skip_missing_properties: if skip_missing_properties {
                Some(true)
            } else if no_skip_missing_properties {
                Some(false)
            } else {
                None
            },
            definitions,
            output,
            pretty,
        }),

        Commands::Kinds { kind, json } => run_kinds(kind.as_deref(), json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("CONSTRAINT_SCHEMA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Ignore failure: a subscriber may already be installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

struct GenerateArgs {
    records: PathBuf,
    options: Option<PathBuf>,
    ref_prefix: Option<String>,
    skip_missing_properties: Option<bool>,
    definitions: bool,
    output: Option<PathBuf>,
    pretty: bool,
}

fn run_generate(args: GenerateArgs) -> Result<(), u8> {
    let GenerateArgs {
        records: records_path,
        options: options_path,
        ref_prefix,
        skip_missing_properties,
        definitions,
        output,
        pretty,
    } = args;

    let records = load_records(&records_path).map_err(|e| {
        eprintln!("Error loading records: {}", e);
        e.exit_code() as u8
    })?;

    let mut options = match &options_path {
        Some(path) => load_options(path).map_err(|e| {
            eprintln!("Error loading options: {}", e);
            e.exit_code() as u8
        })?,
        None => SchemaOptions::new(),
    };
    if let Some(prefix) = ref_prefix {
        options.ref_pointer_prefix = prefix;
    }
    if let Some(skip) = skip_missing_properties {
        options.skip_missing_properties = skip;
    }

    tracing::debug!(
        records = records.len(),
        path = %records_path.display(),
        "generating schemas"
    );
    let schemas = generate_schemas(&records, &options);

    let value = if definitions {
        schemas.to_definitions()
    } else {
        schemas.to_value()
    };

    let json_output = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    write_output(output.as_deref(), &json_output)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), u8> {
    match output {
        Some(path) => {
            std::fs::write(path, content).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn run_kinds(kind: Option<&str>, json: bool) -> Result<(), u8> {
    if let Some(kind) = kind {
        if is_builtin(kind) {
            println!("{}: built-in", kind);
            return Ok(());
        }
        eprintln!("{}: no built-in converter", kind);
        return Err(1);
    }

    if json {
        let output = serde_json::to_string(BUILTIN_KINDS).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", output);
    } else {
        for kind in BUILTIN_KINDS {
            println!("{}", kind);
        }
    }
    Ok(())
}
