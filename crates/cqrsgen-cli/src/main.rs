//! cqrsgen CLI - Command-line interface for CQRS handler registration codegen
//!
//! This binary reads a declaration snapshot exported by the host compiler
//! and writes the C# unit that registers every CQRS handler it finds.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use cqrsgen_cli::commands;
use cqrsgen_cli::input::parse_property;
use cqrsgen_cli::logging;

/// cqrsgen - CQRS handler registration generator
#[derive(Parser)]
#[command(name = "cqrsgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the registration unit from a declaration snapshot
    Generate {
        /// Path to the declaration snapshot (JSON)
        #[arg(short, long)]
        decls: String,

        /// Directory the generated unit is written into
        #[arg(short, long, default_value = "generated")]
        out_dir: String,

        /// Local settings file (TOML), overrides build-wide properties
        #[arg(short, long)]
        config: Option<String>,

        /// Build-wide property override (repeatable)
        #[arg(short = 'p', long = "property", value_name = "NAME=VALUE", value_parser = parse_property)]
        properties: Vec<(String, String)>,

        /// Treat rejected extension points as errors
        #[arg(long)]
        deny_warnings: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate extension points without generating code
    Validate {
        /// Path to the declaration snapshot (JSON)
        #[arg(short, long)]
        decls: String,

        /// Local settings file (TOML), overrides build-wide properties
        #[arg(short, long)]
        config: Option<String>,

        /// Build-wide property override (repeatable)
        #[arg(short = 'p', long = "property", value_name = "NAME=VALUE", value_parser = parse_property)]
        properties: Vec<(String, String)>,

        /// Treat rejected extension points as errors
        #[arg(long)]
        deny_warnings: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the handler registrations found in a snapshot
    Scan {
        /// Path to the declaration snapshot (JSON)
        #[arg(short, long)]
        decls: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show resolved settings and where each value came from
    Config {
        /// Declaration snapshot whose options bag seeds both sources
        #[arg(short, long)]
        decls: Option<String>,

        /// Local settings file (TOML), overrides build-wide properties
        #[arg(short, long)]
        config: Option<String>,

        /// Build-wide property override (repeatable)
        #[arg(short = 'p', long = "property", value_name = "NAME=VALUE", value_parser = parse_property)]
        properties: Vec<(String, String)>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: {}", colored::Colorize::yellow("warning"), e);
    }

    let result = match cli.command {
        Commands::Generate {
            decls,
            out_dir,
            config,
            properties,
            deny_warnings,
            json,
        } => commands::generate::run(
            &commands::generate::GenerateArgs {
                decls_path: &decls,
                out_dir: &out_dir,
                settings: config.as_deref(),
                properties: &properties,
                deny_warnings,
            },
            json,
        ),
        Commands::Validate {
            decls,
            config,
            properties,
            deny_warnings,
            json,
        } => commands::validate::run(&decls, config.as_deref(), &properties, deny_warnings, json),
        Commands::Scan { decls, json } => commands::scan::run(&decls, json),
        Commands::Config {
            decls,
            config,
            properties,
            json,
        } => commands::config::run(decls.as_deref(), config.as_deref(), &properties, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
