//! Command-line interface for lsystem
//! This binary expands L-system definition files and prints the resulting axiom.
//!
//! Usage:
//!   lsystem expand `<path>` [--iterations `<n>`] [--format `<format>`]  - Expand a definition file
//!   lsystem list-formats                                            - List all available formats
//!
//! Pass `-v` (debug) or `-vv` (trace) to any subcommand for log output on stderr.

use clap::{Arg, ArgAction, Command};
use lsystem::{FormatRegistry, LSystem, LSystemConfig};
use tracing::Level;

fn main() {
    let matches = Command::new("lsystem")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Expand L-system definitions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (repeatable)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("expand")
                .about("Iterate a definition file and print the resulting axiom")
                .arg(
                    Arg::new("path")
                        .help("Path to a .yaml, .yml or .json definition")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .short('n')
                        .help("Override the number of iterations")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'symbols', 'parametric', 'json')")
                        .default_value("symbols"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("expand", expand_matches)) => {
            let path = expand_matches
                .get_one::<String>("path")
                .expect("path is required");
            let iterations = expand_matches.get_one::<usize>("iterations").copied();
            let format = expand_matches
                .get_one::<String>("format")
                .expect("format has a default");
            handle_expand_command(path, iterations, format);
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Handle the expand command
fn handle_expand_command(path: &str, iterations: Option<usize>, format: &str) {
    let config = LSystemConfig::load(path).unwrap_or_else(|e| {
        eprintln!("Error loading definition: {}", e);
        std::process::exit(1);
    });

    let mut system = LSystem::from_config(&config).unwrap_or_else(|e| {
        eprintln!("Invalid definition: {}", e);
        std::process::exit(1);
    });

    match iterations {
        Some(n) => system.iterate_n(n),
        None => system.iterate(),
    };

    let output = system.serialize(format).unwrap_or_else(|e| {
        eprintln!("Serialization error: {}", e);
        std::process::exit(1);
    });

    println!("{}", output.trim_end());
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::builtin();
    println!("Available formats:\n");
    for formatter in registry.formats() {
        println!("  {}", formatter.name());
        println!("    {}", formatter.description());
    }
}
