// cmdfile: check, print and reformat command tree files

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cmdfile::format::{find_duplicate_siblings, render_tree, to_dsl};
use cmdfile::types::PassthroughArgumentTypeParser;
use cmdfile::{CommandFileReader, LiteralNode};

#[derive(Debug, Parser)]
#[command(name = "cmdfile", version, about = "Read and inspect command tree files")]
struct Cli {
    /// Accept any type in this namespace, keeping its parameters verbatim
    #[arg(long = "namespace", value_name = "NS", global = true)]
    namespaces: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a file and report problems
    Check {
        /// Command file, or - for stdin
        file: PathBuf,
        /// Fail when a node has two children with the same name
        #[arg(long)]
        deny_duplicates: bool,
    },
    /// Print the tree as an outline
    Tree {
        /// Command file, or - for stdin
        file: PathBuf,
    },
    /// Print the tree as JSON
    Json {
        /// Command file, or - for stdin
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the file in canonical form
    Fmt {
        /// Command file, or - for stdin
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_reader(namespaces: &[String]) -> CommandFileReader {
    let mut builder = CommandFileReader::builder().with_builtin_types();
    for namespace in namespaces {
        debug!(%namespace, "registering passthrough namespace");
        builder = builder
            .with_argument_type_parser(PassthroughArgumentTypeParser::new(namespace.as_str()));
    }
    builder.build()
}

fn read(reader: &CommandFileReader, file: &Path) -> Result<LiteralNode, Box<dyn Error>> {
    let tree = if file.as_os_str() == "-" {
        reader.parse_reader(io::stdin().lock())?
    } else {
        reader.parse_path(file)?
    };
    Ok(tree)
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let reader = build_reader(&cli.namespaces);

    match cli.command {
        Command::Check {
            file,
            deny_duplicates,
        } => {
            let tree = read(&reader, &file)?;
            let duplicates = find_duplicate_siblings(&tree);
            for dup in &duplicates {
                eprintln!(
                    "warning: duplicate child '{}' under {}",
                    dup.name,
                    dup.path.join(" ")
                );
            }
            if deny_duplicates && !duplicates.is_empty() {
                return Err(format!("{} duplicate sibling name(s)", duplicates.len()).into());
            }
            println!(
                "{}: ok, root '{}' with {} node(s)",
                file.display(),
                tree.name,
                tree.node_count()
            );
        }
        Command::Tree { file } => {
            let tree = read(&reader, &file)?;
            print!("{}", render_tree(&tree));
        }
        Command::Json { file, pretty } => {
            let tree = read(&reader, &file)?;
            let json = if pretty {
                serde_json::to_string_pretty(&tree)?
            } else {
                serde_json::to_string(&tree)?
            };
            println!("{}", json);
        }
        Command::Fmt { file } => {
            let tree = read(&reader, &file)?;
            print!("{}", to_dsl(&tree));
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
