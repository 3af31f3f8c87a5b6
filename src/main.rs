//! hwacc-bind - Accelerator Symbol Binding
//!
//! CLI for inspecting symbol decoding, library resolution and registration.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hwacc_bind::config::BindConfig;
use hwacc_bind::ffi::{LibraryResolver, NameGrammar, SignatureBuilder};
use hwacc_bind::registrar::{self, RecordingEngine, Registrar};
use hwacc_bind::EntryPoint;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hwacc-bind")]
#[command(version)]
#[command(about = "Bind encoded accelerator symbols to a native library", long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode symbol names and print their native signatures
    Decode {
        /// Symbol names, e.g. linalg_matmul_2x3xf32
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Locate and validate the accelerator library
    Resolve {
        #[command(flatten)]
        source: ConfigArgs,
    },

    /// Register the symbols listed in a file (one per line)
    Bind {
        /// File with one symbol name per line; `#` starts a comment
        symbols: PathBuf,

        #[command(flatten)]
        source: ConfigArgs,
    },
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Colon-separated search path (overrides config and LD_LIBRARY_PATH)
    #[arg(long)]
    search_path: Option<String>,

    /// Config file (default: hwacc.toml in the current directory or a parent)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Entry point bound symbols target (hwacc_debug or matmul_f32)
    #[arg(long, value_parser = parse_entry_point)]
    entry_point: Option<EntryPoint>,
}

fn parse_entry_point(s: &str) -> std::result::Result<EntryPoint, String> {
    EntryPoint::from_symbol(s).ok_or_else(|| format!("unknown entry point `{}`", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Decode { symbols } => cmd_decode(&symbols),
        Commands::Resolve { source } => cmd_resolve(&source),
        Commands::Bind { symbols, source } => cmd_bind(&symbols, &source),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &ConfigArgs) -> Result<BindConfig> {
    let mut config = if let Some(search_path) = &args.search_path {
        BindConfig::from_search_path(search_path)
    } else if let Some(path) = &args.config {
        BindConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        match BindConfig::find_and_load(&cwd)? {
            Some(config) => config,
            None => BindConfig::from_env()?,
        }
    };

    if let Some(entry_point) = args.entry_point {
        config = config.with_entry_point(entry_point);
    }
    Ok(config)
}

fn cmd_decode(symbols: &[String]) -> Result<()> {
    let grammar = NameGrammar::new();
    let builder = SignatureBuilder::new(*grammar.vocabulary());

    let staged = registrar::signatures(&grammar, &builder, symbols)?;
    if staged.is_empty() {
        bail!("No symbol starts with `{}`", grammar.prefix());
    }
    for (name, signature) in staged {
        println!("{}: {}", name, signature);
    }
    Ok(())
}

fn cmd_resolve(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args)?;
    let library = LibraryResolver::new(config.search_path).resolve()?;

    for attempt in library.attempts() {
        println!("  {}", attempt);
    }
    println!("Using {}", library.path().display());
    Ok(())
}

fn cmd_bind(symbols: &Path, args: &ConfigArgs) -> Result<()> {
    let content = fs::read_to_string(symbols).context("Failed to read symbol file")?;
    let module: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let config = load_config(args)?;
    let registrar = Registrar::new(&config)?;

    let mut engine = RecordingEngine::new();
    let bound = registrar.register(&mut engine, &module)?;

    println!(
        "Registered {} of {} symbols against {}",
        bound.len(),
        module.len(),
        registrar.library().path().display()
    );
    for function in engine.registered() {
        println!("  {}", function);
    }
    Ok(())
}
