use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use fencepost_search::{IndexConfig, TextIndex};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fencepost")]
#[command(about = "Whole-word search with context over chunked files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML file with [chunker] and [search] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find whole-word occurrences of a word with surrounding context
    Search(SearchArgs),

    /// Show how a file is split into chunks
    Chunks(ChunksArgs),
}

#[derive(Args)]
struct TuningArgs {
    /// Chunk size in bytes (overrides the config file)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Per-word byte estimate used to size fences (overrides the config file)
    #[arg(long)]
    max_word_bytes: Option<usize>,
}

#[derive(Args)]
struct SearchArgs {
    /// File to search
    file: PathBuf,

    /// Word to look for (case-insensitive, literal)
    word: String,

    /// Number of context words on each side
    #[arg(long, short = 'c', default_value_t = 0)]
    context: usize,

    #[command(flatten)]
    tuning: TuningArgs,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ChunksArgs {
    /// File to split
    file: PathBuf,

    #[command(flatten)]
    tuning: TuningArgs,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ChunkRow {
    index: usize,
    offset: usize,
    len: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match &cli.command {
        Commands::Search(args) => run_search(args, cli.config.as_deref()),
        Commands::Chunks(args) => run_chunks(args, cli.config.as_deref()),
    }
}

fn load_config(path: Option<&Path>, tuning: &TuningArgs) -> Result<IndexConfig> {
    let mut config = match path {
        Some(path) => IndexConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => IndexConfig::default(),
    };
    if let Some(chunk_size) = tuning.chunk_size {
        config.chunker.chunk_size = chunk_size;
    }
    if let Some(max_word_bytes) = tuning.max_word_bytes {
        config.search.max_word_bytes = max_word_bytes;
    }
    config.validate()?;
    log::debug!("Using {config:?}");
    Ok(config)
}

fn build_index(file: &Path, config: &IndexConfig) -> Result<TextIndex> {
    TextIndex::build_with(file, config)
        .with_context(|| format!("Failed to read {}", file.display()))
}

fn run_search(args: &SearchArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, &args.tuning)?;
    let index = build_index(&args.file, &config)?;

    let matches = index
        .find(&args.word, args.context)
        .with_context(|| format!("Search for {:?} failed", args.word))?;
    log::info!(
        "{} matches for {:?} in {}",
        matches.len(),
        args.word,
        args.file.display()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        for m in &matches {
            println!("{}", m.render());
        }
    }
    Ok(())
}

fn run_chunks(args: &ChunksArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, &args.tuning)?;
    let index = build_index(&args.file, &config)?;

    let rows: Vec<ChunkRow> = index
        .chunks()
        .iter()
        .map(|chunk| ChunkRow {
            index: chunk.index,
            offset: chunk.offset,
            len: chunk.len(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!(
            "{}: {} bytes in {} chunks",
            args.file.display(),
            index.len(),
            rows.len()
        );
        for row in &rows {
            println!("  #{:<5} offset {:>10}  len {:>6}", row.index, row.offset, row.len);
        }
    }
    Ok(())
}
