//! Batch release-title parser.
//!
//! Reads titles from the command line or stdin (one per line) and prints one
//! record per title, in input order.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use shirabe_core::{Episode, Parser, ParserConfig, TitleLanguage};
use tracing::{debug, warn};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One JSON object per line
    Json,
    /// Indented JSON
    Pretty,
    /// Human-readable summary, tab-separated from the input
    Text,
}

/// CLI arguments
#[derive(ClapParser, Debug)]
#[command(name = "shirabe-parse")]
#[command(about = "Parse fansub release titles into episode records")]
#[command(version)]
struct Cli {
    /// Titles to parse; read from stdin when omitted
    titles: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Include the standardized title and token list in the output
    #[arg(long)]
    tokens: bool,

    /// Title language preference, comma separated
    #[arg(long, env = "SHIRABE_PREFER", value_delimiter = ',', default_value = "en,zh,jp")]
    prefer: Vec<TitleLanguage>,

    /// Worker threads (0 = rayon default)
    #[arg(short, long, default_value_t = 0)]
    jobs: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// One output record.
#[derive(Debug, Serialize)]
struct ParseOutput {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    standardized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens: Option<Vec<String>>,
    #[serde(flatten)]
    episode: Episode,
}

impl ParseOutput {
    fn new(parser: &Parser, input: &str, with_tokens: bool) -> Self {
        if with_tokens {
            let parsed = parser.parse_detailed(input);
            Self {
                input: input.to_string(),
                standardized: Some(parsed.standardized),
                tokens: Some(parsed.tokens.into_iter().map(|t| t.text).collect()),
                episode: parsed.episode,
            }
        } else {
            Self {
                input: input.to_string(),
                standardized: None,
                tokens: None,
                episode: parser.parse(input),
            }
        }
    }
}

/// Collects titles from `args`, or from `reader` when `args` is empty.
/// Blank entries are skipped.
fn read_titles<R: BufRead>(args: &[String], reader: R) -> Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect());
    }

    let mut titles = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read title from stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            titles.push(line.to_string());
        }
    }
    Ok(titles)
}

/// Runs `f` inside a dedicated pool of `jobs` threads, or on the global
/// pool when `jobs` is 0.
fn scoped<R: Send>(jobs: usize, f: impl FnOnce() -> R + Send) -> Result<R> {
    if jobs == 0 {
        return Ok(f());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("failed to build thread pool")?;
    Ok(pool.install(f))
}

fn write_output<W: Write>(out: &mut W, record: &ParseOutput, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer(&mut *out, record).context("failed to serialize record")?;
            writeln!(out)?;
        }
        Format::Pretty => {
            serde_json::to_writer_pretty(&mut *out, record)
                .context("failed to serialize record")?;
            writeln!(out)?;
        }
        Format::Text => {
            writeln!(out, "{}\t{}", record.input, record.episode)?;
            if let Some(ref tokens) = record.tokens {
                writeln!(out, "\ttokens: {tokens:?}")?;
            }
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let titles = read_titles(&cli.titles, io::stdin().lock())?;
    debug!(count = titles.len(), jobs = cli.jobs, "parsing titles");

    let config = ParserConfig::new().with_title_order(cli.prefer.clone());
    let parser = Parser::new(config).context("failed to build parser")?;

    let records: Vec<ParseOutput> = scoped(cli.jobs, || {
        titles
            .par_iter()
            .map(|title| ParseOutput::new(&parser, title, cli.tokens))
            .collect()
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        if record.episode.episode.number.is_none() {
            warn!(input = %record.input, "no episode number recognized");
        }
        write_output(&mut out, record, cli.format)?;
    }
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbose flag picks the level
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "shirabe_parse=debug,shirabe_core=trace".to_string()
        } else {
            "shirabe_parse=warn,shirabe_core=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(io::stderr)
        .init();

    run(&cli)
}
