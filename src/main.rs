//! senserank CLI - rank word senses in a sense graph
//!
//! Pipeline:
//!
//! 1. Config: senserank.toml (searched upward) overridden by flags
//! 2. Graph loading: JSON graph file → in-memory sense graph
//! 3. Ranking: init priors, random walks, convergence per parse
//! 4. Rendering: senses per word, best first (text or JSON)

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use senserank::config::Config;
use senserank::graph::{GraphAccessor, GraphFile, ScoreStore, SenseGraph};
use senserank::ranking::{DocumentReport, SenseRanker};
use senserank::types::{DegenerateNeighbor, WalkStart};
use senserank::{DocumentId, Score, SenseId, WordId};

/// Rank candidate word senses by PageRank over a sense-similarity graph
///
/// Examples:
///   senserank graph.json                    # Rank with defaults
///   senserank graph.json --seed 7 --stats   # Reproducible run with report
///   senserank graph.json --json             # Machine-readable scores
#[derive(Parser, Debug)]
#[command(name = "senserank")]
#[command(version)]
#[command(about, long_about = None)]
pub struct Cli {
    /// Graph file (JSON: parses, words, senses, weighted edges)
    #[arg(value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Explicit config file
    ///
    /// Without this, senserank.toml is searched from the graph file's
    /// directory upward.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for the random walk (reproducible output)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// PageRank damping factor, in (0, 1)
    #[arg(long)]
    pub damping: Option<f64>,

    /// Weight of each new delta in the convergence average
    #[arg(long)]
    pub convergence_damper: Option<f64>,

    /// Average delta below which a walk stops
    #[arg(long)]
    pub convergence_limit: Option<f64>,

    /// Step cap per walk
    #[arg(long)]
    pub max_walk_steps: Option<usize>,

    /// Start a walk from every sense instead of once per word
    #[arg(long)]
    pub every_sense: bool,

    /// Fail a parse when a neighbor has zero incoming weight
    ///
    /// By default such neighbors contribute nothing to the rank sum.
    #[arg(long)]
    pub strict: bool,

    /// Print scores as JSON
    #[arg(long)]
    pub json: bool,

    /// Show per-parse statistics
    ///
    /// Walks started, disconnected senses, rank updates, convergence.
    #[arg(long)]
    pub stats: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Trace every walk and rank update on stderr
    #[arg(long)]
    pub diagnose: bool,
}

/// One scored sense in JSON output.
#[derive(Debug, Serialize)]
struct SenseRow<'a> {
    parse: usize,
    word: usize,
    token: &'a str,
    sense: &'a str,
    rank: f64,
    confidence: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let output = run(&cli)?;
    print!("{}", output);

    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = if cli.diagnose {
        Level::TRACE
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(cli: &Cli) -> Result<String> {
    let start = Instant::now();

    // ══════════════════════════════════════════════════════════════════════════
    // Stage 1: Config
    // ══════════════════════════════════════════════════════════════════════════
    let mut file_config = match &cli.config {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => {
            let dir = cli
                .graph
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            Config::load(&dir).context("Failed to load senserank.toml")?
        }
    };
    apply_overrides(cli, &mut file_config);
    file_config
        .ranking
        .validate()
        .context("Invalid ranking parameters")?;

    if cli.verbose {
        eprintln!("senserank v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("{}", file_config.display_summary());
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Stage 2: Graph loading
    // ══════════════════════════════════════════════════════════════════════════
    let loaded = GraphFile::load(&cli.graph)
        .and_then(|file| file.build())
        .with_context(|| format!("Failed to load graph '{}'", cli.graph.display()))?;
    let mut graph = loaded.graph;

    if cli.verbose {
        eprintln!(
            "✓ Loaded {} senses, {} edges ({:.2?})",
            graph.sense_count(),
            graph.edge_count(),
            start.elapsed()
        );
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Stage 3: Ranking
    // ══════════════════════════════════════════════════════════════════════════
    let rank_start = Instant::now();
    let mut ranker = SenseRanker::new(file_config.ranking.clone())?;
    let report = ranker.rank_stored_document(&mut graph, loaded.document);

    if cli.verbose {
        eprintln!(
            "✓ Ranked {} parses, {} failed ({:.2?})",
            report.parses.len(),
            report.failure_count(),
            rank_start.elapsed()
        );
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Stage 4: Rendering
    // ══════════════════════════════════════════════════════════════════════════
    let mut output = if cli.json {
        render_json(&graph, loaded.document)?
    } else {
        render_text(&graph, loaded.document, &report)
    };

    if cli.stats {
        output.push_str(&render_stats(&report));
    }

    Ok(output)
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    let ranking = &mut config.ranking;
    if let Some(seed) = cli.seed {
        ranking.seed = Some(seed);
    }
    if let Some(d) = cli.damping {
        ranking.damping_factor = d;
    }
    if let Some(d) = cli.convergence_damper {
        ranking.convergence_damper = d;
    }
    if let Some(l) = cli.convergence_limit {
        ranking.convergence_limit = l;
    }
    if let Some(n) = cli.max_walk_steps {
        ranking.max_walk_steps = n;
    }
    if cli.every_sense {
        ranking.walk_start = WalkStart::EverySense;
    }
    if cli.strict {
        ranking.degenerate_neighbor = DegenerateNeighbor::Fail;
    }
}

/// Senses of each word, highest rank first.
fn ranked_senses(graph: &SenseGraph, word: WordId) -> Vec<(SenseId, Score)> {
    let mut senses: Vec<_> = graph
        .senses_of(word)
        .filter_map(|s| graph.score(s).map(|score| (s, score)))
        .collect();
    senses.sort_by(|a, b| b.1.mean.total_cmp(&a.1.mean));
    senses
}

fn render_text(graph: &SenseGraph, document: DocumentId, report: &DocumentReport) -> String {
    let mut out = String::new();

    for (parse, result) in &report.parses {
        let _ = writeln!(out, "{}", parse);
        if let Err(e) = result {
            let _ = writeln!(out, "  ✗ {}", e);
            continue;
        }
        for word in graph.word_instances(*parse) {
            let token = graph.word_token(word).unwrap_or("?");
            let senses = ranked_senses(graph, word);
            if senses.is_empty() {
                let _ = writeln!(out, "  {} (no senses)", token);
                continue;
            }
            let _ = writeln!(out, "  {}", token);
            for (i, (sense, score)) in senses.iter().enumerate() {
                let marker = if i == 0 { "*" } else { " " };
                let _ = writeln!(
                    out,
                    "    {} {:<24} {:>9.6}  (conf {:.2})",
                    marker,
                    graph.sense_label(*sense).unwrap_or("?"),
                    score.mean,
                    score.confidence
                );
            }
        }
    }

    if graph.parses(document).next().is_none() {
        out.push_str("No parses found in graph file.\n");
    }
    out
}

fn render_json(graph: &SenseGraph, document: DocumentId) -> Result<String> {
    let mut rows = Vec::new();
    for parse in graph.parses(document) {
        for word in graph.word_instances(parse) {
            let token = graph.word_token(word).unwrap_or_default();
            for (sense, score) in ranked_senses(graph, word) {
                rows.push(SenseRow {
                    parse: parse.index(),
                    word: word.index(),
                    token,
                    sense: graph.sense_label(sense).unwrap_or_default(),
                    rank: score.mean,
                    confidence: score.confidence,
                });
            }
        }
    }
    let mut json = serde_json::to_string_pretty(&rows)?;
    json.push('\n');
    Ok(json)
}

fn render_stats(report: &DocumentReport) -> String {
    let mut out = String::from("\nStatistics\n");
    for (parse, result) in &report.parses {
        match result {
            Ok(r) => {
                let _ = writeln!(
                    out,
                    "  {}: {} words, {} senses, {} walks ({} disconnected), {} updates, \
                     {} degenerate terms, convergence {:.5}{}",
                    parse,
                    r.words,
                    r.senses,
                    r.walks,
                    r.disconnected,
                    r.steps,
                    r.degenerate_terms,
                    r.convergence,
                    if r.converged { "" } else { " (step cap reached)" }
                );
                if !r.empty_words.is_empty() {
                    let _ = writeln!(out, "    {} words without senses", r.empty_words.len());
                }
            }
            Err(e) => {
                let _ = writeln!(out, "  {}: failed: {}", parse, e);
            }
        }
    }
    out
}
