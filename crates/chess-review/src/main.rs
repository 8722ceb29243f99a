mod batch;
mod config;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chess_analysis::stats::{classify_opening, review_game, PlayerReport};
use chess_analysis::{GameAnalyzer, UciEngineProvider};
use chess_board::GameRecord;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use batch::BatchAnalyzer;
use config::ReviewConfig;
use output::AnalysisDocument;

#[derive(Parser)]
#[command(name = "chess-review")]
#[command(about = "Find the mistakes in your chess games")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "review.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse every game in a PGN file and store the results
    Analyze {
        /// PGN file to analyse
        pgn: PathBuf,
        /// Search depth per position
        #[arg(short, long)]
        depth: Option<u32>,
        /// Directory for the analysis documents
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Games analysed concurrently
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Print the review of one stored analysis
    Review {
        /// Analysis document written by `analyze`
        json: PathBuf,
    },
    /// Print a player's aggregate statistics over stored analyses
    Stats {
        /// Directory of analysis documents
        dir: Option<PathBuf>,
        /// Player name as it appears in the PGN headers
        #[arg(short, long)]
        player: String,
    },
    /// List the games in a PGN file
    Games {
        pgn: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ReviewConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Analyze {
            pgn,
            depth,
            output,
            workers,
        } => {
            if let Some(depth) = depth {
                config.analysis.depth = depth;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(workers) = workers {
                config.analysis.workers = workers;
            }
            config.validate()?;
            analyze(&config, &pgn).await
        }
        Commands::Review { json } => review(&json),
        Commands::Stats { dir, player } => {
            let dir = dir.unwrap_or_else(|| config.output_dir.clone());
            stats(&config, &dir, &player)
        }
        Commands::Games { pgn } => games(&config, &pgn),
    }
}

/// Parses a PGN file, logging and skipping games that cannot be read.
///
/// Each record keeps its position in the file.
fn read_games(path: &Path) -> anyhow::Result<Vec<(usize, GameRecord)>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut games = Vec::new();
    for (index, parsed) in GameRecord::parse_all(&text).into_iter().enumerate() {
        match parsed {
            Ok(record) => games.push((index, record)),
            Err(e) => warn!(game = index, error = %e, "game not analyzed: unreadable PGN"),
        }
    }
    Ok(games)
}

async fn analyze(config: &ReviewConfig, pgn: &Path) -> anyhow::Result<()> {
    let games = read_games(pgn)?;
    if games.is_empty() {
        bail!("no readable games in {}", pgn.display());
    }
    let (indices, records): (Vec<usize>, Vec<GameRecord>) = games.into_iter().unzip();

    info!(
        games = records.len(),
        engine = %config.engine.path,
        depth = config.analysis.depth,
        workers = config.analysis.workers,
        "analysing"
    );
    let provider = UciEngineProvider::new(config.engine.path.clone(), config.engine_options());
    let batch = BatchAnalyzer::new(
        GameAnalyzer::new(provider, config.analysis_config()),
        config.analysis.workers,
    );
    let results = batch.analyze_all(records).await;

    let source = pgn.display().to_string();
    let documents: Vec<AnalysisDocument> = indices
        .into_iter()
        .zip(results)
        .map(|(index, game)| AnalysisDocument::new(source.clone(), index, game))
        .collect();
    let paths = output::write_documents(&config.output_dir, &documents)?;

    for (doc, path) in documents.iter().zip(&paths) {
        let headers = &doc.game.record.headers;
        match doc.game.analysis() {
            Some(analysis) => println!(
                "{} vs {}: {} mistakes (white {}, black {}) -> {}",
                headers.white,
                headers.black,
                analysis.mistakes().len(),
                analysis.summary().white_mistakes,
                analysis.summary().black_mistakes,
                path.display()
            ),
            None => println!(
                "{} vs {}: not analyzed -> {}",
                headers.white,
                headers.black,
                path.display()
            ),
        }
    }
    Ok(())
}

fn review(path: &Path) -> anyhow::Result<()> {
    let doc = output::read_document(path).with_context(|| format!("reading {}", path.display()))?;
    match doc.game.analysis() {
        Some(analysis) => {
            println!("{}", serde_json::to_string_pretty(&review_game(analysis))?);
            Ok(())
        }
        None => bail!("{} holds a game that was not analyzed", path.display()),
    }
}

fn stats(config: &ReviewConfig, dir: &Path, player: &str) -> anyhow::Result<()> {
    let documents =
        output::load_directory(dir).with_context(|| format!("reading {}", dir.display()))?;
    let games: Vec<_> = documents.into_iter().map(|doc| doc.game).collect();
    let openings = config.openings()?;

    match PlayerReport::build(&games, player, &openings, config.analysis.opening_plies) {
        Some(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        None => bail!("no analyzed games for {}", player),
    }
}

fn games(config: &ReviewConfig, pgn: &Path) -> anyhow::Result<()> {
    let openings = config.openings()?;
    for (index, record) in read_games(pgn)? {
        let headers = &record.headers;
        println!(
            "{:>3}  {} - {}  {}  {}  {}  {}",
            index,
            headers.white,
            headers.black,
            headers.result.as_str(),
            headers.date.as_deref().unwrap_or("????.??.??"),
            headers.time_control_label().unwrap_or_else(|| "-".to_string()),
            classify_opening(&record, &openings, config.analysis.opening_plies),
        );
    }
    Ok(())
}
