use anyhow::Result;
use candy_engine::bots::{run_games, DeterministicBot, GreedyBot, Player, RandomBot};
use candy_engine::config::GameConfig;
use candy_engine::engine::MatchEngine;
use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare the bundled strategies over seeded games", long_about = None)]
struct Args {
    /// Number of games per strategy
    #[clap(short, long, default_value_t = 20)]
    games: usize,

    /// First seed; game i uses seed + i
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// Path to a TOML game config (defaults are used if it does not exist)
    #[clap(short, long, default_value = "candy.toml")]
    config: PathBuf,

    /// Log level or flexi_logger spec
    #[clap(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = Logger::try_with_env_or_str(&args.log_level)?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(AdaptiveFormat::Default)
        .start()?;

    let mut config = GameConfig::load_or_default(&args.config)?;
    config.seed = Some(args.seed);

    let mut players: Vec<Box<dyn Player>> = vec![
        Box::new(RandomBot::new(args.seed)),
        Box::new(DeterministicBot),
        Box::new(GreedyBot::new(MatchEngine::new(config.score_rule))),
    ];

    println!(
        "Evaluating {} strategies over {} games on a {}x{} board...",
        players.len(),
        args.games,
        config.rows,
        config.columns
    );

    let mut averages: Vec<(String, f64, u32)> = Vec::new();
    for player in players.iter_mut() {
        let reports = run_games(player.as_mut(), &config, args.games)?;
        for (i, report) in reports.iter().enumerate() {
            println!(
                "  Strategy: {:<14} Game: {:<4} Score: {:<6} Moves: {}",
                player.name(),
                i,
                report.score,
                report.moves_played
            );
        }
        let total: u32 = reports.iter().map(|r| r.score).sum();
        let rejected: u32 = reports.iter().map(|r| r.rejected).sum();
        let avg = if reports.is_empty() {
            0.0
        } else {
            total as f64 / reports.len() as f64
        };
        averages.push((player.name().to_string(), avg, rejected));
    }

    averages.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("\n--- Average Scores ---");
    for (name, avg, rejected) in averages {
        println!(
            "Strategy {:<14}: Average Score = {:.2} (rejected proposals: {})",
            name, avg, rejected
        );
    }
    Ok(())
}
