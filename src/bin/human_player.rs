use anyhow::Result;
use candy_engine::config::GameConfig;
use candy_engine::session::Game;
use candy_engine::utils::parse_move;
use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play the swap-and-match puzzle in the terminal", long_about = None)]
struct Args {
    /// Path to a TOML game config (defaults are used if it does not exist)
    #[clap(short, long, default_value = "candy.toml")]
    config: PathBuf,

    /// Seed for a reproducible board, overriding the config
    #[clap(short, long)]
    seed: Option<u64>,

    /// Log level or flexi_logger spec, e.g. "debug" or "candy_engine=trace"
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
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut game = Game::new(&config)?;
    println!("Welcome to Candy Engine!");

    loop {
        println!("---------------------");
        match (game.budget().remaining_moves(), game.budget().seconds_left()) {
            (Some(moves), _) => println!("Score: {}, Moves left: {}", game.score(), moves),
            (_, Some(seconds)) => println!("Score: {}, Seconds left: {}", game.score(), seconds),
            _ => println!("Score: {}", game.score()),
        }
        println!("{}", game.board());

        if game.is_game_over() {
            println!();
            println!("---------------------");
            println!("GAME OVER!");
            println!("Final Score: {}", game.score());
            println!("Moves played: {}", game.moves_played());
            println!("---------------------");
            break;
        }

        print!("Enter a swap (row col row col), 'h' for a hint, or 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "h" => match game.legal_moves().first() {
                Some(mv) => println!("Try swapping {}", mv),
                None => println!("No moves left."),
            },
            other => match parse_move(other) {
                Some(mv) => {
                    let (valid, changes) = game.play_recorded(mv)?;
                    if valid {
                        let removed: usize = changes.iter().map(|c| c.removed_cells().len()).sum();
                        println!("Matched! {} cells cleared.", removed);
                    } else {
                        println!("Invalid move: swapping {} makes no match.", mv);
                    }
                }
                None => println!("Invalid input format. Use 'row col row col', 'h', or 'q'."),
            },
        }
    }

    Ok(())
}
