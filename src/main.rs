use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use gravity_checkers::ai::{Agent, AlphaBetaAgent, RandomAgent};
use gravity_checkers::config::AppConfig;
use gravity_checkers::game::{Game, Player};

/// Play gravity-drop games with the alpha-beta AI as Red.
#[derive(Parser)]
#[command(name = "gravity-checkers", about = "Play gravity-drop games against the alpha-beta AI")]
struct Cli {
    /// Yellow's player: random or ai
    #[arg(long, default_value = "random")]
    opponent: String,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override search depth
    #[arg(long)]
    depth: Option<usize>,

    /// Seed for the random opponent
    #[arg(long)]
    seed: Option<u64>,

    /// Starting position as a state string
    #[arg(long)]
    state: Option<String>,

    /// Write the last game to this file as JSON
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    match cli.opponent.as_str() {
        "random" | "ai" => {}
        other => bail!("unknown opponent '{}' (expected 'random' or 'ai')", other),
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(depth) = cli.depth {
        config.ai.depth = depth;
    }
    config.validate().context("invalid configuration")?;

    let mut red = AlphaBetaAgent::new(config.ai.depth);
    let mut yellow: Box<dyn Agent> = match (cli.opponent.as_str(), cli.seed) {
        ("ai", _) => Box::new(AlphaBetaAgent::new(config.ai.depth)),
        (_, Some(seed)) => Box::new(RandomAgent::with_seed(seed)),
        _ => Box::new(RandomAgent::new()),
    };

    println!(
        "{} (depth {}) vs {} on a {}x{} board",
        red.name(),
        config.ai.depth,
        yellow.name(),
        config.board.width,
        config.board.height
    );

    let mut tally = [0usize; 3];
    let mut last = None;
    for index in 0..cli.games {
        let mut game = Game::new(&config.board);
        if let Some(state) = &cli.state {
            game.load_state_string(state)
                .with_context(|| format!("loading state '{state}'"))?;
        }

        let winner = loop {
            let result = match game.current_player() {
                Player::Red => game.request_ai_move(&mut red),
                Player::Yellow => game.request_ai_move(yellow.as_mut()),
            };
            if let Err(e) = result {
                println!("  no move: {e}");
                break None;
            }
            if let Some(winner) = game.check_for_winner()? {
                break Some(winner);
            }
            if game.check_for_draw()? {
                break None;
            }
        };

        match winner {
            Some(Player::Red) => tally[0] += 1,
            Some(Player::Yellow) => tally[1] += 1,
            None => tally[2] += 1,
        }
        println!(
            "Game {}: {} after {} turns",
            index + 1,
            winner.map_or("draw".to_string(), |p| format!("{} wins", p.name())),
            game.turn()
        );
        print!("{}", game.render());
        last = Some(game);
    }

    println!(
        "Red {} / Yellow {} / draws {}",
        tally[0], tally[1], tally[2]
    );

    if let (Some(path), Some(game)) = (&cli.save, &last) {
        std::fs::write(path, game.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Saved final position to {}", path.display());
    }

    Ok(())
}
