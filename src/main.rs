//! Wickinion - Main Binary
//!
//! Local pass-and-play, bot simulations and networked games over TCP

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;
use wickinion::{
    core::{CardId, BOARD_SETUPS},
    game::{
        BoardChoice, GameConfig, GameLogger, GameLoop, GameState, HeuristicController, InteractiveController,
        PlayerController, RandomController, VerbosityLevel,
    },
    net::{await_seat, join_tcp, run_client, run_host, ClientSession, HostSession, NetConfig, TcpTransport},
    tournament::{run_simulation, BotKind, SimConfig},
};

/// Who decides for a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ControllerType {
    /// Makes random legal choices
    Random,
    /// Big-money bot that also plays its actions
    Heuristic,
    /// Text prompts on stdin
    Tui,
}

impl ControllerType {
    fn build(self, seat: usize, seed: u64) -> Box<dyn PlayerController> {
        match self {
            ControllerType::Random => Box::new(RandomController::new(seat, seed)),
            ControllerType::Heuristic => Box::new(HeuristicController::new(seat)),
            ControllerType::Tui => Box::new(InteractiveController::new(seat)),
        }
    }
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(clap::Args, Debug)]
struct BoardArgs {
    /// Named board setup (see `wick boards`)
    #[arg(long, default_value = "first_game")]
    board: String,

    /// Custom kingdom: ten comma-separated card ids, overrides --board
    #[arg(long, value_delimiter = ',')]
    kingdom: Vec<String>,
}

impl BoardArgs {
    fn choice(&self) -> Result<BoardChoice> {
        if self.kingdom.is_empty() {
            return Ok(BoardChoice::Preset(self.board.clone()));
        }
        let cards = self
            .kingdom
            .iter()
            .map(|key| CardId::from_key(key.trim()).with_context(|| format!("unknown card id '{key}'")))
            .collect::<Result<Vec<_>>>()?;
        Ok(BoardChoice::Custom(cards))
    }
}

#[derive(Parser)]
#[command(name = "wick")]
#[command(about = "Wickinion - deck-building card game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pass-and-play on this terminal
    Play {
        /// Controller per seat, comma separated (2-6 seats)
        #[arg(long, value_enum, value_delimiter = ',', default_value = "tui,heuristic")]
        seats: Vec<ControllerType>,

        /// Player names, comma separated
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,

        #[command(flatten)]
        board: BoardArgs,

        /// Set random seed for a reproducible game
        #[arg(long)]
        seed: Option<u64>,

        /// Give up after this many rounds
        #[arg(long, default_value_t = 200)]
        max_turns: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,
    },

    /// Play many bot games in parallel and print statistics
    Sim {
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        /// Bot per seat, comma separated
        #[arg(long, value_enum, value_delimiter = ',', default_value = "heuristic,heuristic")]
        bots: Vec<BotKind>,

        #[command(flatten)]
        board: BoardArgs,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = 100)]
        max_turns: u32,
    },

    /// Host a networked game; the host plays seat 1
    Host {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:7878")]
        listen: String,

        /// Total seats including the host
        #[arg(long, short = 'p', default_value_t = 2)]
        players: usize,

        #[arg(long, default_value = "Host")]
        name: String,

        #[arg(long, value_enum, default_value = "tui")]
        controller: ControllerType,

        #[command(flatten)]
        board: BoardArgs,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,
    },

    /// Join a networked game
    Join {
        /// Host address
        addr: String,

        #[arg(long, default_value = "Guest")]
        name: String,

        #[arg(long, value_enum, default_value = "tui")]
        controller: ControllerType,

        /// Seconds to wait for the host
        #[arg(long, default_value_t = 5)]
        timeout: u64,

        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,
    },

    /// List the named board setups
    Boards,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            seats,
            names,
            board,
            seed,
            max_turns,
            verbosity,
        } => run_play(seats, names, board.choice()?, seed, max_turns, verbosity.0),
        Commands::Sim {
            games,
            bots,
            board,
            seed,
            max_turns,
        } => {
            let config = SimConfig {
                games,
                bots,
                board: board.choice()?,
                seed,
                max_turns,
            };
            println!("Running {} games with {} seats...", config.games, config.bots.len());
            let summary = run_simulation(&config)?;
            println!("{summary}");
            Ok(())
        }
        Commands::Host {
            listen,
            players,
            name,
            controller,
            board,
            seed,
            verbosity,
        } => run_hosted(listen, players, name, controller, board.choice()?, seed, verbosity.0).await,
        Commands::Join {
            addr,
            name,
            controller,
            timeout,
            verbosity,
        } => run_join(addr, name, controller, Duration::from_secs(timeout), verbosity.0).await,
        Commands::Boards => {
            for setup in BOARD_SETUPS.iter() {
                let cards: Vec<&str> = setup.cards.iter().map(|c| c.as_str()).collect();
                println!("{} - {} ({:?})", setup.id, setup.name, setup.difficulty);
                println!("    {}", setup.description);
                println!("    {}", cards.join(", "));
            }
            Ok(())
        }
    }
}

fn run_play(
    seats: Vec<ControllerType>,
    names: Vec<String>,
    board: BoardChoice,
    seed: Option<u64>,
    max_turns: u32,
    verbosity: VerbosityLevel,
) -> Result<()> {
    let names: Vec<String> = (0..seats.len())
        .map(|i| names.get(i).cloned().unwrap_or_else(|| format!("Player {}", i + 1)))
        .collect();
    let mut config = GameConfig::with_names(names).board(board);
    config.seed = seed;
    let mut game = GameState::with_logger(&config, GameLogger::with_verbosity(verbosity))?;

    let base_seed = seed.unwrap_or_else(rand::random);
    let mut controllers: Vec<Box<dyn PlayerController>> = seats
        .iter()
        .enumerate()
        .map(|(seat, kind)| kind.build(seat, base_seed.wrapping_add(seat as u64 + 1)))
        .collect();

    let result = GameLoop::new(&mut game)
        .with_max_turns(max_turns)
        .run_game(&mut controllers)?;
    print_result(&game, &result.winners);
    Ok(())
}

fn print_result(game: &GameState, winners: &[usize]) {
    println!("\n=== Game Over ===");
    for (player, score) in game.players.iter().zip(game.final_scores()) {
        println!("  {}: {} VP", player.name, score);
    }
    let names: Vec<&str> = winners.iter().map(|&w| game.players[w].name.as_str()).collect();
    println!("Winner: {}", names.join(" & "));
}

async fn run_hosted(
    listen: String,
    players: usize,
    name: String,
    controller: ControllerType,
    board: BoardChoice,
    seed: Option<u64>,
    verbosity: VerbosityLevel,
) -> Result<()> {
    if players < 2 {
        bail!("a hosted game needs at least 2 players");
    }
    let net = NetConfig::default();
    let (addr, events) = TcpTransport::listen(&listen).await?;
    println!("Listening on {addr}");

    let mut session =
        HostSession::new(name, players, board, &net).with_logger(GameLogger::with_verbosity(verbosity));
    if let Some(seed) = seed {
        session = session.with_seed(seed);
    }
    let local = controller.build(0, seed.unwrap_or_else(rand::random));
    let result = run_host(session, events, local, &net).await?;

    println!("\n=== Game Over ({}) ===", result.end_reason);
    for (seat, score) in result.scores.iter().enumerate() {
        println!("  Seat {}: {} VP", seat + 1, score);
    }
    Ok(())
}

async fn run_join(
    addr: String,
    name: String,
    controller: ControllerType,
    timeout: Duration,
    verbosity: VerbosityLevel,
) -> Result<()> {
    let net = NetConfig {
        connect_timeout: timeout,
        ..NetConfig::default()
    };
    let mut session = ClientSession::new(name, &net).with_logger(GameLogger::with_verbosity(verbosity));
    let mut events = join_tcp(&mut session, &addr, &net)
        .await
        .with_context(|| session.status().to_string())?;

    let seat = await_seat(&mut session, &mut events).await?;
    let mut local = controller.build(seat, rand::random());
    let result = run_client(&mut session, &mut events, local.as_mut(), &net).await?;

    println!("\n=== Game Over ({}) ===", result.end_reason);
    if let Some(snapshot) = session.snapshot() {
        for (player, score) in snapshot.players.iter().zip(&result.scores) {
            println!("  {}: {} VP", player.name, score);
        }
    }
    println!("{}", if result.winners.contains(&seat) { "You won!" } else { "You lost." });
    Ok(())
}
