use std::num::NonZero;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use victor::{BoardBuilder, GraphManager, Player};

#[derive(Parser)]
struct Args {
    /// Moves played so far, as squares ("d1 d2") or as column letters ("d d")
    moves: Vec<String>,

    /// Number of rows
    #[arg(long, default_value_t = 6)]
    rows: usize,

    /// Number of columns
    #[arg(long, default_value_t = 7)]
    cols: usize,

    /// How many pieces in a row win
    #[arg(long, default_value_t = 4)]
    connect: usize,

    /// Whose position to prove, "white" or "black"; defaults to the player who moved last
    #[arg(short, long)]
    player: Option<Player>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let rows = NonZero::new(args.rows).context("The board needs at least one row")?;
    let cols = NonZero::new(args.cols).context("The board needs at least one column")?;
    let mut builder = BoardBuilder::with_dims((rows, cols));
    builder.num_to_connect(args.connect).play_moves(&args.moves.join(" "));
    let board = builder.build().map_err(|reasons| {
        anyhow!(reasons.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))
    })?;

    let player = args.player.unwrap_or_else(|| board.player_to_move().other());
    info!(%player, moves = board.history().len(), "proving position");
    print!("{}", board);

    let rows = board.rows();
    let graph = GraphManager::from_board(board, player);
    match graph.evaluate() {
        Some(cover) => {
            let mut lines = cover.iter()
                .map(|solution| {
                    let squares = solution.squares().iter().map(|square| square.on(rows).to_string()).collect::<Vec<_>>();
                    format!("{} {}", solution.rule().kind(), squares.join(" "))
                })
                .collect::<Vec<_>>();
            lines.sort();

            println!("{} is proven with {} solutions", player, lines.len());
            for line in lines {
                println!("{}", line);
            }
        }
        None => println!("unproven"),
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
