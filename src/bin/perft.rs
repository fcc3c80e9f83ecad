use clap::Parser;
use woodpusher::perft::{divide, perft};
use woodpusher::position::Position;

/// Counts legal move paths from a position, for move generator validation.
#[derive(Parser)]
#[command(author, version)]
struct Arguments {
    /// Number of plies to search.
    depth: u32,
    /// Show per-move node counts at the root.
    #[arg(short, long)]
    divide: bool,
    /// Run every depth from 1 up to the requested one.
    #[arg(short, long)]
    iterative: bool,
    /// FEN of the position to search from, defaults to the starting
    /// position.
    position: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Arguments::parse();

    let mut position = match args.position {
        Some(fen) => match Position::from_fen(&fen) {
            Ok(position) => position,
            Err(error) => {
                eprintln!("invalid position: {error}");
                std::process::exit(1);
            }
        },
        None => Position::initial(),
    };
    println!("{position}\n");

    for depth in (if args.iterative { 1 } else { args.depth })..=args.depth {
        if args.divide {
            for (mv, nodes) in divide(&mut position, depth) {
                println!("{mv}: {nodes} nodes");
            }
        }
        println!("depth {depth}: {} nodes", perft(&mut position, depth));
    }
}
