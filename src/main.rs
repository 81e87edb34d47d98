use std::io::{self, BufRead, Write};

use anyhow::Result;
use chess_referee::{Color, GameController, GameStatus};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chess-referee", about = "Two players, one terminal, legal chess only")]
struct Args {
    /// Start from this piece placement instead of the usual one
    /// (e.g. "4k3/8/8/8/8/8/8/4K2R")
    #[arg(long)]
    layout: Option<String>,

    /// Give black the first move
    #[arg(long)]
    black_first: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let first = if args.black_first { Color::Black } else { Color::White };
    let mut game = match &args.layout {
        Some(layout) => GameController::from_layout(layout, first)?,
        None => {
            let mut game = GameController::new();
            game.set_active_color(first);
            game
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    loop {
        game.prepare_turn();
        println!("{}\n", game.board());
        if game.moves().is_empty() {
            break;
        }

        loop {
            print!("{} move: ", game.active_color());
            stdout.flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line?;
            if line.trim() == "quit" {
                return Ok(());
            }
            match game.process_move(&line) {
                Ok(played) => {
                    println!("played {}", played);
                    break;
                }
                Err(err) => println!("{}", err),
            }
        }

        let next = game.active_color().opposite();
        game.set_active_color(next);
    }

    match game.status() {
        GameStatus::Checkmate { winner } => println!("{} wins by checkmate.", winner),
        GameStatus::Stalemate => println!("Stalemate."),
        GameStatus::Ongoing => {}
    }
    Ok(())
}
