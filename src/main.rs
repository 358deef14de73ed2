use anyhow::{anyhow, Result};
use indicatif::ProgressBar;
use log::info;

use std::io::{stdin, stdout, Stdin, Write};

use connect4_lookahead::board::{ArrayBoard, GameState, Player};
use connect4_lookahead::lookahead::*;
use connect4_lookahead::node::SearchTree;

fn ask_yes_no(stdin: &Stdin, question: &str) -> Result<bool> {
    loop {
        let mut buffer = String::new();
        print!("{} y/n: ", question);
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some(_letter @ 'y') => return Ok(true),
            Some(_letter @ 'n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn ask_span(stdin: &Stdin) -> Result<usize> {
    loop {
        let mut buffer = String::new();
        print!("Lookahead depth (default {}): ", DEFAULT_SPAN);
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        let answer = buffer.trim();
        if answer.is_empty() {
            return Ok(DEFAULT_SPAN);
        }
        match answer.parse::<usize>() {
            Ok(span) if span > 0 => return Ok(span),
            _ => println!("Invalid depth: {}", answer),
        }
    }
}

/// Runs the lookahead for the player to move and returns a 1-indexed column
fn ai_move(board: &ArrayBoard, config: &LookaheadConfig) -> Result<usize> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("AI is thinking...");
    spinner.enable_steady_tick(100);

    // the root's mover is whoever played last, so the tree starts with the player to move
    let mut tree = SearchTree::new(board.clone(), board.next_player().opponent(), 0);
    let root = tree.root();
    build_lookahead(&mut tree, root, config)?;
    spinner.finish_and_clear();

    info!("searched {} positions", tree.len());
    for (column, score) in scored_moves(&tree, root) {
        println!("  column {}: {:.1}", column + 1, score);
    }

    let (column, _) =
        best_move(&tree, root).ok_or_else(|| anyhow!("no legal moves to choose from"))?;
    println!("Best move: {}", column + 1);
    Ok(column + 1)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut board = ArrayBoard::new();
    let stdin = stdin();

    println!("Welcome to Connect 4\n");

    let ai_players = (
        ask_yes_no(&stdin, "Is player 1 AI controlled?")?,
        ask_yes_no(&stdin, "Is player 2 AI controlled?")?,
    );
    let config = if ai_players != (false, false) {
        LookaheadConfig::new().with_span(ask_span(&stdin)?)
    } else {
        LookaheadConfig::new()
    };

    // game loop
    loop {
        board.display().expect("Failed to draw board!");

        match board.state() {
            GameState::Playing => {
                let player = board.next_player();
                let ai_controlled = match player {
                    Player::One => ai_players.0,
                    Player::Two => ai_players.1,
                };
                let next_move = if ai_controlled {
                    // slow down play if both players are AI
                    if ai_players == (true, true) {
                        std::thread::sleep(std::time::Duration::new(1, 0));
                    }
                    ai_move(&board, &config)?

                // human player
                } else {
                    print!("Move input > ");
                    stdout().flush().expect("Failed to flush to stdout!");
                    let mut input_str = String::new();
                    stdin.read_line(&mut input_str)?;

                    match input_str.trim().parse::<usize>() {
                        Err(_) => {
                            println!("Invalid number: {}", input_str);
                            continue;
                        }
                        Ok(column) => column,
                    }
                };

                if let Err(err) = board.play_checked(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::PlayerOneWin => {
                println!("Player 1 wins!");
                break;
            }
            GameState::PlayerTwoWin => {
                println!("Player 2 wins!");
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                break;
            }
        }
    }
    Ok(())
}
