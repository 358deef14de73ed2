//! A shallow lookahead agent for the board game 'Connect 4'
//!
//! This agent grows a fixed-depth tree of future moves, scores every new
//! position by how well connected the piece just played is, and then folds
//! those scores back towards the root so the immediate moves can be ranked.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_lookahead::{board::{ArrayBoard, Player}, lookahead::*, node::SearchTree};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = ArrayBoard::from_str("4455")?;
//! // player two placed the last piece, so player one moves first in the tree
//! let mut tree = SearchTree::new(board, Player::Two, 0);
//! let root = tree.root();
//! build_lookahead(&mut tree, root, &LookaheadConfig::default())?;
//!
//! assert_eq!(tree.node(root).children().len(), 7);
//! assert!(best_move(&tree, root).is_some());
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod heuristic;

pub mod node;

pub mod lookahead;


/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// a four-in-a-row has to fit on the board in every direction the heuristic walks
const_assert!(WIDTH >= 4 && HEIGHT >= 4);
