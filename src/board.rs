//! A plain array board used to drive and test the lookahead

use anyhow::{anyhow, Result};
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::convert::TryFrom;
use std::fmt;
use std::io::{stdout, Write};

use crate::{HEIGHT, WIDTH};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The number this player is known by on screen, 1 or 2
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = anyhow::Error;

    fn try_from(number: u8) -> Result<Self> {
        match number {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            _ => Err(anyhow!(
                "Invalid player {}, players are numbered 1 and 2",
                number
            )),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn owner(&self) -> Option<Player> {
        match self {
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
            Cell::Empty => None,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

impl GameState {
    pub fn won_by(player: Player) -> Self {
        match player {
            Player::One => GameState::PlayerOneWin,
            Player::Two => GameState::PlayerTwoWin,
        }
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            GameState::PlayerOneWin => Some(Player::One),
            GameState::PlayerTwoWin => Some(Player::Two),
            _ => None,
        }
    }

    /// Won by either player or drawn
    pub fn is_finished(&self) -> bool {
        !matches!(self, GameState::Playing)
    }
}

/// A Connect 4 position stored cell by cell
///
/// Boards are small `Clone` values: every search node keeps its own copy, and
/// playing a move on one copy never shows up in another.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ArrayBoard {
    cells: [Cell; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
    heights: [usize; WIDTH],
    next_player: Player,
    num_moves: usize,
    state: GameState,
}

impl ArrayBoard {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
            heights: [0; WIDTH],
            next_player: Player::One,
            num_moves: 0,
            state: GameState::Playing,
        }
    }

    /// Builds a position from a string of 1-indexed columns, players alternating from player one
    pub fn from_str<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10) {
                Some(column) => {
                    let _ = board.play_checked(column as usize)?;
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    /// Plays a 1-indexed column for the player whose turn it is
    pub fn play_checked(&mut self, column_one_indexed: usize) -> Result<GameState> {
        if column_one_indexed < 1 || column_one_indexed > WIDTH {
            return Err(anyhow!(
                "Invalid move, column {} out of range. Columns must be between 1 and {}",
                column_one_indexed,
                WIDTH
            ));
        }
        self.play_as(column_one_indexed - 1, self.next_player)
    }

    /// Drops a piece for `player` into a 0-indexed column
    ///
    /// The turn order is not enforced here, the lookahead decides who moves.
    pub fn play_as(&mut self, column: usize, player: Player) -> Result<GameState> {
        if column >= WIDTH {
            return Err(anyhow!(
                "Invalid move, column index {} out of range",
                column
            ));
        }
        if self.state.is_finished() {
            return Err(anyhow!("Invalid move, game is over"));
        }
        if !self.playable(column) {
            return Err(anyhow!("Invalid move, column {} full", column + 1));
        }

        let won = self.check_winning_move(column, player);

        self.cells[column + WIDTH * self.heights[column]] = Cell::from(player);
        self.heights[column] += 1;
        self.num_moves += 1;
        self.next_player = player.opponent();

        self.state = if won {
            GameState::won_by(player)
        } else if self.num_moves == WIDTH * HEIGHT {
            GameState::Draw
        } else {
            GameState::Playing
        };
        Ok(self.state)
    }

    /// Playable columns from left to right, empty once the game is finished
    pub fn possible_moves(&self) -> Vec<usize> {
        if self.state.is_finished() {
            return Vec::new();
        }
        (0..WIDTH).filter(|&column| self.playable(column)).collect()
    }

    pub fn playable(&self, column: usize) -> bool {
        column < WIDTH && self.heights[column] < HEIGHT
    }

    /// Row of the highest piece in a column, `None` for an empty column
    pub fn top_row(&self, column: usize) -> Option<usize> {
        match self.heights.get(column) {
            Some(&height) if height > 0 => Some(height - 1),
            _ => None,
        }
    }

    /// Row 0 is the bottom of the board
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        if row >= HEIGHT || column >= WIDTH {
            return None;
        }
        Some(self.cells[column + WIDTH * row])
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn next_player(&self) -> Player {
        self.next_player
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn display(&self) -> Result<()> {
        let mut stdout = stdout();

        let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
        stdout.queue(PrintStyledContent(style(cols + "\n")))?;
        for _ in 0..HEIGHT {
            stdout.queue(PrintStyledContent(style("\n")))?;
        }
        stdout.flush()?;

        let (origin_x, origin_y) = crossterm::cursor::position()?;

        for (idx, cell) in self.cells.iter().enumerate() {
            let (pos_x, pos_y) = (
                origin_x + (idx % WIDTH) as u16,
                origin_y - (idx / WIDTH) as u16,
            );

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match cell {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
        stdout
            .queue(MoveTo(origin_x + WIDTH as u16, origin_y))?
            .queue(PrintStyledContent(style("\n")))?;
        stdout.flush()?;
        Ok(())
    }

    fn check_winning_move(&self, column: usize, player: Player) -> bool {
        let player = Cell::from(player);
        let height = self.heights[column];

        // check vertical alignment
        if height >= 3
            && self.cells[column + WIDTH * (height - 1)] == player
            && self.cells[column + WIDTH * (height - 2)] == player
            && self.cells[column + WIDTH * (height - 3)] == player
        {
            return true;
        }

        // check horizontal and diagonal alignment
        for dy_dx in -1i32..=1 {
            let mut run = 0;
            for dx in [-1i32, 1].iter() {
                let mut x = column as i32 + dx;
                let mut y = height as i32 + dx * dy_dx;
                loop {
                    if x < 0
                        || x >= WIDTH as i32
                        || y < 0
                        || y >= HEIGHT as i32
                        || self.cells[x as usize + WIDTH * y as usize] != player
                    {
                        break;
                    }
                    x += dx;
                    y += dx * dy_dx;
                    run += 1;
                }
            }
            if run >= 3 {
                return true;
            }
        }

        false
    }
}

impl Default for ArrayBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArrayBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            for column in 0..WIDTH {
                let symbol = match self.cells[column + WIDTH * row] {
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                    Cell::Empty => '.',
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        for column in 1..=WIDTH {
            write!(f, "{}", column)?;
        }
        Ok(())
    }
}
