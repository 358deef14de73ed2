//! Search tree nodes and single-node expansion

use anyhow::{anyhow, Context, Result};
use log::trace;

use std::fmt;
use std::ops::Index;

use crate::board::{ArrayBoard, Player};
use crate::heuristic::heuristic;

/// Handle to a node stored in a [`SearchTree`]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(usize);

/// One position in the lookahead tree
///
/// Holds its own copy of the board. The parent link is a plain id and does
/// not own anything; each child id appears in exactly one parent's child list.
#[derive(Clone, Debug)]
pub struct SearchNode {
    board: ArrayBoard,
    mover: Player,
    parent: Option<NodeId>,
    depth: usize,
    heuristic: f64,
    // child node and the 0-indexed column that produced it
    children: Vec<(NodeId, usize)>,
}

impl SearchNode {
    pub fn board(&self) -> &ArrayBoard {
        &self.board
    }

    /// The player who placed the piece leading to this node
    ///
    /// Expanding the node plays moves for the opponent of this player.
    pub fn mover(&self) -> Player {
        self.mover
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn heuristic(&self) -> f64 {
        self.heuristic
    }

    pub fn children(&self) -> &[(NodeId, usize)] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for SearchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(
            f,
            "player: {}, depth: {}, heuristic: {}",
            self.mover, self.depth, self.heuristic
        )
    }
}

/// Arena owning every node of one lookahead tree
///
/// Dropping the tree drops all of its nodes at once.
#[derive(Clone, Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    root: NodeId,
}

impl SearchTree {
    /// Creates a tree holding only a root node
    ///
    /// `mover` is the player who made the last move on `board`, and `depth`
    /// is the depth assigned to the root.
    pub fn new(board: ArrayBoard, mover: Player, depth: usize) -> Self {
        let root = SearchNode {
            board,
            mover,
            parent: None,
            depth,
            heuristic: 0.0,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds one child per legal move of the opponent of `id`'s mover
    ///
    /// Nothing happens if the position is already won or drawn, or if the
    /// node has been expanded before. Children keep the move order reported
    /// by the board, and each one is scored as it is created.
    pub fn expand(&mut self, id: NodeId) -> Result<()> {
        let node = &self.nodes[id.0];
        if node.board.state().is_finished() || !node.children.is_empty() {
            return Ok(());
        }

        let next_player = node.mover.opponent();
        let depth = node.depth + 1;
        let mut new_nodes = Vec::new();
        for column in node.board.possible_moves() {
            let mut board = node.board.clone();
            board
                .play_as(column, next_player)
                .with_context(|| format!("board reported column {} as legal", column + 1))?;
            let row = board.top_row(column).ok_or_else(|| {
                anyhow!("no piece landed in column {} after playing it", column + 1)
            })?;
            let score = heuristic(&board, row, column, next_player)? as f64;

            new_nodes.push((
                SearchNode {
                    board,
                    mover: next_player,
                    parent: Some(id),
                    depth,
                    heuristic: score,
                    children: Vec::new(),
                },
                column,
            ));
        }

        trace!("expanded node {:?} into {} children", id, new_nodes.len());
        for (child, column) in new_nodes {
            let child_id = NodeId(self.nodes.len());
            self.nodes.push(child);
            self.nodes[id.0].children.push((child_id, column));
        }
        Ok(())
    }

    /// Columns played from the tree root down to `id`
    pub fn path(&self, id: NodeId) -> Vec<usize> {
        let mut moves = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            let (_, column) = self
                .node(parent)
                .children
                .iter()
                .find(|(child, _)| *child == current)
                .copied()
                .expect("child missing from its parent's child list");
            moves.push(column);
            current = parent;
        }
        moves.reverse();
        moves
    }

    /// Every node with its id, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub(crate) fn discount(&mut self, id: NodeId, amount: f64) {
        self.nodes[id.0].heuristic -= amount;
    }

    // hangs a hand-scored child below `parent`, sharing the parent's board
    #[cfg(test)]
    pub(crate) fn attach(&mut self, parent: NodeId, column: usize, heuristic: f64) -> NodeId {
        let parent_node = &self.nodes[parent.0];
        let child = SearchNode {
            board: parent_node.board.clone(),
            mover: parent_node.mover.opponent(),
            parent: Some(parent),
            depth: parent_node.depth + 1,
            heuristic,
            children: Vec::new(),
        };
        let child_id = NodeId(self.nodes.len());
        self.nodes.push(child);
        self.nodes[parent.0].children.push((child_id, column));
        child_id
    }
}

impl Index<NodeId> for SearchTree {
    type Output = SearchNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.node(id)
    }
}
