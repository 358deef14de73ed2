//! Fixed-depth tree growth and backward score aggregation

use anyhow::{anyhow, Result};
use log::debug;
use rayon::prelude::*;

use std::collections::VecDeque;
use std::time::Instant;

use crate::node::{NodeId, SearchTree};

/// Number of plies grown below the starting node
pub const DEFAULT_SPAN: usize = 4;

/// Share of a child's score taken off its parent
pub const DEFAULT_DISCOUNT: f64 = 0.2;

/// Tuning for [`build_lookahead`]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LookaheadConfig {
    pub span: usize,
    pub discount: f64,
    /// Aggregate the nodes of each level on the rayon thread pool
    pub parallel: bool,
}

impl LookaheadConfig {
    pub fn new() -> Self {
        Self {
            span: DEFAULT_SPAN,
            discount: DEFAULT_DISCOUNT,
            parallel: false,
        }
    }

    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for LookaheadConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Grows the tree `config.span` plies below `start` and folds the scores back up
///
/// Nodes are expanded breadth first; anything created deeper than
/// `start.depth + span` is never expanded. Afterwards the levels are walked
/// from the deepest one up to `start`'s own level, and every node on a level
/// loses `discount` times the score of each of its children. A level is only
/// touched once the level below it is complete, so a grandchild reaches a node
/// scaled by `discount` squared.
pub fn build_lookahead(
    tree: &mut SearchTree,
    start: NodeId,
    config: &LookaheadConfig,
) -> Result<()> {
    if config.span == 0 {
        return Err(anyhow!("Lookahead span must be at least 1"));
    }
    let start_time = Instant::now();

    let start_depth = tree.node(start).depth();
    let expected_depth = start_depth + config.span;

    // levels[i] holds the nodes at depth start_depth + i that may have children
    let mut levels: Vec<Vec<NodeId>> = vec![Vec::new(); config.span];
    levels[0].push(start);

    let mut queue = VecDeque::new();
    queue.push_back(start);
    while let Some(current) = queue.pop_front() {
        if tree.node(current).is_leaf() {
            tree.expand(current)?;
        }
        for &(child, _) in tree.node(current).children() {
            let depth = tree.node(child).depth();
            if depth < expected_depth {
                queue.push_back(child);
                levels[depth - start_depth].push(child);
            }
        }
    }

    for (level, nodes) in levels.iter().enumerate() {
        debug!("level {}: {} nodes", level, nodes.len());
    }

    for nodes in levels.iter().rev() {
        aggregate_level(tree, nodes, config);
    }

    debug!(
        "lookahead of span {} finished with {} nodes in {:.3}ms",
        config.span,
        tree.len(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

/// Subtracts the discounted child scores of every node on one level
///
/// All amounts are read before any node is changed. A node's children always
/// live one level down, so this is the same as updating nodes one at a time.
fn aggregate_level(tree: &mut SearchTree, nodes: &[NodeId], config: &LookaheadConfig) {
    let view: &SearchTree = tree;
    let discounted_sum = |id: &NodeId| {
        let amount = view
            .node(*id)
            .children()
            .iter()
            .fold(0.0, |acc, &(child, _)| {
                acc + config.discount * view.node(child).heuristic()
            });
        (*id, amount)
    };

    let amounts: Vec<(NodeId, f64)> = if config.parallel {
        nodes.par_iter().map(discounted_sum).collect()
    } else {
        nodes.iter().map(discounted_sum).collect()
    };

    for (id, amount) in amounts {
        tree.discount(id, amount);
    }
}

/// Every node below `start` (or `start` itself) that has no children, breadth first
pub fn collect_leaves(tree: &SearchTree, start: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    while let Some(current) = queue.pop_front() {
        let node = tree.node(current);
        if node.is_leaf() {
            leaves.push(current);
            continue;
        }
        queue.extend(node.children().iter().map(|&(child, _)| child));
    }
    leaves
}

/// The column and score of each child of `id`, in child order
pub fn scored_moves(tree: &SearchTree, id: NodeId) -> Vec<(usize, f64)> {
    tree.node(id)
        .children()
        .iter()
        .map(|&(child, column)| (column, tree.node(child).heuristic()))
        .collect()
}

/// The highest scored column below `id`, the leftmost one on ties
pub fn best_move(tree: &SearchTree, id: NodeId) -> Option<(usize, f64)> {
    scored_moves(tree, id)
        .into_iter()
        .fold(None, |best, (column, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((column, score)),
        })
}
