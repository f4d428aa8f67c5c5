//! A* search over board states.
//!
//! The frontier is a binary heap ordered by `f = g + h` with the Manhattan
//! distance as `h`. Ties on `f` are broken FIFO: nodes are numbered in the
//! order they are created, and the lower number wins. Nodes live in an arena
//! owned by a single run and point back to their parent by index, so a path
//! is rebuilt by walking parents from the goal and reversing.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::{Board, Direction};
use crate::error::SolveError;
use crate::heuristic::manhattan;
use crate::solvability::is_solvable;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Re-queue a discovered board when a strictly cheaper path to it turns up
    /// before it is expanded. When off, the first discovered path is kept.
    pub relax_costs: bool,
    /// Stop after expanding this many boards
    pub max_expansions: Option<usize>,
    /// Stop after this much wall-clock time
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            relax_costs: true,
            max_expansions: None,
            timeout: None,
        }
    }
}

/// Counters collected during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Boards popped from the frontier and expanded
    pub expanded: usize,
    /// Search nodes created, including the root
    pub generated: usize,
    /// Largest frontier size observed
    pub max_frontier: usize,
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn time_elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// A solved puzzle: every board from the initial one to the goal.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Initial board first, goal board last
    pub path: Vec<Board>,
    /// Blank moves between consecutive boards of `path`
    pub moves: Vec<Direction>,
    pub stats: SearchStats,
}

impl Solution {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

type NodeId = usize;

/// A board discovered by the search. Never mutated once pushed.
#[derive(Debug)]
struct SearchNode {
    board: Board,
    g: u32,
    h: u32,
    parent: Option<NodeId>,
    /// Move that produced this node from its parent
    direction: Option<Direction>,
}

impl SearchNode {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// Visited-set entry. A board absent from the map has not been seen.
#[derive(Debug, Clone, Copy)]
struct Visit {
    best_g: u32,
    finalized: bool,
}

/// State owned by one search run
struct Search<'a> {
    config: &'a SolverConfig,
    nodes: Vec<SearchNode>,
    visited: HashMap<Board, Visit>,
    frontier: BinaryHeap<Reverse<(u32, NodeId)>>,
    stats: SearchStats,
    start: Instant,
}

impl<'a> Search<'a> {
    fn new(config: &'a SolverConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            visited: HashMap::new(),
            frontier: BinaryHeap::new(),
            stats: SearchStats::default(),
            start: Instant::now(),
        }
    }

    fn push(&mut self, node: SearchNode) {
        let id = self.nodes.len();
        self.frontier.push(Reverse((node.f(), id)));
        self.nodes.push(node);

        self.stats.generated += 1;
        self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
    }

    fn finish_stats(&self) -> SearchStats {
        SearchStats {
            elapsed: self.start.elapsed(),
            ..self.stats.clone()
        }
    }

    fn over_budget(&self, deadline: Option<Instant>) -> bool {
        if let Some(max) = self.config.max_expansions {
            if self.stats.expanded >= max {
                return true;
            }
        }
        matches!(deadline, Some(deadline) if Instant::now() >= deadline)
    }

    fn run(mut self, initial: &Board) -> Result<Solution, SolveError> {
        // A deadline past the end of `Instant`'s range means no deadline
        let deadline = self
            .config
            .timeout
            .and_then(|t| self.start.checked_add(t));

        let h = manhattan(initial);
        debug!(
            "starting A* on a {0}x{0} board, initial estimate {1}",
            initial.size(),
            h
        );
        self.visited.insert(
            initial.clone(),
            Visit {
                best_g: 0,
                finalized: false,
            },
        );
        self.push(SearchNode {
            board: initial.clone(),
            g: 0,
            h,
            parent: None,
            direction: None,
        });

        while let Some(Reverse((_, id))) = self.frontier.pop() {
            let g = self.nodes[id].g;
            let Some(visit) = self.visited.get(&self.nodes[id].board).copied() else {
                continue;
            };

            // Superseded by a cheaper copy, or already expanded
            if visit.finalized || g > visit.best_g {
                continue;
            }

            if self.over_budget(deadline) {
                let stats = self.finish_stats();
                debug!(
                    "budget exceeded after {} expansions ({} ms)",
                    stats.expanded,
                    stats.time_elapsed_ms()
                );
                return Err(SolveError::BudgetExceeded { stats });
            }

            if let Some(v) = self.visited.get_mut(&self.nodes[id].board) {
                v.finalized = true;
            }
            self.stats.expanded += 1;
            trace!(
                "expanding node {} (g={}, h={}, frontier={})",
                id,
                g,
                self.nodes[id].h,
                self.frontier.len()
            );

            if self.nodes[id].board.is_goal() {
                let (path, moves) = self.reconstruct(id);
                let stats = self.finish_stats();
                debug!(
                    "solved in {} moves: expanded {}, generated {}, {} ms",
                    moves.len(),
                    stats.expanded,
                    stats.generated,
                    stats.time_elapsed_ms()
                );
                return Ok(Solution { path, moves, stats });
            }

            let child_g = g + 1;
            let successors = self.nodes[id].board.successors();
            for (direction, board) in successors {
                match self.visited.entry(board) {
                    Entry::Occupied(mut seen) => {
                        let visit = seen.get_mut();
                        if visit.finalized || !self.config.relax_costs || child_g >= visit.best_g {
                            continue;
                        }
                        visit.best_g = child_g;
                        let board = seen.key().clone();
                        trace!("cheaper path to a queued board: g={}", child_g);
                        let h = manhattan(&board);
                        self.push(SearchNode {
                            board,
                            g: child_g,
                            h,
                            parent: Some(id),
                            direction: Some(direction),
                        });
                    }
                    Entry::Vacant(slot) => {
                        let board = slot.key().clone();
                        slot.insert(Visit {
                            best_g: child_g,
                            finalized: false,
                        });
                        let h = manhattan(&board);
                        self.push(SearchNode {
                            board,
                            g: child_g,
                            h,
                            parent: Some(id),
                            direction: Some(direction),
                        });
                    }
                }
            }
        }

        let stats = self.finish_stats();
        debug!("frontier exhausted after {} expansions", stats.expanded);
        Err(SolveError::Exhausted { stats })
    }

    /// Follow parent links from `goal` to the root, then reverse.
    fn reconstruct(&self, goal: NodeId) -> (Vec<Board>, Vec<Direction>) {
        let mut path = Vec::new();
        let mut moves = Vec::new();
        let mut current = Some(goal);
        while let Some(id) = current {
            let node = &self.nodes[id];
            path.push(node.board.clone());
            moves.extend(node.direction);
            current = node.parent;
        }
        path.reverse();
        moves.reverse();
        (path, moves)
    }
}

/// Solve a board with A*.
///
/// Unsolvable boards are rejected by the parity check before any search
/// state is allocated.
pub fn solve(initial: &Board, config: &SolverConfig) -> Result<Solution, SolveError> {
    if !is_solvable(initial) {
        debug!("parity check rejected the board; not searching");
        return Err(SolveError::Unsolvable);
    }
    search(initial, config)
}

/// Run A* without the parity gate. An unsolvable board exhausts its half of
/// the state space and returns [`SolveError::Exhausted`].
pub fn search(initial: &Board, config: &SolverConfig) -> Result<Solution, SolveError> {
    Search::new(config).run(initial)
}
