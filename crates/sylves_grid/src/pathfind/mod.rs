//! Pathfinding cores: A*, Dijkstra, BFS over any `Grid` (spec component C7).
//!
//! All three share the same "visited" shape: a map from `Cell` to the best
//! score seen so far plus the step that achieved it, and a priority queue
//! (FIFO for BFS) of candidates to relax. Entries in the queue can go stale
//! when a cheaper path to the same cell is found after it was already
//! pushed; rather than support decrease-key, a popped entry carries the
//! `score` it was pushed with and is skipped if that no longer matches the
//! best recorded score for its cell (spec §4.6, "a *decrease-key-free*
//! heap").

pub mod astar;
pub mod bfs;
pub mod dijkstra;
pub mod heuristic;

use crate::cell::{Cell, CellPath, Step};
use crate::error::{GridError, GridResult};
use std::collections::HashMap;

/// The best known way to reach a cell during a single pathfinding run.
#[derive(Debug, Clone, Copy)]
struct VisitEntry {
    score: f32,
    step: Option<Step>,
}

/// Shared `Cell -> VisitEntry` state for a single search (spec §4.6).
#[derive(Debug, Default)]
struct Visited(HashMap<Cell, VisitEntry>);

impl Visited {
    fn new() -> Self {
        Visited(HashMap::new())
    }

    fn score_of(&self, cell: Cell) -> Option<f32> {
        self.0.get(&cell).map(|e| e.score)
    }

    /// Record `cell` as reachable at `score` via `step` (`None` for the
    /// source cell itself), unconditionally overwriting any prior entry.
    /// Callers are expected to have already checked that `score` improves
    /// on the existing entry.
    fn relax(&mut self, cell: Cell, score: f32, step: Option<Step>) {
        self.0.insert(cell, VisitEntry { score, step });
    }

    fn contains(&self, cell: Cell) -> bool {
        self.0.contains_key(&cell)
    }

    fn iter(&self) -> impl Iterator<Item = (Cell, f32)> + '_ {
        self.0.iter().map(|(&c, e)| (c, e.score))
    }
}

/// Walk `visited[target].step` back to `source`, collecting steps into a
/// `CellPath` (spec §4.6, "Path extraction"). Returns `PathNotFound` if
/// `target` was never visited, or if the backward walk cannot reach
/// `source` (a corrupted/partial `visited` map).
fn reconstruct_path(visited: &Visited, source: Cell, target: Cell) -> GridResult<CellPath> {
    if target == source {
        return Ok(CellPath::zero_length());
    }
    let mut steps = Vec::new();
    let mut current = target;
    loop {
        let entry = visited.0.get(&current).ok_or(GridError::PathNotFound)?;
        match entry.step {
            Some(step) => {
                steps.push(step);
                current = step.src;
                if current == source {
                    break;
                }
            }
            None => {
                // A visited cell with no recorded step must be the source.
                if current == source {
                    break;
                }
                return Err(GridError::PathNotFound);
            }
        }
    }
    steps.reverse();
    Ok(CellPath::from_steps(steps))
}
