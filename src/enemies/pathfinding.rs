//! A* over the tile grid.
//!
//! Legality of every step is judged against the height of the start tile,
//! not the tile being left. Visited tiles are never reopened, so on uneven
//! terrain the route can be longer than the best one, and a route that only
//! exists through a revisited tile is missed.

use bevy::math::IVec2;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::world::terrain::TerrainGrid;

pub const STRAIGHT_COST: i32 = 10;
pub const DIAGONAL_COST: i32 = 14;

/// Neighbor offsets: four straight moves, then four diagonals.
const STEPS: [IVec2; 8] = [
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
    IVec2::new(1, 1),
    IVec2::new(-1, -1),
];

/// Tile route ordered from the goal end back to the start, start included.
pub type Path = Vec<IVec2>;

fn heuristic(tile: IVec2, goal: IVec2) -> i32 {
    ((tile.x - goal.x).abs() + (tile.y - goal.y).abs()) * STRAIGHT_COST
}

struct Visit {
    tile: IVec2,
    cost: i32,
    parent: Option<usize>,
}

/// Find a route from `start` towards `goal`. The search succeeds as soon as
/// it reaches a tile adjacent to (or on) the goal. Returns `None` if the goal
/// tile is not traversable or nothing near it can be reached.
pub fn find_path(terrain: &TerrainGrid, start: IVec2, goal: IVec2) -> Option<Path> {
    if !terrain.is_traversable(goal) {
        return None;
    }
    let reference = terrain.height_at(start)?;

    let width = terrain.width() as usize;
    let mut closed = vec![false; width * terrain.height() as usize];
    let index = |tile: IVec2| tile.y as usize * width + tile.x as usize;

    let mut visits = vec![Visit {
        tile: start,
        cost: 0,
        parent: None,
    }];
    // Ordered by (f, insertion order) so equal scores pop first-in first-out.
    let mut open = BinaryHeap::new();
    open.push(Reverse((heuristic(start, goal), 0usize)));

    while let Some(Reverse((_, current))) = open.pop() {
        let tile = visits[current].tile;
        if closed[index(tile)] {
            continue;
        }
        if (tile - goal).abs().max_element() <= 1 {
            return Some(trace(&visits, current));
        }
        closed[index(tile)] = true;

        for (i, step) in STEPS.iter().enumerate() {
            let next = tile + *step;
            if !terrain.is_valid_move(next, reference) || closed[index(next)] {
                continue;
            }
            let step_cost = if i < 4 { STRAIGHT_COST } else { DIAGONAL_COST };
            let cost = visits[current].cost + step_cost;
            visits.push(Visit {
                tile: next,
                cost,
                parent: Some(current),
            });
            open.push(Reverse((cost + heuristic(next, goal), visits.len() - 1)));
        }
    }
    None
}

fn trace(visits: &[Visit], mut at: usize) -> Path {
    let mut path = vec![visits[at].tile];
    while let Some(parent) = visits[at].parent {
        path.push(visits[parent].tile);
        at = parent;
    }
    path
}
