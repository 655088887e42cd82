//! A* pathfinding over the hex map
//!
//! Every generated tile is traversable at unit cost. Hazards and occupancy are
//! not considered here; they are resolved step by step when the path is walked.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::map::grid::HexMap;
use crate::map::hex::HexCoord;

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: HexCoord,
    f_cost: u32, // g_cost + heuristic
    order: u64,  // discovery order, breaks f-cost ties
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.order == other.order
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path from `start` to `goal`.
///
/// The returned steps exclude `start` and end at `goal`. An empty vector means
/// no movement is possible: the goal is unreachable, never generated, or
/// equal to the start.
pub fn find_path(map: &HexMap, start: HexCoord, goal: HexCoord) -> Vec<HexCoord> {
    if start == goal || !map.contains(start) || !map.contains(goal) {
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
    let mut g_scores: AHashMap<HexCoord, u32> = AHashMap::new();
    let mut order = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.distance(&goal),
        order,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return reconstruct_path(&came_from, start, goal);
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(u32::MAX);

        for neighbor in current.coord.neighbors() {
            if !map.contains(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                order += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.distance(&goal),
                    order,
                });
            }
        }
    }

    Vec::new()
}

/// Walk `came_from` back from goal, dropping the start hex
fn reconstruct_path(
    came_from: &AHashMap<HexCoord, HexCoord>,
    start: HexCoord,
    goal: HexCoord,
) -> Vec<HexCoord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tile::Terrain;

    #[test]
    fn test_pathfind_straight_line() {
        let map = HexMap::open(10, 10);
        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(5, 0);

        let path = find_path(&map, start, goal);

        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&HexCoord::new(1, 0)));
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn test_path_length_equals_distance_on_open_grid() {
        let map = HexMap::open(12, 12);
        let pairs = [
            ((0, 0), (11, 11)),
            ((11, 0), (0, 11)),
            ((3, 7), (9, 2)),
            ((5, 5), (6, 4)),
            ((0, 11), (11, 0)),
        ];
        for ((sq, sr), (gq, gr)) in pairs {
            let start = HexCoord::new(sq, sr);
            let goal = HexCoord::new(gq, gr);
            let path = find_path(&map, start, goal);
            assert_eq!(path.len() as u32, start.distance(&goal));

            // Each step is adjacent to the previous
            let mut prev = start;
            for step in &path {
                assert_eq!(prev.distance(step), 1);
                prev = *step;
            }
        }
    }

    #[test]
    fn test_pathfind_around_gap() {
        // Leave (2,0) and (3,0) ungenerated
        let mut map = HexMap::new(10, 10);
        for q in 0..10 {
            for r in 0..10 {
                if r == 0 && (q == 2 || q == 3) {
                    continue;
                }
                map.add_tile(HexCoord::new(q, r), Terrain::Sand, None).unwrap();
            }
        }

        let path = find_path(&map, HexCoord::new(0, 0), HexCoord::new(5, 0));

        assert!(!path.is_empty());
        assert!(!path.contains(&HexCoord::new(2, 0)));
        assert!(!path.contains(&HexCoord::new(3, 0)));
        assert_eq!(path.last(), Some(&HexCoord::new(5, 0)));
    }

    #[test]
    fn test_pathfind_goal_never_generated() {
        let map = HexMap::open(10, 10);
        let path = find_path(&map, HexCoord::new(0, 0), HexCoord::new(20, 20));
        assert!(path.is_empty());
    }

    #[test]
    fn test_pathfind_disconnected() {
        // Two islands: q < 3 and q > 3, with column q == 3 missing
        let mut map = HexMap::new(8, 8);
        for q in 0..8 {
            for r in 0..8 {
                if q != 3 {
                    map.add_tile(HexCoord::new(q, r), Terrain::Rock, None).unwrap();
                }
            }
        }
        let path = find_path(&map, HexCoord::new(0, 4), HexCoord::new(6, 4));
        assert!(path.is_empty());
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let map = HexMap::open(10, 10);
        let start = HexCoord::new(5, 5);
        assert!(find_path(&map, start, start).is_empty());
    }

    #[test]
    fn test_path_ignores_sinkholes() {
        let mut map = HexMap::open(10, 10);
        map.set_sinkhole(HexCoord::new(1, 0), 0.9).unwrap();
        let path = find_path(&map, HexCoord::new(0, 0), HexCoord::new(2, 0));
        assert_eq!(path.len(), 2);
    }
}
