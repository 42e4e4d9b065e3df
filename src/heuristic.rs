use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::common::{euclid, Agent, INFINITY};
use crate::map::Map;

/// Min-heap entry for the Dijkstra sweeps. Ordering is reversed so the
/// std max-heap pops the smallest distance first.
#[derive(Debug, Clone, PartialEq)]
struct HeapEntry {
    g: f64,
    id: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .g
            .total_cmp(&self.g)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Exact shortest-path distances from a set of pivot vertices, one pivot
/// per agent goal. Pivot `k` is agent `k`'s goal, so `get_value(id, agent.id)`
/// is that agent's perfect heuristic; any pivot doubles as a differential
/// lower bound for searches toward intermediate targets.
#[derive(Debug, Clone)]
pub struct Heuristic {
    values: Vec<Vec<f64>>,
}

impl Heuristic {
    pub fn build(map: &Map, agents: &[Agent]) -> Self {
        let values = agents
            .iter()
            .map(|agent| Self::dijkstra(map, agent.goal_id))
            .collect();
        debug!("heuristic tables built for {} pivots", agents.len());
        Heuristic { values }
    }

    fn dijkstra(map: &Map, source: usize) -> Vec<f64> {
        let mut dist = vec![INFINITY; map.size()];
        let mut heap = BinaryHeap::new();
        dist[source] = 0.0;
        heap.push(HeapEntry { g: 0.0, id: source });

        while let Some(HeapEntry { g, id }) = heap.pop() {
            if g > dist[id] {
                continue;
            }
            let here = map.vertex(id);
            for next in map.get_valid_moves(id) {
                let next_g = g + euclid(here.i, here.j, next.i, next.j);
                if next_g < dist[next.id] {
                    dist[next.id] = next_g;
                    heap.push(HeapEntry {
                        g: next_g,
                        id: next.id,
                    });
                }
            }
        }

        dist
    }

    pub fn get_value(&self, id: usize, pivot: usize) -> f64 {
        self.values[pivot][id]
    }

    /// Number of pivots usable for differential lower bounds.
    pub fn get_size(&self) -> usize {
        self.values.len().min(10)
    }
}
