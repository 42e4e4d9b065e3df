use std::collections::HashMap;

use tracing::debug;

use crate::common::{Constraint, Interval, Move, EPSILON};

/// Per-call digest of the raw constraint list: forbidden occupancy
/// windows per vertex, forbidden departure windows per directed edge,
/// the agent's own mandatory traversals in `t1` order, and positive
/// constraints naming other agents (kept for inspection, never searched).
#[derive(Debug, Default)]
pub(crate) struct ConstraintStore {
    collision_intervals: HashMap<usize, Vec<Interval>>,
    edge_constraints: HashMap<(usize, usize), Vec<Move>>,
    landmarks: Vec<Move>,
    foreign_positive: Vec<Move>,
}

impl ConstraintStore {
    pub(crate) fn clear(&mut self) {
        self.collision_intervals.clear();
        self.edge_constraints.clear();
        self.landmarks.clear();
        self.foreign_positive.clear();
    }

    /// Dispatch every raw constraint into the matching structure.
    pub(crate) fn build(&mut self, agent_id: usize, cons: &[Constraint]) {
        for con in cons {
            if !con.positive {
                if con.id1 == con.id2 {
                    self.add_collision_interval(con.id1, Interval::new(con.t1, con.t2));
                } else {
                    self.add_move_constraint(Move::from(con));
                }
            } else if con.agent == agent_id {
                self.add_landmark(Move::from(con));
            } else {
                self.foreign_positive.push(Move::from(con));
            }
        }
        debug!(
            "constraints built: {} vertices, {} edges, {} landmarks",
            self.collision_intervals.len(),
            self.edge_constraints.len(),
            self.landmarks.len()
        );
    }

    /// Insert a forbidden occupancy window and re-coalesce the vertex
    /// list: sort, then merge any pair that touches or overlaps within
    /// tolerance. Idempotent.
    pub(crate) fn add_collision_interval(&mut self, id: usize, interval: Interval) {
        let list = self.collision_intervals.entry(id).or_default();
        list.push(interval);
        list.sort_by(|a, b| a.lo.total_cmp(&b.lo).then(a.hi.total_cmp(&b.hi)));
        let mut i = 0;
        while i + 1 < list.len() {
            if list[i].hi + EPSILON > list[i + 1].lo {
                list[i].hi = list[i].hi.max(list[i + 1].hi);
                list.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }

    /// Insert a forbidden departure window on a directed edge, keeping
    /// the per-edge list sorted by `t1` and pairwise-disjoint. Merged
    /// windows keep the identity fields of the first contributor.
    pub(crate) fn add_move_constraint(&mut self, m: Move) {
        let list = self.edge_constraints.entry((m.id1, m.id2)).or_default();
        let pos = list
            .iter()
            .position(|e| e.t1.total_cmp(&m.t1).then(e.t2.total_cmp(&m.t2)).is_gt())
            .unwrap_or(list.len());
        list.insert(pos, m);

        let mut i = 0;
        while i + 1 < list.len() {
            if list[i].t2 + EPSILON > list[i + 1].t1 {
                if list[i + 1].t2 > list[i].t2 {
                    list[i].t2 = list[i + 1].t2;
                }
                list.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }

    fn add_landmark(&mut self, m: Move) {
        let pos = self
            .landmarks
            .iter()
            .position(|lm| lm.t1 > m.t1)
            .unwrap_or(self.landmarks.len());
        self.landmarks.insert(pos, m);
    }

    pub(crate) fn collisions(&self, id: usize) -> &[Interval] {
        self.collision_intervals
            .get(&id)
            .map_or(&[], |list| list.as_slice())
    }

    pub(crate) fn edge_list(&self, id1: usize, id2: usize) -> &[Move] {
        self.edge_constraints
            .get(&(id1, id2))
            .map_or(&[], |list| list.as_slice())
    }

    pub(crate) fn landmarks(&self) -> &[Move] {
        &self.landmarks
    }

    #[allow(dead_code)]
    pub(crate) fn foreign_positive(&self) -> &[Move] {
        &self.foreign_positive
    }
}
