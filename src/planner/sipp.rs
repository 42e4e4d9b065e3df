use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::common::{euclid, Agent, Constraint, Interval, Move, Node, Path, EPSILON, INFINITY};
use crate::heuristic::Heuristic;
use crate::map::Map;

use super::constraints::ConstraintStore;

/// Safe-interval A* planner for a single agent.
///
/// Search states are (vertex, safe interval) pairs; waiting is implicit
/// in moving to a later safe interval. A `find_path` call owns its whole
/// lifecycle: constraint digestion, the (possibly landmark-chained)
/// searches, and path reconstruction. Nothing survives between calls.
#[derive(Debug, Default)]
pub struct Sipp {
    agent: Agent,
    open: Vec<Node>,
    closed: Vec<Node>,
    closed_by_vertex: HashMap<usize, Vec<usize>>,
    constraints: ConstraintStore,
    expanded: usize,
}

fn concat_part(mut result: Path, part: &Path) -> Path {
    result.nodes.extend(part.nodes.iter().skip(1).cloned());
    result
}

impl Sipp {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear(&mut self) {
        self.open.clear();
        self.closed.clear();
        self.closed_by_vertex.clear();
        self.constraints.clear();
        self.expanded = 0;
    }

    /// Plan a minimum-cost space-time path for `agent` under `cons`.
    ///
    /// `tree_size` is the caller's constraint-tree size, carried along
    /// for diagnostics only. Returns `None` when no feasible path
    /// exists under the constraints.
    #[instrument(skip_all, name = "sipp", fields(agent = agent.id, start = agent.start_id, goal = agent.goal_id), level = "debug")]
    pub fn find_path(
        &mut self,
        agent: &Agent,
        map: &Map,
        cons: &[Constraint],
        h_values: &Heuristic,
        tree_size: usize,
    ) -> Option<Path> {
        self.clear();
        self.agent = agent.clone();
        self.constraints.build(agent.id, cons);
        debug!(
            "planning under {} constraints at tree size {}",
            cons.len(),
            tree_size
        );

        let landmarks = self.constraints.landmarks().to_vec();
        let mut result = if landmarks.is_empty() {
            self.plan_direct(map, h_values)?
        } else {
            self.plan_with_landmarks(&landmarks, map, h_values)?
        };

        result.cost = result.nodes.last()?.g;
        result.agent_id = agent.id;
        result.expanded = self.expanded;
        debug!("path found: cost {}, {} expansions", result.cost, result.expanded);
        Some(result)
    }

    fn plan_direct(&mut self, map: &Map, h_values: &Heuristic) -> Option<Path> {
        let start = self
            .get_endpoints(
                self.agent.start_id,
                self.agent.start_i,
                self.agent.start_j,
                0.0,
                INFINITY,
            )
            .into_iter()
            .next()?;
        let goal = self
            .get_endpoints(
                self.agent.goal_id,
                self.agent.goal_i,
                self.agent.goal_j,
                0.0,
                INFINITY,
            )
            .pop()?;
        let parts = self.find_partial_path(&[start], &[goal], map, h_values, INFINITY);
        if parts[0].cost < 0.0 {
            return None;
        }
        parts.into_iter().next()
    }

    /// Chain partial searches through the mandatory traversals, carrying
    /// every surviving path prefix between segments. A prefix survives a
    /// segment when some partial path departs from exactly the safe
    /// interval the prefix ended in.
    fn plan_with_landmarks(
        &mut self,
        landmarks: &[Move],
        map: &Map,
        h_values: &Heuristic,
    ) -> Option<Path> {
        let mut results: Vec<Path> = Vec::new();

        for i in 0..=landmarks.len() {
            let starts: Vec<Node> = if i == 0 {
                let endpoints = self.get_endpoints(
                    self.agent.start_id,
                    self.agent.start_i,
                    self.agent.start_j,
                    0.0,
                    INFINITY,
                );
                vec![endpoints.into_iter().next()?]
            } else {
                results
                    .iter()
                    .map(|p| p.nodes.last().cloned())
                    .collect::<Option<Vec<_>>>()?
            };

            let goals: Vec<Node> = if i == landmarks.len() {
                let endpoints = self.get_endpoints(
                    self.agent.goal_id,
                    self.agent.goal_i,
                    self.agent.goal_j,
                    0.0,
                    INFINITY,
                );
                vec![endpoints.into_iter().last()?]
            } else {
                let lm = &landmarks[i];
                self.get_endpoints(lm.id1, lm.i1, lm.j1, lm.t1, lm.t2)
            };
            if goals.is_empty() {
                return None;
            }

            let max_f = goals[goals.len() - 1].interval.hi;
            let parts = self.find_partial_path(&starts, &goals, map, h_values, max_f);

            let mut new_results: Vec<Path> = Vec::new();
            if i == 0 {
                for part in &parts {
                    if !part.nodes.is_empty() {
                        new_results.push(part.clone());
                    }
                }
            } else {
                for part in &parts {
                    if part.nodes.is_empty() {
                        continue;
                    }
                    for prev in &results {
                        let front = part.nodes[0].interval;
                        let back = prev.nodes[prev.nodes.len() - 1].interval;
                        if front.matches(&back) {
                            new_results.push(concat_part(prev.clone(), part));
                        }
                    }
                }
            }
            results = new_results;
            if results.is_empty() {
                debug!("segment {i} left no surviving prefixes");
                return None;
            }

            if i < landmarks.len() {
                results = self.traverse_landmark(&landmarks[i], results)?;
            }
        }

        results.into_iter().next()
    }

    /// Force the landmark edge itself: pick, for every safe arrival
    /// window at the landmark's destination, the cheapest surviving
    /// prefix that can make the traversal, waiting at the origin when
    /// the window has not opened yet.
    fn traverse_landmark(&self, lm: &Move, results: Vec<Path>) -> Option<Vec<Path>> {
        let starts: Vec<Node> = results
            .iter()
            .map(|p| p.nodes.last().cloned())
            .collect::<Option<Vec<_>>>()?;
        let offset = euclid(lm.i1, lm.j1, lm.i2, lm.j2);
        let mut goals = self.get_endpoints(lm.id2, lm.i2, lm.j2, lm.t1 + offset, lm.t2 + offset);
        if goals.is_empty() {
            return None;
        }

        let mut new_results: Vec<Path> = Vec::new();
        for goal in &mut goals {
            let mut best_g = INFINITY;
            let mut best_start = None;
            for (k, start) in starts.iter().enumerate() {
                let g = self.check_endpoint(start, goal);
                if g < best_g {
                    best_start = Some(k);
                    best_g = g;
                }
            }
            let Some(k) = best_start else {
                continue;
            };

            goal.g = best_g;
            // The arrival node now resides at the destination: its safe
            // interval runs to the next collision there, not merely to
            // the end of the mandated window.
            let colls = self.constraints.collisions(goal.id);
            if colls.is_empty() {
                goal.interval.hi = INFINITY;
            } else {
                for c in colls {
                    if goal.g < c.lo {
                        goal.interval.hi = c.lo;
                        break;
                    }
                }
            }

            let mut extended = results[k].clone();
            if goal.g - starts[k].g > offset + EPSILON {
                let mut wait = extended.nodes[extended.nodes.len() - 1].clone();
                wait.g = goal.g - offset;
                extended.nodes.push(wait);
            }
            extended.nodes.push(goal.clone());
            new_results.push(extended);
        }

        if new_results.is_empty() {
            None
        } else {
            Some(new_results)
        }
    }

    /// Multi-source, multi-goal A* over safe intervals, bounded by
    /// `max_f`. All goals share a vertex and differ only in their safe
    /// sub-interval; `paths[k]` stays at its default (negative cost)
    /// when goal `k` was not reached.
    fn find_partial_path(
        &mut self,
        starts: &[Node],
        goals: &[Node],
        map: &Map,
        h_values: &Heuristic,
        max_f: f64,
    ) -> Vec<Path> {
        self.open.clear();
        self.closed.clear();
        self.closed_by_vertex.clear();

        let mut paths = vec![Path::default(); goals.len()];
        let mut found = 0;
        for start in starts {
            let mut start = start.clone();
            start.parent = None;
            self.open.push(start);
        }
        let goal_hint = &goals[0];

        while !self.open.is_empty() {
            let current = self.find_min();
            trace!("expand node: {current:?}");
            let parent_index = self.closed.len();
            self.closed.push(current.clone());
            self.closed_by_vertex
                .entry(current.id)
                .or_default()
                .push(parent_index);

            if current.id == goal_hint.id {
                for (k, goal) in goals.iter().enumerate() {
                    if paths[k].cost >= 0.0 {
                        continue;
                    }
                    if current.g - EPSILON < goal.interval.hi
                        && goal.interval.lo - EPSILON < current.interval.hi
                    {
                        let mut nodes = self.reconstruct_path(&current);
                        let mut arrival = current.g;
                        if nodes[nodes.len() - 1].g < goal.interval.lo {
                            let mut wait = current.clone();
                            wait.g = goal.interval.lo;
                            arrival = wait.g;
                            nodes.push(wait);
                        }
                        paths[k] = Path {
                            nodes,
                            cost: arrival,
                            agent_id: self.agent.id,
                            expanded: self.closed.len(),
                        };
                        found += 1;
                    }
                }
                if found == goals.len() {
                    break;
                }
            }

            for mut succ in self.find_successors(&current, map, h_values, goal_hint) {
                if succ.f > max_f {
                    continue;
                }
                succ.parent = Some(parent_index);
                let dominated = self.closed_by_vertex.get(&succ.id).is_some_and(|ids| {
                    ids.iter().any(|&c| {
                        let entry = &self.closed[c];
                        entry.interval.lo - EPSILON < succ.interval.lo
                            && entry.interval.hi + EPSILON > succ.interval.hi
                    })
                });
                if !dominated {
                    self.add_open(succ);
                }
            }
        }

        self.expanded += self.closed.len();
        paths
    }

    /// All safe (vertex, interval) successors of `current`: for every
    /// adjacent vertex, every safe interval reachable by moving now or
    /// waiting first, with departures shifted past any forbidden edge
    /// windows.
    fn find_successors(
        &self,
        current: &Node,
        map: &Map,
        h_values: &Heuristic,
        goal: &Node,
    ) -> Vec<Node> {
        let mut succs = Vec::new();
        for mv in map.get_valid_moves(current.id) {
            let cost = euclid(current.i, current.j, mv.i, mv.j);
            let arrival = current.g + cost;

            let colls = self.constraints.collisions(mv.id);
            let mut intervals = Vec::with_capacity(colls.len() + 1);
            if colls.is_empty() {
                intervals.push(Interval::new(arrival, INFINITY));
            } else {
                let mut lo = 0.0;
                for c in colls {
                    intervals.push(Interval::new(lo, c.lo));
                    lo = c.hi;
                }
                intervals.push(Interval::new(lo, INFINITY));
            }

            let edge_cons = self.constraints.edge_list(current.id, mv.id);
            for interval in intervals {
                if interval.hi < arrival {
                    continue;
                }
                let mut g = arrival.max(interval.lo);
                for con in edge_cons {
                    if g - cost + EPSILON > con.t1 && g - cost < con.t2 {
                        g = con.t2 + cost;
                    }
                }
                // Must leave inside the current safe interval and arrive
                // inside the destination one.
                if g - cost > current.interval.hi || g > interval.hi {
                    continue;
                }

                let h = if goal.id == self.agent.goal_id {
                    h_values.get_value(mv.id, self.agent.id)
                } else {
                    let mut h = euclid(goal.i, goal.j, mv.i, mv.j);
                    for pivot in 0..h_values.get_size() {
                        h = h.max(
                            (h_values.get_value(mv.id, pivot) - h_values.get_value(goal.id, pivot))
                                .abs(),
                        );
                    }
                    h
                };
                succs.push(Node {
                    id: mv.id,
                    i: mv.i,
                    j: mv.j,
                    g,
                    f: g + h,
                    interval,
                    parent: None,
                });
            }
        }
        succs
    }

    fn find_min(&mut self) -> Node {
        self.open.remove(0)
    }

    /// Insert into the open list, which stays sorted by (f asc, g desc).
    /// A node matching an open entry on vertex and interval end is
    /// interchangeable with it: the one with the better f survives.
    fn add_open(&mut self, new_node: Node) {
        let mut pos: Option<usize> = None;
        let mut idx = 0;
        while idx < self.open.len() {
            let entry = &self.open[idx];
            if pos.is_none()
                && (entry.f > new_node.f + EPSILON
                    || ((entry.f - new_node.f).abs() < EPSILON && new_node.g + EPSILON > entry.g))
            {
                pos = Some(idx);
            }
            if entry.id == new_node.id
                && (entry.interval.hi - new_node.interval.hi).abs() < EPSILON
            {
                if new_node.f > entry.f - EPSILON {
                    return;
                }
                if pos == Some(idx) {
                    let entry = &mut self.open[idx];
                    entry.f = new_node.f;
                    entry.g = new_node.g;
                    entry.interval = new_node.interval;
                    entry.parent = new_node.parent;
                    return;
                }
                self.open.remove(idx);
                break;
            }
            idx += 1;
        }
        match pos {
            Some(p) => self.open.insert(p, new_node),
            None => self.open.push(new_node),
        }
    }

    /// Walk the parent chain out of the closed arena, then make waits
    /// explicit: wherever consecutive nodes are further apart in time
    /// than in space, a wait node is inserted at the earlier vertex.
    fn reconstruct_path(&self, last: &Node) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut current = last.clone();
        loop {
            nodes.push(current.clone());
            match current.parent {
                Some(p) => current = self.closed[p].clone(),
                None => break,
            }
        }
        nodes.reverse();

        let mut i = 0;
        while i + 1 < nodes.len() {
            let step = nodes[i].dist(&nodes[i + 1]);
            if (nodes[i + 1].g - nodes[i].g - step).abs() > EPSILON {
                let mut wait = nodes[i].clone();
                wait.g = nodes[i + 1].g - step;
                nodes.insert(i + 1, wait);
            }
            i += 1;
        }
        nodes
    }

    /// Split `[t1, t2]` at vertex `id` into its maximal safe
    /// sub-intervals, earliest first.
    fn get_endpoints(&self, id: usize, i: f64, j: f64, t1: f64, t2: f64) -> Vec<Node> {
        let mut intervals = vec![Interval::new(t1, t2)];
        for c in self.constraints.collisions(id) {
            let mut split = Vec::with_capacity(intervals.len() + 1);
            for n in intervals {
                if c.lo - EPSILON < n.lo && c.hi + EPSILON > n.hi {
                    // Swallowed whole.
                } else if c.lo - EPSILON < n.lo && c.hi > n.lo {
                    split.push(Interval::new(c.hi, n.hi));
                } else if c.lo - EPSILON > n.lo && c.hi + EPSILON < n.hi {
                    split.push(Interval::new(n.lo, c.lo));
                    split.push(Interval::new(c.hi, n.hi));
                } else if c.lo < n.hi && c.hi + EPSILON > n.hi {
                    split.push(Interval::new(n.lo, c.lo));
                } else {
                    split.push(n);
                }
            }
            intervals = split;
        }
        intervals
            .into_iter()
            .map(|interval| Node {
                id,
                i,
                j,
                g: 0.0,
                f: 0.0,
                interval,
                parent: None,
            })
            .collect()
    }

    /// Earliest feasible arrival for a forced `start -> goal` traversal,
    /// or `INFINITY` when the traversal cannot be made.
    fn check_endpoint(&self, start: &Node, goal: &Node) -> f64 {
        let cost = start.dist(goal);
        let mut depart = start.g;
        if depart + cost < goal.interval.lo {
            depart = goal.interval.lo - cost;
        }
        for con in self.constraints.edge_list(start.id, goal.id) {
            if depart + EPSILON > con.t1 && depart < con.t2 {
                depart = con.t2;
            }
        }
        if depart > start.interval.hi || depart + cost > goal.interval.hi {
            INFINITY
        } else {
            depart + cost
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();
    }

    fn line_map(width: usize) -> Map {
        let content = format!(
            "type octile\nheight 1\nwidth {}\nmap\n{}\n",
            width,
            ".".repeat(width)
        );
        Map::from_map_str(&content).unwrap()
    }

    fn open_map(height: usize, width: usize) -> Map {
        let mut content = format!("type octile\nheight {}\nwidth {}\nmap\n", height, width);
        for _ in 0..height {
            content.push_str(&".".repeat(width));
            content.push('\n');
        }
        Map::from_map_str(&content).unwrap()
    }

    fn make_agent(map: &Map, id: usize, start: (usize, usize), goal: (usize, usize)) -> Agent {
        let start_id = map.vertex_id(start.0, start.1);
        let goal_id = map.vertex_id(goal.0, goal.1);
        Agent {
            id,
            start_id,
            start_i: start.0 as f64,
            start_j: start.1 as f64,
            goal_id,
            goal_i: goal.0 as f64,
            goal_j: goal.1 as f64,
        }
    }

    fn wait_con(map: &Map, cell: (usize, usize), t1: f64, t2: f64) -> Constraint {
        let id = map.vertex_id(cell.0, cell.1);
        Constraint {
            agent: 0,
            positive: false,
            id1: id,
            id2: id,
            i1: cell.0 as f64,
            j1: cell.1 as f64,
            i2: cell.0 as f64,
            j2: cell.1 as f64,
            t1,
            t2,
        }
    }

    fn edge_con(map: &Map, from: (usize, usize), to: (usize, usize), t1: f64, t2: f64) -> Constraint {
        Constraint {
            agent: 0,
            positive: false,
            id1: map.vertex_id(from.0, from.1),
            id2: map.vertex_id(to.0, to.1),
            i1: from.0 as f64,
            j1: from.1 as f64,
            i2: to.0 as f64,
            j2: to.1 as f64,
            t1,
            t2,
        }
    }

    fn landmark_con(
        map: &Map,
        agent: usize,
        from: (usize, usize),
        to: (usize, usize),
        t1: f64,
        t2: f64,
    ) -> Constraint {
        Constraint {
            agent,
            positive: true,
            ..edge_con(map, from, to, t1, t2)
        }
    }

    fn assert_path_shape(path: &Path) {
        for pair in path.nodes.windows(2) {
            let step = pair[0].dist(&pair[1]);
            let dg = pair[1].g - pair[0].g;
            assert!(
                (dg - step).abs() < EPSILON || (pair[0].id == pair[1].id && dg > 0.0),
                "inconsistent step between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_straight_line() {
        init_tracing();
        let map = line_map(5);
        let agent = make_agent(&map, 0, (0, 0), (0, 4));
        let h_values = Heuristic::build(&map, std::slice::from_ref(&agent));
        let mut planner = Sipp::new();

        let path = planner.find_path(&agent, &map, &[], &h_values, 0).unwrap();
        assert_eq!(path.nodes.len(), 5);
        assert!((path.cost - 4.0).abs() < EPSILON);
        let ids: Vec<usize> = path.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_path_shape(&path);
    }

    #[test]
    fn test_wait_constraint_forces_wait() {
        init_tracing();
        let map = line_map(3);
        let agent = make_agent(&map, 0, (0, 0), (0, 2));
        let h_values = Heuristic::build(&map, std::slice::from_ref(&agent));
        let mut planner = Sipp::new();

        let cons = vec![wait_con(&map, (0, 1), 0.5, 2.0)];
        let path = planner
            .find_path(&agent, &map, &cons, &h_values, 0)
            .unwrap();

        // The middle vertex only opens at t = 2; the slack turns into a
        // wait at the start vertex during reconstruction.
        assert!((path.cost - 3.0).abs() < EPSILON);
        assert_eq!(path.nodes.len(), 4);
        assert_eq!(path.nodes[0].id, path.nodes[1].id);
        assert!((path.nodes[1].g - 1.0).abs() < EPSILON);
        assert!((path.nodes[2].g - 2.0).abs() < EPSILON);
        assert_path_shape(&path);
    }

    #[test]
    fn test_wait_constraint_boundary_touch() {
        init_tracing();
        let map = line_map(3);
        let agent = make_agent(&map, 0, (0, 0), (0, 2));
        let h_values = Heuristic::build(&map, std::slice::from_ref(&agent));
        let mut planner = Sipp::new();

        // Arrival exactly at the window's opening instant is a boundary
        // touch, which the closed-ish interval arithmetic admits.
        let cons = vec![wait_con(&map, (0, 1), 1.0, 2.0)];
        let path = planner
            .find_path(&agent, &map, &cons, &h_values, 0)
            .unwrap();
        assert!((path.cost - 2.0).abs() < EPSILON);
        assert_eq!(path.nodes.len(), 3);
    }

    #[test]
    fn test_edge_constraint_delays_departure() {
        init_tracing();
        let map = open_map(3, 3);
        let agent = make_agent(&map, 0, (0, 0), (2, 0));
        let h_values = Heuristic::build(&map, std::slice::from_ref(&agent));
        let mut planner = Sipp::new();

        let cons = vec![edge_con(&map, (1, 0), (2, 0), 1.0, 2.5)];
        let path = planner
            .find_path(&agent, &map, &cons, &h_values, 0)
            .unwrap();

        // Waiting at (1, 0) until the edge frees beats the detour of
        // cost 4 around the right.
        assert!((path.cost - 3.5).abs() < EPSILON);
        let ids: Vec<usize> = path.nodes.iter().map(|n| n.id).collect();
        assert_eq!(
            ids,
            vec![
                map.vertex_id(0, 0),
                map.vertex_id(1, 0),
                map.vertex_id(1, 0),
                map.vertex_id(2, 0)
            ]
        );
        assert!((path.nodes[2].g - 2.5).abs() < EPSILON);
        assert_path_shape(&path);
    }

    #[test]
    fn test_blocked_forever_is_infeasible() {
        init_tracing();
        let map = line_map(3);
        let agent = make_agent(&map, 0, (0, 0), (0, 2));
        let h_values = Heuristic::build(&map, std::slice::from_ref(&agent));
        let mut planner = Sipp::new();

        let cons = vec![wait_con(&map, (0, 1), 0.0, INFINITY)];
        assert!(planner.find_path(&agent, &map, &cons, &h_values, 0).is_none());
    }

    #[test]
    fn test_landmark_traversal_in_window() {
        init_tracing();
        let map = line_map(5);
        let agent = make_agent(&map, 0, (0, 0), (0, 4));
        let h_values = Heuristic::build(&map, std::slice::from_ref(&agent));
        let mut planner = Sipp::new();

        let cons = vec![landmark_con(&map, 0, (0, 2), (0, 3), 5.0, 6.0)];
        let path = planner
            .find_path(&agent, &map, &cons, &h_values, 0)
            .unwrap();

        assert!((path.cost - 7.0).abs() < EPSILON);
        assert_path_shape(&path);

        // The mandated edge appears with a departure inside [5, 6].
        let from = map.vertex_id(0, 2);
        let to = map.vertex_id(0, 3);
        let crossing = path
            .nodes
            .windows(2)
            .find(|pair| pair[0].id == from && pair[1].id == to)
            .expect("landmark edge missing from path");
        let depart = crossing[1].g - crossing[0].dist(&crossing[1]);
        assert!((5.0..=6.0).contains(&depart));
    }

    #[test]
    fn test_landmark_endpoint_fully_blocked() {
        init_tracing();
        let map = line_map(5);
        let agent = make_agent(&map, 0, (0, 0), (0, 4));
        let h_values = Heuristic::build(&map, std::slice::from_ref(&agent));
        let mut planner = Sipp::new();

        let cons = vec![
            landmark_con(&map, 0, (0, 2), (0, 3), 5.0, 6.0),
            wait_con(&map, (0, 2), 0.0, INFINITY),
        ];
        assert!(planner.find_path(&agent, &map, &cons, &h_values, 0).is_none());
    }

    #[test]
    fn test_deterministic_replanning() {
        init_tracing();
        let map = open_map(3, 3);
        let agent = make_agent(&map, 0, (0, 0), (2, 0));
        let h_values = Heuristic::build(&map, std::slice::from_ref(&agent));
        let mut planner = Sipp::new();

        let cons = vec![
            edge_con(&map, (1, 0), (2, 0), 1.0, 2.5),
            wait_con(&map, (0, 1), 0.0, 1.0),
        ];
        let first = planner.find_path(&agent, &map, &cons, &h_values, 0).unwrap();
        let second = planner.find_path(&agent, &map, &cons, &h_values, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_open_discards_dominated() {
        let node = |f: f64, g: f64| Node {
            id: 7,
            i: 0.0,
            j: 0.0,
            g,
            f,
            interval: Interval::new(0.0, 10.0),
            parent: None,
        };
        let mut planner = Sipp::new();

        planner.add_open(node(5.0, 3.0));
        // Same vertex, same interval end, worse f: discarded.
        planner.add_open(node(6.0, 3.5));
        assert_eq!(planner.open.len(), 1);
        assert!((planner.open[0].f - 5.0).abs() < EPSILON);

        // Better f replaces the stale entry in place.
        planner.add_open(node(4.0, 2.5));
        assert_eq!(planner.open.len(), 1);
        assert!((planner.open[0].f - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_add_open_orders_by_f_then_g_desc() {
        let node = |id: usize, f: f64, g: f64| Node {
            id,
            i: 0.0,
            j: 0.0,
            g,
            f,
            interval: Interval::new(0.0, id as f64),
            parent: None,
        };
        let mut planner = Sipp::new();

        planner.add_open(node(1, 5.0, 1.0));
        planner.add_open(node(2, 3.0, 1.0));
        planner.add_open(node(3, 5.0, 4.0));

        let order: Vec<usize> = planner.open.iter().map(|n| n.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_get_endpoints_splits_window() {
        let mut planner = Sipp::new();
        planner
            .constraints
            .add_collision_interval(5, Interval::new(2.0, 3.0));
        planner
            .constraints
            .add_collision_interval(5, Interval::new(6.0, 7.0));

        let endpoints = planner.get_endpoints(5, 0.0, 5.0, 0.0, 10.0);
        let intervals: Vec<(f64, f64)> = endpoints
            .iter()
            .map(|n| (n.interval.lo, n.interval.hi))
            .collect();
        assert_eq!(intervals, vec![(0.0, 2.0), (3.0, 6.0), (7.0, 10.0)]);
    }

    #[test]
    fn test_get_endpoints_trims_and_drops() {
        let mut planner = Sipp::new();
        planner
            .constraints
            .add_collision_interval(5, Interval::new(0.0, 1.0));

        // Left overlap trims the window's opening.
        let endpoints = planner.get_endpoints(5, 0.0, 5.0, 0.5, 4.0);
        assert_eq!(endpoints.len(), 1);
        assert!(endpoints[0].interval.matches(&Interval::new(1.0, 4.0)));

        // A window inside the collision disappears.
        let endpoints = planner.get_endpoints(5, 0.0, 5.0, 0.2, 0.8);
        assert!(endpoints.is_empty());
    }

    #[test]
    fn test_check_endpoint() {
        let mut planner = Sipp::new();
        planner.constraints.add_move_constraint(Move {
            t1: 2.0,
            t2: 4.0,
            i1: 0.0,
            j1: 0.0,
            i2: 0.0,
            j2: 1.0,
            id1: 0,
            id2: 1,
        });

        let start = Node {
            id: 0,
            i: 0.0,
            j: 0.0,
            g: 0.0,
            f: 0.0,
            interval: Interval::new(0.0, 10.0),
            parent: None,
        };
        let goal = Node {
            id: 1,
            i: 0.0,
            j: 1.0,
            g: 0.0,
            f: 0.0,
            interval: Interval::new(3.0, 20.0),
            parent: None,
        };

        // Waits until the goal window would open (depart 2.0), then gets
        // pushed past the blocked departures to 4.0, arriving at 5.0.
        assert!((planner.check_endpoint(&start, &goal) - 5.0).abs() < EPSILON);

        // Infeasible when the start's safe interval closes first.
        let mut cramped = start.clone();
        cramped.interval.hi = 1.0;
        assert_eq!(planner.check_endpoint(&cramped, &goal), INFINITY);
    }
}
