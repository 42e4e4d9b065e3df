use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

use crate::common::{Agent, Constraint};
use crate::map::Map;

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentYaml {
    pub start: [usize; 2],
    pub goal: [usize; 2],
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConstraintYaml {
    pub agent: usize,
    #[serde(default)]
    pub positive: bool,
    pub from: [usize; 2],
    pub to: [usize; 2],
    pub t1: f64,
    pub t2: f64,
}

/// A planning instance: agents plus the constraint list handed to each
/// planner call, in grid coordinates. Conversion against a map resolves
/// cells into vertex ids.
#[derive(Debug, Serialize, Deserialize)]
pub struct Task {
    pub agents: Vec<AgentYaml>,
    #[serde(default)]
    pub constraints: Vec<ConstraintYaml>,
}

impl Task {
    pub fn from_yaml(path: &str) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn to_agents(&self, map: &Map) -> Result<Vec<Agent>, String> {
        let mut agents = Vec::new();
        for (index, a) in self.agents.iter().enumerate() {
            let agent = Agent {
                id: index,
                start_id: map.vertex_id(a.start[0], a.start[1]),
                start_i: a.start[0] as f64,
                start_j: a.start[1] as f64,
                goal_id: map.vertex_id(a.goal[0], a.goal[1]),
                goal_i: a.goal[0] as f64,
                goal_j: a.goal[1] as f64,
            };
            if !agent.verify(map) {
                return Err(format!("Verification failed for agent at index {}", index));
            }
            agents.push(agent);
        }
        Ok(agents)
    }

    pub fn to_constraints(&self, map: &Map) -> Result<Vec<Constraint>, String> {
        let mut cons = Vec::new();
        for (index, c) in self.constraints.iter().enumerate() {
            if c.t1 > c.t2 {
                return Err(format!("Constraint {} has a reversed time window", index));
            }
            cons.push(Constraint {
                agent: c.agent,
                positive: c.positive,
                id1: map.vertex_id(c.from[0], c.from[1]),
                id2: map.vertex_id(c.to[0], c.to[1]),
                i1: c.from[0] as f64,
                j1: c.from[1] as f64,
                i2: c.to[0] as f64,
                j2: c.to[1] as f64,
                t1: c.t1,
                t2: c.t2,
            });
        }
        Ok(cons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TASK: &str = "\
agents:
  - start: [0, 0]
    goal: [2, 2]
constraints:
  - agent: 0
    from: [1, 1]
    to: [1, 1]
    t1: 1.0
    t2: 2.0
  - agent: 0
    positive: true
    from: [1, 1]
    to: [1, 2]
    t1: 3.0
    t2: 4.0
";

    fn test_map() -> Map {
        Map::from_map_str("type octile\nheight 3\nwidth 3\nmap\n...\n...\n...\n").unwrap()
    }

    #[test]
    fn test_read_task() {
        let map = test_map();
        let task = Task::from_yaml_str(TEST_TASK).unwrap();

        let agents = task.to_agents(&map).unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id, 0);
        assert_eq!(agents[0].start_id, 0);
        assert_eq!(agents[0].goal_id, map.vertex_id(2, 2));

        let cons = task.to_constraints(&map).unwrap();
        assert_eq!(cons.len(), 2);
        assert!(!cons[0].positive);
        assert_eq!(cons[0].id1, cons[0].id2);
        assert!(cons[1].positive);
        assert_eq!(cons[1].id2, map.vertex_id(1, 2));
    }

    #[test]
    fn test_reversed_window_rejected() {
        let map = test_map();
        let task = Task::from_yaml_str(
            "agents:\n  - start: [0, 0]\n    goal: [2, 2]\nconstraints:\n  - agent: 0\n    from: [1, 1]\n    to: [1, 1]\n    t1: 5.0\n    t2: 1.0\n",
        )
        .unwrap();
        assert!(task.to_constraints(&map).is_err());
    }

    #[test]
    fn test_agent_on_wall_rejected() {
        let map =
            Map::from_map_str("type octile\nheight 3\nwidth 3\nmap\n...\n.@.\n...\n").unwrap();
        let task = Task::from_yaml_str("agents:\n  - start: [0, 0]\n    goal: [1, 1]\n").unwrap();
        assert!(task.to_agents(&map).is_err());
    }
}
