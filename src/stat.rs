use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub cost: f64,
    pub time_us: usize,
    pub expanded_nodes: usize,
}

impl Stats {
    pub fn print(&self, agent_id: usize) {
        info!(
            "Agent {:?} cost {:?} Time(microseconds) {:?} Expanded nodes number {:?}",
            agent_id, self.cost, self.time_us, self.expanded_nodes
        );
    }
}
