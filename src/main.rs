use anyhow::Context;
use clap::Parser;
use std::fs;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rust_sipp::config::{Cli, Config};
use rust_sipp::heuristic::Heuristic;
use rust_sipp::map::Map;
use rust_sipp::planner::Sipp;
use rust_sipp::stat::Stats;
use rust_sipp::task::Task;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {path}"))?;
            Config::from_yaml_str(&content)?
        }
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let map = Map::from_file(&config.map_path)
        .with_context(|| format!("failed to load map {}", config.map_path))?;
    let task = Task::from_yaml(&config.task_path)
        .with_context(|| format!("failed to load task {}", config.task_path))?;
    let agents = task.to_agents(&map).map_err(anyhow::Error::msg)?;
    let constraints = task.to_constraints(&map).map_err(anyhow::Error::msg)?;

    let h_values = Heuristic::build(&map, &agents);
    let mut planner = Sipp::new();

    for agent in &agents {
        let solve_start = Instant::now();
        match planner.find_path(agent, &map, &constraints, &h_values, 0) {
            Some(path) => {
                let stats = Stats {
                    cost: path.cost,
                    time_us: solve_start.elapsed().as_micros() as usize,
                    expanded_nodes: path.expanded,
                };
                stats.print(agent.id);
                for node in &path.nodes {
                    info!("agent {}: ({}, {}) at t={}", agent.id, node.i, node.j, node.g);
                }
            }
            None => error!("no feasible path for agent {}", agent.id),
        }
    }

    Ok(())
}
