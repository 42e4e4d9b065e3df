use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "Rust SIPP", about = "Safe-interval path planning over grid maps.", author = "Moriarty Yu", version = "1.0")]
pub struct Cli {
    #[arg(long, short, help = "Path to the YAML config file")]
    pub config: Option<String>,
}

#[derive(Serialize, Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub map_path: String,
    pub task_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_path: "map_file/test/test.map".to_string(),
            task_path: "map_file/test/test.yaml".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(config_str: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(config_str)?;
        config.validate()
    }

    pub fn validate(self) -> anyhow::Result<Self> {
        if self.map_path.is_empty() || self.task_path.is_empty() {
            anyhow::bail!("map_path and task_path must be set");
        }
        Ok(self)
    }
}
