//! Simulation configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::auction::TieBreak;
use crate::core::common::ResourceKind;

/// Holds raw simulation config parsed from YAML file.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawSimulationConfig {
    pub bid_model: Option<String>,
    pub tie_break: Option<TieBreak>,
    pub commit_cost: Option<f64>,
    pub resources: Option<Vec<ResourceKind>>,
    pub idle_power: Option<f64>,
    pub full_power: Option<f64>,
    pub hosts: Option<Vec<HostConfig>>,
}

/// Holds configuration of a single physical host or a set of identical hosts.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct HostConfig {
    /// Host CPU capacity in abstract compute units.
    pub cpus: u32,
    /// Host memory capacity.
    pub memory: u64,
    /// Initial token balance.
    pub initial_tokens: Option<f64>,
    /// Number of such hosts.
    pub count: Option<u32>,
}

/// Represents simulation configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SimulationConfig {
    /// Bid model config string, e.g. `Plain[base_cost=100,scale=100]`
    /// or `TokenGated[base_cost=10,scale=20]`.
    pub bid_model: String,
    /// Tie-break policy applied on exact price ties.
    pub tie_break: TieBreak,
    /// Tokens deducted from the winner on a successful commit.
    pub commit_cost: f64,
    /// Resource kinds auctioned per VM. A single kind gives a plain
    /// single-resource auction; several kinds require a coinciding winner.
    pub resources: Vec<ResourceKind>,
    /// Host power draw in Watts at zero CPU load.
    pub idle_power: f64,
    /// Host power draw in Watts at full CPU load.
    pub full_power: f64,
    /// Configurations of physical hosts.
    pub hosts: Vec<HostConfig>,
}

impl SimulationConfig {
    /// Creates simulation config by reading parameter values from YAML file
    /// (uses default values if some parameters are absent).
    pub fn from_file(file_name: &str) -> Self {
        let raw: RawSimulationConfig = serde_yaml::from_str(
            &std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name));

        Self {
            bid_model: raw.bid_model.unwrap_or_else(|| "Plain[base_cost=100,scale=100]".to_string()),
            tie_break: raw.tie_break.unwrap_or(TieBreak::FirstSeen),
            commit_cost: raw.commit_cost.unwrap_or(0.),
            resources: raw.resources.unwrap_or_else(|| vec![ResourceKind::Cpu]),
            idle_power: raw.idle_power.unwrap_or(100.),
            full_power: raw.full_power.unwrap_or(200.),
            hosts: raw.hosts.unwrap_or_default(),
        }
    }
}

/// Parses config value string, which consists of two parts - name and options.
/// Example: `Plain[base_cost=100,scale=100]` parts are name `Plain`
/// and options string `base_cost=100,scale=100`.
pub fn parse_config_value(config_str: &str) -> (String, Option<String>) {
    match config_str.split_once('[') {
        Some((l, r)) => (l.to_string(), Some(r.to_string().replace(']', ""))),
        None => (config_str.to_string(), None),
    }
}

/// Parses options string from config value, returns map with option names and values.
pub fn parse_options(options_str: &str) -> HashMap<String, String> {
    let mut options = HashMap::new();
    for option_str in options_str.split(',') {
        if let Some((name, value)) = option_str.split_once('=') {
            options.insert(name.to_string(), value.to_string());
        }
    }
    options
}
