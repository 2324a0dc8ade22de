//! Placement and energy reporting.

use std::fs::File;

use serde::Serialize;

use crate::core::auction::{PlacementDecision, PlacementVerdict};
use crate::core::energy::EnergySample;

/// Aggregated result of one simulation run: per-VM placement decisions,
/// per-host energy samples and the fleet energy total.
#[derive(Serialize, Default)]
pub struct PlacementReport {
    pub placements: Vec<PlacementDecision>,
    pub energy: Vec<EnergySample>,
    pub total_energy_kwh: f64,
}

impl PlacementReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_placement(&mut self, decision: PlacementDecision) {
        self.placements.push(decision);
    }

    pub fn add_energy_sample(&mut self, sample: EnergySample) {
        self.total_energy_kwh += sample.energy_kwh;
        self.energy.push(sample);
    }

    /// Returns the number of VMs that were committed to a host.
    pub fn committed_count(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| p.verdict == PlacementVerdict::Committed)
            .count()
    }

    /// Saves per-host energy samples as CSV.
    pub fn save_energy_csv(&self, path: &str) -> Result<(), std::io::Error> {
        let file = File::create(path)?;
        let mut wtr = csv::Writer::from_writer(file);
        for sample in &self.energy {
            wtr.serialize(sample)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Saves the full report as pretty-printed JSON.
    pub fn save_json(&self, path: &str) -> Result<(), std::io::Error> {
        let mut file = File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        Ok(())
    }
}
