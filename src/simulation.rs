use std::collections::BTreeMap;

use log::info;

use crate::core::auction::{AuctionEngine, PlacementDecision, TieBreak};
use crate::core::bid_model::bid_model_resolver;
use crate::core::common::ResourceKind;
use crate::core::config::{parse_config_value, SimulationConfig};
use crate::core::energy::EnergyEstimator;
use crate::core::power_model::LinearPowerModel;
use crate::core::report::PlacementReport;
use crate::core::resource_pool::ResourcePoolState;
use crate::core::utilization::utilization_or_saturated;
use crate::core::vm::VirtualMachine;

/// Simulation driver stand-in: owns the resource pool, the submitted VMs and the
/// auction engine, and produces the final placement report.
///
/// Single-threaded and synchronous; each placement pass and the final snapshot run to
/// completion within one call.
pub struct MarketSimulation {
    pool: ResourcePoolState,
    vms: BTreeMap<u32, VirtualMachine>,
    pending: Vec<u32>,
    placements: Vec<PlacementDecision>,
    engine: AuctionEngine,
    estimator: EnergyEstimator,
    resources: Vec<ResourceKind>,
    next_host_id: u32,
}

impl MarketSimulation {
    pub fn new(config: &SimulationConfig) -> Self {
        // The balance tie-break reads token balances, which only the token-gated
        // model keeps meaningful by pricing hosts out as they run low.
        let (model_name, _) = parse_config_value(&config.bid_model);
        if config.tie_break == TieBreak::TokenBalance && model_name != "TokenGated" {
            panic!(
                "Can't use TokenBalance tie-break with bid model {}",
                config.bid_model
            );
        }
        let engine = AuctionEngine::new(
            bid_model_resolver(&config.bid_model),
            config.tie_break,
            config.commit_cost,
        );
        let estimator = EnergyEstimator::new(Box::new(LinearPowerModel::new(
            config.idle_power,
            config.full_power,
        )));
        let mut sim = Self {
            pool: ResourcePoolState::new(),
            vms: BTreeMap::new(),
            pending: Vec::new(),
            placements: Vec::new(),
            engine,
            estimator,
            resources: config.resources.clone(),
            next_host_id: 0,
        };
        for host_config in &config.hosts {
            for _ in 0..host_config.count.unwrap_or(1) {
                sim.add_host(
                    host_config.cpus,
                    host_config.memory,
                    host_config.initial_tokens.unwrap_or(0.),
                );
            }
        }
        sim
    }

    /// Adds a host to the pool and returns its id. Hosts participate in auctions
    /// in the order they were added.
    pub fn add_host(&mut self, cpu_total: u32, memory_total: u64, token_balance: f64) -> u32 {
        let id = self.next_host_id;
        self.next_host_id += 1;
        self.pool.add_host(id, cpu_total, memory_total, token_balance);
        id
    }

    /// Submits a VM for placement in the next placement pass. Re-submitting an id
    /// replaces the VM's demand; the VM is still auctioned exactly once.
    pub fn submit_vm(&mut self, id: u32, cpu_usage: u32, memory_usage: u64) {
        self.vms.insert(id, VirtualMachine::new(id, cpu_usage, memory_usage));
        if !self.pending.contains(&id) {
            self.pending.push(id);
        }
    }

    /// Auctions every pending VM in submission order.
    pub fn place_submitted_vms(&mut self) {
        let candidates = self.pool.get_hosts_list();
        for vm_id in std::mem::take(&mut self.pending) {
            info!("starting auction for vm #{}", vm_id);
            let vm = self.vms.get_mut(&vm_id).unwrap();
            let decision = self.engine.place_vm(vm, &candidates, &self.resources, &mut self.pool);
            self.placements.push(decision);
        }
    }

    /// Returns the host the specified VM is assigned to, if any.
    pub fn vm_host(&self, vm_id: u32) -> Option<u32> {
        self.vms[&vm_id].host_id()
    }

    pub fn host_token_balance(&self, host_id: u32) -> f64 {
        self.pool.get_token_balance(host_id)
    }

    pub fn host_cpu_load(&self, host_id: u32) -> f64 {
        utilization_or_saturated(&self.pool, host_id, ResourceKind::Cpu)
    }

    pub fn pool(&self) -> &ResourcePoolState {
        &self.pool
    }

    /// Produces the final report from the end-of-run pool state.
    ///
    /// Allocations are deliberately not released first: the utilization each energy
    /// sample is based on must reflect the run's actual end state, so this snapshot
    /// replaces any automatic teardown the driver would otherwise perform.
    ///
    /// - `elapsed_time` - total elapsed simulated time in seconds, queried from the
    ///   driver's clock once the run has completed.
    pub fn finalize(&self, elapsed_time: f64) -> PlacementReport {
        let mut report = PlacementReport::new();
        for decision in &self.placements {
            report.add_placement(decision.clone());
        }
        for host_id in self.pool.get_hosts_list() {
            let load = utilization_or_saturated(&self.pool, host_id, ResourceKind::Cpu);
            let sample = self.estimator.estimate(host_id, load, elapsed_time);
            info!(
                "host #{} final utilization is {:.2}%, consuming {:.4} kWh",
                host_id,
                sample.utilization * 100.,
                sample.energy_kwh
            );
            report.add_energy_sample(sample);
        }
        info!("total energy consumption for all hosts: {:.4} kWh", report.total_energy_kwh);
        report
    }
}
