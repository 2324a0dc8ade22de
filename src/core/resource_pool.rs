//! Resource pool state.

use indexmap::IndexMap;

use crate::core::common::{Allocation, AllocationVerdict, ResourceKind};

/// Stores host properties (resource capacity, token balance) and state (available resources).
///
/// Capacity fields are mutated only through [`ResourcePoolState::allocate`] and
/// [`ResourcePoolState::release`] (the scheduler side); the token balance is mutated only
/// through [`ResourcePoolState::deduct_tokens`] (the auction side).
#[derive(Clone)]
pub struct HostInfo {
    pub cpu_total: u32,
    pub memory_total: u64,

    pub cpu_available: u32,
    pub memory_available: u64,

    pub cpu_overcommit: u32,
    pub memory_overcommit: u64,

    pub token_balance: f64,
}

impl HostInfo {
    /// Creates fully available host info with specified capacity and token balance.
    pub fn new(cpu_total: u32, memory_total: u64, token_balance: f64) -> Self {
        Self {
            cpu_total,
            memory_total,
            cpu_available: cpu_total,
            memory_available: memory_total,
            cpu_overcommit: 0,
            memory_overcommit: 0,
            token_balance,
        }
    }
}

/// Set of hosts in auction candidate order.
///
/// Hosts are kept in insertion order, which is the order auctions examine them in and
/// therefore the order tie-breaks are resolved in.
#[derive(Clone)]
pub struct ResourcePoolState {
    hosts: IndexMap<u32, HostInfo>,
}

impl ResourcePoolState {
    /// Creates empty resource pool state.
    pub fn new() -> Self {
        Self { hosts: IndexMap::new() }
    }

    /// Adds host to resource pool.
    pub fn add_host(&mut self, id: u32, cpu_total: u32, memory_total: u64, token_balance: f64) {
        self.hosts.insert(id, HostInfo::new(cpu_total, memory_total, token_balance));
    }

    /// Returns IDs of all hosts in insertion order.
    pub fn get_hosts_list(&self) -> Vec<u32> {
        self.hosts.keys().cloned().collect()
    }

    /// Returns the number of hosts.
    pub fn get_host_count(&self) -> u32 {
        self.hosts.len() as u32
    }

    /// Checks if the specified allocation is currently possible on the specified host.
    pub fn can_allocate(&self, alloc: &Allocation, host_id: u32) -> AllocationVerdict {
        if !self.hosts.contains_key(&host_id) {
            return AllocationVerdict::HostNotFound;
        }
        if self.hosts[&host_id].cpu_available < alloc.cpu_usage {
            return AllocationVerdict::NotEnoughCPU;
        }
        if self.hosts[&host_id].memory_available < alloc.memory_usage {
            return AllocationVerdict::NotEnoughMemory;
        }
        AllocationVerdict::Success
    }

    /// Applies the specified allocation on the specified host.
    pub fn allocate(&mut self, alloc: &Allocation, host_id: u32) {
        if let Some(host) = self.hosts.get_mut(&host_id) {
            if host.cpu_available < alloc.cpu_usage {
                host.cpu_overcommit += alloc.cpu_usage - host.cpu_available;
                host.cpu_available = 0;
            } else {
                host.cpu_available -= alloc.cpu_usage;
            }

            if host.memory_available < alloc.memory_usage {
                host.memory_overcommit += alloc.memory_usage - host.memory_available;
                host.memory_available = 0;
            } else {
                host.memory_available -= alloc.memory_usage;
            }
        }
    }

    /// Removes the specified allocation from the specified host.
    pub fn release(&mut self, alloc: &Allocation, host_id: u32) {
        if let Some(host) = self.hosts.get_mut(&host_id) {
            if host.cpu_overcommit >= alloc.cpu_usage {
                host.cpu_overcommit -= alloc.cpu_usage;
            } else {
                host.cpu_available += alloc.cpu_usage - host.cpu_overcommit;
                host.cpu_overcommit = 0;
            }

            if host.memory_overcommit >= alloc.memory_usage {
                host.memory_overcommit -= alloc.memory_usage;
            } else {
                host.memory_available += alloc.memory_usage - host.memory_overcommit;
                host.memory_overcommit = 0;
            }
        }
    }

    /// Returns the total capacity of the specified host for the specified resource kind.
    pub fn get_total(&self, host_id: u32, resource: ResourceKind) -> f64 {
        match resource {
            ResourceKind::Cpu => self.hosts[&host_id].cpu_total as f64,
            ResourceKind::Memory => self.hosts[&host_id].memory_total as f64,
        }
    }

    /// Returns the available capacity of the specified host for the specified resource kind.
    pub fn get_available(&self, host_id: u32, resource: ResourceKind) -> f64 {
        match resource {
            ResourceKind::Cpu => self.hosts[&host_id].cpu_available as f64,
            ResourceKind::Memory => self.hosts[&host_id].memory_available as f64,
        }
    }

    /// Returns the current token balance of the specified host.
    pub fn get_token_balance(&self, host_id: u32) -> f64 {
        self.hosts[&host_id].token_balance
    }

    /// Deducts tokens from the specified host. The balance is allowed to go negative:
    /// abstention is decided by the bid model before commit, not enforced here.
    pub fn deduct_tokens(&mut self, host_id: u32, amount: f64) {
        if let Some(host) = self.hosts.get_mut(&host_id) {
            host.token_balance -= amount;
        }
    }
}
