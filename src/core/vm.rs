//! Representation of virtual machine.

use serde::Serialize;

use crate::core::common::Allocation;

/// Represents a VM submitted for placement: its resource demand and the host
/// assignment produced by an auction (or `None` while unassigned).
#[derive(Clone, Serialize)]
pub struct VirtualMachine {
    pub id: u32,
    pub cpu_usage: u32,
    pub memory_usage: u64,
    host_id: Option<u32>,
}

impl VirtualMachine {
    /// Creates unassigned virtual machine with specified demand.
    pub fn new(id: u32, cpu_usage: u32, memory_usage: u64) -> Self {
        Self {
            id,
            cpu_usage,
            memory_usage,
            host_id: None,
        }
    }

    /// Returns the demand record used by admission checks and auctions.
    pub fn allocation(&self) -> Allocation {
        Allocation {
            id: self.id,
            cpu_usage: self.cpu_usage,
            memory_usage: self.memory_usage,
        }
    }

    /// Returns the host this VM is assigned to, if any.
    pub fn host_id(&self) -> Option<u32> {
        self.host_id
    }

    /// Sets or clears the host assignment. Called once per placement attempt.
    pub fn set_host(&mut self, host_id: Option<u32>) {
        self.host_id = host_id;
    }
}
