//! Non-auction placement baseline.

use crate::core::common::{Allocation, AllocationVerdict, ResourceKind};
use crate::core::resource_pool::ResourcePoolState;
use crate::core::utilization::utilization_or_saturated;

/// Selects the suitable host with the lowest CPU utilization.
///
/// Baseline heuristic for comparing auction outcomes against plain load balancing.
/// Candidates are examined in slice order; on equal utilization the first-seen host
/// is retained. Selection only, like [`AuctionEngine::run_auction`]; the caller
/// commits the allocation.
///
/// [`AuctionEngine::run_auction`]: crate::core::auction::AuctionEngine::run_auction
#[derive(Default)]
pub struct LowestUtilization;

impl LowestUtilization {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn select_host(&self, alloc: &Allocation, candidates: &[u32], pool: &ResourcePoolState) -> Option<u32> {
        let mut result: Option<u32> = None;
        let mut min_utilization = f64::MAX;

        for &host_id in candidates {
            if pool.can_allocate(alloc, host_id) != AllocationVerdict::Success {
                continue;
            }
            let utilization = utilization_or_saturated(pool, host_id, ResourceKind::Cpu);
            if utilization < min_utilization {
                min_utilization = utilization;
                result = Some(host_id);
            }
        }
        result
    }
}
