//! Host utilization probe.

use log::warn;

use crate::core::common::ResourceKind;
use crate::core::resource_pool::ResourcePoolState;

/// Host reported a non-positive total capacity, so a utilization fraction cannot be derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegenerateHost {
    pub host_id: u32,
    pub resource: ResourceKind,
}

/// Returns the utilization fraction `(total - available) / total` of the specified host
/// for the specified resource kind, clamped to [0, 1].
///
/// The clamp covers floating-point noise and momentarily over-subscribed hosts, which
/// would otherwise yield values outside the unit interval.
pub fn utilization(
    pool: &ResourcePoolState,
    host_id: u32,
    resource: ResourceKind,
) -> Result<f64, DegenerateHost> {
    let total = pool.get_total(host_id, resource);
    if total <= 0. {
        return Err(DegenerateHost { host_id, resource });
    }
    let available = pool.get_available(host_id, resource);
    Ok(((total - available) / total).clamp(0., 1.))
}

/// Returns the utilization fraction, treating degenerate hosts as fully utilized.
///
/// This is the defined fallback for auctions: a host with no usable capacity is the least
/// competitive bidder, never a division fault.
pub fn utilization_or_saturated(pool: &ResourcePoolState, host_id: u32, resource: ResourceKind) -> f64 {
    match utilization(pool, host_id, resource) {
        Ok(fraction) => fraction,
        Err(e) => {
            warn!("host #{} has zero total {}, treating as saturated", e.host_id, e.resource);
            1.
        }
    }
}
