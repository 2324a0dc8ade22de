//! Sealed-bid auction engine.

use std::fmt::{Display, Formatter};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::bid_model::{Bid, BidModel};
use crate::core::common::{Allocation, AllocationVerdict, ResourceKind};
use crate::core::resource_pool::ResourcePoolState;
use crate::core::utilization::utilization_or_saturated;
use crate::core::vm::VirtualMachine;

/// Policy applied when two hosts offer exactly the same price.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum TieBreak {
    /// An equal bid never displaces the current leader.
    FirstSeen,
    /// On an exact price tie the strictly higher token balance wins;
    /// equal balances retain the first-seen leader.
    TokenBalance,
}

/// Winning host and price of one single-resource auction.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Winner {
    pub host_id: u32,
    pub price: f64,
}

/// Outcome of one single-resource auction for one VM.
#[derive(Clone, Debug)]
pub struct AuctionResult {
    pub resource: ResourceKind,
    pub winner: Option<Winner>,
    /// Number of candidates that passed the admission check.
    pub eligible: usize,
    /// Number of eligible candidates that declined to bid.
    pub abstained: usize,
}

/// Final outcome of one placement attempt. All non-committed outcomes are
/// recoverable: the VM is left unassigned and no token balance changes.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub enum PlacementVerdict {
    Committed,
    /// No candidate passed the admission check for any auctioned resource.
    NoSuitableHost,
    /// Admission passed somewhere, but every would-be bidder abstained.
    AllAbstained,
    /// Per-resource auctions produced different winners.
    WinnersDisagree,
}

impl Display for PlacementVerdict {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PlacementVerdict::Committed => write!(f, "committed"),
            PlacementVerdict::NoSuitableHost => write!(f, "no_suitable_host"),
            PlacementVerdict::AllAbstained => write!(f, "all_abstained"),
            PlacementVerdict::WinnersDisagree => write!(f, "winners_disagree"),
        }
    }
}

/// Placement decision for one VM, aggregated into the final report.
#[derive(Serialize, Clone, Debug)]
pub struct PlacementDecision {
    pub vm_id: u32,
    pub host_id: Option<u32>,
    /// Winning price per auctioned resource kind (empty unless committed).
    pub prices: Vec<(ResourceKind, f64)>,
    pub verdict: PlacementVerdict,
}

/// Runs sealed-bid auctions over a candidate host set and commits the results.
///
/// The engine holds no cross-call state: each auction round is a pure function of the
/// candidate list and pool state, plus the single token deduction on a successful commit.
pub struct AuctionEngine {
    bid_model: Box<dyn BidModel>,
    tie_break: TieBreak,
    commit_cost: f64,
}

impl AuctionEngine {
    pub fn new(bid_model: Box<dyn BidModel>, tie_break: TieBreak, commit_cost: f64) -> Self {
        Self {
            bid_model,
            tie_break,
            commit_cost,
        }
    }

    /// Runs one sealed-bid auction for the specified resource kind.
    ///
    /// Candidates are examined exactly once, in slice order, which makes tie-break
    /// outcomes deterministic and caller-visible. Selection only; no side effects.
    pub fn run_auction(
        &self,
        resource: ResourceKind,
        alloc: &Allocation,
        candidates: &[u32],
        pool: &ResourcePoolState,
    ) -> AuctionResult {
        let mut winner: Option<Winner> = None;
        let mut eligible = 0;
        let mut abstained = 0;

        for &host_id in candidates {
            if pool.can_allocate(alloc, host_id) != AllocationVerdict::Success {
                continue;
            }
            eligible += 1;

            let load = utilization_or_saturated(pool, host_id, resource);
            let balance = pool.get_token_balance(host_id);
            let price = match self.bid_model.bid(load, balance) {
                Bid::Price(price) => price,
                Bid::Abstain => {
                    abstained += 1;
                    continue;
                }
            };
            debug!("vm #{}, {}: host #{} bids {:.2}", alloc.id, resource, host_id, price);

            let replace = match winner {
                None => true,
                Some(leader) => {
                    price < leader.price
                        || (price == leader.price
                            && self.tie_break == TieBreak::TokenBalance
                            && balance > pool.get_token_balance(leader.host_id))
                }
            };
            if replace {
                winner = Some(Winner { host_id, price });
            }
        }

        if let Some(w) = winner {
            info!(
                "{} auction for vm #{} won by host #{} with bid {:.2}",
                resource, alloc.id, w.host_id, w.price
            );
        }
        AuctionResult {
            resource,
            winner,
            eligible,
            abstained,
        }
    }

    /// Runs one auction per resource kind over the same candidate set and commits the VM
    /// only if every per-kind auction produced the same winning host.
    ///
    /// On commit the VM is assigned, the allocation is applied to the pool and the commit
    /// cost is deducted from the winner's token balance exactly once. On any failure the
    /// VM is left unassigned and nothing changes. An empty resource list holds no auction
    /// at all and never commits.
    pub fn place_vm(
        &self,
        vm: &mut VirtualMachine,
        candidates: &[u32],
        resources: &[ResourceKind],
        pool: &mut ResourcePoolState,
    ) -> PlacementDecision {
        if resources.is_empty() {
            info!("auction failed for vm #{}: nothing to auction", vm.id);
            vm.set_host(None);
            return PlacementDecision {
                vm_id: vm.id,
                host_id: None,
                prices: Vec::new(),
                verdict: PlacementVerdict::NoSuitableHost,
            };
        }

        let alloc = vm.allocation();
        let results: Vec<AuctionResult> = resources
            .iter()
            .map(|&resource| self.run_auction(resource, &alloc, candidates, pool))
            .collect();

        if results.iter().any(|r| r.winner.is_none()) {
            let verdict = if results.iter().all(|r| r.eligible == 0) {
                PlacementVerdict::NoSuitableHost
            } else {
                PlacementVerdict::AllAbstained
            };
            info!("auction failed for vm #{}: {}", vm.id, verdict);
            vm.set_host(None);
            return PlacementDecision {
                vm_id: vm.id,
                host_id: None,
                prices: Vec::new(),
                verdict,
            };
        }

        let first = results[0].winner.unwrap().host_id;
        if results.iter().any(|r| r.winner.unwrap().host_id != first) {
            info!("auction failed for vm #{}: no single host won all resource auctions", vm.id);
            vm.set_host(None);
            return PlacementDecision {
                vm_id: vm.id,
                host_id: None,
                prices: Vec::new(),
                verdict: PlacementVerdict::WinnersDisagree,
            };
        }

        vm.set_host(Some(first));
        pool.allocate(&alloc, first);
        pool.deduct_tokens(first, self.commit_cost);
        info!(
            "vm #{} committed to host #{}, deducted {:.2} tokens, new balance {:.2}",
            vm.id,
            first,
            self.commit_cost,
            pool.get_token_balance(first)
        );
        PlacementDecision {
            vm_id: vm.id,
            host_id: Some(first),
            prices: results
                .iter()
                .map(|r| (r.resource, r.winner.unwrap().price))
                .collect(),
            verdict: PlacementVerdict::Committed,
        }
    }
}
