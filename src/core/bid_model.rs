//! Host bid models.

use dyn_clone::{clone_trait_object, DynClone};

use crate::core::config::parse_config_value;
use crate::core::config::parse_options;

/// A price offered by a host for one resource auction, or an explicit refusal to bid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bid {
    Price(f64),
    Abstain,
}

/// Bid model is a function, which computes the price a host offers for hosting a VM
/// based on its current utilization and token balance.
///
/// Models must be monotonically non-decreasing in utilization: busier hosts bid higher
/// and are therefore less competitive. This is what gives the auction its economic
/// interpretation, so new models should preserve it.
pub trait BidModel: DynClone {
    /// Returns the bid of a host.
    ///
    /// - `utilization` - host load fraction in [0, 1] for the auctioned resource.
    /// - `token_balance` - current host token balance.
    fn bid(&self, utilization: f64, token_balance: f64) -> Bid;
}

clone_trait_object!(BidModel);

pub fn bid_model_resolver(config_str: &str) -> Box<dyn BidModel> {
    let (model_name, options) = parse_config_value(config_str);
    match model_name.as_str() {
        "Plain" => Box::new(PlainBidModel::from_options(&options.unwrap_or_default())),
        "TokenGated" => Box::new(TokenGatedBidModel::from_options(&options.unwrap_or_default())),
        _ => panic!("Can't resolve bid model: {}", config_str),
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Plain linear pricing: `base_cost + utilization * scale`. Always bids.
#[derive(Clone)]
pub struct PlainBidModel {
    base_cost: f64,
    scale: f64,
}

impl PlainBidModel {
    pub fn new(base_cost: f64, scale: f64) -> Self {
        Self { base_cost, scale }
    }

    pub fn from_options(options_str: &str) -> Self {
        let options = parse_options(options_str);
        let base_cost = options.get("base_cost").map_or(100., |v| v.parse::<f64>().unwrap());
        let scale = options.get("scale").map_or(100., |v| v.parse::<f64>().unwrap());
        Self { base_cost, scale }
    }
}

impl BidModel for PlainBidModel {
    fn bid(&self, utilization: f64, _token_balance: f64) -> Bid {
        Bid::Price(self.base_cost + utilization * self.scale)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Linear pricing gated by the token balance: the host abstains when it cannot
/// afford its own price.
#[derive(Clone)]
pub struct TokenGatedBidModel {
    base_cost: f64,
    scale: f64,
}

impl TokenGatedBidModel {
    pub fn new(base_cost: f64, scale: f64) -> Self {
        Self { base_cost, scale }
    }

    pub fn from_options(options_str: &str) -> Self {
        let options = parse_options(options_str);
        let base_cost = options.get("base_cost").map_or(10., |v| v.parse::<f64>().unwrap());
        let scale = options.get("scale").map_or(20., |v| v.parse::<f64>().unwrap());
        Self { base_cost, scale }
    }
}

impl BidModel for TokenGatedBidModel {
    fn bid(&self, utilization: f64, token_balance: f64) -> Bid {
        let price = self.base_cost + utilization * self.scale;
        if token_balance < price {
            return Bid::Abstain;
        }
        Bid::Price(price)
    }
}
