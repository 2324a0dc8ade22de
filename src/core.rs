pub mod auction;
pub mod bid_model;
pub mod common;
pub mod config;
pub mod energy;
pub mod placement;
pub mod power_model;
pub mod report;
pub mod resource_pool;
pub mod utilization;
pub mod vm;
