//! Physical host power consumption models.

use dyn_clone::{clone_trait_object, DynClone};

/// Power model is a function, which computes the power draw of a physical host
/// based on its CPU load.
pub trait PowerModel: DynClone {
    /// Returns the power draw of a physical host in Watts.
    ///
    /// - `cpu_load` - host CPU load fraction, clamped by implementations to [0, 1].
    fn get_power(&self, cpu_load: f64) -> f64;
}

clone_trait_object!(PowerModel);

/// Linear interpolation between idle and full power:
/// `idle_power + (full_power - idle_power) * cpu_load`.
///
/// An idle host draws `idle_power`, never zero; the modeled fleet is always powered on.
#[derive(Clone)]
pub struct LinearPowerModel {
    idle_power: f64,
    full_power: f64,
}

impl LinearPowerModel {
    /// Creates linear power model.
    /// - `idle_power` - host power draw in Watts when CPU load is zero.
    /// - `full_power` - host power draw in Watts when CPU is fully loaded.
    pub fn new(idle_power: f64, full_power: f64) -> Self {
        Self { idle_power, full_power }
    }
}

impl PowerModel for LinearPowerModel {
    fn get_power(&self, cpu_load: f64) -> f64 {
        let factor = self.full_power - self.idle_power;
        self.idle_power + cpu_load.clamp(0., 1.) * factor
    }
}

/// Constant power draw regardless of load.
#[derive(Clone)]
pub struct ConstantPowerModel {
    power: f64,
}

impl ConstantPowerModel {
    pub fn new(power: f64) -> Self {
        Self { power }
    }
}

impl PowerModel for ConstantPowerModel {
    fn get_power(&self, _cpu_load: f64) -> f64 {
        self.power
    }
}
