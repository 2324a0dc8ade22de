//! Post-hoc energy estimation from final host utilization.

use serde::Serialize;

use crate::core::power_model::PowerModel;

/// Watt-seconds per kilowatt-hour.
pub const WS_PER_KWH: f64 = 3_600_000.;

/// Energy consumption of one host over one run. Produced once per host per report.
#[derive(Serialize, Clone, Debug)]
pub struct EnergySample {
    pub host_id: u32,
    /// Final observed utilization fraction, clamped to [0, 1].
    pub utilization: f64,
    /// Power drawn at that utilization, in Watts.
    pub power_w: f64,
    /// Elapsed simulated time, in seconds.
    pub elapsed_time: f64,
    pub energy_ws: f64,
    pub energy_kwh: f64,
}

/// Converts final host utilization and elapsed simulated time into consumed energy.
///
/// Holds no state between calls; each estimate is a pure function of its inputs.
pub struct EnergyEstimator {
    power_model: Box<dyn PowerModel>,
}

impl EnergyEstimator {
    pub fn new(power_model: Box<dyn PowerModel>) -> Self {
        Self { power_model }
    }

    /// Estimates the energy consumed by the specified host.
    ///
    /// This is a single-sample approximation: the final utilization is assumed to have
    /// held for the whole run, so the figure under- or overstates the true time integral
    /// whenever utilization varied during the run.
    pub fn estimate(&self, host_id: u32, utilization: f64, elapsed_time: f64) -> EnergySample {
        let utilization = utilization.clamp(0., 1.);
        let power_w = self.power_model.get_power(utilization);
        let energy_ws = power_w * elapsed_time;
        EnergySample {
            host_id,
            utilization,
            power_w,
            elapsed_time,
            energy_ws,
            energy_kwh: energy_ws / WS_PER_KWH,
        }
    }
}
