//! Per-robot tuning parameters.

/// Rates and thresholds governing one robot's movement and battery model.
///
/// Defaults match the reference fleet: a robot crosses one lane per second,
/// drains 0.5 %/s while advancing, recharges at 2 %/s, diverts to a charger
/// below 20 %, and replans after 10 s of waiting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RobotConfig {
    /// Lane traversal speed, in lanes per second (progress units).
    pub movement_speed: f64,

    /// Battery drain while advancing along a lane, in percent per second.
    pub battery_drain_rate: f64,

    /// Battery recovery while charging, in percent per second.
    pub charge_rate: f64,

    /// Below this battery percentage the robot diverts to a charger.
    pub min_battery: f64,

    /// Waiting longer than this forces a path recomputation, in seconds.
    pub max_wait_secs: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            movement_speed:     1.0,
            battery_drain_rate: 0.5,
            charge_rate:        2.0,
            min_battery:        20.0,
            max_wait_secs:      10.0,
        }
    }
}
