use chrono::{DateTime, Local};
use std::time::Duration;

/// One point-in-time reading of the host, produced once per sampler tick.
///
/// Samples are immutable once built; the history window and every display
/// sink receive copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// When the sample was taken.
    pub timestamp: DateTime<Local>,
    /// Instantaneous CPU utilisation (0.0 – 100.0).
    pub cpu_percent: f32,
    /// Instantaneous memory utilisation (0.0 – 100.0).
    pub ram_percent: f32,
    /// Cumulative network counters since boot, summed over all interfaces.
    pub net: NetCounters,
    /// Upload rate in bytes/second; `None` on the first sample.
    pub send_rate: Option<f64>,
    /// Download rate in bytes/second; `None` on the first sample.
    pub recv_rate: Option<f64>,
    /// `None` when the host has no battery (desktop, VM).
    pub battery: Option<BatteryReading>,
    /// Time since boot.
    pub uptime: Duration,
}

impl Sample {
    /// Battery charge (0–100), `None` if no battery present.
    #[must_use]
    pub fn battery_percent(&self) -> Option<f32> {
        self.battery.map(|b| b.percent)
    }

    /// `true` = charging / plugged in, `None` = no battery.
    #[must_use]
    pub fn battery_charging(&self) -> Option<bool> {
        self.battery.map(|b| b.charging)
    }
}

/// Cumulative bytes moved over the network since boot.
///
/// Non-decreasing within a boot session; a decrease means the counters
/// were reset and is treated as zero traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// Battery charge level and charger state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    /// Charge level (0.0 – 100.0).
    pub percent: f32,
    /// `true` = charging / full on AC, `false` = discharging.
    pub charging: bool,
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample;
    use super::*;

    #[test]
    fn battery_accessors_without_battery() {
        let s = sample(0, 10.0);
        assert_eq!(s.battery_percent(), None);
        assert_eq!(s.battery_charging(), None);
    }

    #[test]
    fn battery_accessors_with_battery() {
        let mut s = sample(0, 10.0);
        s.battery = Some(BatteryReading { percent: 81.0, charging: true });
        assert_eq!(s.battery_percent(), Some(81.0));
        assert_eq!(s.battery_charging(), Some(true));
    }
}
