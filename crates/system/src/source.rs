use crate::battery;
use chrono::{DateTime, Local};
use ssm_core::{BatteryReading, NetCounters, Result, SsmError};
use sysinfo::{Networks, System};

/// Everything the sampler needs from one tick's worth of counter reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterSnapshot {
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub net: NetCounters,
    pub battery: Option<BatteryReading>,
}

/// Point-in-time reads of the host's OS counters.
///
/// Implementations may block briefly; the sampler runs them off the async
/// executor and bounds them with a timeout.
pub trait CounterSource: Send {
    /// Instantaneous CPU utilisation, 0.0 – 100.0.
    fn read_cpu_percent(&mut self) -> Result<f32>;

    /// Instantaneous memory utilisation, 0.0 – 100.0.
    fn read_memory_percent(&mut self) -> Result<f32>;

    /// Cumulative bytes sent/received since boot.
    fn read_network_counters(&mut self) -> Result<NetCounters>;

    /// `Ok(None)` when the host has no battery.
    fn read_battery(&mut self) -> Result<Option<BatteryReading>>;

    fn read_boot_time(&mut self) -> Result<DateTime<Local>>;

    /// Gather one tick's reads.  Any single failure fails the snapshot.
    fn snapshot(&mut self) -> Result<CounterSnapshot> {
        Ok(CounterSnapshot {
            cpu_percent: self.read_cpu_percent()?.clamp(0.0, 100.0),
            ram_percent: self.read_memory_percent()?.clamp(0.0, 100.0),
            net:         self.read_network_counters()?,
            battery:     self.read_battery()?,
        })
    }
}

/// [`CounterSource`] backed by `sysinfo` plus sysfs for the battery.
pub struct SysinfoSource {
    sys:      System,
    networks: Networks,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        // Prime the CPU counters; usage is a delta between two refreshes.
        sys.refresh_cpu_usage();
        Self {
            sys,
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SysinfoSource {
    fn read_cpu_percent(&mut self) -> Result<f32> {
        self.sys.refresh_cpu_usage();
        Ok(self.sys.global_cpu_usage())
    }

    fn read_memory_percent(&mut self) -> Result<f32> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(SsmError::Sensor("total memory reported as zero".into()));
        }
        Ok((self.sys.used_memory() as f64 / total as f64 * 100.0) as f32)
    }

    fn read_network_counters(&mut self) -> Result<NetCounters> {
        self.networks.refresh(false); // false = keep existing interfaces list
        let (bytes_sent, bytes_recv) = self
            .networks
            .iter()
            .fold((0u64, 0u64), |(tx, rx), (_, data)| {
                (
                    tx.saturating_add(data.total_transmitted()),
                    rx.saturating_add(data.total_received()),
                )
            });
        Ok(NetCounters { bytes_sent, bytes_recv })
    }

    fn read_battery(&mut self) -> Result<Option<BatteryReading>> {
        battery::read_battery()
    }

    fn read_boot_time(&mut self) -> Result<DateTime<Local>> {
        let secs = i64::try_from(System::boot_time())
            .map_err(|_| SsmError::Sensor("boot time out of range".into()))?;
        DateTime::from_timestamp(secs, 0)
            .map(|utc| utc.with_timezone(&Local))
            .ok_or_else(|| SsmError::Sensor(format!("invalid boot timestamp {secs}")))
    }
}
