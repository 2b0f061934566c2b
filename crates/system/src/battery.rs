use ssm_core::{BatteryReading, Result, SsmError};
use std::path::Path;

const POWER_SUPPLY: &str = "/sys/class/power_supply";

/// Read battery state from the Linux sysfs power-supply interface.
///
/// Returns the first battery found, or `Ok(None)` if the system has no
/// battery (desktop, VM).  A battery that exists but cannot be read is an
/// error.
pub fn read_battery() -> Result<Option<BatteryReading>> {
    read_battery_in(Path::new(POWER_SUPPLY))
}

pub(crate) fn read_battery_in(root: &Path) -> Result<Option<BatteryReading>> {
    for name in ["BAT0", "BAT1", "BAT2"] {
        let base = root.join(name);
        if !base.exists() {
            continue;
        }

        let capacity = std::fs::read_to_string(base.join("capacity"))?;
        let status   = std::fs::read_to_string(base.join("status"))?;

        let percent = capacity.trim().parse::<u8>().map_err(|e| {
            SsmError::Sensor(format!("{name}: bad capacity {:?}: {e}", capacity.trim()))
        })?;
        let charging = matches!(status.trim(), "Charging" | "Full");

        return Ok(Some(BatteryReading {
            percent: f32::from(percent.min(100)),
            charging,
        }));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn battery_dir(root: &Path, name: &str, capacity: &str, status: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("capacity"), capacity).unwrap();
        fs::write(dir.join("status"), status).unwrap();
    }

    #[test]
    fn no_battery_is_none() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(read_battery_in(root.path()).unwrap(), None);
    }

    #[test]
    fn charging_battery() {
        let root = tempfile::tempdir().unwrap();
        battery_dir(root.path(), "BAT0", "76\n", "Charging\n");

        let b = read_battery_in(root.path()).unwrap().unwrap();
        assert_eq!(b.percent, 76.0);
        assert!(b.charging);
    }

    #[test]
    fn discharging_second_slot() {
        let root = tempfile::tempdir().unwrap();
        battery_dir(root.path(), "BAT1", "12", "Discharging");

        let b = read_battery_in(root.path()).unwrap().unwrap();
        assert_eq!(b.percent, 12.0);
        assert!(!b.charging);
    }

    #[test]
    fn garbled_capacity_is_a_sensor_error() {
        let root = tempfile::tempdir().unwrap();
        battery_dir(root.path(), "BAT0", "lots", "Full");

        assert!(matches!(read_battery_in(root.path()), Err(SsmError::Sensor(_))));
    }
}
