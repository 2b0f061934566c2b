use ssm_core::Sample;

/// Displays battery level and charger state.
///
/// Shows `N/A` for both when no battery is present (desktop / VM).
#[derive(Debug, Default)]
pub struct BatteryWidget;

impl BatteryWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, sample: &Sample) -> String {
        format!("{}  {}", battery_label(sample), charger_label(sample))
    }
}

pub fn battery_label(sample: &Sample) -> String {
    match sample.battery_percent() {
        Some(pct) => format!("Battery: {pct:.0}%"),
        None => "Battery: N/A".to_string(),
    }
}

pub fn charger_label(sample: &Sample) -> &'static str {
    match sample.battery_charging() {
        Some(true) => "Charger: Charging",
        Some(false) => "Charger: Not Charging",
        None => "Charger: N/A",
    }
}
