use ssm_core::Sample;
use std::time::Duration;

/// Displays system uptime.
#[derive(Debug, Default)]
pub struct UptimeWidget;

impl UptimeWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, sample: &Sample) -> String {
        format!("Uptime: {}", format_uptime(sample.uptime))
    }
}

/// `"2d 3h 4m"` once past a day, `"3h 4m"` below.
pub fn format_uptime(uptime: Duration) -> String {
    let mins  = uptime.as_secs() / 60;
    let hours = mins / 60;
    let days  = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m", days, hours % 24, mins % 60)
    } else {
        format!("{}h {}m", hours, mins % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_a_day() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0h 0m");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 4 * 60 + 59)), "3h 4m");
    }

    #[test]
    fn days_are_not_dropped() {
        let secs = 2 * 86_400 + 3 * 3600 + 4 * 60;
        assert_eq!(format_uptime(Duration::from_secs(secs)), "2d 3h 4m");
    }
}
