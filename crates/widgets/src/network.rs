use crate::units::meter_level;
use ssm_core::Sample;
use ssm_system::format_rate;

/// Displays upload / download rates with their meter levels.
#[derive(Debug, Default)]
pub struct NetworkWidget;

impl NetworkWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, sample: &Sample) -> String {
        let sent = sample.send_rate.unwrap_or(0.0);
        let recv = sample.recv_rate.unwrap_or(0.0);
        format!(
            "Sent: {} [{:>3}]  Recv: {} [{:>3}]",
            format_rate(sent),
            meter_level(sent),
            format_rate(recv),
            meter_level(recv),
        )
    }
}
