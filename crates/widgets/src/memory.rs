use ssm_core::Sample;

/// Displays RAM usage as a percentage.
#[derive(Debug, Default)]
pub struct MemoryWidget;

impl MemoryWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view(&self, sample: &Sample) -> String {
        format!("RAM {:>5.1}%", sample.ram_percent)
    }
}
