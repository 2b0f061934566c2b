use ssm_core::Sample;
use ssm_system::HistoryReader;

/// Sparkline glyphs from idle to saturated.
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Displays CPU usage, plus a sparkline of the history window when one is
/// attached.
#[derive(Debug, Default)]
pub struct CpuWidget {
    history: Option<HistoryReader>,
}

impl CpuWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: HistoryReader) -> Self {
        Self { history: Some(history) }
    }

    pub fn view(&self, sample: &Sample) -> String {
        let mut out = format!("CPU {:>5.1}%", sample.cpu_percent);
        if let Some(history) = &self.history {
            let values: Vec<f32> = history.snapshot().iter().map(|s| s.cpu_percent).collect();
            out.push_str(&format!(
                "  {}  avg {:.1}%",
                sparkline(&values),
                history.average_cpu()
            ));
        }
        out
    }
}

/// One glyph per percentage value, oldest first.
pub fn sparkline(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| {
            let idx = (v.clamp(0.0, 100.0) / 100.0 * (BARS.len() - 1) as f32).round() as usize;
            BARS[idx]
        })
        .collect()
}
