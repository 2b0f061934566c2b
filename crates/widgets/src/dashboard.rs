use crate::{BatteryWidget, CpuWidget, MemoryWidget, NetworkWidget, UptimeWidget};
use ssm_core::{DisplaySink, Sample};
use ssm_system::HistoryReader;
use std::io::Write;
use tokio::sync::watch;
use tracing::warn;

/// Renders each sample as a short block of text lines.
#[derive(Debug)]
pub struct TextDashboard<W> {
    out:     W,
    cpu:     CpuWidget,
    memory:  MemoryWidget,
    network: NetworkWidget,
    battery: BatteryWidget,
    uptime:  UptimeWidget,
}

impl<W: Write + Send> TextDashboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cpu:     CpuWidget::new(),
            memory:  MemoryWidget::new(),
            network: NetworkWidget::new(),
            battery: BatteryWidget::new(),
            uptime:  UptimeWidget::new(),
        }
    }

    /// Add a CPU sparkline drawn from the sampler's history window.
    pub fn with_history(mut self, history: HistoryReader) -> Self {
        self.cpu = CpuWidget::with_history(history);
        self
    }

    pub fn render(&self, sample: &Sample) -> String {
        format!(
            "[{}] {}  {}\n  {}\n  {}  {}\n",
            sample.timestamp.format("%H:%M:%S"),
            self.cpu.view(sample),
            self.memory.view(sample),
            self.network.view(sample),
            self.battery.view(sample),
            self.uptime.view(sample),
        )
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> DisplaySink for TextDashboard<W> {
    fn on_sample(&mut self, sample: &Sample) {
        let block = self.render(sample);
        if let Err(e) = self.out.write_all(block.as_bytes()).and_then(|()| self.out.flush()) {
            warn!("Dashboard write failed: {e}");
        }
    }
}

/// Feed `sink` from the sampler's mailbox until `stop` fires or the sampler
/// goes away.  Only the most recent sample is ever delivered.
pub async fn drive_display<S: DisplaySink>(
    mut sink: S,
    mut latest: watch::Receiver<Option<Sample>>,
    mut stop: watch::Receiver<bool>,
) -> S {
    loop {
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
            changed = latest.changed() => {
                if changed.is_err() {
                    break;
                }
                // Clone out of the slot so the sampler is never held up by
                // the sink.
                let sample = latest.borrow_and_update().clone();
                if let Some(sample) = sample {
                    sink.on_sample(&sample);
                }
            }
        }
    }
    sink
}
