pub mod battery;
pub mod history;
pub mod metrics_log;
pub mod rate;
pub mod sampler;
pub mod source;

pub use history::{history_channel, HistoryReader, HistoryWindow, HistoryWriter};
pub use metrics_log::{spawn_metrics_log, MetricsLog};
pub use rate::{format_rate, per_second};
pub use sampler::{spawn_sampler, Reading, Sampler, SamplerHandle, SkipReason, Tick};
pub use source::{CounterSnapshot, CounterSource, SysinfoSource};
