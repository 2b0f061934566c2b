//! Text rendering of samples: one small widget per metric, composed into a
//! dashboard that implements [`DisplaySink`](ssm_core::DisplaySink).

pub mod battery;
pub mod cpu;
pub mod dashboard;
pub mod memory;
pub mod network;
pub mod units;
pub mod uptime;

pub use battery::BatteryWidget;
pub use cpu::CpuWidget;
pub use dashboard::{drive_display, TextDashboard};
pub use memory::MemoryWidget;
pub use network::NetworkWidget;
pub use uptime::UptimeWidget;
