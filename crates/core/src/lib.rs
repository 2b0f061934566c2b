pub mod error;
pub mod sink;
pub mod state;

pub use error::{Result, SsmError};
pub use sink::DisplaySink;
pub use state::{BatteryReading, NetCounters, Sample};
