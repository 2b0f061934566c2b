//! The sampling loop: read counters on a fixed period, derive rates, fold
//! each reading into a [`Sample`], record it and publish it.

use crate::history::{history_channel, HistoryReader, HistoryWriter};
use crate::rate;
use crate::source::{CounterSnapshot, CounterSource};
use chrono::{DateTime, Local};
use ssm_config::SamplerConfig;
use ssm_core::{NetCounters, Result, Sample, SsmError};
use std::fmt;
use std::sync::{Arc, Mutex, TryLockError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, trace, warn};

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    Sampled(Sample),
    Skipped(SkipReason),
}

/// Why a tick produced no sample.  Always transient: the loop keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ReadFailed(String),
    TimedOut(Duration),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed(why) => write!(f, "counter read failed: {why}"),
            Self::TimedOut(after) => write!(f, "counter read timed out after {after:?}"),
        }
    }
}

/// Raw material for one sample, gathered off the async executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub boot_time: DateTime<Local>,
    pub counters:  CounterSnapshot,
}

/// Read everything one tick needs.  The boot time is only asked for until
/// it has been obtained once.
pub fn read_counters<S>(source: &mut S, boot_time: Option<DateTime<Local>>) -> Result<Reading>
where
    S: CounterSource + ?Sized,
{
    let boot_time = match boot_time {
        Some(t) => t,
        None => source.read_boot_time()?,
    };
    Ok(Reading {
        boot_time,
        counters: source.snapshot()?,
    })
}

/// Per-loop state carried between ticks.
#[derive(Debug, Default)]
pub struct Sampler {
    /// Fixed once the first read succeeds.
    boot_time: Option<DateTime<Local>>,
    /// Network counters and time of the previous successful tick.
    prev: Option<(NetCounters, DateTime<Local>)>,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boot_time(&self) -> Option<DateTime<Local>> {
        self.boot_time
    }

    /// One synchronous tick against `source`, stamped `now`.
    pub fn tick<S>(&mut self, source: &mut S, now: DateTime<Local>) -> Tick
    where
        S: CounterSource + ?Sized,
    {
        match read_counters(source, self.boot_time) {
            Ok(reading) => Tick::Sampled(self.fold(reading, now)),
            Err(e) => Tick::Skipped(SkipReason::ReadFailed(e.to_string())),
        }
    }

    /// Turn a successful reading into a [`Sample`].  Rates are `None` on the
    /// first sample.
    pub fn fold(&mut self, reading: Reading, now: DateTime<Local>) -> Sample {
        let Reading { boot_time, counters } = reading;
        let boot_time = *self.boot_time.get_or_insert(boot_time);

        let (send_rate, recv_rate) = match self.prev {
            Some((prev, prev_at)) => (
                Some(rate::per_second(prev.bytes_sent, &prev_at, counters.net.bytes_sent, &now)),
                Some(rate::per_second(prev.bytes_recv, &prev_at, counters.net.bytes_recv, &now)),
            ),
            None => (None, None),
        };
        self.prev = Some((counters.net, now));

        Sample {
            timestamp: now,
            cpu_percent: counters.cpu_percent,
            ram_percent: counters.ram_percent,
            net: counters.net,
            send_rate,
            recv_rate,
            battery: counters.battery,
            uptime: now
                .signed_duration_since(boot_time)
                .to_std()
                .unwrap_or_default(),
        }
    }

    /// One tick with the read moved to the blocking pool and bounded by
    /// `read_timeout`.
    async fn tick_bounded<S>(&mut self, source: &Arc<Mutex<S>>, read_timeout: Duration) -> Tick
    where
        S: CounterSource + 'static,
    {
        let source = Arc::clone(source);
        let boot_time = self.boot_time;
        let read = task::spawn_blocking(move || {
            // A read that outlived its timeout may still hold the source.
            let mut guard = match source.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    return Err(SsmError::Sensor("previous read still in progress".into()))
                }
            };
            read_counters(&mut *guard, boot_time)
        });

        match time::timeout(read_timeout, read).await {
            Ok(Ok(Ok(reading))) => Tick::Sampled(self.fold(reading, Local::now())),
            Ok(Ok(Err(e))) => Tick::Skipped(SkipReason::ReadFailed(e.to_string())),
            Ok(Err(join)) => Tick::Skipped(SkipReason::ReadFailed(format!("read task failed: {join}"))),
            Err(_) => Tick::Skipped(SkipReason::TimedOut(read_timeout)),
        }
    }
}

/// Handle to a running sampler task.
#[derive(Debug)]
pub struct SamplerHandle {
    latest:  watch::Receiver<Option<Sample>>,
    history: HistoryReader,
    stop:    watch::Sender<bool>,
    task:    JoinHandle<()>,
}

impl SamplerHandle {
    /// Single-slot mailbox holding the most recent sample (`None` until the
    /// first successful tick).
    pub fn latest(&self) -> watch::Receiver<Option<Sample>> {
        self.latest.clone()
    }

    pub fn history(&self) -> HistoryReader {
        self.history.clone()
    }

    /// Fires `true` once shutdown has been requested.  Other tasks can use it
    /// to stop alongside the sampler.
    pub fn stop_signal(&self) -> watch::Receiver<bool> {
        self.stop.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Ask the loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            warn!("Sampler task ended abnormally: {e}");
        }
    }
}

/// Spawn a background Tokio task that samples `source` every
/// `config.interval()` and publishes through the returned handle.
///
/// The loop only stops on [`SamplerHandle::shutdown`] (or when the handle is
/// dropped); failed or slow reads skip the tick and nothing more.
pub fn spawn_sampler<S>(source: S, config: &SamplerConfig) -> SamplerHandle
where
    S: CounterSource + 'static,
{
    let (writer, history) = history_channel(config.history_capacity);
    let (latest_tx, latest) = watch::channel(None);
    let (stop, stop_rx) = watch::channel(false);

    let interval = config.interval();
    // Shutdown must be observed within one tick, reads included.
    let read_timeout = config.read_timeout().min(interval);

    let task = tokio::spawn(sample_loop(
        Arc::new(Mutex::new(source)),
        interval,
        read_timeout,
        writer,
        latest_tx,
        stop_rx,
    ));

    SamplerHandle { latest, history, stop, task }
}

async fn sample_loop<S>(
    source: Arc<Mutex<S>>,
    interval: Duration,
    read_timeout: Duration,
    history: HistoryWriter,
    latest: watch::Sender<Option<Sample>>,
    mut stop: watch::Receiver<bool>,
) where
    S: CounterSource + 'static,
{
    let mut sampler = Sampler::new();
    let mut ticker  = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires at once; let a full period pass after the source
    // primed its CPU counters so the first usage figure is a real delta.
    ticker.tick().await;

    info!("Sampler started (every {interval:?})");

    loop {
        tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        match sampler.tick_bounded(&source, read_timeout).await {
            Tick::Sampled(sample) => {
                trace!(
                    cpu = sample.cpu_percent,
                    ram = sample.ram_percent,
                    "sample"
                );
                history.push(sample.clone());
                latest.send_replace(Some(sample));
            }
            Tick::Skipped(reason) => warn!("Skipping tick: {reason}"),
        }
    }

    info!("Sampler stopped");
}
