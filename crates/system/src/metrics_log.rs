//! Optional append-only audit trail: one CSV-ish line per interval.
//!
//! Line format: `timestamp,cpu%,ram%,sent_kb,recv_kb`, e.g.
//! `2024-05-01 13:37:00,12.5,48.0,20480.0,102400.0`.

use chrono::{DateTime, Local};
use ssm_config::LogConfig;
use ssm_core::{Result, Sample};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{self, JoinHandle};
use tracing::{info, warn};

/// Appends sample lines to a file, rotating it before it outgrows
/// `max_bytes`.
#[derive(Debug)]
pub struct MetricsLog {
    path:         PathBuf,
    interval:     Duration,
    max_bytes:    u64,
    last_written: Option<DateTime<Local>>,
}

impl MetricsLog {
    pub fn new(config: &LogConfig) -> Self {
        Self {
            path:         config.path.clone(),
            interval:     Duration::from_secs(config.interval_secs),
            max_bytes:    config.max_bytes,
            last_written: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the previous generation goes on rotation.
    pub fn rotated_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".1");
        PathBuf::from(name)
    }

    /// Append `sample` if a full interval has passed since the last written
    /// line.  Returns whether a line was written.
    pub fn record(&mut self, sample: &Sample) -> Result<bool> {
        if let Some(last) = self.last_written {
            // A clock that stepped backwards restarts the interval from here.
            let since = sample.timestamp.signed_duration_since(last).to_std();
            if matches!(since, Ok(since) if since < self.interval) {
                return Ok(false);
            }
        }

        let line = format_line(sample);
        self.rotate_if_needed(line.len() as u64)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;

        self.last_written = Some(sample.timestamp);
        Ok(true)
    }

    fn rotate_if_needed(&self, incoming: u64) -> Result<()> {
        let current = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        if current > 0 && current + incoming > self.max_bytes {
            fs::rename(&self.path, self.rotated_path())?;
            info!("Rotated metrics log '{}'", self.path.display());
        }
        Ok(())
    }
}

/// Render one log line, newline included.
pub fn format_line(sample: &Sample) -> String {
    format!(
        "{},{:.1},{:.1},{:.1},{:.1}\n",
        sample.timestamp.format("%Y-%m-%d %H:%M:%S"),
        sample.cpu_percent,
        sample.ram_percent,
        sample.net.bytes_sent as f64 / 1024.0,
        sample.net.bytes_recv as f64 / 1024.0,
    )
}

/// Spawn a task that feeds every published sample into a [`MetricsLog`]
/// until `stop` fires or the sampler goes away.  File I/O runs on the
/// blocking pool.
pub fn spawn_metrics_log(
    config: &LogConfig,
    mut latest: watch::Receiver<Option<Sample>>,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let mut log = MetricsLog::new(config);

    tokio::spawn(async move {
        info!("Writing metrics log to '{}'", log.path().display());
        loop {
            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                changed = latest.changed() => {
                    if changed.is_err() {
                        break; // sampler gone
                    }
                    let sample = latest.borrow_and_update().clone();
                    let Some(sample) = sample else { continue };
                    let written = task::spawn_blocking(move || {
                        let res = log.record(&sample);
                        (log, res)
                    })
                    .await;
                    match written {
                        Ok((back, res)) => {
                            log = back;
                            if let Err(e) = res {
                                warn!("Metrics log write failed: {e}");
                            }
                        }
                        Err(e) => {
                            warn!("Metrics log writer failed: {e}");
                            break;
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ssm_core::NetCounters;

    fn sample(secs: i64) -> Sample {
        Sample {
            timestamp:   Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            cpu_percent: 12.5,
            ram_percent: 48.0,
            net: NetCounters {
                bytes_sent: 20 * 1024 * 1024,
                bytes_recv: 100 * 1024 * 1024,
            },
            send_rate:   None,
            recv_rate:   None,
            battery:     None,
            uptime:      Duration::from_secs(60),
        }
    }

    fn config(dir: &Path, max_bytes: u64) -> LogConfig {
        LogConfig {
            enabled: true,
            path: dir.join("nested").join("metrics.log"),
            interval_secs: 60,
            max_bytes,
        }
    }

    #[test]
    fn line_format() {
        let s = sample(0);
        let expected = format!(
            "{},12.5,48.0,20480.0,102400.0\n",
            s.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
        assert_eq!(format_line(&s), expected);
    }

    #[test]
    fn writes_at_most_one_line_per_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = MetricsLog::new(&config(dir.path(), 1 << 20));

        assert!(log.record(&sample(0)).unwrap());
        assert!(!log.record(&sample(1)).unwrap());
        assert!(!log.record(&sample(59)).unwrap());
        assert!(log.record(&sample(60)).unwrap());
        assert!(log.record(&sample(200)).unwrap());

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn clock_stepping_back_does_not_silence_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = MetricsLog::new(&config(dir.path(), 1 << 20));

        assert!(log.record(&sample(3_600)).unwrap());
        // Wall clock jumped back an hour.
        assert!(log.record(&sample(0)).unwrap());
        assert!(!log.record(&sample(30)).unwrap());
        assert!(log.record(&sample(60)).unwrap());

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn rotates_before_exceeding_cap() {
        let dir = tempfile::tempdir().unwrap();
        let line_len = format_line(&sample(0)).len() as u64;
        // Room for two lines, not three.
        let mut log = MetricsLog::new(&config(dir.path(), line_len * 2 + 1));

        for minute in 0..3 {
            assert!(log.record(&sample(minute * 60)).unwrap());
        }

        let current = fs::read_to_string(log.path()).unwrap();
        let rotated = fs::read_to_string(log.rotated_path()).unwrap();
        assert_eq!(rotated.lines().count(), 2);
        assert_eq!(current.lines().count(), 1);
        assert!(fs::metadata(log.path()).unwrap().len() <= line_len * 2 + 1);
    }

    #[tokio::test]
    async fn task_logs_published_samples() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), 1 << 20);
        let (tx, rx) = watch::channel(None);
        let (stop_tx, stop_rx) = watch::channel(false);

        let task = spawn_metrics_log(&cfg, rx, stop_tx.subscribe());
        drop(stop_rx);

        tx.send_replace(Some(sample(0)));
        for _ in 0..100 {
            if cfg.path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        stop_tx.send(true).unwrap();
        task.await.unwrap();

        let contents = fs::read_to_string(&cfg.path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
