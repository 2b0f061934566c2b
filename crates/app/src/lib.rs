//! Wires the monitor together:
//! - Sampler task (CPU, RAM, network, battery, uptime)
//! - Text dashboard fed from the sampler's mailbox
//! - Optional metrics log
//! - Console commands on stdin (cleanup, power, history)

pub mod command;

pub use command::Command;

use anyhow::Result;
use ssm_cleaner::{spawn_cleanup, CleanupProgress, CleanupReport, CleanupTask};
use ssm_core::SsmError;
use ssm_config::{default_path, load as load_config, SsmConfig};
use ssm_power::{PowerControl, SystemPower};
use ssm_system::{spawn_metrics_log, spawn_sampler, HistoryReader, SysinfoSource};
use ssm_widgets::{drive_display, units::format_bytes, uptime::format_uptime, TextDashboard};
use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use tracing::{info, warn};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run until the user quits, stdin closes, or Ctrl-C arrives.
pub async fn run() -> Result<()> {
    let config = load_config(default_path())?;

    let sampler = spawn_sampler(SysinfoSource::new(), &config.sampler);
    let history = sampler.history();

    let dashboard = TextDashboard::new(std::io::stdout()).with_history(history.clone());
    let display = tokio::spawn(drive_display(
        dashboard,
        sampler.latest(),
        sampler.stop_signal(),
    ));

    let metrics_log = config
        .log
        .enabled
        .then(|| spawn_metrics_log(&config.log, sampler.latest(), sampler.stop_signal()));

    println!("{}", command::HELP);

    tokio::select! {
        () = console(&config, &history, &SystemPower) => {}
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!("Cannot listen for Ctrl-C: {e}");
            }
        }
    }

    info!("Shutting down");
    sampler.shutdown().await;
    if let Err(e) = display.await {
        warn!("Display task ended abnormally: {e}");
    }
    if let Some(task) = metrics_log {
        if let Err(e) = task.await {
            warn!("Metrics log task ended abnormally: {e}");
        }
    }
    Ok(())
}

// ── Console ───────────────────────────────────────────────────────────────────

/// Read commands from stdin until `quit` or end of input.  Leaving (or
/// being dropped on Ctrl-C) drops any running cleanup, which cancels it.
async fn console(
    config: &SsmConfig,
    history: &HistoryReader,
    power: &dyn PowerControl,
) {
    let mut lines = spawn_stdin_reader();
    let mut cleanup: Option<CleanupTask> = None;

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    return; // stdin closed
                };
                match Command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => return,
                    Ok(Some(Command::Help)) => println!("{}", command::HELP),
                    Ok(Some(Command::History)) => print_history(history),
                    Ok(Some(Command::Clean)) => {
                        if cleanup.is_some() {
                            println!("Cleanup already running");
                        } else {
                            cleanup = Some(spawn_cleanup(config.cleaner.roots(), config.cleaner.pace()));
                            println!("Cleaning junk files…");
                        }
                    }
                    Ok(Some(Command::Power(action))) => match power.invoke(action) {
                        Ok(()) => println!("Requested {action}"),
                        Err(e) => println!("Could not {action}: {e}"),
                    },
                    Err(word) => println!("Unknown command '{word}' (try 'help')"),
                }
            }
            event = next_cleanup_event(&mut cleanup) => match event {
                CleanupEvent::Progress(p) => {
                    if p.done == p.total || p.done % 50 == 0 {
                        print!("\rCleaning… {:>3}%", p.percent());
                        let _ = std::io::stdout().flush();
                    }
                }
                CleanupEvent::Finished(report) => {
                    cleanup = None;
                    match report {
                        Ok(r) => println!(
                            "\rCleaned {} junk item(s), freed {}, skipped {}{}",
                            r.deleted_count,
                            format_bytes(r.deleted_bytes),
                            r.skipped(),
                            if r.cancelled { " (stopped early)" } else { "" }
                        ),
                        Err(e) => println!("\rCleanup failed: {e}"),
                    }
                }
            },
        }
    }
}

enum CleanupEvent {
    Progress(CleanupProgress),
    Finished(ssm_core::Result<CleanupReport>),
}

/// Next event from the running cleanup; pending forever when none runs.
async fn next_cleanup_event(cleanup: &mut Option<CleanupTask>) -> CleanupEvent {
    let Some(task) = cleanup else {
        return std::future::pending().await;
    };
    tokio::select! {
        biased;
        Some(p) = task.progress.recv() => CleanupEvent::Progress(p),
        done = &mut task.done => CleanupEvent::Finished(done.map_err(|_| {
            SsmError::Cleanup("cleanup task ended without a report".into())
        })),
    }
}

/// Forward stdin lines from a plain thread.  The thread is never joined, so
/// a pending read cannot hold up shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break; // console gone
                    }
                }
                Err(e) => {
                    warn!("Reading stdin failed: {e}");
                    break;
                }
            }
        }
    });
    rx
}

fn print_history(history: &HistoryReader) {
    let samples = history.snapshot();
    println!(
        "{} of {} sample(s), avg CPU {:.1}%",
        samples.len(),
        history.capacity(),
        history.average_cpu()
    );
    for s in samples {
        println!(
            "  {}  cpu {:>5.1}%  ram {:>5.1}%  up {}",
            s.timestamp.format("%H:%M:%S"),
            s.cpu_percent,
            s.ram_percent,
            format_uptime(s.uptime)
        );
    }
}
