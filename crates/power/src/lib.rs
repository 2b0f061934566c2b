//! Shutdown / restart / sleep.
//!
//! Commands are fired and forgotten: [`PowerControl::invoke`] returns as soon
//! as the platform command has been launched.  Failing to launch it is an
//! error the caller must show to the user.

use ssm_core::{Result, SsmError};
use std::fmt;
use std::str::FromStr;
use tokio::process::Command;
use tracing::{info, warn};

/// A power-state change the user can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerAction {
    Shutdown,
    Restart,
    Sleep,
}

impl PowerAction {
    pub const ALL: [PowerAction; 3] = [Self::Shutdown, Self::Restart, Self::Sleep];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::Restart => "restart",
            Self::Sleep => "sleep",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerAction {
    type Err = SsmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shutdown" | "poweroff" => Ok(Self::Shutdown),
            "restart" | "reboot" => Ok(Self::Restart),
            "sleep" | "suspend" => Ok(Self::Sleep),
            other => Err(SsmError::Power(format!("unknown power action '{other}'"))),
        }
    }
}

/// Program and arguments that carry out an action on this platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerCommand {
    pub program: String,
    pub args:    Vec<String>,
}

impl PowerCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args:    args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[cfg(target_os = "windows")]
    pub fn for_action(action: PowerAction) -> Self {
        match action {
            PowerAction::Shutdown => Self::new("shutdown", &["/s", "/t", "1"]),
            PowerAction::Restart => Self::new("shutdown", &["/r", "/t", "1"]),
            PowerAction::Sleep => {
                Self::new("rundll32.exe", &["powrprof.dll,SetSuspendState", "0,1,0"])
            }
        }
    }

    #[cfg(target_os = "macos")]
    pub fn for_action(action: PowerAction) -> Self {
        match action {
            PowerAction::Shutdown => Self::new("shutdown", &["-h", "now"]),
            PowerAction::Restart => Self::new("shutdown", &["-r", "now"]),
            PowerAction::Sleep => Self::new("pmset", &["sleepnow"]),
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    pub fn for_action(action: PowerAction) -> Self {
        match action {
            PowerAction::Shutdown => Self::new("systemctl", &["poweroff"]),
            PowerAction::Restart => Self::new("systemctl", &["reboot"]),
            PowerAction::Sleep => Self::new("systemctl", &["suspend"]),
        }
    }

    /// Launch the command without waiting for it.  A detached task reaps the
    /// child and logs a non-zero exit.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(&self) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .spawn()
            .map_err(|e| SsmError::Power(format!("cannot run '{}': {e}", self.program)))?;

        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("'{program}' exited with {status}"),
                Err(e) => warn!("Lost track of '{program}': {e}"),
            }
        });
        Ok(())
    }
}

impl fmt::Display for PowerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Issues power-state changes.
pub trait PowerControl: Send + Sync {
    fn invoke(&self, action: PowerAction) -> Result<()>;
}

/// [`PowerControl`] that runs the platform's own commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPower;

impl PowerControl for SystemPower {
    fn invoke(&self, action: PowerAction) -> Result<()> {
        let command = PowerCommand::for_action(action);
        info!("Power {action}: running `{command}`");
        command.spawn()
    }
}
