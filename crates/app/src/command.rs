use ssm_power::PowerAction;

/// A line typed on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Delete junk from the configured directories.
    Clean,
    Power(PowerAction),
    /// Print the history window.
    History,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line.  Blank lines are `Ok(None)`; anything
    /// unrecognised comes back as the offending word.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let word = line.trim().to_ascii_lowercase();
        let cmd = match word.as_str() {
            "" => return Ok(None),
            "clean" => Self::Clean,
            "history" => Self::History,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => match other.parse::<PowerAction>() {
                Ok(action) => Self::Power(action),
                Err(_) => return Err(word),
            },
        };
        Ok(Some(cmd))
    }
}

pub const HELP: &str = "\
commands:
  clean      delete junk files from the temp directories
  shutdown   power off the machine
  restart    reboot the machine
  sleep      suspend the machine
  history    show the recent sample window
  help       this text
  quit       exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("clean\n"), Ok(Some(Command::Clean)));
        assert_eq!(Command::parse("  QUIT "), Ok(Some(Command::Quit)));
        assert_eq!(
            Command::parse("sleep"),
            Ok(Some(Command::Power(PowerAction::Sleep)))
        );
        assert_eq!(
            Command::parse("reboot"),
            Ok(Some(Command::Power(PowerAction::Restart)))
        );
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("Dance"), Err("dance".to_string()));
    }
}
