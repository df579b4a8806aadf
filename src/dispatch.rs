//! Runs the external tools that apply a wallpaper.
//!
//! Every command is best-effort: failures are logged and the next command
//! still runs. Nothing is reported back to the caller.

use clap::ValueEnum;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::{GuhwallError, Result, APP_NAME};

const NOTIFY_TITLE: &str = "Wallpaper Set";
const NOTIFY_BODY: &str = "Global theme updated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeBackend {
    #[default]
    Matugen,
    Pywal,
    #[value(name = "none")]
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes one external command to completion.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &ExternalCommand) -> Result<()>;
}

/// Spawns real processes with stdio discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ExternalCommand) -> Result<()> {
        let status = Command::new(command.program())
            .args(command.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| GuhwallError::CommandLaunch {
                program: command.program().to_owned(),
                source,
            })?;

        if !status.success() {
            return Err(GuhwallError::CommandStatus {
                program: command.program().to_owned(),
                status,
            });
        }
        Ok(())
    }
}

pub struct ActionDispatcher {
    theme: ThemeBackend,
    runner: Box<dyn CommandRunner>,
}

impl ActionDispatcher {
    pub fn new(theme: ThemeBackend) -> Self {
        Self::with_runner(theme, SystemRunner)
    }

    pub fn with_runner(theme: ThemeBackend, runner: impl CommandRunner + 'static) -> Self {
        Self {
            theme,
            runner: Box::new(runner),
        }
    }

    pub fn theme(&self) -> ThemeBackend {
        self.theme
    }

    /// The commands `activate` runs for `path`, in order.
    pub fn commands_for(&self, path: &Path) -> Vec<ExternalCommand> {
        let mut commands = vec![ExternalCommand::new("swww").arg("img").arg(path).args([
            "--transition-type",
            "grow",
            "--transition-pos",
            "center",
            "--transition-step",
            "90",
            "--transition-fps",
            "120",
        ])];

        match self.theme {
            ThemeBackend::Matugen => {
                commands.push(ExternalCommand::new("matugen").arg("image").arg(path))
            }
            ThemeBackend::Pywal => {
                commands.push(ExternalCommand::new("wal").arg("-i").arg(path).arg("-n"))
            }
            ThemeBackend::Disabled => {}
        }

        commands.push(
            ExternalCommand::new("notify-send")
                .args(["-a", APP_NAME, "-i"])
                .arg(path)
                .args([NOTIFY_TITLE, NOTIFY_BODY]),
        );
        commands
    }

    /// Sets `path` as the wallpaper, regenerates the theme and notifies.
    /// Blocks until every command has finished.
    pub fn activate(&self, path: &Path) {
        info!("Applying wallpaper {:?}", path);
        for command in self.commands_for(path) {
            debug!("Running {}", command);
            if let Err(e) = self.runner.run(&command) {
                warn!("{}", e);
            }
        }
    }
}
