//! External process boundary: launch commands and teardown kill rules.
//!
//! Everything that touches the OS process table goes through a
//! [`CommandRunner`] so sessions can be exercised without spawning anything.

use crate::catalog::FileKind;
use crate::result::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default managed launcher for `.jnlp` files
pub const DEFAULT_LAUNCHER: &str = "javaws";

/// Helper process spawned by the managed launcher
pub const LAUNCHER_HELPER_PROCESS: &str = "jp2launcher.exe";

/// Title of the Java Control Panel window
pub const CONTROL_PANEL_TITLE: &str = "Java Control Panel";

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable
    pub program: String,
    /// Arguments, passed verbatim
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command with no arguments
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// How a finished command exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
}

impl CommandStatus {
    /// Status of a process that exited with `code`
    #[must_use]
    pub const fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether the command exited with status zero
    #[must_use]
    pub const fn success(self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Exit status plus captured standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status
    pub status: CommandStatus,
    /// Captured stdout, lossily decoded
    pub stdout: String,
}

/// Runs commands to completion.
pub trait CommandRunner: Send + Sync {
    /// Run with inherited stdio and block until the process exits.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Launch`] if the process cannot be started.
    fn run(&self, command: &CommandSpec) -> HarnessResult<CommandStatus>;

    /// Run and capture stdout.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Launch`] if the process cannot be started.
    fn capture(&self, command: &CommandSpec) -> HarnessResult<CommandOutput>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd
    }

    fn launch_error(spec: &CommandSpec, err: &std::io::Error) -> HarnessError {
        HarnessError::Launch {
            command: spec.to_string(),
            message: err.to_string(),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> HarnessResult<CommandStatus> {
        // Launchers hand their stdio to the spawned application, so nothing is
        // piped here or the wait would last as long as the application.
        let status = Self::command(spec)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| Self::launch_error(spec, &e))?;
        Ok(CommandStatus {
            code: status.code(),
        })
    }

    fn capture(&self, spec: &CommandSpec) -> HarnessResult<CommandOutput> {
        let output = Self::command(spec)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| Self::launch_error(spec, &e))?;
        Ok(CommandOutput {
            status: CommandStatus {
                code: output.status.code(),
            },
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Extensions run as programs rather than handed to the opener
const EXECUTABLE_EXTENSIONS: [&str; 4] = ["exe", "bat", "cmd", "com"];

/// How a file is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchKind {
    /// `.jnlp` passed to the managed launcher
    Managed,
    /// Executable run as the program itself
    Direct,
    /// Anything else, handed to the platform file opener
    Opened,
}

impl LaunchKind {
    /// Classify `file` by extension (case-insensitive). Files without an
    /// extension are treated as executables.
    #[must_use]
    pub fn of(file: &Path) -> Self {
        let Some(ext) = file.extension().and_then(|ext| ext.to_str()) else {
            return Self::Direct;
        };
        if ext.eq_ignore_ascii_case(FileKind::Jnlp.extension()) {
            Self::Managed
        } else if EXECUTABLE_EXTENSIONS
            .iter()
            .any(|exe| ext.eq_ignore_ascii_case(exe))
        {
            Self::Direct
        } else {
            Self::Opened
        }
    }
}

/// Command that opens `file` with its associated application.
#[must_use]
pub fn open_command(file: &str) -> CommandSpec {
    if cfg!(windows) {
        // The empty argument is the window title `start` would otherwise take from a quoted path.
        CommandSpec::new("cmd").args(["/c", "start", "", file])
    } else if cfg!(target_os = "macos") {
        CommandSpec::new("open").arg(file)
    } else {
        CommandSpec::new("xdg-open").arg(file)
    }
}

/// Command that starts a demo application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    file: PathBuf,
    spec: CommandSpec,
    kind: LaunchKind,
}

impl LaunchCommand {
    /// Build the launch command for `file`.
    ///
    /// `.jnlp` files go through `launcher`, executables run directly and
    /// everything else (zip archives included) goes through [`open_command`].
    #[must_use]
    pub fn for_file(file: &Path, launcher: &str) -> Self {
        let kind = LaunchKind::of(file);
        let file_arg = file.display().to_string();
        let spec = match kind {
            LaunchKind::Managed => CommandSpec::new(launcher).arg(file_arg),
            LaunchKind::Direct => CommandSpec::new(file_arg),
            LaunchKind::Opened => open_command(&file_arg),
        };

        Self {
            file: file.to_path_buf(),
            spec,
            kind,
        }
    }

    /// File being launched
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Command to run
    #[must_use]
    pub const fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// How the file is started
    #[must_use]
    pub const fn kind(&self) -> LaunchKind {
        self.kind
    }

    /// Whether the file goes through the managed launcher
    #[must_use]
    pub const fn is_managed(&self) -> bool {
        matches!(self.kind, LaunchKind::Managed)
    }
}

/// A name- or title-matched process kill issued on teardown.
///
/// These are untargeted: any matching process on the machine is killed, not
/// only the ones a session started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", content = "value", rename_all = "snake_case")]
pub enum KillRule {
    /// Kill processes whose image name equals the value
    ProcessName(String),
    /// Kill processes owning a window with this exact title on Windows; other
    /// platforms match the value against process command lines instead
    WindowTitle(String),
}

impl KillRule {
    /// Rules run after every session by default
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::ProcessName(LAUNCHER_HELPER_PROCESS.to_string()),
            Self::WindowTitle(CONTROL_PANEL_TITLE.to_string()),
        ]
    }

    /// Platform command implementing the rule
    #[must_use]
    pub fn to_command(&self) -> CommandSpec {
        if cfg!(windows) {
            match self {
                Self::ProcessName(name) => CommandSpec::new("cmd").args([
                    "/c".to_string(),
                    "wmic".to_string(),
                    "process".to_string(),
                    "where".to_string(),
                    format!("name='{name}'"),
                    "delete".to_string(),
                ]),
                Self::WindowTitle(title) => CommandSpec::new("taskkill").args([
                    "/FI".to_string(),
                    format!("WINDOWTITLE eq {title}"),
                    "/F".to_string(),
                ]),
            }
        } else {
            match self {
                Self::ProcessName(name) => CommandSpec::new("pkill").arg("-x").arg(name.as_str()),
                Self::WindowTitle(title) => CommandSpec::new("pkill").arg("-f").arg(title.as_str()),
            }
        }
    }
}

impl fmt::Display for KillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessName(name) => write!(f, "process name '{name}'"),
            Self::WindowTitle(title) => write!(f, "window title '{title}'"),
        }
    }
}

/// Run every kill rule, ignoring failures.
pub fn run_kill_rules(runner: &dyn CommandRunner, rules: &[KillRule]) {
    for rule in rules {
        let command = rule.to_command();
        match runner.run(&command) {
            Ok(status) if status.success() => {
                tracing::debug!(%rule, "teardown rule matched");
            }
            Ok(status) => {
                tracing::debug!(%rule, code = ?status.code, "teardown rule matched nothing");
            }
            Err(e) => {
                tracing::debug!(%rule, error = %e, "teardown command failed");
            }
        }
    }
}
