//! Accessibility driver seam.
//!
//! The harness never looks inside a driver. It constructs one from a window
//! title through a [`DriverFactory`] and hands it to the test body. Locating
//! the window is the driver's job; a driver bound to a title that never
//! appears fails on first use, not on construction.

use crate::launcher::{CommandRunner, CommandSpec};
use crate::result::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default timeout for the optional window wait (30 seconds)
pub const DEFAULT_WINDOW_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval for the optional window wait
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// A driver attached to one top-level window.
pub trait AccessDriver {
    /// Title the driver was bound to
    fn window_title(&self) -> &str;

    /// Whether a window with the bound title currently exists.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Driver`] if the query itself fails.
    fn is_window_present(&self) -> HarnessResult<bool>;
}

/// Builds drivers for a window title.
pub trait DriverFactory {
    /// Driver produced by this factory
    type Driver: AccessDriver;

    /// Bind a driver to `window_title`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Driver`] if construction fails.
    fn bind(&self, window_title: &str) -> HarnessResult<Self::Driver>;
}

/// Driver handle that carries the window title and answers presence queries
/// through the process table (window titles on Windows, command lines
/// elsewhere).
pub struct WindowDriver {
    title: String,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for WindowDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowDriver")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl WindowDriver {
    /// Command that lists processes owning a window titled `title`.
    ///
    /// Off Windows this is `pgrep -f`, which matches process command lines
    /// rather than window titles.
    #[must_use]
    pub fn presence_query(title: &str) -> CommandSpec {
        if cfg!(windows) {
            CommandSpec::new("tasklist")
                .arg("/FI")
                .arg(format!("WINDOWTITLE eq {title}"))
                .arg("/NH")
        } else {
            CommandSpec::new("pgrep").arg("-f").arg(title)
        }
    }
}

impl AccessDriver for WindowDriver {
    fn window_title(&self) -> &str {
        &self.title
    }

    fn is_window_present(&self) -> HarnessResult<bool> {
        let output = self
            .runner
            .capture(&Self::presence_query(&self.title))
            .map_err(|e| HarnessError::driver(&self.title, e.to_string()))?;

        if cfg!(windows) {
            // tasklist exits 0 either way and prints "INFO: No tasks ..." on no match.
            let stdout = output.stdout.trim();
            Ok(output.status.success() && !stdout.is_empty() && !stdout.starts_with("INFO:"))
        } else {
            Ok(output.status.success())
        }
    }
}

/// Factory for [`WindowDriver`].
#[derive(Clone)]
pub struct TitleDriverFactory {
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for TitleDriverFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TitleDriverFactory").finish_non_exhaustive()
    }
}

impl TitleDriverFactory {
    /// Create a factory whose drivers query through `runner`
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl DriverFactory for TitleDriverFactory {
    type Driver = WindowDriver;

    fn bind(&self, window_title: &str) -> HarnessResult<WindowDriver> {
        Ok(WindowDriver {
            title: window_title.to_string(),
            runner: Arc::clone(&self.runner),
        })
    }
}

/// Wait for the bound window to appear before handing the driver out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowWait {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WindowWait {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WINDOW_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WindowWait {
    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Poll `driver` until its window is present.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Timeout`] if the window never appears, or the
    /// driver's own error if a query fails.
    pub fn wait_for<D: AccessDriver + ?Sized>(&self, driver: &D) -> HarnessResult<Duration> {
        let start = Instant::now();
        let timeout = Duration::from_millis(self.timeout_ms);
        let poll_interval = Duration::from_millis(self.poll_interval_ms);

        loop {
            if driver.is_window_present()? {
                return Ok(start.elapsed());
            }
            if start.elapsed() >= timeout {
                return Err(HarnessError::Timeout {
                    ms: self.timeout_ms,
                });
            }
            std::thread::sleep(poll_interval);
        }
    }
}
