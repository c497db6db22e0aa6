//! Launched application sessions.
//!
//! A [`LaunchedSession`] owns one launch of a demo application and the driver
//! bound to its window. Teardown runs exactly once, when the session is
//! released or dropped, whether or not the launch got as far as binding.

use crate::driver::{AccessDriver, DriverFactory, WindowWait};
use crate::launcher::{run_kill_rules, CommandRunner, KillRule, LaunchCommand};
use crate::result::HarnessResult;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lifecycle of a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    /// Session exists, nothing started yet
    Created,
    /// Launch command is running
    Launching,
    /// Driver bound to the window title
    Bound,
    /// Kill rules are running
    TearingDown,
    /// Teardown finished
    Done,
}

/// What to launch and which window to expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    /// File or executable to start
    pub file: PathBuf,
    /// Expected window title
    pub window_title: String,
}

impl LaunchTarget {
    /// Create a target
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, window_title: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            window_title: window_title.into(),
        }
    }
}

/// Settings shared by every session a harness starts.
#[derive(Clone)]
pub struct SessionOptions {
    /// Managed launcher for `.jnlp` files
    pub launcher: String,
    /// Rules run on teardown
    pub teardown: Vec<KillRule>,
    /// Optional wait for the window after binding
    pub window_wait: Option<WindowWait>,
    /// Runner for launch and teardown commands
    pub runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("launcher", &self.launcher)
            .field("teardown", &self.teardown)
            .field("window_wait", &self.window_wait)
            .finish_non_exhaustive()
    }
}

/// One launched application with its bound driver.
pub struct LaunchedSession<D: AccessDriver> {
    target: LaunchTarget,
    driver: Option<D>,
    state: SessionState,
    teardown: Vec<KillRule>,
    runner: Arc<dyn CommandRunner>,
}

impl<D: AccessDriver> fmt::Debug for LaunchedSession<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchedSession")
            .field("target", &self.target)
            .field("state", &self.state)
            .field("bound", &self.driver.is_some())
            .finish()
    }
}

impl<D: AccessDriver> LaunchedSession<D> {
    /// Launch `target`, wait for the launch command to exit, then bind a driver.
    ///
    /// The wait covers the launch command only. With a managed launcher that
    /// command usually exits before the application window exists; set
    /// [`SessionOptions::window_wait`] to poll for the window afterwards.
    ///
    /// # Errors
    ///
    /// Returns the launch, bind or wait error. Teardown has already run by the
    /// time the error is returned.
    pub fn acquire<F>(
        target: LaunchTarget,
        options: &SessionOptions,
        factory: &F,
    ) -> HarnessResult<Self>
    where
        F: DriverFactory<Driver = D>,
    {
        // Constructed first so that Drop covers every failure below.
        let mut session = Self {
            target,
            driver: None,
            state: SessionState::Created,
            teardown: options.teardown.clone(),
            runner: Arc::clone(&options.runner),
        };

        session.state = SessionState::Launching;
        let command = LaunchCommand::for_file(&session.target.file, &options.launcher);
        tracing::info!(
            command = %command.spec(),
            kind = ?command.kind(),
            "launching"
        );
        let status = session.runner.run(command.spec())?;
        if !status.success() {
            tracing::warn!(code = ?status.code, command = %command.spec(), "launch command exited with failure");
        }

        let driver = factory.bind(&session.target.window_title)?;
        if let Some(wait) = options.window_wait {
            let waited = wait.wait_for(&driver)?;
            tracing::debug!(waited_ms = waited.as_millis(), "window present");
        }
        tracing::info!(window = %session.target.window_title, "driver bound");
        session.driver = Some(driver);
        session.state = SessionState::Bound;

        Ok(session)
    }

    /// Bound driver
    #[must_use]
    pub fn driver(&self) -> &D {
        self.driver
            .as_ref()
            .expect("acquire only returns bound sessions")
    }

    /// Bound driver, mutably
    #[must_use]
    pub fn driver_mut(&mut self) -> &mut D {
        self.driver
            .as_mut()
            .expect("acquire only returns bound sessions")
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Launched file
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.target.file
    }

    /// Expected window title
    #[must_use]
    pub fn window_title(&self) -> &str {
        &self.target.window_title
    }

    /// Tear down now instead of on drop.
    pub fn release(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.state >= SessionState::TearingDown {
            return;
        }
        self.state = SessionState::TearingDown;
        drop(self.driver.take());
        tracing::debug!(window = %self.target.window_title, "tearing down");
        run_kill_rules(self.runner.as_ref(), &self.teardown);
        self.state = SessionState::Done;
    }
}

impl<D: AccessDriver> Drop for LaunchedSession<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
