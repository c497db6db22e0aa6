//! Harness configuration.
//!
//! Defaults reproduce the stock Windows test bench. A YAML file can override
//! any field, and `JABFIX_FILES_DIR` / `JABFIX_LAUNCHER` override the file on
//! top of that.

use crate::driver::WindowWait;
use crate::launcher::{KillRule, CONTROL_PANEL_TITLE, DEFAULT_LAUNCHER};
use crate::result::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding [`HarnessConfig::files_dir`]
pub const ENV_FILES_DIR: &str = "JABFIX_FILES_DIR";

/// Environment variable overriding [`HarnessConfig::launcher`]
pub const ENV_LAUNCHER: &str = "JABFIX_LAUNCHER";

/// Default download directory
pub const DEFAULT_FILES_DIR: &str = "jnlps";

/// Default Java Control Panel executable
pub const DEFAULT_CONTROL_PANEL_PATH: &str =
    r"C:\Program Files\Java\jdk1.8.0_311\jre\bin\javacpl.exe";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory downloaded demo files are cached in
    pub files_dir: PathBuf,
    /// Managed launcher for `.jnlp` files
    pub launcher: String,
    /// Executable opened by the control panel fixture
    pub control_panel_path: PathBuf,
    /// Window title of the control panel
    pub control_panel_title: String,
    /// Kill rules run after every session
    pub teardown: Vec<KillRule>,
    /// Optional wait for the window after the driver is bound
    pub window_wait: Option<WindowWait>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            files_dir: PathBuf::from(DEFAULT_FILES_DIR),
            launcher: DEFAULT_LAUNCHER.to_string(),
            control_panel_path: PathBuf::from(DEFAULT_CONTROL_PANEL_PATH),
            control_panel_title: CONTROL_PANEL_TITLE.to_string(),
            teardown: KillRule::defaults(),
            window_wait: None,
        }
    }
}

impl HarnessConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from YAML; missing fields keep their defaults
    pub fn from_yaml_str(yaml: &str) -> HarnessResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            HarnessError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> HarnessResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    #[must_use]
    pub fn with_overrides_from<L>(mut self, lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_FILES_DIR).filter(|v| !v.is_empty()) {
            self.files_dir = PathBuf::from(dir);
        }
        if let Some(launcher) = lookup(ENV_LAUNCHER).filter(|v| !v.is_empty()) {
            self.launcher = launcher;
        }
        self
    }

    /// Set download directory
    #[must_use]
    pub fn with_files_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.files_dir = dir.into();
        self
    }

    /// Set managed launcher
    #[must_use]
    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = launcher.into();
        self
    }

    /// Set control panel executable and title
    #[must_use]
    pub fn with_control_panel(mut self, path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        self.control_panel_path = path.into();
        self.control_panel_title = title.into();
        self
    }

    /// Replace the teardown rules
    #[must_use]
    pub fn with_teardown(mut self, rules: Vec<KillRule>) -> Self {
        self.teardown = rules;
        self
    }

    /// Enable the post-bind window wait
    #[must_use]
    pub const fn with_window_wait(mut self, wait: WindowWait) -> Self {
        self.window_wait = Some(wait);
        self
    }

    fn validate(&self) -> HarnessResult<()> {
        if self.launcher.trim().is_empty() {
            return Err(HarnessError::config("launcher must not be empty"));
        }
        if self.files_dir.as_os_str().is_empty() {
            return Err(HarnessError::config("files_dir must not be empty"));
        }
        if let Some(wait) = self.window_wait {
            if wait.poll_interval_ms == 0 {
                return Err(HarnessError::config(
                    "window_wait.poll_interval_ms must be positive",
                ));
            }
        }
        Ok(())
    }
}
