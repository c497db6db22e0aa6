//! jab-fixtures: fixtures for accessibility tests against Swing demo apps
//!
//! Downloads the Java tutorial demo applications, launches one per test,
//! binds an accessibility driver to its window by title and kills the
//! launcher processes when the test ends.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────────────┐   ┌────────────┐
//! │ Catalog  │──►│ Fetcher  │──►│ LaunchedSession  │──►│ test body  │
//! │ (static) │   │ (once)   │   │ launch ─► bind   │   │ (&mut D)   │
//! └──────────┘   └──────────┘   │ drop ─► kill     │   └────────────┘
//!                               └──────────────────┘
//! ```
//!
//! Sessions are single-threaded and blocking. The download directory is not
//! locked, so two harnesses must not share it concurrently.

#![warn(missing_docs)]

mod catalog;
mod config;
mod driver;
mod fetch;
mod fixture;
mod harness;
mod launcher;
/// Structured logging setup
pub mod logging;
mod result;
mod session;

pub use catalog::{
    derive_window_title, file_kind, strip_digits, AppSource, Catalog, CatalogEntry, FileKind,
    OracleApp, BASE_ORACLE_URL, UI_SWING_BASE_URL,
};
pub use config::{
    HarnessConfig, DEFAULT_CONTROL_PANEL_PATH, DEFAULT_FILES_DIR, ENV_FILES_DIR, ENV_LAUNCHER,
};
pub use driver::{
    AccessDriver, DriverFactory, TitleDriverFactory, WindowDriver, WindowWait,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_WINDOW_TIMEOUT_MS,
};
pub use fetch::{FetchReport, Fetcher, HttpTransport, Transport};
pub use fixture::{AppFixture, Fixture, FixtureManager, FixtureScope, FixtureState};
pub use harness::Harness;
pub use launcher::{
    open_command, run_kill_rules, CommandOutput, CommandRunner, CommandSpec, CommandStatus,
    KillRule, LaunchCommand, LaunchKind, SystemRunner, CONTROL_PANEL_TITLE, DEFAULT_LAUNCHER,
    LAUNCHER_HELPER_PROCESS,
};
pub use result::{HarnessError, HarnessResult};
pub use session::{LaunchTarget, LaunchedSession, SessionOptions, SessionState};
