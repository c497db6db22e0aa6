//! Entry points used by tests.
//!
//! A [`Harness`] owns the catalog, the fetch state and everything a session
//! needs. Catalog files are fetched at most once per harness; the control panel
//! fixture skips the catalog entirely.
//!
//! ```rust,ignore
//! use jab_fixtures::{Harness, HarnessConfig, OracleApp, AccessDriver};
//!
//! let mut harness = Harness::from_config(HarnessConfig::new().with_env_overrides())?;
//! harness.with_oracle_app(OracleApp::Button, |driver| {
//!     assert_eq!(driver.window_title(), "ButtonDemo");
//!     Ok(())
//! })?;
//! ```

use crate::catalog::{Catalog, CatalogEntry, OracleApp};
use crate::config::HarnessConfig;
use crate::driver::{DriverFactory, TitleDriverFactory};
use crate::fetch::{FetchReport, Fetcher, HttpTransport, Transport};
use crate::fixture::AppFixture;
use crate::launcher::{CommandRunner, SystemRunner};
use crate::result::HarnessResult;
use crate::session::{LaunchTarget, LaunchedSession, SessionOptions};
use std::fmt;
use std::sync::Arc;

/// Fixture entry points over one download directory.
pub struct Harness<F: DriverFactory> {
    config: HarnessConfig,
    catalog: Catalog,
    transport: Box<dyn Transport>,
    options: SessionOptions,
    factory: F,
    fetched: Option<FetchReport>,
}

impl<F: DriverFactory> fmt::Debug for Harness<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("config", &self.config)
            .field("fetched", &self.fetched.is_some())
            .finish_non_exhaustive()
    }
}

impl Harness<TitleDriverFactory> {
    /// Harness using HTTP downloads, real processes and [`TitleDriverFactory`].
    ///
    /// # Errors
    ///
    /// Fails if the catalog is malformed or the HTTP client cannot be built.
    pub fn from_config(config: HarnessConfig) -> HarnessResult<Self> {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
        let factory = TitleDriverFactory::new(Arc::clone(&runner));
        Self::new(config, Box::new(HttpTransport::new()?), runner, factory)
    }
}

impl<F: DriverFactory> Harness<F> {
    /// Assemble a harness from its parts.
    ///
    /// # Errors
    ///
    /// Fails if the catalog is malformed.
    pub fn new(
        config: HarnessConfig,
        transport: Box<dyn Transport>,
        runner: Arc<dyn CommandRunner>,
        factory: F,
    ) -> HarnessResult<Self> {
        let catalog = Catalog::load(&config.files_dir)?;
        let options = SessionOptions {
            launcher: config.launcher.clone(),
            teardown: config.teardown.clone(),
            window_wait: config.window_wait,
            runner,
        };
        Ok(Self {
            config,
            catalog,
            transport,
            options,
            factory,
            fetched: None,
        })
    }

    /// Effective configuration
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Resolved catalog
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog entry for `app`
    #[must_use]
    pub fn entry(&self, app: OracleApp) -> &CatalogEntry {
        self.catalog.entry(app)
    }

    /// Fetch missing catalog files, once per harness.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; a failed fetch is retried on the next call.
    pub fn ensure_files(&mut self) -> HarnessResult<&FetchReport> {
        let report = match self.fetched.take() {
            Some(report) => report,
            None => Fetcher::new(self.transport.as_ref())
                .ensure_local_copies(&self.catalog)?,
        };
        let report: &FetchReport = self.fetched.insert(report);
        Ok(report)
    }

    /// Launch a catalog app and bind a driver to its window.
    ///
    /// # Errors
    ///
    /// Returns fetch, launch or bind errors.
    pub fn oracle_app(&mut self, app: OracleApp) -> HarnessResult<LaunchedSession<F::Driver>> {
        self.ensure_files()?;
        let entry = self.catalog.entry(app);
        tracing::debug!(%app, window = %entry.window_title, "oracle app fixture");
        let target = LaunchTarget::new(entry.local_path.clone(), entry.window_title.clone());
        LaunchedSession::acquire(target, &self.options, &self.factory)
    }

    /// Launch the Java Control Panel and bind a driver to it.
    ///
    /// # Errors
    ///
    /// Returns launch or bind errors.
    pub fn java_control_app(&self) -> HarnessResult<LaunchedSession<F::Driver>> {
        LaunchedSession::acquire(self.control_panel_target(), &self.options, &self.factory)
    }

    /// Run `body` against a catalog app; teardown runs before this returns.
    ///
    /// # Errors
    ///
    /// Returns the setup error or the body's error.
    pub fn with_oracle_app<T, B>(&mut self, app: OracleApp, body: B) -> HarnessResult<T>
    where
        B: FnOnce(&mut F::Driver) -> HarnessResult<T>,
    {
        let mut session = self.oracle_app(app)?;
        let result = body(session.driver_mut());
        session.release();
        result
    }

    /// Run `body` against the Java Control Panel; teardown runs before this returns.
    ///
    /// # Errors
    ///
    /// Returns the setup error or the body's error.
    pub fn with_java_control_app<T, B>(&self, body: B) -> HarnessResult<T>
    where
        B: FnOnce(&mut F::Driver) -> HarnessResult<T>,
    {
        let mut session = self.java_control_app()?;
        let result = body(session.driver_mut());
        session.release();
        result
    }

    fn control_panel_target(&self) -> LaunchTarget {
        LaunchTarget::new(
            self.config.control_panel_path.clone(),
            self.config.control_panel_title.clone(),
        )
    }
}

impl<F: DriverFactory + Clone> Harness<F> {
    /// Deferred fixture for a catalog app, for use with a [`crate::FixtureManager`].
    ///
    /// # Errors
    ///
    /// Fetches catalog files first and returns that error.
    pub fn app_fixture(&mut self, app: OracleApp) -> HarnessResult<AppFixture<F>> {
        self.ensure_files()?;
        let entry = self.catalog.entry(app);
        Ok(AppFixture::new(
            app.name(),
            LaunchTarget::new(entry.local_path.clone(), entry.window_title.clone()),
            self.options.clone(),
            self.factory.clone(),
        ))
    }

    /// Deferred fixture for the Java Control Panel.
    #[must_use]
    pub fn control_panel_fixture(&self) -> AppFixture<F> {
        AppFixture::new(
            "JAVA_CONTROL_PANEL",
            self.control_panel_target(),
            self.options.clone(),
            self.factory.clone(),
        )
    }
}
