//! Fixture lifecycle management.
//!
//! [`Fixture`] is the setup/teardown contract; [`AppFixture`] implements it for
//! one launched demo application. A [`FixtureManager`] sets fixtures up in
//! priority order and tears them down in reverse, and [`FixtureScope`] does the
//! teardown on drop.

use crate::driver::DriverFactory;
use crate::result::{HarnessError, HarnessResult};
use crate::session::{LaunchTarget, LaunchedSession, SessionOptions};
use std::fmt;

/// Trait for test fixtures that can be set up and torn down.
pub trait Fixture {
    /// Set up the fixture before test execution.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture setup fails.
    fn setup(&mut self) -> HarnessResult<()>;

    /// Tear down the fixture after test execution.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture teardown fails.
    fn teardown(&mut self) -> HarnessResult<()>;

    /// Get the fixture name for logging/debugging.
    fn name(&self) -> &str;

    /// Get fixture priority (higher = set up first, tear down last).
    fn priority(&self) -> i32 {
        0
    }
}

/// State of a fixture in the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    /// Fixture is registered but not set up.
    Registered,
    /// Fixture has been set up successfully.
    SetUp,
    /// Fixture has been torn down.
    TornDown,
    /// Fixture setup failed.
    Failed,
}

/// A demo application launched for the duration of a fixture.
pub struct AppFixture<F: DriverFactory> {
    name: String,
    target: LaunchTarget,
    options: SessionOptions,
    factory: F,
    session: Option<LaunchedSession<F::Driver>>,
}

impl<F: DriverFactory> fmt::Debug for AppFixture<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppFixture")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("active", &self.session.is_some())
            .finish()
    }
}

impl<F: DriverFactory> AppFixture<F> {
    /// Create a fixture; nothing is launched until [`Fixture::setup`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        target: LaunchTarget,
        options: SessionOptions,
        factory: F,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            options,
            factory,
            session: None,
        }
    }

    /// Live session, if set up
    #[must_use]
    pub const fn session(&self) -> Option<&LaunchedSession<F::Driver>> {
        self.session.as_ref()
    }

    /// Bound driver, if set up
    #[must_use]
    pub fn driver(&self) -> Option<&F::Driver> {
        self.session.as_ref().map(LaunchedSession::driver)
    }
}

impl<F: DriverFactory> Fixture for AppFixture<F> {
    fn setup(&mut self) -> HarnessResult<()> {
        if self.session.is_some() {
            return Ok(());
        }
        let session = LaunchedSession::acquire(self.target.clone(), &self.options, &self.factory)?;
        self.session = Some(session);
        Ok(())
    }

    fn teardown(&mut self) -> HarnessResult<()> {
        if let Some(session) = self.session.take() {
            session.release();
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct FixtureEntry {
    fixture: Box<dyn Fixture>,
    state: FixtureState,
}

/// Manager for test fixtures with priority-ordered setup/teardown.
#[derive(Default)]
pub struct FixtureManager {
    fixtures: Vec<FixtureEntry>,
    setup_order: Vec<usize>,
}

impl fmt::Debug for FixtureManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureManager")
            .field("fixture_count", &self.fixtures.len())
            .field("setup_order", &self.setup_order.len())
            .finish()
    }
}

impl FixtureManager {
    /// Create a new fixture manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixture. Names must be unique.
    pub fn register<T: Fixture + 'static>(&mut self, fixture: T) -> HarnessResult<()> {
        if self.index_of(fixture.name()).is_some() {
            return Err(HarnessError::FixtureError {
                message: format!("Fixture '{}' already registered", fixture.name()),
            });
        }
        self.fixtures.push(FixtureEntry {
            fixture: Box::new(fixture),
            state: FixtureState::Registered,
        });
        Ok(())
    }

    /// Get the number of registered fixtures.
    #[must_use]
    pub fn count(&self) -> usize {
        self.fixtures.len()
    }

    /// Get the state of a fixture by name.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<FixtureState> {
        self.index_of(name).map(|i| self.fixtures[i].state)
    }

    /// List all registered fixture names.
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.fixtures.iter().map(|e| e.fixture.name()).collect()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fixtures.iter().position(|e| e.fixture.name() == name)
    }

    /// Set up all registered fixtures in priority order (highest first).
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture setup fails. Previously set up
    /// fixtures are torn down before returning the error.
    pub fn setup_all(&mut self) -> HarnessResult<()> {
        let mut ordered: Vec<usize> = (0..self.fixtures.len()).collect();
        // Stable sort keeps registration order among equal priorities.
        ordered.sort_by_key(|i| std::cmp::Reverse(self.fixtures[*i].fixture.priority()));

        self.setup_order.clear();

        for index in ordered {
            let entry = &mut self.fixtures[index];
            if !matches!(entry.state, FixtureState::Registered | FixtureState::TornDown) {
                continue;
            }
            if let Err(e) = entry.fixture.setup() {
                entry.state = FixtureState::Failed;
                let message = format!("Fixture '{}' setup failed: {e}", entry.fixture.name());
                tracing::warn!(%message, "fixture setup failed");
                // Setup error takes precedence over teardown errors.
                let _ = self.teardown_all();
                return Err(HarnessError::FixtureError { message });
            }
            entry.state = FixtureState::SetUp;
            self.setup_order.push(index);
        }

        Ok(())
    }

    /// Tear down all fixtures in reverse setup order.
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture teardown fails. Other fixtures
    /// will still be torn down, but the first error is returned.
    pub fn teardown_all(&mut self) -> HarnessResult<()> {
        let mut first_error: Option<HarnessError> = None;

        for index in self.setup_order.drain(..).rev() {
            let entry = &mut self.fixtures[index];
            if entry.state != FixtureState::SetUp {
                continue;
            }
            match entry.fixture.teardown() {
                Ok(()) => entry.state = FixtureState::TornDown,
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(HarnessError::FixtureError {
                            message: format!(
                                "Fixture '{}' teardown failed: {e}",
                                entry.fixture.name()
                            ),
                        });
                    }
                    entry.state = FixtureState::Failed;
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

/// A fixture scope for automatic teardown using RAII.
pub struct FixtureScope {
    manager: FixtureManager,
}

impl FixtureScope {
    /// Set up every fixture in `manager` and take ownership of it.
    ///
    /// # Errors
    ///
    /// Returns the setup error; already set up fixtures are torn down first.
    pub fn enter(mut manager: FixtureManager) -> HarnessResult<Self> {
        manager.setup_all()?;
        Ok(Self { manager })
    }

    /// Access the managed fixtures
    #[must_use]
    pub const fn manager(&self) -> &FixtureManager {
        &self.manager
    }
}

impl Drop for FixtureScope {
    fn drop(&mut self) {
        // Best effort teardown - ignore errors during drop
        let _ = self.manager.teardown_all();
    }
}

impl fmt::Debug for FixtureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureScope")
            .field("manager", &self.manager)
            .finish()
    }
}
