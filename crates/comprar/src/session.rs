//! One browser session: a boxed driver plus the process configuration.
//!
//! A session drives one sequential test script; parallelism happens across
//! sessions, never inside one. The two default-timeout waiters reflect the
//! two tunings a wait can want: [`Session::waiter`] for "this might take a
//! while" and [`Session::quick`] for "this should already be there".

use crate::config::{Backend, Config};
use crate::driver::PageDriver;
use crate::result::{ComprarError, ComprarResult};
use crate::sim::SimDriver;
use crate::wait::{WaitOptions, Waiter};
use std::path::PathBuf;
use std::time::Duration;

/// A single browser session
pub struct Session {
    driver: Box<dyn PageDriver>,
    config: Config,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap an already-constructed driver
    #[must_use]
    pub fn new(driver: Box<dyn PageDriver>, config: Config) -> Self {
        Self { driver, config }
    }

    /// Select and launch the configured backend.
    ///
    /// `Backend::Cdp` requires the `browser` feature; without it the
    /// selection is a configuration error.
    pub fn connect(config: Config) -> ComprarResult<Self> {
        let driver: Box<dyn PageDriver> = match config.backend {
            Backend::Sim => Box::new(SimDriver::new()),
            #[cfg(feature = "browser")]
            Backend::Cdp => Box::new(crate::cdp::CdpDriver::launch(&config)?),
            #[cfg(not(feature = "browser"))]
            Backend::Cdp => {
                return Err(ComprarError::config(
                    "cdp backend requires the `browser` feature",
                ))
            }
        };
        Ok(Self::new(driver, config))
    }

    /// The configuration this session was built with
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn PageDriver {
        self.driver.as_ref()
    }

    /// Waiter with the long default deadline
    #[must_use]
    pub fn waiter(&self) -> Waiter<'_> {
        let options = WaitOptions::new()
            .with_timeout(self.config.default_timeout)
            .with_poll_interval(self.config.poll_interval);
        Waiter::new(self.driver.as_ref(), &options)
    }

    /// Waiter with the short default deadline
    #[must_use]
    pub fn quick(&self) -> Waiter<'_> {
        let options = WaitOptions::new()
            .with_timeout(self.config.quick_timeout)
            .with_poll_interval(self.config.poll_interval);
        Waiter::new(self.driver.as_ref(), &options)
    }

    /// Waiter with an explicit deadline
    #[must_use]
    pub fn wait_with(&self, timeout: Duration) -> Waiter<'_> {
        self.waiter().with_timeout(timeout)
    }

    /// Navigate to an absolute URL
    pub fn goto(&self, url: &str) -> ComprarResult<()> {
        tracing::info!(url, "navigate");
        self.driver.navigate(url)
    }

    /// Navigate to a path under the configured base address
    pub fn goto_path(&self, path: &str) -> ComprarResult<()> {
        self.goto(&self.config.url_for(path))
    }

    /// Navigate to the base address
    pub fn goto_base(&self) -> ComprarResult<()> {
        self.goto_path("")
    }

    /// Reload the current page
    pub fn refresh(&self) -> ComprarResult<()> {
        self.driver.refresh()
    }

    /// Current page URL
    pub fn current_url(&self) -> ComprarResult<String> {
        self.driver.current_url()
    }

    /// Current page title
    pub fn title(&self) -> ComprarResult<String> {
        self.driver.title()
    }

    /// Whether the first match is currently displayed; `false` when absent.
    ///
    /// A point-in-time check, no waiting involved.
    pub fn is_displayed(&self, locator: &crate::locator::Locator) -> ComprarResult<bool> {
        match self.driver.find_all(locator)?.into_iter().next() {
            Some(el) => self.driver.is_visible(&el),
            None => Ok(false),
        }
    }

    /// Save a screenshot under `tests/artifacts/` with a timestamp and an
    /// optional name suffix; returns the written path.
    pub fn save_screenshot(&self, name: &str) -> ComprarResult<PathBuf> {
        let data = self.driver.screenshot()?;
        let ts = chrono::Local::now().format("%H%M%S_%d_%m_%Y");
        let suffix = if name.is_empty() {
            String::new()
        } else {
            format!("_{name}")
        };
        let dir = PathBuf::from("tests").join("artifacts");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("test_{ts}{suffix}.png"));
        std::fs::write(&path, data)?;
        tracing::info!(path = %path.display(), "screenshot saved");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use crate::sim::SimNode;

    fn test_config() -> Config {
        Config::new("https://shop.test")
            .unwrap()
            .with_default_timeout(Duration::from_millis(200))
            .with_quick_timeout(Duration::from_millis(50))
            .with_poll_interval(Duration::from_millis(10))
    }

    fn sim_session() -> (Session, crate::sim::SimHandle) {
        let driver = SimDriver::new();
        let handle = driver.handle();
        (Session::new(Box::new(driver), test_config()), handle)
    }

    #[test]
    fn test_goto_path_builds_absolute_url() {
        let (session, _) = sim_session();
        session.goto_path("/login").unwrap();
        assert_eq!(session.current_url().unwrap(), "https://shop.test/login");
        session.goto_base().unwrap();
        assert_eq!(session.current_url().unwrap(), "https://shop.test/");
    }

    #[test]
    fn test_connect_selects_sim_backend() {
        let session = Session::connect(test_config()).unwrap();
        session.goto_base().unwrap();
        assert_eq!(session.current_url().unwrap(), "https://shop.test/");
    }

    #[cfg(not(feature = "browser"))]
    #[test]
    fn test_connect_cdp_without_feature_is_config_error() {
        let config = test_config().with_backend(Backend::Cdp);
        assert!(matches!(
            Session::connect(config),
            Err(ComprarError::Config { .. })
        ));
    }

    #[test]
    fn test_waiter_tiers_use_distinct_defaults() {
        let (session, handle) = sim_session();
        let _ = handle.dom().insert(SimNode::new([".slow"]).hidden());

        // Quick tier gives up before the long tier would.
        let start = std::time::Instant::now();
        assert!(session.quick().visible(&Locator::css(".slow")).is_err());
        let quick_elapsed = start.elapsed();
        assert!(quick_elapsed < Duration::from_millis(150));
    }

    #[test]
    fn test_per_call_override_wins() {
        let (session, _) = sim_session();
        let err = session
            .wait_with(Duration::from_millis(30))
            .present(&Locator::css(".never"))
            .unwrap_err();
        match err {
            ComprarError::Timeout { ms, .. } => assert_eq!(ms, 30),
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_screenshot_writes_artifact() {
        let (session, _) = sim_session();
        let cwd = std::env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();
        let path = session.save_screenshot("after_login").unwrap();
        assert!(path.exists());
        assert!(path.to_string_lossy().contains("after_login"));
        std::env::set_current_dir(cwd).unwrap();
    }
}
