//! Process-wide configuration.
//!
//! One explicit `Config` object is built at startup and passed to the
//! session, the request builders, and the page objects. There is no hidden
//! global: per-call timeout overrides go through [`crate::wait::Waiter`].

use crate::result::{ComprarError, ComprarResult};
use std::time::Duration;

/// Default deadline for "this might take a while" waits (30 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default deadline for "this should already be there" waits (4 seconds)
pub const QUICK_TIMEOUT_MS: u64 = 4_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Which driver backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// In-memory scripted DOM (hermetic tests)
    #[default]
    Sim,
    /// Real browser over the Chrome DevTools Protocol
    Cdp,
}

impl Backend {
    /// Parse a backend name (`sim` / `cdp`)
    pub fn parse(s: &str) -> ComprarResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sim" => Ok(Self::Sim),
            "cdp" => Ok(Self::Cdp),
            other => Err(ComprarError::config(format!(
                "unknown backend {other:?} (expected \"sim\" or \"cdp\")"
            ))),
        }
    }
}

/// Configuration for one test process
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address of the target site, scheme included
    pub base_address: String,
    /// Deadline for long waits
    pub default_timeout: Duration,
    /// Deadline for short waits (elements expected to already be there)
    pub quick_timeout: Duration,
    /// Polling interval for all waits
    pub poll_interval: Duration,
    /// Driver backend selected at startup
    pub backend: Backend,
    /// Run the browser headless
    pub headless: bool,
    /// Chromium binary override (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Environment profile name (`local` / `staging`), informational
    pub profile: String,
}

impl Config {
    /// Create a config for the given base address, with defaults everywhere
    /// else.
    ///
    /// The address may omit the scheme; `https://` is assumed.
    pub fn new(base_address: impl Into<String>) -> ComprarResult<Self> {
        let base_address = normalize_address(base_address.into())?;
        Ok(Self {
            base_address,
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            quick_timeout: Duration::from_millis(QUICK_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            backend: Backend::default(),
            headless: true,
            chromium_path: None,
            profile: "local".to_string(),
        })
    }

    /// Build a config from the environment.
    ///
    /// Reads `ADDRESS` (required), `COMPRAR_BACKEND`, `HEADLESS`,
    /// `CHROMIUM_PATH`, `ENV_TYPE` and `COMPRAR_TIMEOUT_MS`. A missing
    /// `ADDRESS` is a fatal setup error, surfaced here rather than on the
    /// first call.
    pub fn from_env() -> ComprarResult<Self> {
        let address = std::env::var("ADDRESS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ComprarError::config("required env var ADDRESS is not set"))?;

        let mut config = Self::new(address)?;

        if let Ok(backend) = std::env::var("COMPRAR_BACKEND") {
            config.backend = Backend::parse(&backend)?;
        }
        if let Ok(headless) = std::env::var("HEADLESS") {
            config.headless = matches!(
                headless.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            if !path.trim().is_empty() {
                config.chromium_path = Some(path);
            }
        }
        if let Ok(profile) = std::env::var("ENV_TYPE") {
            if !profile.trim().is_empty() {
                config.profile = profile;
            }
        }
        if let Ok(ms) = std::env::var("COMPRAR_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                ComprarError::config(format!("COMPRAR_TIMEOUT_MS is not a number: {ms:?}"))
            })?;
            config.default_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Set the default (long) wait deadline
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set the quick (short) wait deadline
    #[must_use]
    pub const fn with_quick_timeout(mut self, timeout: Duration) -> Self {
        self.quick_timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Select the driver backend
    #[must_use]
    pub const fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Name of the env file this profile points at
    /// (`localconf_<profile>.env`). Loading it is the runner's business.
    #[must_use]
    pub fn profile_file(&self) -> String {
        format!("localconf_{}.env", self.profile)
    }

    /// Absolute URL for a path on the target site
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_address.trim_end_matches('/');
        if path.is_empty() {
            return format!("{base}/");
        }
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Prepend `https://` when the address has no scheme; reject empty input.
fn normalize_address(address: String) -> ComprarResult<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ComprarError::config("base address is empty"));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{trimmed}"))
    }
}
