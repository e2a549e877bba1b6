//! Logger construction
//!
//! Builds a `tracing::Dispatch` per profile without touching the process-wide
//! default subscriber.

use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use super::test_capture::{TestCapture, TestCaptureLayer};

const DEV_FILTER: &str = "recon_core=debug,recon_store=debug,recon_cli=debug";
const PROD_FILTER: &str = "recon_core=info,recon_store=info,recon_cli=info";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Silent; tests that assert on logs use `Logger::capturing`
    Test,
}

/// Explicit logging handle
///
/// Cloning is cheap; clones share the same underlying subscriber.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Build a logger for the given profile
    ///
    /// # Profiles
    ///
    /// - **Development**: Human-readable logs on stderr at debug level
    /// - **Production**: JSON structured logs on stderr at info level
    /// - **Test**: Discards everything
    ///
    /// `RUST_LOG` overrides the default filter of the first two profiles.
    pub fn new(profile: Profile) -> Self {
        let dispatch = match profile {
            Profile::Development => Dispatch::new(
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(env_filter(DEV_FILTER))
                    .finish(),
            ),
            Profile::Production => Dispatch::new(
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(env_filter(PROD_FILTER))
                    .finish(),
            ),
            Profile::Test => Dispatch::none(),
        };
        Self { dispatch }
    }

    /// A logger that drops every event
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// A logger that records every event in memory
    ///
    /// # Example
    ///
    /// ```
    /// use recon_core::logging_facility::Logger;
    /// use recon_core::log_op_start;
    ///
    /// let (logger, capture) = Logger::capturing();
    /// logger.in_scope(|| {
    ///     log_op_start!("my_operation");
    /// });
    /// capture.assert_event_exists("my_operation", "start");
    /// ```
    pub fn capturing() -> (Self, TestCapture) {
        let (layer, capture) = TestCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        (
            Self {
                dispatch: Dispatch::new(subscriber),
            },
            capture,
        )
    }

    /// Run `f` with this logger as the current thread's subscriber
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
