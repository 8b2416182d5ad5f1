//! Logging initialization

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Logging profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable, warnings and errors only
    Human,
    /// Human-readable with debug detail (`--verbose`)
    Verbose,
    /// JSON lines at info level, for CI log collectors
    Json,
    /// No output; tests install their own capture layer
    Test,
}

impl Profile {
    /// Pick a profile from the two CLI switches
    pub fn select(verbose: bool, json: bool) -> Self {
        match (json, verbose) {
            (true, _) => Profile::Json,
            (false, true) => Profile::Verbose,
            (false, false) => Profile::Human,
        }
    }

    fn default_directive(&self) -> &'static str {
        match self {
            Profile::Human => "keva=warn",
            Profile::Verbose => "keva=debug",
            Profile::Json => "keva=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call installs a subscriber, and only if no other global
/// subscriber exists. `RUST_LOG`, when set, replaces
/// the profile's default filter.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));

        match profile {
            Profile::Human => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time()
                    .with_env_filter(filter)
                    .try_init()
                    .ok();
            }
            Profile::Verbose => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .try_init()
                    .ok();
            }
            Profile::Json => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(filter)
                    .try_init()
                    .ok();
            }
            // Capture is installed separately by `init_test_capture`
            Profile::Test => {}
        }
    });
}
