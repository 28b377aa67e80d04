//! Board configuration
//!
//! Values the host glue needs but the co-processor cannot report: the PL
//! clock used to convert cycle counts, the mailbox size, and how long a
//! blocking command may take. Defaults match a stock Pynq-Z2 overlay.

use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable overriding [`BoardConfig::fclk0_mhz`].
pub const ENV_FCLK0_MHZ: &str = "PYNQ_FCLK0_MHZ";
/// Environment variable overriding [`BoardConfig::mailbox_words`].
pub const ENV_MAILBOX_WORDS: &str = "PYNQ_MAILBOX_WORDS";
/// Environment variable overriding [`BoardConfig::command_timeout_ms`].
pub const ENV_COMMAND_TIMEOUT_MS: &str = "PYNQ_COMMAND_TIMEOUT_MS";

/// Board-level settings shared by all drivers
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    /// FCLK0 frequency in MHz, the co-processor's timer clock
    pub fclk0_mhz: f64,

    /// Shared mailbox size in 32-bit words
    pub mailbox_words: usize,

    /// Timeout for a blocking command (ms)
    pub command_timeout_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fclk0_mhz: 100.0,
            mailbox_words: 1024,
            command_timeout_ms: 1000,
        }
    }
}

impl BoardConfig {
    /// Defaults overridden by any `PYNQ_*` variables present
    ///
    /// Unparseable or non-positive values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(mhz) = read_env::<f64>(ENV_FCLK0_MHZ).filter(|v| *v > 0.0) {
            config.fclk0_mhz = mhz;
        }
        if let Some(words) = read_env::<usize>(ENV_MAILBOX_WORDS).filter(|v| *v > 0) {
            config.mailbox_words = words;
        }
        if let Some(ms) = read_env::<u64>(ENV_COMMAND_TIMEOUT_MS).filter(|v| *v > 0) {
            config.command_timeout_ms = ms;
        }

        debug!(?config, "Board configuration");
        config
    }

    /// Set the FCLK0 frequency
    #[must_use]
    pub fn with_fclk0_mhz(mut self, mhz: f64) -> Self {
        self.fclk0_mhz = mhz;
        self
    }

    /// Set the mailbox size
    #[must_use]
    pub fn with_mailbox_words(mut self, words: usize) -> Self {
        self.mailbox_words = words;
        self
    }

    /// Set the command timeout
    #[must_use]
    pub fn with_command_timeout_ms(mut self, ms: u64) -> Self {
        self.command_timeout_ms = ms;
        self
    }

    /// Command timeout as a [`Duration`]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Whole nanoseconds per FCLK0 cycle, truncated
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clock_period_ns(&self) -> u64 {
        (1000.0 / self.fclk0_mhz) as u64
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}
