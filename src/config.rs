//! Manager configuration.
//!
//! Read once from the environment when the process-wide manager is built:
//!
//! - `ISM_SETTLE_MS`: milliseconds to wait between an activation request and
//!   the verifying query (default 0). Some input methods finish switching
//!   asynchronously; a short settle time avoids spurious mismatches.
//!   Clamped to `MAX_SETTLE_TIME`.

use std::time::Duration;

/// Environment variable holding the settle time in milliseconds.
pub const SETTLE_MS_ENV: &str = "ISM_SETTLE_MS";

/// Upper bound on the settle time, so a switch never stalls its caller.
pub const MAX_SETTLE_TIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManagerConfig {
    /// Pause between activation and verification.
    pub settle_time: Duration,
}

impl ManagerConfig {
    pub fn from_env() -> Self {
        Self::from_settle_var(std::env::var(SETTLE_MS_ENV).ok().as_deref())
    }

    fn from_settle_var(value: Option<&str>) -> Self {
        let settle_time = match value.map(str::trim) {
            None | Some("") => Duration::ZERO,
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(e) => {
                    tracing::warn!("ignoring {}={:?}: {}", SETTLE_MS_ENV, raw, e);
                    Duration::ZERO
                }
            },
        };
        Self::default().with_settle_time(settle_time)
    }

    /// Set the settle time, clamped to `MAX_SETTLE_TIME`.
    pub fn with_settle_time(mut self, settle_time: Duration) -> Self {
        if settle_time > MAX_SETTLE_TIME {
            tracing::warn!(
                "settle time {:?} clamped to {:?}",
                settle_time,
                MAX_SETTLE_TIME
            );
        }
        self.settle_time = settle_time.min(MAX_SETTLE_TIME);
        self
    }
}
