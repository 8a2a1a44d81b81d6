//! Account and polling configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::tracker::{BoundaryMode, ClockZone};

/// Reference polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// One tracked account, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Tracked user identifier. Sent to the API as `vmid`.
    #[serde(alias = "vmid")]
    id: String,
    /// Display label for the exposed metric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl AccountConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            name: None,
        }
    }

    /// Set the display label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse and validate an account from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut account: Self = serde_json::from_str(json)
            .map_err(|e| TrackerError::configuration(format!("invalid account: {e}")))?;
        account.id = account.id.trim().to_string();
        account.validate()?;
        Ok(account)
    }

    /// Check that the account can be polled.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(TrackerError::configuration("account id must not be empty"));
        }
        if self.id.chars().any(char::is_whitespace) {
            return Err(TrackerError::configuration(format!(
                "account id '{}' must not contain whitespace",
                self.id
            )));
        }
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The configured label, or one derived from the id.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Bilibili Fans {}", self.id),
        }
    }

    /// Stable identifier of the exposed metric.
    pub fn unique_id(&self) -> String {
        format!("bilibili_fans_{}", self.id)
    }
}

/// Tracking behavior shared by all coordinators.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    poll_interval: Duration,
    boundary_mode: BoundaryMode,
    clock_zone: ClockZone,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            boundary_mode: BoundaryMode::Legacy,
            clock_zone: ClockZone::Local,
        }
    }
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interval between scheduled polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set how month boundaries are detected.
    pub fn with_boundary_mode(mut self, mode: BoundaryMode) -> Self {
        self.boundary_mode = mode;
        self
    }

    /// Set which calendar the system clock reports.
    pub fn with_clock_zone(mut self, zone: ClockZone) -> Self {
        self.clock_zone = zone;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(TrackerError::configuration(
                "poll interval must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary_mode
    }

    pub fn clock_zone(&self) -> ClockZone {
        self.clock_zone
    }
}
