//! Per-overlay configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for a single overlay. Every field has a default, so a partial JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log every placement decision.
    pub debug: bool,
    /// Separation between the anchor and the overlay.
    pub gap: i32,
    /// Margin kept between the overlay and the right edge of the viewport.
    pub edge_margin: i32,
    /// Time between a close and the overlay being taken out of display.
    pub hide_delay_ms: u64,
    /// Quiet period after viewport movement before the overlay is re-placed.
    pub settle_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            gap: 20,
            edge_margin: 15,
            hide_delay_ms: 200,
            settle_delay_ms: 200,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Enable or disable placement logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the anchor gap.
    pub fn with_gap(mut self, gap: i32) -> Self {
        self.gap = gap;
        self
    }

    /// Set the hide delay in milliseconds.
    pub fn with_hide_delay(mut self, ms: u64) -> Self {
        self.hide_delay_ms = ms;
        self
    }

    /// Set the settle delay in milliseconds.
    pub fn with_settle_delay(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// The hide delay as a duration.
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    /// The settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
