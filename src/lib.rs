//! Sunbucks kiosk library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod capture;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// How the kiosk obtains the customer's mood.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Snap a photo on demand and send it for analysis.
    #[default]
    Capture,
    /// Poll the service for the last emotion it observed.
    Poll,
}
