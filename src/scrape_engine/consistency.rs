//! Rendered-vs-embedded count validation
//!
//! Pure classification of the disagreement between the number of listing
//! cards on screen and the number of listings in the embedded state. No I/O;
//! the same inputs always produce the same verdict.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How far apart the two counts are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Within tolerance
    Consistent,
    /// Beyond tolerance but the payload is substantial; accepted with a warning
    MinorDrift,
    /// Payload far short of a non-trivial rendered count; triggers recovery
    CriticalMismatch,
}

impl Severity {
    #[must_use]
    pub fn is_acceptable(self) -> bool {
        !matches!(self, Self::CriticalMismatch)
    }
}

/// Outcome of comparing rendered and payload counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub dom_count: usize,
    pub payload_count: usize,
    pub severity: Severity,
}

impl ValidationVerdict {
    #[must_use]
    pub fn drift(&self) -> usize {
        self.dom_count.abs_diff(self.payload_count)
    }
}

/// Thresholds separating the three severities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationThresholds {
    /// Largest drift still considered consistent
    pub tolerance: usize,
    /// Rendered count below which a mismatch is never critical
    pub critical_min_dom: usize,
    /// Payload below `dom_count * critical_ratio` is critical
    pub critical_ratio: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            tolerance: 2,
            critical_min_dom: 5,
            critical_ratio: 0.5,
        }
    }
}

impl ValidationThresholds {
    /// Check the thresholds are usable
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when `critical_ratio` is outside
    /// `(0, 1]` or not finite.
    pub fn check(&self) -> Result<(), String> {
        if !self.critical_ratio.is_finite() || self.critical_ratio <= 0.0 || self.critical_ratio > 1.0 {
            return Err(format!(
                "critical_ratio must be in (0, 1], got {}",
                self.critical_ratio
            ));
        }
        Ok(())
    }
}

/// Classify a (rendered, payload) count pair
#[must_use]
pub fn validate_counts(
    dom_count: usize,
    payload_count: usize,
    thresholds: &ValidationThresholds,
) -> ValidationVerdict {
    let drift = dom_count.abs_diff(payload_count);

    let severity = if drift <= thresholds.tolerance {
        Severity::Consistent
    } else if dom_count >= thresholds.critical_min_dom
        && (payload_count as f64) < dom_count as f64 * thresholds.critical_ratio
    {
        Severity::CriticalMismatch
    } else {
        Severity::MinorDrift
    };

    match severity {
        Severity::Consistent => {
            debug!("Counts consistent: rendered={dom_count} payload={payload_count}");
        }
        Severity::MinorDrift => {
            warn!("Minor drift: rendered={dom_count} payload={payload_count} (drift {drift})");
        }
        Severity::CriticalMismatch => {
            warn!("Critical mismatch: rendered={dom_count} payload={payload_count}");
        }
    }

    ValidationVerdict {
        dom_count,
        payload_count,
        severity,
    }
}
