//! Severity tiers per predicted class, confidence filtering and batch-level risk summary.

mod severity;
mod summary;

pub use severity::{Severity, SeverityMap};
pub use summary::{
    filter_by_confidence, Summary, SystemStatus, HIGH_THREAT_FROM, MODERATE_RISK_FROM,
};
