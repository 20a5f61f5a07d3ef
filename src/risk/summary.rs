//! Reducers over (filtered) predictions. Recompute whenever the confidence cutoff changes.

use super::Severity;
use crate::inference::PredictionResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attack share (percent) at which the status leaves `Secure`
pub const MODERATE_RISK_FROM: f64 = 20.0;
/// Attack share (percent) at which the status becomes `HighThreat`
pub const HIGH_THREAT_FROM: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Secure,
    ModerateRisk,
    HighThreat,
}

impl SystemStatus {
    pub fn from_attack_percentage(pct: f64) -> Self {
        if pct >= HIGH_THREAT_FROM {
            SystemStatus::HighThreat
        } else if pct >= MODERATE_RISK_FROM {
            SystemStatus::ModerateRisk
        } else {
            SystemStatus::Secure
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemStatus::Secure => "Secure",
            SystemStatus::ModerateRisk => "Moderate Risk",
            SystemStatus::HighThreat => "High Threat",
        }
    }
}

/// Keep rows whose confidence (percent) is at least `min_pct`; the cutoff is clamped to 0–100.
pub fn filter_by_confidence(results: &[PredictionResult], min_pct: f64) -> Vec<&PredictionResult> {
    let cutoff = if min_pct.is_nan() { 0.0 } else { min_pct.clamp(0.0, 100.0) };
    results
        .iter()
        .filter(|r| r.confidence_pct() >= cutoff)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub normal: usize,
    pub attacks: usize,
    pub critical: usize,
    /// 0 when there are no rows
    pub attack_percentage: f64,
    pub status: SystemStatus,
    pub by_class: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}

impl Summary {
    /// `baseline` lists the classes counted as normal traffic; matching ignores case.
    pub fn from_results<'a, S: AsRef<str>>(
        results: impl IntoIterator<Item = &'a PredictionResult>,
        baseline: &[S],
    ) -> Self {
        let mut s = Summary {
            total: 0,
            normal: 0,
            attacks: 0,
            critical: 0,
            attack_percentage: 0.0,
            status: SystemStatus::Secure,
            by_class: BTreeMap::new(),
            by_severity: BTreeMap::new(),
        };
        for r in results {
            s.total += 1;
            let class = r.class.trim();
            if baseline
                .iter()
                .any(|b| class.eq_ignore_ascii_case(b.as_ref().trim()))
            {
                s.normal += 1;
            } else {
                s.attacks += 1;
            }
            if r.severity == Severity::Critical {
                s.critical += 1;
            }
            *s.by_class.entry(r.class.clone()).or_default() += 1;
            *s.by_severity.entry(r.severity).or_default() += 1;
        }
        s.attack_percentage = if s.total == 0 {
            0.0
        } else {
            100.0 * s.attacks as f64 / s.total as f64
        };
        s.status = SystemStatus::from_attack_percentage(s.attack_percentage);
        s
    }
}
