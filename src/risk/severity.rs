//! Predicted class → triage tier.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    /// Class has no entry in the severity table
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
            Severity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_TIERS: &[(&str, Severity)] = &[
    ("Normal", Severity::Low),
    ("BENIGN", Severity::Low),
    ("PortScan", Severity::Medium),
    ("Probe", Severity::Medium),
    ("BruteForce", Severity::Medium),
    ("DoS", Severity::High),
    ("Bot", Severity::High),
    ("WebAttack", Severity::High),
    ("Attack", Severity::High),
    ("DDoS", Severity::Critical),
    ("Infiltration", Severity::Critical),
    ("Heartbleed", Severity::Critical),
];

/// Class names compare case-insensitively and ignore surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityMap {
    tiers: HashMap<String, Severity>,
}

fn key(class: &str) -> String {
    class.trim().to_ascii_lowercase()
}

impl Default for SeverityMap {
    fn default() -> Self {
        Self::from_entries(DEFAULT_TIERS.iter().map(|(c, s)| (c.to_string(), *s)))
    }
}

impl SeverityMap {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Severity)>) -> Self {
        Self {
            tiers: entries.into_iter().map(|(c, s)| (key(&c), s)).collect(),
        }
    }

    pub fn lookup(&self, class: &str) -> Severity {
        self.tiers.get(&key(class)).copied().unwrap_or(Severity::Unknown)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
