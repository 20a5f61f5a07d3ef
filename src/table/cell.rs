//! Cell classification for raw CSV values.

/// Tokens read as missing in addition to empty strings and non-finite numbers.
const NA_TOKENS: &[&str] = &["na", "n/a", "#n/a", "null", "none", "-nan", "nan"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Empty, NA-like, NaN or ±inf
    Missing,
    Number(f64),
    /// Anything that is present but not a number
    Text,
}

impl Cell {
    pub fn parse(raw: &str) -> Cell {
        let s = raw.trim();
        if s.is_empty() || NA_TOKENS.iter().any(|t| s.eq_ignore_ascii_case(t)) {
            return Cell::Missing;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            Ok(_) => Cell::Missing,
            Err(_) => Cell::Text,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match *self {
            Cell::Number(v) => Some(v),
            _ => None,
        }
    }
}
