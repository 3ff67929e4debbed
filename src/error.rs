//! Typed errors for the habit core.
//!
//! Three kinds matter to callers: validation (bad input, detected before
//! any mutation), storage (the date file is unreadable, unwritable, or
//! corrupt), and internal (anything unexpected). The REST layer maps
//! validation to 400 and everything else to 500 — the core itself never
//! produces HTTP semantics.

#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    /// A date string at the API boundary did not parse as `YYYY-MM-DD`.
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// A history range/count that cannot map to real calendar days.
    #[error("invalid history range: {0}")]
    InvalidRange(String),

    /// The backing date file could not be read or written.
    #[error("habit store I/O failure: {0}")]
    Storage(#[from] std::io::Error),

    /// The backing date file contains something that is not a date.
    /// Corruption is rejected on load, never silently dropped.
    #[error("habit store corrupt: bad date '{value}' on line {line}")]
    Corrupt { line: usize, value: String },

    /// Unexpected failure that is neither bad input nor a storage fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HabitError {
    /// True for errors caused by caller input rather than system state.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidDate(_) | Self::InvalidRange(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(HabitError::InvalidDate("2024-13-40".into()).is_validation());
        assert!(HabitError::InvalidRange("count underflows".into()).is_validation());
        assert!(!HabitError::Corrupt { line: 3, value: "x".into() }.is_validation());
        assert!(!HabitError::Internal("boom".into()).is_validation());
    }

    #[test]
    fn test_corrupt_message_names_line() {
        let e = HabitError::Corrupt {
            line: 7,
            value: "not-a-date".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("not-a-date"));
    }
}
