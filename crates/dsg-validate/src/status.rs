use std::fmt;

use dsg_model::{Diagnostic, SeverityCounts};
use serde::Serialize;

/// Overall verdict on a checked submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "count", rename_all = "snake_case")]
pub enum CheckStatus {
    Acceptable,
    Warnings(usize),
    Errors(usize),
    Unacceptable,
}

impl CheckStatus {
    /// Any critical diagnostic makes the data unacceptable; otherwise the
    /// most severe level present decides.
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        Self::from_counts(SeverityCounts::from_diagnostics(diagnostics))
    }

    pub fn from_counts(counts: SeverityCounts) -> Self {
        if counts.critical > 0 {
            Self::Unacceptable
        } else if counts.error > 0 {
            Self::Errors(counts.error)
        } else if counts.warning > 0 {
            Self::Warnings(counts.warning)
        } else {
            Self::Acceptable
        }
    }

    pub fn is_acceptable(&self) -> bool {
        matches!(self, Self::Acceptable | Self::Warnings(_))
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acceptable => f.write_str("Acceptable"),
            Self::Warnings(count) => write!(f, "Warnings ({count})"),
            Self::Errors(count) => write!(f, "Errors ({count})"),
            Self::Unacceptable => f.write_str("Unacceptable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsg_model::Severity;

    #[test]
    fn worst_severity_decides() {
        let warning = Diagnostic::new(Severity::Warning, "w");
        let error = Diagnostic::new(Severity::Error, "e");
        let critical = Diagnostic::new(Severity::Critical, "c");

        assert_eq!(CheckStatus::from_diagnostics(&[]), CheckStatus::Acceptable);
        assert_eq!(
            CheckStatus::from_diagnostics(&[warning.clone(), warning.clone()]),
            CheckStatus::Warnings(2)
        );
        assert_eq!(
            CheckStatus::from_diagnostics(&[warning.clone(), error.clone()]),
            CheckStatus::Errors(1)
        );
        assert_eq!(
            CheckStatus::from_diagnostics(&[warning, error, critical]),
            CheckStatus::Unacceptable
        );
    }

    #[test]
    fn display_and_acceptance() {
        assert_eq!(CheckStatus::Errors(3).to_string(), "Errors (3)");
        assert!(CheckStatus::Warnings(1).is_acceptable());
        assert!(!CheckStatus::Errors(1).is_acceptable());
    }
}
