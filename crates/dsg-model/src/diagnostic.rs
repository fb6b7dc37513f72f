use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a data-quality problem.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Returns true for severities that mark a data row as bad.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error | Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which bound a value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundsViolation {
    UnreasonablySmall,
    QuestionablySmall,
    QuestionablyLarge,
    UnreasonablyLarge,
}

impl BoundsViolation {
    pub fn tag(&self) -> &'static str {
        match self {
            BoundsViolation::UnreasonablySmall => "UNREASONABLY_SMALL",
            BoundsViolation::QuestionablySmall => "QUESTIONABLY_SMALL",
            BoundsViolation::QuestionablyLarge => "QUESTIONABLY_LARGE",
            BoundsViolation::UnreasonablyLarge => "UNREASONABLY_LARGE",
        }
    }

    pub fn is_unreasonable(&self) -> bool {
        matches!(
            self,
            BoundsViolation::UnreasonablySmall | BoundsViolation::UnreasonablyLarge
        )
    }
}

/// A data-quality message produced while standardizing or checking data.
///
/// Row and column numbers are 1-based; `None` means the message is not
/// attached to a particular row or column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    /// Short text shared by all messages of the same kind.
    pub general: String,
    /// Text specific to this occurrence.
    pub detailed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<BoundsViolation>,
}

impl Diagnostic {
    /// Creates a message whose detailed text equals the general text.
    pub fn new(severity: Severity, general: impl Into<String>) -> Self {
        let general = general.into();
        Self {
            severity,
            row: None,
            column: None,
            column_name: None,
            detailed: general.clone(),
            general,
            violation: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detailed: impl Into<String>) -> Self {
        self.detailed = detailed.into();
        self
    }

    #[must_use]
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Attach the message to a 1-based column and its user-given name.
    #[must_use]
    pub fn at_column(mut self, column: usize, name: impl Into<String>) -> Self {
        self.column = Some(column);
        self.column_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_violation(mut self, violation: BoundsViolation) -> Self {
        self.violation = Some(violation);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(row) = self.row {
            write!(f, " row {row}")?;
        }
        if let Some(name) = &self.column_name {
            write!(f, " column '{name}'")?;
        }
        write!(f, ": {}", self.detailed)
    }
}

/// Counts of diagnostics by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub error: usize,
    pub warning: usize,
}

impl SeverityCounts {
    pub fn from_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        let mut counts = Self::default();
        for diagnostic in diagnostics {
            match diagnostic.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Error => counts.error += 1,
                Severity::Warning => counts.warning += 1,
            }
        }
        counts
    }

    pub fn has_critical(&self) -> bool {
        self.critical > 0
    }
}
