/// Default ship speed above which a warning is reported.
pub const DEFAULT_SPEED_WARNING_KNOTS: f64 = 20.0;

/// Default ship speed above which an error is reported.
pub const DEFAULT_SPEED_ERROR_KNOTS: f64 = 50.0;

/// Options for building and checking a standardization array.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizeOptions {
    /// Row numbers reported in diagnostics; defaults to `1..=N`.
    pub row_numbers: Option<Vec<usize>>,
    /// Automatic QC flags carried over from an earlier pass.
    pub autocheck_flags: Option<Vec<char>>,
    pub speed_warning_knots: f64,
    pub speed_error_knots: f64,
}

impl Default for StandardizeOptions {
    fn default() -> Self {
        Self {
            row_numbers: None,
            autocheck_flags: None,
            speed_warning_knots: DEFAULT_SPEED_WARNING_KNOTS,
            speed_error_knots: DEFAULT_SPEED_ERROR_KNOTS,
        }
    }
}

impl StandardizeOptions {
    #[must_use]
    pub fn with_row_numbers(mut self, row_numbers: Vec<usize>) -> Self {
        self.row_numbers = Some(row_numbers);
        self
    }

    #[must_use]
    pub fn with_autocheck_flags(mut self, flags: Vec<char>) -> Self {
        self.autocheck_flags = Some(flags);
        self
    }

    #[must_use]
    pub fn with_speed_limits(mut self, warning_knots: f64, error_knots: f64) -> Self {
        self.speed_warning_knots = warning_knots;
        self.speed_error_knots = error_knots;
        self
    }
}
