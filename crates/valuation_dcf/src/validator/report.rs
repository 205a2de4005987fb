//! Validation report types.
//!
//! All validator output is advisory data: findings never halt a
//! computation that already completed, and the report is returned for the
//! caller to surface or ignore.

/// Severity of one validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Arithmetic inconsistency; the result should not be trusted
    Error,
    /// Unusual but not necessarily wrong; never blocks validity
    Warning,
    /// Neutral observation recorded for downstream decision-making
    Info,
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Finding {
    /// Severity of this finding
    pub severity: Severity,
    /// Stable machine-readable code, e.g. `ENTERPRISE_VALUE`
    pub code: String,
    /// Human-readable description
    pub message: String,
    /// The value observed in the result, where applicable
    pub observed: Option<f64>,
    /// The recomputed/expected value, where applicable
    pub expected: Option<f64>,
}

impl Finding {
    /// Create an error finding.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning finding.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create an info finding.
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            observed: None,
            expected: None,
        }
    }

    /// Attach the observed and expected values.
    pub fn with_values(mut self, observed: f64, expected: f64) -> Self {
        self.observed = Some(observed);
        self.expected = Some(expected);
        self
    }

    /// Attach an observed value with no expectation.
    pub fn with_observed(mut self, observed: f64) -> Self {
        self.observed = Some(observed);
        self
    }
}

/// Structured output of one validation run.
///
/// `is_valid` is true iff the error list is empty; warnings and info never
/// affect validity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationReport {
    /// True iff no error findings were recorded
    pub is_valid: bool,
    /// Arithmetic inconsistencies
    pub errors: Vec<Finding>,
    /// Unusual observations that do not block validity
    pub warnings: Vec<Finding>,
    /// Neutral observations
    pub info: Vec<Finding>,
}

impl ValidationReport {
    /// Create an empty, valid report.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Record a finding, routing it by severity.
    pub fn record(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => {
                self.is_valid = false;
                self.errors.push(finding);
            }
            Severity::Warning => self.warnings.push(finding),
            Severity::Info => self.info.push(finding),
        }
    }

    /// Whether any finding with the given code was recorded.
    pub fn has_finding(&self, code: &str) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .chain(&self.info)
            .any(|finding| finding.code == code)
    }

    /// Total number of findings across all severities.
    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.info.len()
    }

    /// Whether the report holds no findings at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
