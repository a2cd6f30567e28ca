//! Core domain models for naming violations and analysis results
//!
//! Architecture: Rich Domain Models - Violations are entities with behavior, not just data
//! - Violations carry their rule code, position, and formatted message
//! - AnalysisReport acts as an aggregate root managing collections of violations
//! - Reports are deterministic: re-running a rule set over an unchanged token
//!   stream produces an identical violation set

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity levels for naming violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages and suggestions
    Info,
    /// Warnings that should be addressed but don't block builds
    Warning,
    /// Errors that block commits and fail CI/CD builds
    Error,
}

impl Severity {
    /// Whether this severity level should cause analysis to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A naming-convention violation detected during analysis
///
/// Write-once: built by a rule, optionally annotated with the source file by
/// the analyzer, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Stable code identifying the kind of violation (e.g. `WrongClassName`)
    pub code: String,
    /// Severity level of this violation
    pub severity: Severity,
    /// Source file the token stream was produced from, when known
    pub file_path: Option<PathBuf>,
    /// Index of the offending token in the stream
    pub token_index: usize,
    /// Line number (1-indexed) of the offending token
    pub line: u32,
    /// Column number (1-indexed) of the offending token
    pub column: u32,
    /// Human-readable description of the violation
    pub message: String,
}

impl Violation {
    /// Create a new violation at a token position
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        token_index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            file_path: None,
            token_index,
            line: 0,
            column: 0,
            message: message.into(),
        }
    }

    /// Set line and column position
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Attach the source file the stream was tokenized from
    pub fn with_file(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    /// Whether this violation is blocking (prevents commits/builds)
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Format violation for display
    pub fn format_display(&self) -> String {
        let file = self
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stream>".to_string());

        format!(
            "{}:{}:{} [{}] {} ({})",
            file,
            self.line,
            self.column,
            self.severity.as_str(),
            self.message,
            self.code
        )
    }
}

/// Summary statistics for an analysis report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of token streams analyzed
    pub total_streams: usize,
    /// Total number of tokens walked
    pub total_tokens: usize,
    /// Number of violations by severity level
    pub violations_by_severity: ViolationCounts,
}

/// Count of violations by severity level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl ViolationCounts {
    /// Total number of violations across all severities
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    /// Whether there are any blocking violations
    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    /// Add a violation to the counts
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Complete analysis report containing all violations and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// All violations found during analysis
    pub violations: Vec<Violation>,
    /// Summary statistics
    pub summary: ReportSummary,
}

impl AnalysisReport {
    /// Create a new empty analysis report
    pub fn new() -> Self {
        Self { violations: Vec::new(), summary: ReportSummary::default() }
    }

    /// Add a violation to the report
    pub fn add_violation(&mut self, violation: Violation) {
        self.summary.violations_by_severity.add(violation.severity);
        self.violations.push(violation);
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Whether the report contains blocking violations (errors)
    pub fn has_errors(&self) -> bool {
        self.summary.violations_by_severity.has_blocking()
    }

    /// Get violations of a specific severity
    pub fn violations_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }

    /// Set the number of streams analyzed
    pub fn set_streams_analyzed(&mut self, count: usize) {
        self.summary.total_streams = count;
    }

    /// Record how many tokens were walked
    pub fn add_tokens_walked(&mut self, count: usize) {
        self.summary.total_tokens += count;
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: AnalysisReport) {
        for violation in other.violations {
            self.add_violation(violation);
        }
        self.summary.total_streams += other.summary.total_streams;
        self.summary.total_tokens += other.summary.total_tokens;
    }

    /// Sort violations by file path and position for consistent output
    pub fn sort_violations(&mut self) {
        self.violations.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.token_index.cmp(&b.token_index))
                .then_with(|| a.code.cmp(&b.code))
        });
    }
}

impl Default for AnalysisReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur during analysis
#[derive(Debug, thiserror::Error)]
pub enum NameguardError {
    /// Configuration file could not be loaded or parsed, or the policy is invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Token dump could not be parsed
    #[error("Token dump error in {file}: {message}")]
    Dump { file: String, message: String },

    /// Analysis failed for a specific stream
    #[error("Analysis error in {file}: {message}")]
    Analysis { file: String, message: String },

    /// Report formatting failed
    #[error("Report error: {message}")]
    Report { message: String },
}

impl NameguardError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a token-dump error
    pub fn dump(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dump { file: file.into(), message: message.into() }
    }

    /// Create an analysis error
    pub fn analysis(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis { file: file.into(), message: message.into() }
    }

    /// Create a report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report { message: message.into() }
    }
}

/// Result type for Nameguard operations
pub type NameguardResult<T> = Result<T, NameguardError>;
