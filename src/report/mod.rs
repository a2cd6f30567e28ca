//! Report generation with multiple output formats
//!
//! Architecture: Anti-Corruption Layer - formatters translate domain objects to external formats
//! - AnalysisReport (domain) is converted to various external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - Domain logic remains pure while supporting multiple presentation needs

use crate::domain::violations::{
    AnalysisReport, NameguardError, NameguardResult, Severity, Violation,
};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Supported output formats for analysis reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// GitHub Actions format for workflow integration
    GitHub,
}

impl OutputFormat {
    /// Parse format from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "github" => Some(Self::GitHub),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "github"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Maximum number of violations to include
    pub max_violations: Option<usize>,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, max_violations: None, min_severity: None }
    }
}

/// Main report formatter that dispatches to specific formatters
pub struct ReportFormatter {
    options: ReportOptions,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format an analysis report in the specified format
    pub fn format_report(
        &self,
        report: &AnalysisReport,
        format: OutputFormat,
    ) -> NameguardResult<String> {
        let filtered_violations = self.filter_violations(&report.violations);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, &filtered_violations)),
            OutputFormat::Json => self.format_json(report, &filtered_violations),
            OutputFormat::GitHub => Ok(self.format_github(&filtered_violations)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &AnalysisReport,
        format: OutputFormat,
        mut writer: W,
    ) -> NameguardResult<()> {
        let formatted = self.format_report(report, format)?;
        writer
            .write_all(formatted.as_bytes())
            .map_err(|e| NameguardError::Io { source: e })?;
        Ok(())
    }

    /// Filter violations based on report options
    fn filter_violations<'a>(&self, violations: &'a [Violation]) -> Vec<&'a Violation> {
        let mut filtered: Vec<&Violation> = violations
            .iter()
            .filter(|v| {
                if let Some(min_severity) = self.options.min_severity {
                    if v.severity < min_severity {
                        return false;
                    }
                }
                true
            })
            .collect();

        if let Some(max) = self.options.max_violations {
            filtered.truncate(max);
        }

        filtered
    }

    /// Format report in human-readable format
    fn format_human(&self, report: &AnalysisReport, violations: &[&Violation]) -> String {
        let mut output = String::new();

        if violations.is_empty() {
            if self.options.use_colors {
                output.push_str("\x1b[32mNo naming violations found\x1b[0m\n");
            } else {
                output.push_str("No naming violations found\n");
            }
        } else {
            if self.options.use_colors {
                let color = if report.has_errors() { "31" } else { "33" };
                output.push_str(&format!("\x1b[{color}mNaming Violations Found\x1b[0m\n\n"));
            } else {
                output.push_str("Naming Violations Found\n\n");
            }

            // Group violations by file; unattributed ones come first
            let mut by_file: BTreeMap<Option<&Path>, Vec<&Violation>> = BTreeMap::new();
            for violation in violations {
                by_file
                    .entry(violation.file_path.as_deref())
                    .or_default()
                    .push(violation);
            }

            for (file_path, file_violations) in by_file {
                let file = file_path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<stream>".to_string());
                output.push_str(&format!("{file}\n"));

                for violation in file_violations {
                    let severity_color = match violation.severity {
                        Severity::Error => "31",
                        Severity::Warning => "33",
                        Severity::Info => "36",
                    };

                    if self.options.use_colors {
                        output.push_str(&format!(
                            "  \x1b[2m{}:{}\x1b[0m [\x1b[{}m{}\x1b[0m] {} ({})\n",
                            violation.line,
                            violation.column,
                            severity_color,
                            violation.severity.as_str(),
                            violation.message,
                            violation.code
                        ));
                    } else {
                        output.push_str(&format!(
                            "  {}:{} [{}] {} ({})\n",
                            violation.line,
                            violation.column,
                            violation.severity.as_str(),
                            violation.message,
                            violation.code
                        ));
                    }
                }

                output.push('\n');
            }
        }

        output.push_str(&self.format_summary(report));
        output
    }

    /// Format report in JSON format
    fn format_json(
        &self,
        report: &AnalysisReport,
        violations: &[&Violation],
    ) -> NameguardResult<String> {
        let json_violations: Vec<JsonValue> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "code": v.code,
                    "severity": v.severity.as_str(),
                    "file_path": v.file_path.as_ref().map(|p| p.display().to_string()),
                    "token_index": v.token_index,
                    "line": v.line,
                    "column": v.column,
                    "message": v.message,
                })
            })
            .collect();

        let json_report = serde_json::json!({
            "violations": json_violations,
            "summary": {
                "total_streams": report.summary.total_streams,
                "total_tokens": report.summary.total_tokens,
                "violations_by_severity": {
                    "error": report.summary.violations_by_severity.error,
                    "warning": report.summary.violations_by_severity.warning,
                    "info": report.summary.violations_by_severity.info,
                },
            },
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| NameguardError::report(format!("JSON serialization failed: {e}")))
    }

    /// Format report for GitHub Actions
    fn format_github(&self, violations: &[&Violation]) -> String {
        let mut output = String::new();

        for violation in violations {
            let level = match violation.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "notice",
            };

            let file = violation
                .file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<stream>".to_string());

            output.push_str(&format!(
                "::{} file={},title={} line={},col={}::{}\n",
                level, file, violation.code, violation.line, violation.column, violation.message
            ));
        }

        output
    }

    /// Format the summary section
    fn format_summary(&self, report: &AnalysisReport) -> String {
        let mut summary = String::new();

        let counts = &report.summary.violations_by_severity;

        if self.options.use_colors {
            summary.push_str("\x1b[1mSummary:\x1b[0m ");
        } else {
            summary.push_str("Summary: ");
        }

        if counts.total() == 0 {
            let text = format!(
                "0 violations in {} streams ({} tokens)\n",
                report.summary.total_streams, report.summary.total_tokens
            );
            if self.options.use_colors {
                summary.push_str(&format!("\x1b[32m{text}\x1b[0m"));
            } else {
                summary.push_str(&text);
            }
        } else {
            let mut parts = Vec::new();

            if counts.error > 0 {
                let text = format!(
                    "{} error{}",
                    counts.error,
                    if counts.error == 1 { "" } else { "s" }
                );
                if self.options.use_colors {
                    parts.push(format!("\x1b[31m{text}\x1b[0m"));
                } else {
                    parts.push(text);
                }
            }

            if counts.warning > 0 {
                let text = format!(
                    "{} warning{}",
                    counts.warning,
                    if counts.warning == 1 { "" } else { "s" }
                );
                if self.options.use_colors {
                    parts.push(format!("\x1b[33m{text}\x1b[0m"));
                } else {
                    parts.push(text);
                }
            }

            if counts.info > 0 {
                let text = format!("{} info", counts.info);
                if self.options.use_colors {
                    parts.push(format!("\x1b[36m{text}\x1b[0m"));
                } else {
                    parts.push(text);
                }
            }

            summary.push_str(&format!(
                "{} in {} streams ({} tokens)\n",
                parts.join(", "),
                report.summary.total_streams,
                report.summary.total_tokens
            ));
        }

        summary
    }
}
