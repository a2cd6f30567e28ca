//! Nameguard - prefix naming-convention enforcement over token streams
//!
//! Architecture: Clean Architecture - library interface serves as the application layer
//! - Pure domain logic separated from infrastructure concerns
//! - Clean boundaries between the rule engine and external dependencies
//! - High-level linter API wraps analysis and report formatting workflows

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod report;
pub mod rules;
pub mod tokens;

// Re-export main types for convenient access
pub use domain::violations::{
    AnalysisReport, NameguardError, NameguardResult, ReportSummary, Severity, Violation,
};

pub use config::{ConfigBuilder, NameguardConfig, NamingPolicy};

pub use analyzer::{AnalysisOptions, Analyzer};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use rules::RuleSet;

pub use tokens::{Token, TokenBuffer, TokenDump, TokenKind, TokenStream};

use std::path::Path;

/// Main linter providing high-level naming-check operations
pub struct NameguardLinter {
    analyzer: Analyzer,
    report_formatter: ReportFormatter,
}

impl NameguardLinter {
    /// Create a new linter with the given configuration
    pub fn new_with_config(config: NameguardConfig) -> NameguardResult<Self> {
        let analyzer = Analyzer::new(config)?;
        Ok(Self { analyzer, report_formatter: ReportFormatter::default() })
    }

    /// Create a linter with the default policy
    pub fn new() -> NameguardResult<Self> {
        Self::new_with_config(NameguardConfig::default())
    }

    /// Create a linter loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> NameguardResult<Self> {
        let config = NameguardConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    /// Check a single in-memory token stream
    pub fn lint_stream(&self, stream: &dyn TokenStream) -> AnalysisReport {
        let mut report = AnalysisReport::new();
        for violation in self.analyzer.analyze_stream(stream) {
            report.add_violation(violation);
        }
        report.set_streams_analyzed(1);
        report.add_tokens_walked(stream.len());
        report
    }

    /// Check a single token dump file
    pub fn lint_dump<P: AsRef<Path>>(&self, dump_path: P) -> NameguardResult<AnalysisReport> {
        self.analyzer
            .analyze_paths(&[dump_path.as_ref()], &AnalysisOptions::default())
    }

    /// Check all token dumps under the given paths
    pub fn lint_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> NameguardResult<AnalysisReport> {
        self.analyzer.analyze_paths(paths, options)
    }

    /// Check a directory tree of token dumps
    pub fn lint_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> NameguardResult<AnalysisReport> {
        self.analyzer.analyze_directory(root, options)
    }

    /// Format an analysis report for output
    pub fn format_report(
        &self,
        report: &AnalysisReport,
        format: OutputFormat,
    ) -> NameguardResult<String> {
        self.report_formatter.format_report(report, format)
    }

    /// The policy this linter checks against
    pub fn policy(&self) -> &NamingPolicy {
        self.analyzer.rule_set().policy()
    }
}

/// Convenience function to check a directory of token dumps with defaults
pub fn lint_directory<P: AsRef<Path>>(directory: P) -> NameguardResult<AnalysisReport> {
    let linter = NameguardLinter::new()?;
    linter.lint_directory(directory, &AnalysisOptions::default())
}

/// Convenience function to check token dump files with defaults
pub fn lint_dumps<P: AsRef<Path>>(dumps: &[P]) -> NameguardResult<AnalysisReport> {
    let linter = NameguardLinter::new()?;
    linter.lint_paths(dumps, &AnalysisOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use crate::tokens::stream_of;
    use TokenKind::*;

    #[test]
    fn test_linter_creation() {
        let linter = NameguardLinter::new().unwrap();
        assert_eq!(linter.policy().type_prefix, "Mi");
        assert_eq!(linter.policy().constant_prefix, "MI");
        assert_eq!(linter.policy().member_prefix, "mi");
    }

    #[test]
    fn test_stream_linting() {
        let linter = NameguardLinter::new().unwrap();
        let stream = stream_of(&[
            (Class, "class"),
            (Whitespace, " "),
            (Identifier, "Widget"),
            (OpenBrace, "{"),
            (CloseBrace, "}"),
        ]);

        let report = linter.lint_stream(&stream);
        assert!(report.has_errors());
        assert_eq!(report.summary.total_streams, 1);
        assert_eq!(report.summary.total_tokens, 5);
        assert_eq!(report.violations[0].code, "WrongClassName");
    }

    #[test]
    fn test_dump_linting() {
        let temp_dir = TempDir::new().unwrap();
        let dump_path = temp_dir.path().join("widget.tokens.json");
        fs::write(
            &dump_path,
            r#"{"source":"widget.php","tokens":[
                {"kind":"variable","content":"$count","line":3,"column":5},
                {"kind":"semicolon","content":";","line":3,"column":11}
            ]}"#,
        )
        .unwrap();

        let linter = NameguardLinter::new().unwrap();
        let report = linter.lint_dump(&dump_path).unwrap();

        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].code, "WrongVariableName");
        assert_eq!(report.violations[0].line, 3);
    }

    #[test]
    fn test_custom_policy_from_config() {
        let config = ConfigBuilder::new()
            .type_prefix("Acme")
            .constant_prefix("ACME")
            .member_prefix("acme")
            .build()
            .unwrap();

        let linter = NameguardLinter::new_with_config(config).unwrap();
        let stream = stream_of(&[
            (Class, "class"),
            (Whitespace, " "),
            (Identifier, "MiWidget"),
            (OpenBrace, "{"),
            (CloseBrace, "}"),
        ]);

        let report = linter.lint_stream(&stream);
        assert!(report.has_errors());
        assert!(report.violations[0].message.contains("\"Acme\""));
    }

    #[test]
    fn test_report_formatting() {
        let linter = NameguardLinter::new().unwrap();
        let stream = stream_of(&[
            (Function, "function"),
            (Whitespace, " "),
            (Identifier, "render"),
            (OpenParen, "("),
            (CloseParen, ")"),
            (OpenBrace, "{"),
            (CloseBrace, "}"),
        ]);

        let report = linter.lint_stream(&stream);

        let human = linter.format_report(&report, OutputFormat::Human).unwrap();
        assert!(human.contains("Naming Violations Found"));

        let json = linter.format_report(&report, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["violations"].is_array());
    }

    #[test]
    fn test_convenience_directory_lint() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("a.tokens.json"),
            r#"{"source":"a.php","tokens":[{"kind":"variable","content":"$miOk","line":1,"column":1}]}"#,
        )
        .unwrap();

        let report = lint_directory(temp_dir.path()).unwrap();
        assert!(!report.has_violations());
        assert_eq!(report.summary.total_streams, 1);
    }
}
