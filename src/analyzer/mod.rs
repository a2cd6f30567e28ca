//! Main analysis orchestrator for Nameguard
//!
//! Architecture: Domain Services - the analyzer orchestrates the naming-check workflow
//! - Coordinates dump discovery, stream walking, and result aggregation
//! - Provides a clean interface for checking single streams or directory trees
//! - Handles parallel processing and error recovery gracefully

use crate::config::NameguardConfig;
use crate::domain::violations::{AnalysisReport, NameguardError, NameguardResult, Violation};
use crate::rules::RuleSet;
use crate::tokens::{TokenDump, TokenStream};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File suffix identifying token dump files during directory discovery
pub const DUMP_SUFFIX: &str = ".tokens.json";

/// Main analyzer that walks token streams and applies the naming rules
pub struct Analyzer {
    /// Rule set evaluated against every registered token position
    rule_set: RuleSet,
}

/// Options for customizing analysis behavior
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Maximum number of streams to analyze
    pub max_streams: Option<usize>,
    /// Whether to continue on errors or fail fast
    pub fail_fast: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { parallel: true, max_streams: None, fail_fast: false }
    }
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: NameguardConfig) -> NameguardResult<Self> {
        config.validate()?;
        Ok(Self { rule_set: RuleSet::new(config.policy) })
    }

    /// Create an analyzer with the default policy
    pub fn with_defaults() -> NameguardResult<Self> {
        Self::new(NameguardConfig::default())
    }

    /// The rule set this analyzer dispatches to
    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Walk a single token stream and return all violations in token order
    ///
    /// Every position is visited exactly once; positions whose kind no rule
    /// listens for are skipped without a verdict.
    pub fn analyze_stream(&self, stream: &dyn TokenStream) -> Vec<Violation> {
        let mut violations = Vec::new();

        for position in 0..stream.len() {
            let Some(token) = stream.token_at(position) else {
                continue;
            };
            if !RuleSet::listens_for(token.kind) {
                continue;
            }
            violations.extend(self.rule_set.evaluate(stream, position));
        }

        violations
    }

    /// Load a token dump file and analyze its stream
    ///
    /// Violations are attributed to the source path recorded in the dump.
    pub fn analyze_dump<P: AsRef<Path>>(&self, dump_path: P) -> NameguardResult<Vec<Violation>> {
        let dump = TokenDump::load_from_file(dump_path)?;
        let (source, stream) = dump.into_stream();

        tracing::debug!(
            "analyzing {} ({} tokens)",
            source.display(),
            stream.len()
        );

        Ok(self
            .analyze_stream(&stream)
            .into_iter()
            .map(|v| v.with_file(&source))
            .collect())
    }

    /// Analyze dump files under the given paths and build a complete report
    ///
    /// Directories are walked recursively for `.tokens.json` files; explicit
    /// file paths are taken as dumps regardless of suffix.
    pub fn analyze_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> NameguardResult<AnalysisReport> {
        let mut report = AnalysisReport::new();

        let mut dumps = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_file() {
                dumps.push(path.to_path_buf());
            } else if path.is_dir() {
                dumps.extend(discover_dumps(path));
            }
        }
        dumps.sort();
        dumps.dedup();

        if let Some(max) = options.max_streams {
            dumps.truncate(max);
        }

        let total_streams = dumps.len();

        let (violations, tokens_walked) = if options.parallel && dumps.len() > 1 {
            self.analyze_dumps_parallel(&dumps, options)?
        } else {
            self.analyze_dumps_sequential(&dumps, options)?
        };

        for violation in violations {
            report.add_violation(violation);
        }

        report.set_streams_analyzed(total_streams);
        report.add_tokens_walked(tokens_walked);
        report.sort_violations();

        Ok(report)
    }

    fn analyze_dumps_sequential(
        &self,
        dumps: &[PathBuf],
        options: &AnalysisOptions,
    ) -> NameguardResult<(Vec<Violation>, usize)> {
        let mut all_violations = Vec::new();
        let mut tokens_walked = 0;

        for dump_path in dumps {
            match self.analyze_dump_counting(dump_path) {
                Ok((violations, tokens)) => {
                    all_violations.extend(violations);
                    tokens_walked += tokens;
                }
                Err(e) => {
                    if options.fail_fast {
                        return Err(e);
                    }
                    tracing::warn!("Failed to analyze {}: {}", dump_path.display(), e);
                }
            }
        }

        Ok((all_violations, tokens_walked))
    }

    fn analyze_dumps_parallel(
        &self,
        dumps: &[PathBuf],
        options: &AnalysisOptions,
    ) -> NameguardResult<(Vec<Violation>, usize)> {
        let results: Vec<(&PathBuf, NameguardResult<(Vec<Violation>, usize)>)> = dumps
            .par_iter()
            .map(|dump_path| (dump_path, self.analyze_dump_counting(dump_path)))
            .collect();

        let mut all_violations = Vec::new();
        let mut tokens_walked = 0;

        for (dump_path, result) in results {
            match result {
                Ok((violations, tokens)) => {
                    all_violations.extend(violations);
                    tokens_walked += tokens;
                }
                Err(e) => {
                    if options.fail_fast {
                        return Err(NameguardError::analysis(
                            dump_path.display().to_string(),
                            e.to_string(),
                        ));
                    }
                    tracing::warn!("Failed to analyze {}: {}", dump_path.display(), e);
                }
            }
        }

        Ok((all_violations, tokens_walked))
    }

    fn analyze_dump_counting(
        &self,
        dump_path: &Path,
    ) -> NameguardResult<(Vec<Violation>, usize)> {
        let dump = TokenDump::load_from_file(dump_path)?;
        let (source, stream) = dump.into_stream();
        let tokens = stream.len();

        let violations = self
            .analyze_stream(&stream)
            .into_iter()
            .map(|v| v.with_file(&source))
            .collect();

        Ok((violations, tokens))
    }

    /// Analyze a directory tree of token dumps and return a report
    pub fn analyze_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> NameguardResult<AnalysisReport> {
        self.analyze_paths(&[root.as_ref()], options)
    }
}

/// Recursively collect token dump files under `root`
fn discover_dumps(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(DUMP_SUFFIX))
        })
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{stream_of, TokenKind};
    use std::fs;
    use tempfile::TempDir;
    use TokenKind::*;

    fn dump_json(source: &str, tokens: &[(&str, &str)]) -> String {
        let tokens: Vec<String> = tokens
            .iter()
            .map(|(kind, content)| {
                format!(
                    r#"{{"kind":"{kind}","content":{},"line":1,"column":1}}"#,
                    serde_json::to_string(content).unwrap()
                )
            })
            .collect();
        format!(r#"{{"source":"{source}","tokens":[{}]}}"#, tokens.join(","))
    }

    #[test]
    fn test_stream_walk_collects_in_token_order() {
        let analyzer = Analyzer::with_defaults().unwrap();
        let stream = stream_of(&[
            (Class, "class"),         // 0: flagged
            (Whitespace, " "),        // 1
            (Identifier, "Widget"),   // 2
            (OpenBrace, "{"),         // 3
            (Const, "const"),         // 4: flagged
            (Whitespace, " "),        // 5
            (Identifier, "VERSION"),  // 6
            (Semicolon, ";"),         // 7
            (CloseBrace, "}"),        // 8
        ]);

        let violations = analyzer.analyze_stream(&stream);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].token_index, 0);
        assert_eq!(violations[0].code, "WrongClassName");
        assert_eq!(violations[1].token_index, 4);
        assert_eq!(violations[1].code, "WrongClassConstantName");
    }

    #[test]
    fn test_clean_stream_has_no_violations() {
        let analyzer = Analyzer::with_defaults().unwrap();
        let stream = stream_of(&[
            (Class, "class"),
            (Whitespace, " "),
            (Identifier, "MiWidget"),
            (OpenBrace, "{"),
            (Variable, "$miCount"),
            (Semicolon, ";"),
            (CloseBrace, "}"),
        ]);

        assert!(analyzer.analyze_stream(&stream).is_empty());
    }

    #[test]
    fn test_dump_analysis_attributes_source_path() {
        let temp_dir = TempDir::new().unwrap();
        let dump_path = temp_dir.path().join("widget.tokens.json");
        fs::write(
            &dump_path,
            dump_json("src/widget.php", &[("variable", "$count"), ("semicolon", ";")]),
        )
        .unwrap();

        let analyzer = Analyzer::with_defaults().unwrap();
        let violations = analyzer.analyze_dump(&dump_path).unwrap();

        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].file_path.as_deref(),
            Some(Path::new("src/widget.php"))
        );
    }

    #[test]
    fn test_directory_analysis_discovers_dumps() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested")).unwrap();

        fs::write(
            root.join("a.tokens.json"),
            dump_json("a.php", &[("variable", "$count")]),
        )
        .unwrap();
        fs::write(
            root.join("nested/b.tokens.json"),
            dump_json("b.php", &[("variable", "$miCount")]),
        )
        .unwrap();
        // Not a dump file; must be ignored
        fs::write(root.join("notes.txt"), "skip me").unwrap();

        let analyzer = Analyzer::with_defaults().unwrap();
        let report = analyzer
            .analyze_directory(root, &AnalysisOptions::default())
            .unwrap();

        assert_eq!(report.summary.total_streams, 2);
        assert_eq!(report.summary.total_tokens, 2);
        assert_eq!(report.violations.len(), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn test_unreadable_dump_warns_and_continues() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("bad.tokens.json"), "not json at all").unwrap();
        fs::write(
            root.join("good.tokens.json"),
            dump_json("good.php", &[("variable", "$count")]),
        )
        .unwrap();

        let analyzer = Analyzer::with_defaults().unwrap();
        let options = AnalysisOptions { parallel: false, ..Default::default() };
        let report = analyzer.analyze_directory(root, &options).unwrap();

        // The good dump still contributes its violation
        assert_eq!(report.violations.len(), 1);
    }

    #[test]
    fn test_fail_fast_propagates_dump_errors() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("bad.tokens.json"), "not json at all").unwrap();

        let analyzer = Analyzer::with_defaults().unwrap();
        let options = AnalysisOptions { fail_fast: true, ..Default::default() };
        assert!(analyzer.analyze_directory(root, &options).is_err());
    }

    #[test]
    fn test_max_streams_limits_analysis() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        for name in ["a", "b", "c"] {
            fs::write(
                root.join(format!("{name}.tokens.json")),
                dump_json(&format!("{name}.php"), &[("variable", "$count")]),
            )
            .unwrap();
        }

        let analyzer = Analyzer::with_defaults().unwrap();
        let options = AnalysisOptions { max_streams: Some(1), ..Default::default() };
        let report = analyzer.analyze_directory(root, &options).unwrap();

        assert_eq!(report.summary.total_streams, 1);
        assert_eq!(report.violations.len(), 1);
    }

    #[test]
    fn test_report_is_sorted_by_file_then_position() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(
            root.join("z.tokens.json"),
            dump_json("a_first.php", &[("variable", "$count")]),
        )
        .unwrap();
        fs::write(
            root.join("a.tokens.json"),
            dump_json("z_last.php", &[("variable", "$count")]),
        )
        .unwrap();

        let analyzer = Analyzer::with_defaults().unwrap();
        let report = analyzer
            .analyze_directory(root, &AnalysisOptions::default())
            .unwrap();

        let files: Vec<_> = report
            .violations
            .iter()
            .filter_map(|v| v.file_path.as_deref())
            .collect();
        assert_eq!(files, [Path::new("a_first.php"), Path::new("z_last.php")]);
    }
}
