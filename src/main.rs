//! Nameguard CLI - command-line interface for naming-convention enforcement
//!
//! Architecture: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Handles external concerns like file I/O, process exit codes, and terminal output
//! - Provides clean separation between user interface and business logic

use clap::{Parser, Subcommand, ValueEnum};
use nameguard::{
    AnalysisOptions, NameguardConfig, NameguardLinter, NameguardResult, OutputFormat,
    ReportFormatter, ReportOptions, RuleSet, Severity,
};
use std::path::{Path, PathBuf};
use std::process;

/// Nameguard - prefix naming-convention enforcement
#[derive(Parser)]
#[command(name = "nameguard")]
#[command(version = "0.1.0")]
#[command(about = "Checks token streams for prefix naming-convention violations")]
#[command(
    long_about = "Nameguard analyzes tokenized source dumps for naming-convention violations: \
                  type, constant, function, and variable names are checked against the \
                  configured required prefixes. Designed for CI/CD integration."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check token dumps for naming violations
    Check {
        /// Paths to analyze (dump files or directories)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Minimum severity level to report
        #[arg(short, long, value_enum)]
        severity: Option<SeverityArg>,

        /// Maximum number of violations to report
        #[arg(long)]
        max_violations: Option<usize>,

        /// Maximum number of streams to analyze
        #[arg(long)]
        max_streams: Option<usize>,

        /// Disable parallel processing
        #[arg(long)]
        no_parallel: bool,

        /// Fail on first error
        #[arg(long)]
        fail_fast: bool,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// List the naming rules and the token kinds they listen for
    Rules,
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> NameguardResult<i32> {
    match cli.command {
        Commands::Check {
            paths,
            format,
            severity,
            max_violations,
            max_streams,
            no_parallel,
            fail_fast,
        } => run_check(
            cli.config,
            paths,
            format,
            severity,
            max_violations,
            max_streams,
            no_parallel,
            fail_fast,
            !cli.no_color,
        ),
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))
        }
        Commands::Rules => run_list_rules(),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_check(
    config_path: Option<PathBuf>,
    paths: Vec<PathBuf>,
    format: OutputFormatArg,
    severity: Option<SeverityArg>,
    max_violations: Option<usize>,
    max_streams: Option<usize>,
    no_parallel: bool,
    fail_fast: bool,
    use_colors: bool,
) -> NameguardResult<i32> {
    let config = load_config(config_path)?;

    let formatter = ReportFormatter::new(ReportOptions {
        use_colors,
        max_violations,
        min_severity: severity.map(Into::into),
    });
    let linter = NameguardLinter::new_with_config(config)?.with_report_formatter(formatter);

    let paths = if paths.is_empty() { vec![PathBuf::from(".")] } else { paths };

    let analysis_options = AnalysisOptions {
        parallel: !no_parallel,
        max_streams,
        fail_fast,
    };

    let report = linter.lint_paths(&paths, &analysis_options)?;

    let formatted = linter.format_report(&report, format.into())?;
    println!("{formatted}");

    if report.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Load configuration from an explicit path or the first default config file
/// found in the working directory
fn load_config(config_path: Option<PathBuf>) -> NameguardResult<NameguardConfig> {
    if let Some(path) = config_path {
        return NameguardConfig::load_from_file(path);
    }

    let default_configs = ["nameguard.yaml", "nameguard.yml", ".nameguard.yaml"];
    for config_name in &default_configs {
        if Path::new(config_name).exists() {
            return NameguardConfig::load_from_file(config_name);
        }
    }

    Ok(NameguardConfig::default())
}

fn run_validate_config(config_path: Option<PathBuf>) -> NameguardResult<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("nameguard.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match NameguardConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("Policy summary:");
            println!("  Type prefix: {}", config.policy.type_prefix);
            println!("  Constant prefix: {}", config.policy.constant_prefix);
            println!("  Member prefix: {}", config.policy.member_prefix);
            println!("  Definition function: {}", config.policy.definition_function);
            println!("  Exempt variables: {}", config.policy.exempt_variables.len());
            Ok(0)
        }
        Err(e) => {
            eprintln!("Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn run_list_rules() -> NameguardResult<i32> {
    let rules: &[(&str, &str)] = &[
        ("WrongClassName", "Class declarations must carry the type prefix"),
        ("WrongInterfaceName", "Interface declarations must carry the type prefix"),
        ("WrongTraitName", "Trait declarations must carry the type prefix"),
        ("WrongClassConstantName", "Class constants must carry the constant prefix"),
        ("WrongConstantName", "Globally defined constants must carry the constant prefix"),
        ("WrongMethodName", "Functions and methods must carry the member prefix"),
        ("WrongVariableName", "Variables and properties must carry the member prefix"),
        ("WrongMemberVariableName", "Accessed members must carry the member prefix"),
    ];

    println!("Naming rules\n");
    for (code, description) in rules {
        println!("  {code} - {description}");
    }

    println!("\nToken kinds listened for:");
    let kinds: Vec<String> = RuleSet::registered_kinds()
        .iter()
        .map(|k| format!("{k:?}"))
        .collect();
    println!("  {}", kinds.join(", "));

    Ok(0)
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_command_reports_violations() {
        let temp_dir = TempDir::new().unwrap();
        let dump = temp_dir.path().join("widget.tokens.json");
        fs::write(
            &dump,
            r#"{"source":"widget.php","tokens":[
                {"kind":"class","content":"class","line":1,"column":1},
                {"kind":"whitespace","content":" ","line":1,"column":6},
                {"kind":"identifier","content":"Widget","line":1,"column":7},
                {"kind":"open_brace","content":"{","line":1,"column":14},
                {"kind":"close_brace","content":"}","line":1,"column":15}
            ]}"#,
        )
        .unwrap();

        let result = run_check(
            None,
            vec![dump],
            OutputFormatArg::Json,
            None,
            None,
            None,
            false,
            false,
            false,
        );

        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn test_check_command_passes_clean_dump() {
        let temp_dir = TempDir::new().unwrap();
        let dump = temp_dir.path().join("clean.tokens.json");
        fs::write(
            &dump,
            r#"{"source":"clean.php","tokens":[
                {"kind":"variable","content":"$miTotal","line":1,"column":1},
                {"kind":"semicolon","content":";","line":1,"column":9}
            ]}"#,
        )
        .unwrap();

        let result = run_check(
            None,
            vec![dump],
            OutputFormatArg::Human,
            None,
            None,
            None,
            false,
            false,
            false,
        );

        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_validate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nameguard.yaml");

        let yaml = serde_yaml::to_string(&NameguardConfig::default()).unwrap();
        fs::write(&config_file, yaml).unwrap();

        assert_eq!(run_validate_config(Some(config_file)).unwrap(), 0);

        let missing = temp_dir.path().join("missing.yaml");
        assert_eq!(run_validate_config(Some(missing)).unwrap(), 1);
    }

    #[test]
    fn test_list_rules_command() {
        assert_eq!(run_list_rules().unwrap(), 0);
    }
}
