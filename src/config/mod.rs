//! Configuration loading and management for Nameguard
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to a clean, immutable naming policy
//! - Default prefixes and the reserved-variable table are embedded in the domain
//! - Policy misconfiguration is a startup-time fatal condition; no rule ever
//!   runs against an invalid policy

use crate::domain::violations::{NameguardError, NameguardResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Main configuration structure for Nameguard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameguardConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,
    /// The naming policy rules evaluate against
    #[serde(default)]
    pub policy: NamingPolicy,
}

/// Static naming policy: required prefixes per construct kind and the
/// identifier exceptions
///
/// Loaded once at start, immutable for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingPolicy {
    /// Required prefix for class, interface, and trait names
    #[serde(default = "default_type_prefix")]
    pub type_prefix: String,
    /// Required prefix for constant names
    #[serde(default = "default_constant_prefix")]
    pub constant_prefix: String,
    /// Required prefix for function, method, and variable names
    #[serde(default = "default_member_prefix")]
    pub member_prefix: String,
    /// Name of the global constant-definition function (matched case-insensitively)
    #[serde(default = "default_definition_function")]
    pub definition_function: String,
    /// Language-reserved variable names always excluded from prefix checking
    #[serde(default = "default_exempt_variables")]
    pub exempt_variables: HashSet<String>,
}

impl NamingPolicy {
    /// Whether a variable name is reserved and therefore never checked
    pub fn is_exempt(&self, name: &str) -> bool {
        self.exempt_variables.contains(name)
    }

    /// Validate the policy for consistency and correctness
    pub fn validate(&self) -> NameguardResult<()> {
        for (field, value) in [
            ("type_prefix", &self.type_prefix),
            ("constant_prefix", &self.constant_prefix),
            ("member_prefix", &self.member_prefix),
            ("definition_function", &self.definition_function),
        ] {
            if value.is_empty() {
                return Err(NameguardError::config(format!("Policy field '{field}' is empty")));
            }
        }
        Ok(())
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            type_prefix: default_type_prefix(),
            constant_prefix: default_constant_prefix(),
            member_prefix: default_member_prefix(),
            definition_function: default_definition_function(),
            exempt_variables: default_exempt_variables(),
        }
    }
}

impl NameguardConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NameguardResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            NameguardError::config(format!(
                "Failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            NameguardError::config(format!(
                "Failed to parse config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> NameguardResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| NameguardError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Get default configuration with the built-in policy
    pub fn with_defaults() -> Self {
        Self { version: default_version(), policy: NamingPolicy::default() }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> NameguardResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(NameguardError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        self.policy.validate()
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> NameguardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NameguardError::config(format!("Failed to serialize config: {e}")))
    }
}

impl Default for NameguardConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_type_prefix() -> String {
    "Mi".to_string()
}

fn default_constant_prefix() -> String {
    "MI".to_string()
}

fn default_member_prefix() -> String {
    "mi".to_string()
}

fn default_definition_function() -> String {
    "define".to_string()
}

/// Reserved variable names the language defines: the instance receiver and
/// the request/environment superglobals
fn default_exempt_variables() -> HashSet<String> {
    [
        "this",
        "GLOBALS",
        "_SERVER",
        "_GET",
        "_POST",
        "_REQUEST",
        "_SESSION",
        "_ENV",
        "_COOKIE",
        "_FILES",
        "http_response_header",
        "HTTP_RAW_POST_DATA",
        "php_errormsg",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: NameguardConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self { config: NameguardConfig::default() }
    }

    /// Set the required type-declaration prefix
    pub fn type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.policy.type_prefix = prefix.into();
        self
    }

    /// Set the required constant prefix
    pub fn constant_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.policy.constant_prefix = prefix.into();
        self
    }

    /// Set the required function/method/variable prefix
    pub fn member_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.policy.member_prefix = prefix.into();
        self
    }

    /// Set the global constant-definition function name
    pub fn definition_function(mut self, name: impl Into<String>) -> Self {
        self.config.policy.definition_function = name.into();
        self
    }

    /// Add a reserved variable name to the exempt set
    pub fn exempt_variable(mut self, name: impl Into<String>) -> Self {
        self.config.policy.exempt_variables.insert(name.into());
        self
    }

    /// Build the final configuration
    pub fn build(self) -> NameguardResult<NameguardConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
