//! Rule engine for prefix naming-convention checks
//!
//! Architecture: Service Layer - the rule set coordinates per-construct decision procedures
//! - Each rule is a pure function of (position, stream, policy): no rule mutates
//!   the token stream or another rule's state
//! - The rule set owns the registration table mapping token kinds to rules and
//!   dispatches matched positions to the owning rule
//! - Verdicts are local and independent; a skip or violation for one token
//!   never affects the evaluation of another

pub mod constants;
pub mod functions;
pub mod types;
pub mod variables;

use crate::config::NamingPolicy;
use crate::domain::violations::Violation;
use crate::tokens::{TokenKind, TokenStream};

pub use types::TypeDeclKind;
pub use variables::embedded_variables;

/// Token kinds the rule set listens for
const REGISTERED_KINDS: &[TokenKind] = &[
    // Type declaration rules
    TokenKind::Class,
    TokenKind::Interface,
    TokenKind::Trait,
    // Constant rule: class constants and definition calls
    TokenKind::Const,
    TokenKind::Identifier,
    // Function/method rule
    TokenKind::Function,
    // Variable rule, including double-quoted string interpolation
    TokenKind::Variable,
    TokenKind::InterpolatedString,
];

/// Dispatches token positions of interest to the owning naming rule
///
/// Stateless except for the immutable policy; safe to share across files.
#[derive(Debug, Clone)]
pub struct RuleSet {
    policy: NamingPolicy,
}

impl RuleSet {
    /// Create a rule set evaluating against the given policy
    pub fn new(policy: NamingPolicy) -> Self {
        Self { policy }
    }

    /// The policy this rule set evaluates against
    pub fn policy(&self) -> &NamingPolicy {
        &self.policy
    }

    /// Token kinds that should be fed to [`evaluate`](Self::evaluate)
    pub fn registered_kinds() -> &'static [TokenKind] {
        REGISTERED_KINDS
    }

    /// Whether any rule listens for the given token kind
    pub fn listens_for(kind: TokenKind) -> bool {
        REGISTERED_KINDS.contains(&kind)
    }

    /// Evaluate the rule owning the token at `position`, returning zero or
    /// more violations
    ///
    /// Positions whose kind no rule listens for produce no verdict.
    pub fn evaluate(&self, stream: &dyn TokenStream, position: usize) -> Vec<Violation> {
        let Some(token) = stream.token_at(position) else {
            return Vec::new();
        };

        match token.kind {
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait => {
                let kind = match token.kind {
                    TokenKind::Interface => TypeDeclKind::Interface,
                    TokenKind::Trait => TypeDeclKind::Trait,
                    _ => TypeDeclKind::Class,
                };
                types::check(stream, position, kind, &self.policy).into_iter().collect()
            }
            TokenKind::Const | TokenKind::Identifier => {
                constants::check(stream, position, &self.policy).into_iter().collect()
            }
            TokenKind::Function => {
                functions::check(stream, position, &self.policy).into_iter().collect()
            }
            TokenKind::Variable | TokenKind::InterpolatedString => {
                variables::check(stream, position, &self.policy)
            }
            _ => Vec::new(),
        }
    }
}
