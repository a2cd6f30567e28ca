//! Generic prefix rule for type declarations
//!
//! Class, interface, and trait declarations share one algorithm; the rule is
//! parameterized by the triggering declaration kind rather than copied per
//! construct. Anonymous declarations have no resolvable name and are skipped.

use crate::config::NamingPolicy;
use crate::domain::violations::{Severity, Violation};
use crate::tokens::{TokenKind, TokenStream};

/// Which type-declaration construct triggered the rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Trait,
}

impl TypeDeclKind {
    /// The token kind this declaration kind listens for
    pub fn trigger(self) -> TokenKind {
        match self {
            Self::Class => TokenKind::Class,
            Self::Interface => TokenKind::Interface,
            Self::Trait => TokenKind::Trait,
        }
    }

    /// Map a triggering token kind back to the declaration kind
    pub fn from_trigger(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Class => Some(Self::Class),
            TokenKind::Interface => Some(Self::Interface),
            TokenKind::Trait => Some(Self::Trait),
            _ => None,
        }
    }

    /// Display label used in violation messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Trait => "Trait",
        }
    }

    /// Violation code identifying the construct kind
    pub fn code(self) -> &'static str {
        match self {
            Self::Class => "WrongClassName",
            Self::Interface => "WrongInterfaceName",
            Self::Trait => "WrongTraitName",
        }
    }
}

/// Check the type declaration starting at `position` against the type prefix
pub fn check(
    stream: &dyn TokenStream,
    position: usize,
    kind: TypeDeclKind,
    policy: &NamingPolicy,
) -> Option<Violation> {
    // Anonymous declarations are never flagged
    let name = stream.declaration_name_at(position)?;
    if name.starts_with(&policy.type_prefix) {
        return None;
    }

    let token = stream.token_at(position)?;
    Some(
        Violation::new(
            kind.code(),
            Severity::Error,
            position,
            format!(
                "{} names must be prefixed with \"{}\"; found \"{}\"",
                kind.label(),
                policy.type_prefix,
                name
            ),
        )
        .with_position(token.line, token.column),
    )
}
