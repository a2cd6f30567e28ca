//! Prefix rule for variables, member variables, and string-embedded variables
//!
//! Every variable token is disambiguated into one of four syntactic contexts
//! (object-member access, static access, plain reference, member declaration);
//! double-quoted strings get a fifth context scanning their raw content for
//! interpolated names. Leading underscores are a convention marker for
//! members whose visibility cannot be determined statically: the rule strips
//! them for the prefix test but always reports the original name.

use crate::config::NamingPolicy;
use crate::domain::violations::{Severity, Violation};
use crate::tokens::{Token, TokenKind, TokenStream, WHITESPACE};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `$name` or `${name}` not preceded by an escape character
    static ref EMBEDDED_VARIABLE: Regex =
        Regex::new(r"[^\\]\$\{?([A-Za-z_][A-Za-z0-9_]*)").expect("embedded-variable pattern");
}

/// Scan raw double-quoted string content for interpolated variable names,
/// yielding `(offset, name)` pairs in source order
///
/// Pure function of the content; escaped occurrences (`\$name`) never match.
pub fn embedded_variables(content: &str) -> impl Iterator<Item = (usize, &str)> {
    EMBEDDED_VARIABLE.captures_iter(content).filter_map(|caps| {
        let name = caps.get(1)?;
        Some((name.start(), name.as_str()))
    })
}

/// Check the variable construct at `position` against the member prefix
pub fn check(stream: &dyn TokenStream, position: usize, policy: &NamingPolicy) -> Vec<Violation> {
    let Some(token) = stream.token_at(position) else {
        return Vec::new();
    };

    match token.kind {
        TokenKind::InterpolatedString => check_embedded(token, position, policy),
        TokenKind::Variable => {
            // A variable sitting directly in a type body is a member
            // declaration; anywhere else the reference contexts apply
            let deepest_is_oo = stream
                .scope_chain_at(position)
                .last()
                .and_then(|&p| stream.token_at(p))
                .is_some_and(|t| t.kind.is_oo());

            if deepest_is_oo {
                check_member_declaration(stream, position, policy).into_iter().collect()
            } else {
                check_reference(stream, position, policy)
            }
        }
        _ => Vec::new(),
    }
}

/// The variable name without its sigil
fn sigilless(content: &str) -> &str {
    content.strip_prefix('$').unwrap_or(content)
}

/// Property declaration inside a type body
fn check_member_declaration(
    stream: &dyn TokenStream,
    position: usize,
    policy: &NamingPolicy,
) -> Option<Violation> {
    // Unresolvable visibility generally means invalid code or a parse error;
    // those are reported by the tokenizer layer, so no verdict here
    stream.member_properties_at(position)?;

    let token = stream.token_at(position)?;
    let var_name = sigilless(&token.content);

    // Property declarations always support the underscore convention marker
    let test_name = var_name.trim_start_matches('_');
    if test_name.starts_with(&policy.member_prefix) {
        return None;
    }

    Some(
        Violation::new(
            "WrongVariableName",
            Severity::Error,
            position,
            format!(
                "Member variable \"{}\" should start with prefix \"{}\"",
                var_name, policy.member_prefix
            ),
        )
        .with_position(token.line, token.column),
    )
}

/// Variable reference outside a type body: object-member access, static
/// access, or a plain reference
fn check_reference(
    stream: &dyn TokenStream,
    position: usize,
    policy: &NamingPolicy,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let Some(token) = stream.token_at(position) else {
        return violations;
    };
    let raw = token.content.as_str();
    let var_name = sigilless(raw);

    // Object-member access: the accessed member is checked on its own; the
    // base variable still falls through to the remaining contexts
    if let Some(member) = accessed_member(stream, position) {
        if let Some(member_token) = stream.token_at(member) {
            let original = member_token.content.as_str();
            // Visibility is unknowable here, so a leading underscore is
            // ignored and only the main part of the name is checked
            let test_name = original.strip_prefix('_').unwrap_or(original);
            if !test_name.starts_with(&policy.member_prefix) {
                violations.push(
                    Violation::new(
                        "WrongMemberVariableName",
                        Severity::Error,
                        member,
                        format!(
                            "Member variable \"{}\" should start with prefix \"{}\"",
                            original, policy.member_prefix
                        ),
                    )
                    .with_position(member_token.line, member_token.column),
                );
            }
        }
    }

    // Static access: the variable lives within a class and is referenced as
    // Type::$variable, so its scope is unknown; check and stop
    if let Some(prev) = position
        .checked_sub(1)
        .and_then(|from| stream.find_previous(WHITESPACE, from, None, true))
    {
        if stream.token_at(prev).is_some_and(|t| t.kind == TokenKind::DoubleColon) {
            let test_name = var_name.strip_prefix('_').unwrap_or(var_name);
            if !test_name.starts_with(&policy.member_prefix) {
                violations.push(
                    Violation::new(
                        "WrongMemberVariableName",
                        Severity::Error,
                        position,
                        format!(
                            "Member variable \"{}\" should start with prefix \"{}\"",
                            raw, policy.member_prefix
                        ),
                    )
                    .with_position(token.line, token.column),
                );
            }
            return violations;
        }
    }

    // Plain reference: language-reserved variables are never checked
    if policy.is_exempt(var_name) {
        return violations;
    }

    let mut test_name = var_name;
    if var_name.starts_with('_') && in_oo_scope(stream, position) {
        // Inside a type declaration the underscore is a convention marker;
        // free-standing variables keep theirs
        test_name = &var_name[1..];
    }

    if !test_name.starts_with(&policy.member_prefix) {
        violations.push(
            Violation::new(
                "WrongVariableName",
                Severity::Error,
                position,
                format!(
                    "Variable \"{}\" should start with prefix \"{}\"",
                    var_name, policy.member_prefix
                ),
            )
            .with_position(token.line, token.column),
        );
    }

    violations
}

/// Position of the member identifier accessed through `->`/`?->` from the
/// variable at `position`, excluding method calls
fn accessed_member(stream: &dyn TokenStream, position: usize) -> Option<usize> {
    let operator = stream.find_next(WHITESPACE, position + 1, None, true)?;
    if !stream.token_at(operator)?.kind.is_member_access() {
        return None;
    }

    let member = stream.find_next(WHITESPACE, operator + 1, None, true)?;
    if stream.token_at(member)?.kind != TokenKind::Identifier {
        return None;
    }

    // Followed by an opening parenthesis: a method call, not a member read
    let is_call = stream
        .find_next(WHITESPACE, member + 1, None, true)
        .and_then(|p| stream.token_at(p))
        .is_some_and(|t| t.kind == TokenKind::OpenParen);

    if is_call {
        None
    } else {
        Some(member)
    }
}

fn in_oo_scope(stream: &dyn TokenStream, position: usize) -> bool {
    stream
        .scope_chain_at(position)
        .iter()
        .any(|&p| stream.token_at(p).is_some_and(|t| t.kind.is_oo()))
}

/// Variables found inside a double-quoted string, all attributed to the
/// string token's position
fn check_embedded(token: &Token, position: usize, policy: &NamingPolicy) -> Vec<Violation> {
    embedded_variables(&token.content)
        .filter(|(_, name)| !policy.is_exempt(name))
        .filter(|(_, name)| !name.starts_with(&policy.member_prefix))
        .map(|(_, name)| {
            Violation::new(
                "WrongVariableName",
                Severity::Error,
                position,
                format!(
                    "Member variable \"{}\" should start with prefix \"{}\"",
                    name, policy.member_prefix
                ),
            )
            .with_position(token.line, token.column)
        })
        .collect()
}
