//! Scope-aware prefix rule for function and method names
//!
//! The rule takes the explicit scope chain for the declaration position and
//! decides which of two forms applies: a method of the innermost enclosing
//! object-oriented construct, or a free function. Declarations nested below a
//! deeper scope are skipped so they are only reported once, at their own
//! evaluation. Legacy constructors and destructors (a method named after its
//! type, with or without a leading underscore) are exempt from the prefix.

use crate::config::NamingPolicy;
use crate::domain::violations::{Severity, Violation};
use crate::tokens::TokenStream;

/// Check the function declaration at `position` against the member prefix
pub fn check(
    stream: &dyn TokenStream,
    position: usize,
    policy: &NamingPolicy,
) -> Option<Violation> {
    let chain = stream.scope_chain_at(position);
    let oo_scope = chain
        .iter()
        .rev()
        .copied()
        .find(|&p| stream.token_at(p).is_some_and(|t| t.kind.is_oo()));

    match oo_scope {
        None => check_free_function(stream, position, policy),
        Some(curr_scope) => {
            // A deeper chain entry means this declaration belongs to a nested
            // construct that gets its own evaluation; skip to avoid
            // double-reporting
            if chain.last().copied() != Some(curr_scope) {
                tracing::debug!("skipping nested declaration at {}", position);
                return None;
            }
            check_method(stream, position, curr_scope, policy)
        }
    }
}

fn check_method(
    stream: &dyn TokenStream,
    position: usize,
    curr_scope: usize,
    policy: &NamingPolicy,
) -> Option<Violation> {
    // Closures have no name and no verdict
    let method_name = stream.declaration_name_at(position)?;
    let type_name = stream.declaration_name_at(curr_scope).unwrap_or("[Anonymous Class]");

    let method_lc = method_name.to_lowercase();
    let type_lc = type_name.to_lowercase();

    // Legacy constructors are allowed to break the rules
    if method_lc == type_lc {
        return None;
    }

    // Legacy destructors are allowed to break the rules
    if method_lc == format!("_{type_lc}") {
        return None;
    }

    // Leading underscores mark visibility by convention and are not part of
    // the checked name
    let test_name = method_name.trim_start_matches('_');
    if test_name.starts_with(&policy.member_prefix) {
        return None;
    }

    let token = stream.token_at(position)?;
    Some(
        Violation::new(
            "WrongMethodName",
            Severity::Error,
            position,
            format!(
                "Method name \"{}::{}\" should start with prefix \"{}\"",
                type_name, method_name, policy.member_prefix
            ),
        )
        .with_position(token.line, token.column),
    )
}

fn check_free_function(
    stream: &dyn TokenStream,
    position: usize,
    policy: &NamingPolicy,
) -> Option<Violation> {
    let name = stream.declaration_name_at(position)?;

    if name.starts_with(&policy.member_prefix) {
        return None;
    }

    let token = stream.token_at(position)?;
    Some(
        Violation::new(
            "WrongMethodName",
            Severity::Error,
            position,
            format!(
                "Function name \"{}\" should start with prefix \"{}\"",
                name, policy.member_prefix
            ),
        )
        .with_position(token.line, token.column),
    )
}
