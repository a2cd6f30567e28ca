//! Prefix rule for class constants and global constant-definition calls
//!
//! Two trigger forms: the `const` declaration keyword, and bare identifiers
//! matching the configured definition function (`define` by default). Dynamic
//! constant names cannot be statically validated and produce no verdict;
//! malformed declarations are the tokenizer layer's concern and are skipped
//! silently.

use crate::config::NamingPolicy;
use crate::domain::violations::{Severity, Violation};
use crate::tokens::{TokenKind, TokenStream, INSIGNIFICANT, WHITESPACE};

/// Check the constant construct at `position` against the constant prefix
pub fn check(
    stream: &dyn TokenStream,
    position: usize,
    policy: &NamingPolicy,
) -> Option<Violation> {
    match stream.token_at(position)?.kind {
        TokenKind::Const => check_class_constant(stream, position, policy),
        TokenKind::Identifier => check_definition_call(stream, position, policy),
        _ => None,
    }
}

/// `const NAME = ...;` inside a type body
fn check_class_constant(
    stream: &dyn TokenStream,
    position: usize,
    policy: &NamingPolicy,
) -> Option<Violation> {
    let name_pos = stream.find_next(INSIGNIFICANT, position + 1, None, true)?;
    let name_token = stream.token_at(name_pos)?;
    if name_token.kind != TokenKind::Identifier {
        // Malformed declaration; reported by the tokenizer layer, not here
        return None;
    }

    let name = name_token.content.as_str();
    if name.starts_with(&policy.constant_prefix) {
        return None;
    }

    let keyword = stream.token_at(position)?;
    Some(
        Violation::new(
            "WrongClassConstantName",
            Severity::Error,
            position,
            format!(
                "Constants must be prefixed with \"{}\"; found \"{}\"",
                policy.constant_prefix, name
            ),
        )
        .with_position(keyword.line, keyword.column),
    )
}

/// `define('NAME', ...)` as a global call
fn check_definition_call(
    stream: &dyn TokenStream,
    position: usize,
    policy: &NamingPolicy,
) -> Option<Violation> {
    let token = stream.token_at(position)?;
    if !token.content.eq_ignore_ascii_case(&policy.definition_function) {
        return None;
    }

    // A preceding member/static access operator makes this a method call,
    // not the global definition function
    if let Some(prev) = position
        .checked_sub(1)
        .and_then(|from| stream.find_previous(WHITESPACE, from, None, true))
    {
        let preceding = stream.token_at(prev)?.kind;
        if preceding.is_member_access() || preceding == TokenKind::DoubleColon {
            return None;
        }
    }

    // Not followed by an opening parenthesis: not a call at all
    let open = stream.find_next(INSIGNIFICANT, position + 1, None, true)?;
    if stream.token_at(open)?.kind != TokenKind::OpenParen {
        return None;
    }

    // A non-literal first argument means the constant name is computed at
    // runtime; nothing to validate statically
    let arg_pos = stream.find_next(WHITESPACE, open + 1, None, true)?;
    let arg = stream.token_at(arg_pos)?;
    if arg.kind != TokenKind::StringLiteral {
        tracing::debug!(
            "skipping definition call at {}: dynamic constant name",
            position
        );
        return None;
    }

    let name = bare_constant_name(&arg.content);
    if name.starts_with(&policy.constant_prefix) {
        return None;
    }

    Some(
        Violation::new(
            "WrongConstantName",
            Severity::Error,
            position,
            format!(
                "Constants must be prefixed with \"{}\"; found \"{}\"",
                policy.constant_prefix, name
            ),
        )
        .with_position(token.line, token.column),
    )
}

/// Reduce a quoted constant-name literal to the bare name the prefix applies
/// to: surrounding quotes, a leading `Scope::` qualifier, and any namespace
/// path are context, not part of the checked name.
fn bare_constant_name(literal: &str) -> &str {
    let mut name = literal.trim_matches(|c| c == '\'' || c == '"');
    if let Some(split) = name.find("::") {
        name = &name[split + 2..];
    }
    if let Some(split) = name.rfind('\\') {
        name = &name[split + 1..];
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::stream_of;
    use rstest::rstest;
    use TokenKind::*;

    fn policy() -> NamingPolicy {
        NamingPolicy::default()
    }

    #[test]
    fn test_class_constant_without_prefix() {
        let stream = stream_of(&[
            (Const, "const"),
            (Whitespace, " "),
            (Identifier, "VERSION"),
            (Operator, "="),
            (StringLiteral, "'1.0'"),
            (Semicolon, ";"),
        ]);

        let violation = check(&stream, 0, &policy()).unwrap();
        assert_eq!(violation.code, "WrongClassConstantName");
        assert_eq!(violation.token_index, 0);
        assert!(violation.message.contains("\"VERSION\""));
    }

    #[test]
    fn test_class_constant_with_prefix_passes() {
        let stream = stream_of(&[
            (Const, "const"),
            (Whitespace, " "),
            (Comment, "/* pinned */"),
            (Whitespace, " "),
            (Identifier, "MI_VERSION"),
            (Operator, "="),
            (StringLiteral, "'1.0'"),
        ]);

        assert_eq!(check(&stream, 0, &policy()), None);
    }

    #[test]
    fn test_malformed_const_declaration_is_skipped() {
        let stream = stream_of(&[(Const, "const"), (Whitespace, " "), (Operator, "=")]);
        assert_eq!(check(&stream, 0, &policy()), None);

        // `const` as the very last token
        let stream = stream_of(&[(Const, "const")]);
        assert_eq!(check(&stream, 0, &policy()), None);
    }

    fn define_call(name_literal: &str) -> crate::tokens::TokenBuffer {
        stream_of(&[
            (Identifier, "define"),
            (OpenParen, "("),
            (StringLiteral, name_literal),
            (Comma, ","),
            (Whitespace, " "),
            (Other, "1"),
            (CloseParen, ")"),
            (Semicolon, ";"),
        ])
    }

    #[test]
    fn test_define_with_prefix_passes() {
        assert_eq!(check(&define_call("'MI_FOO'"), 0, &policy()), None);
    }

    #[test]
    fn test_define_without_prefix_is_flagged() {
        let violation = check(&define_call("'FOO'"), 0, &policy()).unwrap();
        assert_eq!(violation.code, "WrongConstantName");
        assert_eq!(violation.token_index, 0);
        assert!(violation.message.contains("\"FOO\""));
    }

    #[rstest]
    #[case("'self::FOO'")]
    #[case("'\\App\\Util\\FOO'")]
    fn test_decorations_are_stripped_before_checking(#[case] literal: &str) {
        let violation = check(&define_call(literal), 0, &policy()).unwrap();
        assert!(violation.message.contains("found \"FOO\""));

        let prefixed = literal.replace("FOO", "MI_FOO");
        assert_eq!(check(&define_call(&prefixed), 0, &policy()), None);
    }

    #[rstest]
    #[case(ObjectOperator, "->")]
    #[case(NullsafeObjectOperator, "?->")]
    #[case(DoubleColon, "::")]
    fn test_method_call_is_excluded(#[case] kind: TokenKind, #[case] op: &str) {
        let stream = stream_of(&[
            (Variable, "$obj"),
            (kind, op),
            (Identifier, "define"),
            (OpenParen, "("),
            (StringLiteral, "'FOO'"),
            (CloseParen, ")"),
        ]);

        assert_eq!(check(&stream, 2, &policy()), None);
    }

    #[test]
    fn test_dynamic_name_is_skipped() {
        let stream = stream_of(&[
            (Identifier, "define"),
            (OpenParen, "("),
            (Variable, "$name"),
            (Comma, ","),
            (Other, "1"),
            (CloseParen, ")"),
        ]);

        assert_eq!(check(&stream, 0, &policy()), None);
    }

    #[test]
    fn test_bare_identifier_without_call_is_skipped() {
        let stream = stream_of(&[(Identifier, "define"), (Semicolon, ";")]);
        assert_eq!(check(&stream, 0, &policy()), None);

        // Unrelated identifiers are not definition calls
        let stream = stream_of(&[
            (Identifier, "render"),
            (OpenParen, "("),
            (StringLiteral, "'FOO'"),
            (CloseParen, ")"),
        ]);
        assert_eq!(check(&stream, 0, &policy()), None);
    }

    #[test]
    fn test_definition_function_matches_case_insensitively() {
        let stream = stream_of(&[
            (Identifier, "DEFINE"),
            (OpenParen, "("),
            (StringLiteral, "'FOO'"),
            (CloseParen, ")"),
        ]);

        assert!(check(&stream, 0, &policy()).is_some());
    }

    #[test]
    fn test_define_at_stream_start_is_a_global_call() {
        // No preceding token at all: nothing marks this as a method call
        assert!(check(&define_call("'FOO'"), 0, &policy()).is_some());
    }
}
