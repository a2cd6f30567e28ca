//! Token model and the navigable stream facade rules operate on
//!
//! Architecture: Anti-Corruption Layer - the `TokenStream` trait is the seam between
//! the rule engine and whatever tokenizer the host runs
//! - Rules only ever read tokens; they never create, mutate, or retain them
//! - Structural queries (declaration names, scope chains, member properties)
//!   are answered by the stream, keeping rules free of grammar knowledge
//! - `TokenBuffer` is the in-memory implementation for hosts whose tokenizer
//!   emits a flat classified stream (e.g. the JSON dumps the CLI consumes)

pub mod dump;

use serde::{Deserialize, Serialize};

pub use dump::TokenDump;

/// Classification tags for tokens, produced by the external tokenizer
///
/// Closed enumeration: the rule engine matches on these tags and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// `class` declaration keyword
    Class,
    /// `interface` declaration keyword
    Interface,
    /// `trait` declaration keyword
    Trait,
    /// `function` declaration keyword
    Function,
    /// `const` declaration keyword
    Const,
    /// Bare identifier (function names, type names, call targets)
    Identifier,
    /// Variable token, sigil included in the content (`$total`)
    Variable,
    /// Single-quoted / constant string literal, quotes included in the content
    StringLiteral,
    /// Double-quoted string supporting `$name` interpolation, quotes included
    InterpolatedString,
    /// `->`
    ObjectOperator,
    /// `?->`
    NullsafeObjectOperator,
    /// `::`
    DoubleColon,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Comma,
    /// Visibility and declaration modifiers
    Public,
    Protected,
    Private,
    Static,
    Var,
    Abstract,
    Final,
    /// Any other operator or punctuation
    Operator,
    /// Any other keyword
    Keyword,
    Whitespace,
    Comment,
    DocComment,
    Other,
}

impl TokenKind {
    /// Tokens that carry no syntactic weight for navigation
    pub fn is_insignificant(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment | Self::DocComment)
    }

    /// Keywords that open a braced scope when followed by a body
    pub fn opens_scope(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Trait | Self::Function)
    }

    /// Object-oriented construct keywords
    pub fn is_oo(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Trait)
    }

    /// Operators that access a member through an object reference
    pub fn is_member_access(self) -> bool {
        matches!(self, Self::ObjectOperator | Self::NullsafeObjectOperator)
    }
}

/// Kinds skipped when searching past formatting and commentary
pub const INSIGNIFICANT: &[TokenKind] =
    &[TokenKind::Whitespace, TokenKind::Comment, TokenKind::DocComment];

/// Kinds skipped when only whitespace is transparent
pub const WHITESPACE: &[TokenKind] = &[TokenKind::Whitespace];

/// An immutable classified token with its source position
///
/// Produced and owned entirely by the stream; rules only borrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token
    pub content: String,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, line: u32, column: u32) -> Self {
        Self { kind, content: content.into(), line, column }
    }
}

/// Declared visibility of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Resolved metadata for a member-variable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberProperties {
    pub visibility: Visibility,
    /// Whether the visibility was written out or is the implicit default
    pub visibility_specified: bool,
    pub is_static: bool,
}

/// Read-only navigable view over a tokenized source file
///
/// Positions are indices into the stream. Scope chains list the positions of
/// the scope-opening keyword tokens of every enclosing construct, outermost
/// first and innermost last.
pub trait TokenStream {
    /// Number of tokens in the stream
    fn len(&self) -> usize;

    /// Whether the stream holds no tokens
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The token at a position, if in bounds
    fn token_at(&self, position: usize) -> Option<&Token>;

    /// Find the first position in `from..to` whose kind is in `kinds`
    /// (or not in `kinds` when `negate` is set). `to` defaults to the end.
    fn find_next(
        &self,
        kinds: &[TokenKind],
        from: usize,
        to: Option<usize>,
        negate: bool,
    ) -> Option<usize>;

    /// Symmetric to [`find_next`](Self::find_next), scanning backward from
    /// `from` down to `to` (default 0), both inclusive.
    fn find_previous(
        &self,
        kinds: &[TokenKind],
        from: usize,
        to: Option<usize>,
        negate: bool,
    ) -> Option<usize>;

    /// The declared name for a declaration-keyword token, if any
    ///
    /// Absent for anonymous classes and closures; callers must treat absence
    /// as "skip, no verdict".
    fn declaration_name_at(&self, position: usize) -> Option<&str>;

    /// Positions of the scope-opening tokens enclosing `position`, innermost last
    fn scope_chain_at(&self, position: usize) -> Vec<usize>;

    /// Metadata for a member-variable declaration, `None` when unresolvable
    fn member_properties_at(&self, position: usize) -> Option<MemberProperties>;
}

/// Span of a braced scope: the opening keyword and its body's brace pair
#[derive(Debug, Clone, Copy)]
struct ScopeSpan {
    opener: usize,
    open_brace: usize,
    close_brace: usize,
}

/// In-memory [`TokenStream`] over a flat token vector
///
/// Scope spans are resolved once at construction by brace tracking: a
/// declaration keyword is bound to the next `{` at the same nesting level
/// unless a statement terminator intervenes (body-less declarations such as
/// interface method signatures).
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    scopes: Vec<ScopeSpan>,
}

impl TokenBuffer {
    /// Build a buffer from tokens produced by an external tokenizer
    pub fn new(tokens: Vec<Token>) -> Self {
        let scopes = Self::resolve_scopes(&tokens);
        Self { tokens, scopes }
    }

    /// All tokens, in stream order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn resolve_scopes(tokens: &[Token]) -> Vec<ScopeSpan> {
        let mut spans = Vec::new();
        // Keyword waiting for its opening brace
        let mut pending: Option<usize> = None;
        let mut stack: Vec<(Option<usize>, usize)> = Vec::new();
        let mut paren_depth = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Class | TokenKind::Interface | TokenKind::Trait
                | TokenKind::Function => {
                    pending = Some(i);
                }
                TokenKind::OpenParen => paren_depth += 1,
                TokenKind::CloseParen => paren_depth = paren_depth.saturating_sub(1),
                // Body-less declaration (abstract/interface method signature)
                TokenKind::Semicolon if paren_depth == 0 => pending = None,
                TokenKind::OpenBrace => stack.push((pending.take(), i)),
                TokenKind::CloseBrace => {
                    if let Some((opener, open_brace)) = stack.pop() {
                        if let Some(opener) = opener {
                            spans.push(ScopeSpan { opener, open_brace, close_brace: i });
                        }
                    }
                }
                _ => {}
            }
        }

        // Truncated input: close whatever is still open at the end of the stream
        while let Some((opener, open_brace)) = stack.pop() {
            if let Some(opener) = opener {
                spans.push(ScopeSpan { opener, open_brace, close_brace: tokens.len() });
            }
        }

        spans.sort_by_key(|span| span.open_brace);
        spans
    }
}

impl TokenStream for TokenBuffer {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn token_at(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    fn find_next(
        &self,
        kinds: &[TokenKind],
        from: usize,
        to: Option<usize>,
        negate: bool,
    ) -> Option<usize> {
        let to = to.unwrap_or(self.tokens.len()).min(self.tokens.len());
        (from..to).find(|&i| kinds.contains(&self.tokens[i].kind) != negate)
    }

    fn find_previous(
        &self,
        kinds: &[TokenKind],
        from: usize,
        to: Option<usize>,
        negate: bool,
    ) -> Option<usize> {
        if self.tokens.is_empty() {
            return None;
        }
        let from = from.min(self.tokens.len() - 1);
        let to = to.unwrap_or(0);
        (to..=from).rev().find(|&i| kinds.contains(&self.tokens[i].kind) != negate)
    }

    fn declaration_name_at(&self, position: usize) -> Option<&str> {
        let token = self.tokens.get(position)?;
        if !token.kind.opens_scope() {
            return None;
        }

        let mut i = position + 1;
        while let Some(candidate) = self.tokens.get(i) {
            match candidate.kind {
                kind if kind.is_insignificant() => {}
                // By-reference marker between the keyword and the name
                TokenKind::Operator => {}
                TokenKind::Identifier => return Some(&candidate.content),
                // Hit `(` or `{` first: closure or anonymous class
                _ => return None,
            }
            i += 1;
        }
        None
    }

    fn scope_chain_at(&self, position: usize) -> Vec<usize> {
        self.scopes
            .iter()
            .filter(|span| span.open_brace < position && position < span.close_brace)
            .map(|span| span.opener)
            .collect()
    }

    fn member_properties_at(&self, position: usize) -> Option<MemberProperties> {
        let token = self.tokens.get(position)?;
        if token.kind != TokenKind::Variable {
            return None;
        }

        // Only direct members of an object-oriented body have properties
        let deepest = *self.scope_chain_at(position).last()?;
        if !self.tokens[deepest].kind.is_oo() {
            return None;
        }

        let mut visibility = None;
        let mut is_static = false;
        let mut i = position;
        while i > 0 {
            i -= 1;
            let preceding = &self.tokens[i];
            match preceding.kind {
                kind if kind.is_insignificant() => {}
                TokenKind::Public => {
                    visibility.get_or_insert(Visibility::Public);
                }
                TokenKind::Protected => {
                    visibility.get_or_insert(Visibility::Protected);
                }
                TokenKind::Private => {
                    visibility.get_or_insert(Visibility::Private);
                }
                TokenKind::Static => is_static = true,
                TokenKind::Var => {}
                // Type hint or nullable marker between modifiers and the name
                TokenKind::Identifier | TokenKind::Operator => {}
                // Start of the statement reached
                TokenKind::Semicolon | TokenKind::OpenBrace | TokenKind::CloseBrace
                | TokenKind::Comma => break,
                // Anything else means this is not a property declaration
                _ => return None,
            }
        }

        let visibility_specified = visibility.is_some();
        Some(MemberProperties {
            visibility: visibility.unwrap_or(Visibility::Public),
            visibility_specified,
            is_static,
        })
    }
}

/// Build a buffer from `(kind, content)` pairs, assigning positions by
/// accumulating the content text. Test-only convenience shared by rule tests.
#[cfg(test)]
pub(crate) fn stream_of(parts: &[(TokenKind, &str)]) -> TokenBuffer {
    let mut line = 1u32;
    let mut column = 1u32;
    let mut tokens = Vec::with_capacity(parts.len());
    for (kind, content) in parts {
        tokens.push(Token::new(*kind, *content, line, column));
        for ch in content.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
    }
    TokenBuffer::new(tokens)
}
