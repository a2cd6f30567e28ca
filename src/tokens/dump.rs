//! JSON token-dump loading for pre-tokenized source files
//!
//! Architecture: Anti-Corruption Layer - dumps translate an external tokenizer's
//! output into the domain token model
//! - The tokenizer runs elsewhere; this crate only deserializes its dump
//! - A dump records the source path it was produced from so violations can be
//!   attributed to the original file

use crate::domain::violations::{NameguardError, NameguardResult};
use crate::tokens::{Token, TokenBuffer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A tokenized source file as emitted by an external tokenizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDump {
    /// Path of the source file the tokens were produced from
    pub source: PathBuf,
    /// The classified tokens, in stream order
    pub tokens: Vec<Token>,
}

impl TokenDump {
    /// Load a dump from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NameguardResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            NameguardError::dump(path.display().to_string(), format!("failed to read: {e}"))
        })?;
        Self::load_from_str(&contents)
            .map_err(|e| NameguardError::dump(path.display().to_string(), e.to_string()))
    }

    /// Parse a dump from JSON content
    pub fn load_from_str(content: &str) -> NameguardResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| NameguardError::dump("<string>", format!("invalid dump: {e}")))
    }

    /// Consume the dump, producing the source path and a navigable stream
    pub fn into_stream(self) -> (PathBuf, TokenBuffer) {
        (self.source, TokenBuffer::new(self.tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;

    #[test]
    fn test_dump_round_trip() {
        let dump = TokenDump {
            source: PathBuf::from("src/order.php"),
            tokens: vec![
                Token::new(TokenKind::Class, "class", 1, 1),
                Token::new(TokenKind::Whitespace, " ", 1, 6),
                Token::new(TokenKind::Identifier, "MiOrder", 1, 7),
            ],
        };

        let json = serde_json::to_string(&dump).unwrap();
        let parsed = TokenDump::load_from_str(&json).unwrap();
        assert_eq!(parsed.source, Path::new("src/order.php"));
        assert_eq!(parsed.tokens.len(), 3);
        assert_eq!(parsed.tokens[2].content, "MiOrder");
    }

    #[test]
    fn test_dump_kind_tags_are_snake_case() {
        let json = r#"{
            "source": "a.php",
            "tokens": [
                {"kind": "interpolated_string", "content": "\"$x\"", "line": 1, "column": 1},
                {"kind": "double_colon", "content": "::", "line": 1, "column": 7}
            ]
        }"#;

        let parsed = TokenDump::load_from_str(json).unwrap();
        assert_eq!(parsed.tokens[0].kind, TokenKind::InterpolatedString);
        assert_eq!(parsed.tokens[1].kind, TokenKind::DoubleColon);
    }

    #[test]
    fn test_invalid_dump_is_an_error() {
        let err = TokenDump::load_from_str("{not json").unwrap_err();
        assert!(err.to_string().contains("invalid dump"));
    }
}
