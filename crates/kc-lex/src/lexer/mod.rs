//! The lexer: classifies bytes into the flat token sequence described in
//! §4.1, dispatching on the first byte of each token in the priority order
//! the spec lays out. Grounded in `faxc-lex`'s `Lexer`/`Cursor` split,
//! simplified to this language's much smaller alphabet (no comments, no
//! escape sequences, no Unicode identifiers).

mod scan;

use kc_util::Span;

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{Token, TokenKind};
use scan::is_symbol_byte;

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Reads `path` and tokenizes its contents, returning the flat sequence
    /// of tokens ending in exactly one `Eof` (§8, invariant 1).
    pub fn tokenize_file(path: &std::path::Path) -> Result<Vec<Token>, LexError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| LexError::CannotOpen(path.display().to_string(), e.to_string()))?;
        Ok(Self::new(&source).tokenize())
    }

    /// Tokenizes an in-memory source string.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn span(&self) -> Span {
        Span::new(self.cursor.line(), self.cursor.column())
    }

    /// Returns the next token, or `Eof` once the source is exhausted.
    /// Whitespace is skipped before each token is classified.
    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let span = self.span();

        let Some(b) = self.cursor.current() else {
            return Token::eof(span);
        };

        match b {
            b'(' => self.single(TokenKind::LParen, span),
            b')' => self.single(TokenKind::RParen, span),
            b'[' => self.single(TokenKind::LBracket, span),
            b']' => self.single(TokenKind::RBracket, span),
            b'{' => self.single(TokenKind::LBrace, span),
            b'}' => self.single(TokenKind::RBrace, span),
            b',' => self.single(TokenKind::Comma, span),
            b';' => self.single(TokenKind::Semicolon, span),
            b'0'..=b'9' => {
                let lexeme = self.consume_run(|b| b.is_ascii_digit());
                Token::new(TokenKind::Digit, lexeme, span)
            }
            b'a'..=b'z' => {
                let lexeme = self.consume_run(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
                Token::new(TokenKind::SmallName, lexeme, span)
            }
            b'A'..=b'Z' => {
                let lexeme = self.consume_run(|b| b.is_ascii_alphanumeric());
                Token::new(TokenKind::CapitalName, lexeme, span)
            }
            b'"' => self.scan_double_quoted(span),
            b if is_symbol_byte(b) => {
                let lexeme = self.consume_run(is_symbol_byte);
                Token::new(TokenKind::Symbol, lexeme, span)
            }
            _ => {
                // Any other byte is treated as whitespace (§4.1, rule 7):
                // skip it and classify what follows.
                self.cursor.advance();
                self.next_token()
            }
        }
    }

    fn single(&mut self, kind: TokenKind, span: Span) -> Token {
        let b = self.cursor.advance().expect("caller already peeked this byte");
        Token::new(kind, (b as char).to_string(), span)
    }

    /// Consumes through the matching unescaped `"`, per §4.1 rule 6. The
    /// lexeme includes both surrounding quotes; the parser strips them.
    fn scan_double_quoted(&mut self, span: Span) -> Token {
        let mut buf = vec![self.cursor.advance().expect("caller already peeked '\"'")];
        while let Some(b) = self.cursor.advance() {
            buf.push(b);
            if b == b'"' {
                break;
            }
        }
        Token::new(TokenKind::DoubleQuoted, String::from_utf8_lossy(&buf).into_owned(), span)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.cursor.current() {
            if b.is_ascii_whitespace() {
                self.cursor.advance();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    fn lexemes(source: &str) -> Vec<String> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.lexeme).collect()
    }

    #[test]
    fn ends_in_exactly_one_eof() {
        let toks = Lexer::new("DefFn").tokenize();
        assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(toks.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn classifies_punctuation() {
        assert_eq!(
            kinds("(){}[],;"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn digit_run_is_maximal() {
        assert_eq!(lexemes("123 45"), vec!["123", "45", ""]);
    }

    #[test]
    fn small_name_allows_digits_and_underscore() {
        assert_eq!(kinds("foo_1")[0], TokenKind::SmallName);
        assert_eq!(lexemes("foo_1")[0], "foo_1");
    }

    #[test]
    fn capital_name_has_no_underscore() {
        let toks = Lexer::new("Foo_Bar").tokenize();
        assert_eq!(toks[0].kind, TokenKind::CapitalName);
        assert_eq!(toks[0].lexeme, "Foo");
    }

    #[test]
    fn symbol_run_is_maximal() {
        assert_eq!(kinds("->")[0], TokenKind::Symbol);
        assert_eq!(lexemes("->")[0], "->");
        assert_eq!(lexemes("+ -")[..2], ["+".to_string(), "-".to_string()]);
    }

    #[test]
    fn double_quoted_includes_quotes() {
        let toks = Lexer::new("\"ab\"").tokenize();
        assert_eq!(toks[0].kind, TokenKind::DoubleQuoted);
        assert_eq!(toks[0].lexeme, "\"ab\"");
    }

    #[test]
    fn whitespace_is_a_separator_and_is_discarded() {
        assert_eq!(kinds("  \n\t a "), vec![TokenKind::SmallName, TokenKind::Eof]);
    }

    #[test]
    fn non_ascii_byte_is_treated_as_whitespace() {
        // 0x01 is outside every classification rule.
        let src = "a\u{1}b";
        assert_eq!(kinds(src), vec![TokenKind::SmallName, TokenKind::SmallName, TokenKind::Eof]);
    }

    #[test]
    fn concatenated_lexemes_are_a_subsequence_of_the_input() {
        let src = "DefFn add(a: i32, b: i32) -> i32 { a + b }";
        let toks = Lexer::new(src).tokenize();
        let concatenated: String = toks
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.lexeme.as_str())
            .collect();
        let without_whitespace: String = src.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(concatenated, without_whitespace);
    }
}
