// TOPOS-Xi lexer -- tokenizer for `.topology` source files.

mod cursor;

use cursor::Cursor;
use topos_common::error::{LexError, LexErrorKind};
use topos_common::span::Span;
use topos_common::token::{keyword_from_str, Token, TokenKind};

/// The TOPOS-Xi lexer. Converts source text into a stream of tokens.
///
/// Whitespace, newlines, and `//` line comments are discarded. The token
/// stream is terminated by a single `Eof` token. Lexing aborts on the
/// first unrecognized character.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token. The first
    /// lexical error aborts tokenization.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Produce the next token.
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let start = self.cursor.offset();

        let Some(c) = self.cursor.peek() else {
            return Ok(Token::new(TokenKind::Eof, start, start));
        };

        let token = match c {
            // ── Delimiters ─────────────────────────────────────────────
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            ':' => self.single_char_token(TokenKind::Colon, start),

            // ── Operators ──────────────────────────────────────────────
            '-' => self.lex_minus(start),
            '=' => self.single_char_token(TokenKind::Eq, start),
            '<' => self.single_char_token(TokenKind::Lt, start),
            '>' => self.single_char_token(TokenKind::Gt, start),
            '+' => self.single_char_token(TokenKind::Plus, start),
            '*' => self.single_char_token(TokenKind::Star, start),
            '/' => self.single_char_token(TokenKind::Slash, start),

            // ── Literals, identifiers, keywords ────────────────────────
            '0'..='9' => self.lex_number(start),
            '"' => self.lex_string(start)?,
            c if is_ident_start(c) => self.lex_ident(start),

            c => {
                self.cursor.bump();
                return Err(LexError::new(
                    LexErrorKind::UnexpectedCharacter(c),
                    Span::new(start, self.cursor.offset()),
                ));
            }
        };
        Ok(token)
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Skip whitespace (including newlines) and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_whitespace());
            if self.cursor.peek() == Some('/') && self.cursor.peek_second() == Some('/') {
                self.cursor.eat_while(|c| c != '\n');
            } else {
                return;
            }
        }
    }

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.bump();
        Token::new(kind, start, self.cursor.offset())
    }

    /// `-` -> `Minus`, `->` -> `Arrow`
    fn lex_minus(&mut self, start: u32) -> Token {
        self.cursor.bump(); // consume '-'
        if self.cursor.peek() == Some('>') {
            self.cursor.bump();
            Token::new(TokenKind::Arrow, start, self.cursor.offset())
        } else {
            Token::new(TokenKind::Minus, start, self.cursor.offset())
        }
    }

    /// Lex a number literal: digits, optionally `.` and more digits.
    fn lex_number(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.') {
            self.cursor.bump(); // consume '.'
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        Token::new(TokenKind::NumberLiteral, start, self.cursor.offset())
    }

    /// Lex a string literal. No escape sequences; any character except
    /// the closing quote is content.
    fn lex_string(&mut self, start: u32) -> Result<Token, LexError> {
        self.cursor.bump(); // consume opening '"'
        self.cursor.eat_while(|c| c != '"');
        if self.cursor.at_end() {
            return Err(LexError::new(
                LexErrorKind::UnterminatedString,
                Span::new(start, self.cursor.offset()),
            ));
        }
        self.cursor.bump(); // consume closing '"'
        Ok(Token::new(TokenKind::StringLiteral, start, self.cursor.offset()))
    }

    /// Lex an identifier or keyword.
    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.bump(); // consume first char
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.offset());
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, start, self.cursor.offset())
    }
}

/// Whether a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .expect("lexing should succeed")
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lex_space_header() {
        assert_eq!(
            kinds("space QuantumRegister {"),
            vec![
                TokenKind::Space,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_arrow_vs_minus() {
        assert_eq!(
            kinds("a -> b - c"),
            vec![
                TokenKind::Ident,
                TokenKind::Arrow,
                TokenKind::Ident,
                TokenKind::Minus,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        let tokens = Lexer::tokenize("42 3.14 7.").unwrap();
        let source = "42 3.14 7.";
        assert_eq!(tokens[0].text(source), "42");
        assert_eq!(tokens[1].text(source), "3.14");
        assert_eq!(tokens[2].text(source), "7.");
        assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::NumberLiteral));
    }

    #[test]
    fn lex_string_strips_quotes_via_text() {
        let source = "x = \"Z x Z\"";
        let tokens = Lexer::tokenize(source).unwrap();
        assert_eq!(tokens[2].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[2].text(source), "Z x Z");
    }

    #[test]
    fn lex_comment_discarded() {
        assert_eq!(
            kinds("x // trailing comment\ny"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn lex_underscore_is_an_identifier() {
        let tokens = Lexer::tokenize("_").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text("_"), "_");
    }

    #[test]
    fn lex_unexpected_character() {
        let err = Lexer::tokenize("space @").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('@'));
        assert_eq!(err.span, Span::new(6, 7));
    }

    #[test]
    fn lex_unterminated_string() {
        let err = Lexer::tokenize("\"open").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn lex_empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }
}
