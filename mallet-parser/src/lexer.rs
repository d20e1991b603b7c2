// mallet-parser - Lexer for mallet
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lexer (tokeniser) for mallet source code.
//!
//! Whitespace and commas separate tokens and are discarded. Every other
//! character starts some token, so tokenising never fails: malformed input
//! such as an unterminated string is reported by the parser.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Reader macros
    Quote,         // '
    Quasiquote,    // `
    Unquote,       // ~
    SpliceUnquote, // ~@
    Deref,         // @

    /// String literal body with escapes kept verbatim
    String { text: String, terminated: bool },
    /// Line comment, without the leading `;`
    Comment(String),
    /// Any other run of non-delimiter characters
    Atom(String),

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Quote => write!(f, "'"),
            Token::Quasiquote => write!(f, "`"),
            Token::Unquote => write!(f, "~"),
            Token::SpliceUnquote => write!(f, "~@"),
            Token::Deref => write!(f, "@"),
            Token::String { text, terminated } => {
                write!(f, "\"{}", text)?;
                if *terminated {
                    write!(f, "\"")?;
                }
                Ok(())
            }
            Token::Comment(text) => write!(f, ";{}", text),
            Token::Atom(text) => write!(f, "{}", text),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// The lexer converts source code into tokens.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_separators();

        let c = match self.peek() {
            Some(c) => c,
            None => return Token::Eof,
        };

        match c {
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '\'' => self.single(Token::Quote),
            '`' => self.single(Token::Quasiquote),
            '@' => self.single(Token::Deref),
            '~' => {
                self.advance();
                if self.peek() == Some('@') {
                    self.advance();
                    Token::SpliceUnquote
                } else {
                    Token::Unquote
                }
            }
            '"' => self.read_string(),
            ';' => self.read_comment(),
            _ => self.read_atom(),
        }
    }

    /// Collect all tokens (excluding the final `Eof`) into a vector.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if matches!(token, Token::Eof) {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    /// Get the current line number (1-indexed).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the current column number (1-indexed).
    pub fn column(&self) -> usize {
        self.column
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        c
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ',' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self) -> Token {
        self.advance(); // consume opening "
        let mut text = String::new();

        loop {
            match self.advance() {
                Some('"') => {
                    return Token::String {
                        text,
                        terminated: true,
                    };
                }
                Some('\\') => {
                    // Keep the escape verbatim; the parser resolves it
                    text.push('\\');
                    match self.advance() {
                        Some(c) => text.push(c),
                        None => break,
                    }
                }
                Some(c) => text.push(c),
                None => break,
            }
        }

        Token::String {
            text,
            terminated: false,
        }
    }

    fn read_comment(&mut self) -> Token {
        self.advance(); // consume ;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token::Comment(text)
    }

    fn read_atom(&mut self) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !is_atom_char(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token::Atom(text)
    }
}

/// Characters that may continue an atom token. `~` and `@` are only
/// punctuation at the start of a token.
fn is_atom_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '"' | '`' | ',' | ';')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(s: &str) -> Vec<Token> {
        Lexer::new(s).tokenize()
    }

    fn atom(s: &str) -> Token {
        Token::Atom(s.to_string())
    }

    fn string(s: &str) -> Token {
        Token::String {
            text: s.to_string(),
            terminated: true,
        }
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            tokenize("( ) [ ] { }"),
            vec![
                Token::LParen,
                Token::RParen,
                Token::LBracket,
                Token::RBracket,
                Token::LBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_reader_macros() {
        assert_eq!(
            tokenize("' ` ~ ~@ @"),
            vec![
                Token::Quote,
                Token::Quasiquote,
                Token::Unquote,
                Token::SpliceUnquote,
                Token::Deref,
            ]
        );
    }

    #[test]
    fn test_commas_are_whitespace() {
        assert_eq!(tokenize("1,2 ,, 3"), vec![atom("1"), atom("2"), atom("3")]);
    }

    #[test]
    fn test_atoms_stop_at_delimiters() {
        assert_eq!(
            tokenize("(+ 1 abc)"),
            vec![Token::LParen, atom("+"), atom("1"), atom("abc"), Token::RParen]
        );
        assert_eq!(tokenize("a'b"), vec![atom("a"), Token::Quote, atom("b")]);
    }

    #[test]
    fn test_tilde_and_at_inside_atom() {
        assert_eq!(tokenize("swap!@x a~b"), vec![atom("swap!@x"), atom("a~b")]);
    }

    #[test]
    fn test_strings_keep_escapes() {
        assert_eq!(tokenize(r#""""#), vec![string("")]);
        assert_eq!(tokenize(r#""a\nb""#), vec![string(r"a\nb")]);
        assert_eq!(tokenize(r#""say \"hi\"""#), vec![string(r#"say \"hi\""#)]);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokenize(r#""abc"#),
            vec![Token::String {
                text: "abc".to_string(),
                terminated: false
            }]
        );
        // The escaped quote does not close the literal
        assert_eq!(
            tokenize(r#""abc\""#),
            vec![Token::String {
                text: r#"abc\""#.to_string(),
                terminated: false
            }]
        );
    }

    #[test]
    fn test_comments_run_to_end_of_line() {
        assert_eq!(
            tokenize("1 ; note (not code)\n2"),
            vec![
                atom("1"),
                Token::Comment(" note (not code)".to_string()),
                atom("2"),
            ]
        );
    }

    #[test]
    fn test_keywords_and_symbols_are_atoms() {
        assert_eq!(
            tokenize(":kw sym -12 nil"),
            vec![atom(":kw"), atom("sym"), atom("-12"), atom("nil")]
        );
    }

    #[test]
    fn test_position_tracking() {
        let mut lexer = Lexer::new("a\n  b");
        assert_eq!(lexer.next_token(), atom("a"));
        assert_eq!(lexer.next_token(), atom("b"));
        assert_eq!(lexer.line(), 2);
        assert_eq!(lexer.column(), 4);
    }

    #[test]
    fn test_display_round_trips_token_text() {
        let tokens = tokenize(r#"(def! x "a\"b") ; c"#);
        let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["(", "def!", "x", r#""a\"b""#, ")", "; c"]
        );
    }
}
