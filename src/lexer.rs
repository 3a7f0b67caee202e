use thiserror::Error;

use crate::token::{Pos, Token, TokenKind};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("LexError: unexpected character '{character}' ({pos})")]
    UnexpectedCharacter { character: char, pos: Pos },
    #[error("LexError: unclosed string literal ({pos})")]
    UnterminatedString { pos: Pos },
    #[error("LexError: invalid escape '\\{character}' in string literal ({pos})")]
    InvalidEscape { character: char, pos: Pos },
    #[error("LexError: unclosed block comment ({pos})")]
    UnterminatedComment { pos: Pos },
    #[error("LexError: invalid numeric literal '{literal}' ({pos})")]
    InvalidNumericLiteral { literal: String, pos: Pos },
}

pub type LexResult<T> = Result<T, LexError>;

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_trivia()?;

        let start = self.current_pos();
        let Some(ch) = self.peek_char() else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        if ch.is_ascii_alphabetic() || ch == '_' {
            return Ok(self.read_identifier(start));
        }
        if ch.is_ascii_digit() {
            return self.read_number(start);
        }
        if ch == '"' {
            return self.read_string(start);
        }

        let kind = match ch {
            '=' => TokenKind::Equal,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            _ => {
                return Err(LexError::UnexpectedCharacter {
                    character: ch,
                    pos: start,
                });
            }
        };
        self.consume_char();
        Ok(Token::new(kind, start))
    }

    /// Skips whitespace, `//` line comments, and `/* */` block comments.
    fn skip_trivia(&mut self) -> LexResult<()> {
        loop {
            self.consume_while(|c| c.is_whitespace());
            if self.peek_char() != Some('/') {
                return Ok(());
            }
            match self.peek_second() {
                Some('/') => {
                    self.consume_while(|c| c != '\n');
                }
                Some('*') => {
                    let start = self.current_pos();
                    self.consume_char();
                    self.consume_char();
                    self.skip_block_comment(start)?;
                }
                // A lone '/' is not trivia; next_token reports it.
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self, start: Pos) -> LexResult<()> {
        // Comments do not nest; the first "*/" closes.
        while let Some(ch) = self.consume_char() {
            if ch == '*' && self.peek_char() == Some('/') {
                self.consume_char();
                return Ok(());
            }
        }
        Err(LexError::UnterminatedComment { pos: start })
    }

    fn read_identifier(&mut self, start: Pos) -> Token {
        let begin = self.pos;
        self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let word = &self.src[begin..self.pos];
        let kind =
            TokenKind::keyword(word).unwrap_or_else(|| TokenKind::Identifier(word.to_string()));
        Token::new(kind, start)
    }

    fn read_number(&mut self, start: Pos) -> LexResult<Token> {
        let begin = self.pos;
        self.consume_while(|c| c.is_ascii_digit());

        // A '.' continues the literal only when a digit follows; otherwise it
        // is the attribute-access dot and belongs to the next token.
        let is_float = self.peek_char() == Some('.')
            && self.peek_second().is_some_and(|c| c.is_ascii_digit());
        if is_float {
            self.consume_char();
            self.consume_while(|c| c.is_ascii_digit());
            let text = &self.src[begin..self.pos];
            let value = text
                .parse::<f64>()
                .map_err(|_| LexError::InvalidNumericLiteral {
                    literal: text.to_string(),
                    pos: start,
                })?;
            return Ok(Token::new(TokenKind::Float(value), start));
        }

        let text = &self.src[begin..self.pos];
        let value = text
            .parse::<i64>()
            .map_err(|_| LexError::InvalidNumericLiteral {
                literal: text.to_string(),
                pos: start,
            })?;
        Ok(Token::new(TokenKind::Integer(value), start))
    }

    fn read_string(&mut self, start: Pos) -> LexResult<Token> {
        self.consume_char(); // opening quote
        let mut text = String::new();
        loop {
            let char_pos = self.current_pos();
            match self.consume_char() {
                None => return Err(LexError::UnterminatedString { pos: start }),
                Some('"') => return Ok(Token::new(TokenKind::Str(text), start)),
                Some('\\') => {
                    let Some(escaped) = self.consume_char() else {
                        return Err(LexError::UnterminatedString { pos: start });
                    };
                    let decoded = match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '\\' => '\\',
                        '"' => '"',
                        '0' => '\0',
                        other => {
                            return Err(LexError::InvalidEscape {
                                character: other,
                                pos: char_pos,
                            });
                        }
                    };
                    text.push(decoded);
                }
                Some(ch) => text.push(ch),
            }
        }
    }

    fn consume_while<P>(&mut self, keep: P)
    where
        P: Fn(char) -> bool,
    {
        while let Some(c) = self.peek_char() {
            if !keep(c) {
                break;
            }
            self.consume_char();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn current_pos(&self) -> Pos {
        Pos::new(self.line, self.col)
    }
}

pub fn tokenize(src: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::Eof);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn lexes_simple_program() {
        let input = indoc! {r#"
            let a = mul([false], 3);
            print(a.count(true));
        "#};
        let expected = vec![
            TokenKind::Let,
            TokenKind::Identifier("a".to_string()),
            TokenKind::Equal,
            TokenKind::Identifier("mul".to_string()),
            TokenKind::LParen,
            TokenKind::LBracket,
            TokenKind::False,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Integer(3),
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Identifier("print".to_string()),
            TokenKind::LParen,
            TokenKind::Identifier("a".to_string()),
            TokenKind::Dot,
            TokenKind::Identifier("count".to_string()),
            TokenKind::LParen,
            TokenKind::True,
            TokenKind::RParen,
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ];
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn distinguishes_keywords_from_identifiers() {
        let input = "for of forx ofx null nullish";
        let expected = vec![
            TokenKind::For,
            TokenKind::Of,
            TokenKind::Identifier("forx".to_string()),
            TokenKind::Identifier("ofx".to_string()),
            TokenKind::Null,
            TokenKind::Identifier("nullish".to_string()),
            TokenKind::Eof,
        ];
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn lexes_numbers_and_trailing_dot() {
        // "1." is an integer followed by an attribute dot, not a float.
        let expected = vec![
            TokenKind::Float(1.5),
            TokenKind::Integer(2),
            TokenKind::Integer(1),
            TokenKind::Dot,
            TokenKind::Identifier("length".to_string()),
            TokenKind::Eof,
        ];
        assert_eq!(kinds("1.5 2 1.length"), expected);
    }

    #[test]
    fn skips_line_and_block_comments() {
        let input = indoc! {r#"
            // leading comment
            let x = 1; // trailing
            /* spanning
               lines */ print(x);
        "#};
        let expected = vec![
            TokenKind::Let,
            TokenKind::Identifier("x".to_string()),
            TokenKind::Equal,
            TokenKind::Integer(1),
            TokenKind::Semicolon,
            TokenKind::Identifier("print".to_string()),
            TokenKind::LParen,
            TokenKind::Identifier("x".to_string()),
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ];
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn decodes_string_escapes() {
        let tokens = tokenize(r#""a\nb\t\"\\\0""#).expect("tokenize should succeed");
        assert_eq!(tokens[0].kind, TokenKind::Str("a\nb\t\"\\\0".to_string()));
    }

    #[test]
    fn permits_literal_newline_in_string() {
        let tokens = tokenize("\"a\nb\"").expect("tokenize should succeed");
        assert_eq!(tokens[0].kind, TokenKind::Str("a\nb".to_string()));
    }

    #[test]
    fn tracks_line_and_column_positions() {
        let tokens = tokenize("let x = 1;\nprint(x);").expect("tokenize should succeed");
        let positions: Vec<(u32, u32)> = tokens
            .iter()
            .map(|token| (token.pos.line, token.pos.col))
            .collect();
        assert_eq!(
            positions,
            vec![
                (1, 1),
                (1, 5),
                (1, 7),
                (1, 9),
                (1, 10),
                (2, 1),
                (2, 6),
                (2, 7),
                (2, 8),
                (2, 9),
                (2, 10),
            ]
        );
    }

    #[test]
    fn positions_are_monotonically_nondecreasing() {
        let input = indoc! {r#"
            fn fib(n) {
                if (lt(n, 2)) { return n; }
                return add(fib(sub(n, 1)), fib(sub(n, 2)));
            }
            print(fib(10));
        "#};
        let tokens = tokenize(input).expect("tokenize should succeed");
        for pair in tokens.windows(2) {
            let (a, b) = (pair[0].pos, pair[1].pos);
            assert!(
                (a.line, a.col) <= (b.line, b.col),
                "position went backwards: {a} then {b}"
            );
        }
    }

    #[test]
    fn errors_on_unterminated_string() {
        let err = tokenize("let s = \"abc;").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::UnterminatedString {
                pos: Pos::new(1, 9)
            }
        );
    }

    #[test]
    fn errors_on_invalid_escape() {
        let err = tokenize(r#""a\q""#).expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::InvalidEscape {
                character: 'q',
                pos: Pos::new(1, 3)
            }
        );
    }

    #[test]
    fn errors_on_unclosed_block_comment() {
        let err = tokenize("let x = 1; /* oops").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::UnterminatedComment {
                pos: Pos::new(1, 12)
            }
        );
    }

    #[test]
    fn errors_on_unknown_character() {
        let err = tokenize("let x = 1 @ 2;").expect_err("expected lexing failure");
        assert!(err.to_string().contains("unexpected character '@'"));
        assert!(err.to_string().contains("(1:11)"));
    }

    #[test]
    fn errors_on_integer_overflow() {
        let err = tokenize("let n = 99999999999999999999;").expect_err("expected overflow");
        assert!(err.to_string().contains("invalid numeric literal"));
    }

    #[test]
    fn lone_slash_is_an_error() {
        let err = tokenize("let x = 1 / 2;").expect_err("expected lexing failure");
        assert!(err.to_string().contains("unexpected character '/'"));
    }
}
