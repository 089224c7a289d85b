mod token;

pub use token::*;

use once_cell::sync::Lazy;
use std::{collections::HashMap, error::Error, fmt::Display, iter::Peekable, str::Chars};

macro_rules! keyword {
    ($map:ident, $name:ident, $value:expr) => {
        $map.insert($value, Terminal::$name);
    };
}

/// Keyword lexemes, matched byte-for-byte against scanned words. No
/// normalization and no folding; only these exact sequences are keywords.
static KEYWORDS: Lazy<HashMap<&'static str, Terminal>> = Lazy::new(|| {
    let mut m = HashMap::new();

    keyword!(m, VarKeyword, "متغير");
    keyword!(m, IfKeyword, "اذا");
    keyword!(m, ElseKeyword, "والا");
    keyword!(m, WhileKeyword, "بينما");
    keyword!(m, FnKeyword, "دالة");
    keyword!(m, ReturnKeyword, "ارجع");
    keyword!(m, PrintKeyword, "اطبع");

    m
});

pub const ARABIC_SEMICOLON: char = '\u{061B}';
pub const ARABIC_COMMA: char = '\u{060C}';

/// First scalar of an identifier: an ASCII letter, an underscore, or anything
/// in the Arabic block except the punctuation we lex as terminals.
fn is_word_start(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
        || (('\u{0600}'..='\u{06FF}').contains(&c) && c != ARABIC_SEMICOLON && c != ARABIC_COMMA)
}

fn is_word_continue(c: char) -> bool {
    is_word_start(c) || c.is_ascii_digit()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnexpectedCharacter { scalar: char, position: Position },
    NumberTooLarge { lexeme: String, position: Position },
}

pub type LexResult<T> = Result<T, LexError>;

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::UnexpectedCharacter { scalar, position } => f.write_fmt(format_args!(
                "unexpected character '{scalar}' (U+{:04X}) at {position}",
                *scalar as u32
            )),
            LexError::NumberTooLarge { lexeme, position } => f.write_fmt(format_args!(
                "numeric literal '{lexeme}' does not fit into 64 bits at {position}"
            )),
        }
    }
}

impl Error for LexError {}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iterator: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iterator = input.chars().peekable();

        Self {
            tokens: vec![],
            iterator,
            line: 1,
            col: 1,
            offset: 0,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.iterator.peek()
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.iterator.next()?;

        self.offset += next.len_utf8();
        if next == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }

        Some(next)
    }

    fn bump_if(&mut self, func: impl FnOnce(&char) -> bool) -> Option<char> {
        if func(self.peek()?) {
            return self.bump();
        }

        None
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col, self.offset)
    }

    fn eat_whitespace(&mut self) {
        while self
            .bump_if(|item| matches!(*item, ' ' | '\t' | '\r' | '\n'))
            .is_some()
        {}
    }

    /// Tokenize the whole input. The returned stream always ends in exactly
    /// one `Eof` token; the first unrecognized scalar aborts with no partial
    /// stream.
    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        loop {
            self.eat_whitespace();

            let Some(next) = self.peek().copied() else {
                self.tokens.push(Token::Eof {
                    position: self.position(),
                });
                return Ok(self.tokens);
            };

            if is_word_start(next) {
                self.lex_word()?;
            } else if next.is_ascii_digit() {
                self.lex_numeric()?;
            } else {
                self.lex_symbol()?;
            }
        }
    }

    fn lex_word(&mut self) -> LexResult<()> {
        let mut stack = vec![];

        let position = self.position();

        while let Some(next) = self.bump_if(|item| is_word_continue(*item)) {
            stack.push(next);
        }

        let read = stack.iter().collect::<String>();

        if let Some(keyword) = KEYWORDS.get(read.as_str()) {
            self.tokens.push(keyword.to_token(position));
        } else {
            self.tokens.push(Token::Id {
                value: read,
                position,
            });
        }

        Ok(())
    }

    fn lex_numeric(&mut self) -> LexResult<()> {
        let mut stack = vec![];

        let position = self.position();

        while let Some(next) = self.bump_if(|item| item.is_ascii_digit()) {
            stack.push(next);
        }

        let read = stack.iter().collect::<String>();

        let num = read
            .parse::<i64>()
            .map(|value| Token::Num { value, position })
            .map_err(|_| LexError::NumberTooLarge {
                lexeme: read.clone(),
                position,
            })?;

        self.tokens.push(num);

        Ok(())
    }

    fn lex_symbol(&mut self) -> LexResult<()> {
        let position = self.position();

        let Some(current) = self.bump() else {
            return Ok(());
        };

        let terminal = match current {
            '/' => {
                if self.bump_if(|item| *item == '/').is_some() {
                    // line comment, consumed up to and including the newline
                    while let Some(next) = self.bump() {
                        if next == '\n' {
                            break;
                        }
                    }
                    return Ok(());
                }
                Terminal::Slash
            }
            '=' => {
                if self.bump_if(|item| *item == '=').is_some() {
                    Terminal::Equal
                } else {
                    Terminal::Assign
                }
            }
            '!' => {
                if self.bump_if(|item| *item == '=').is_some() {
                    Terminal::NotEqual
                } else {
                    return Err(LexError::UnexpectedCharacter {
                        scalar: current,
                        position,
                    });
                }
            }
            '<' => {
                if self.bump_if(|item| *item == '=').is_some() {
                    Terminal::LessEqual
                } else {
                    Terminal::LessThan
                }
            }
            '>' => {
                if self.bump_if(|item| *item == '=').is_some() {
                    Terminal::GreaterEqual
                } else {
                    Terminal::GreaterThan
                }
            }
            '+' => Terminal::Plus,
            '-' => Terminal::Minus,
            '*' => Terminal::Times,
            '(' => Terminal::LParen,
            ')' => Terminal::RParen,
            '{' => Terminal::LBrace,
            '}' => Terminal::RBrace,
            ARABIC_SEMICOLON => Terminal::Semicolon,
            ARABIC_COMMA => Terminal::Comma,
            _ => {
                return Err(LexError::UnexpectedCharacter {
                    scalar: current,
                    position,
                })
            }
        };

        self.tokens.push(terminal.to_token(position));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_alphabetic_id() {
        let lexer = Lexer::new("letter");

        assert_eq!(
            Ok(vec![
                Token::Id {
                    value: "letter".into(),
                    position: Position::new(1, 1, 0)
                },
                Token::Eof {
                    position: Position::new(1, 7, 6)
                }
            ]),
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_arabic_id() {
        let lexer = Lexer::new("عدد");

        assert_eq!(
            Ok(vec![
                Token::Id {
                    value: "عدد".into(),
                    position: Position::new(1, 1, 0)
                },
                Token::Eof {
                    position: Position::new(1, 4, 6)
                }
            ]),
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_numeric() {
        let lexer = Lexer::new("1337");

        assert_eq!(
            Ok(vec![
                Token::Num {
                    value: 1337,
                    position: Position::new(1, 1, 0)
                },
                Token::Eof {
                    position: Position::new(1, 5, 4)
                }
            ]),
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_keyword() {
        let lexer = Lexer::new("متغير");

        assert_eq!(
            Ok(vec![
                Token::VarKeyword {
                    position: Position::new(1, 1, 0)
                },
                Token::Eof {
                    position: Position::new(1, 6, 10)
                }
            ]),
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_declaration() {
        let lexer = Lexer::new("متغير س = 42؛");

        assert_eq!(
            Ok(vec![
                Token::VarKeyword {
                    position: Position::new(1, 1, 0)
                },
                Token::Id {
                    value: "س".into(),
                    position: Position::new(1, 7, 11)
                },
                Token::Assign {
                    position: Position::new(1, 9, 14)
                },
                Token::Num {
                    value: 42,
                    position: Position::new(1, 11, 16)
                },
                Token::Semicolon {
                    position: Position::new(1, 13, 18)
                },
                Token::Eof {
                    position: Position::new(1, 14, 20)
                }
            ]),
            lexer.lex()
        )
    }

    #[test]
    fn test_lex_function_head() {
        let tokens = Lexer::new("دالة جمع(ا، ب) {}").lex().unwrap();

        let kinds = tokens
            .iter()
            .map(|token| match token {
                Token::FnKeyword { .. } => "fn",
                Token::Id { .. } => "id",
                Token::LParen { .. } => "(",
                Token::RParen { .. } => ")",
                Token::Comma { .. } => "،",
                Token::LBrace { .. } => "{",
                Token::RBrace { .. } => "}",
                Token::Eof { .. } => "eof",
                other => panic!("unexpected token {other:?}"),
            })
            .collect::<Vec<_>>();

        assert_eq!(
            vec!["fn", "id", "(", "id", "،", "id", ")", "{", "}", "eof"],
            kinds
        );
    }

    #[test]
    fn test_lex_operators_greedy() {
        let tokens = Lexer::new("<= >= == != < > =").lex().unwrap();

        assert!(matches!(tokens[0], Token::LessEqual { .. }));
        assert!(matches!(tokens[1], Token::GreaterEqual { .. }));
        assert!(matches!(tokens[2], Token::Equal { .. }));
        assert!(matches!(tokens[3], Token::NotEqual { .. }));
        assert!(matches!(tokens[4], Token::LessThan { .. }));
        assert!(matches!(tokens[5], Token::GreaterThan { .. }));
        assert!(matches!(tokens[6], Token::Assign { .. }));
        assert!(matches!(tokens[7], Token::Eof { .. }));
    }

    #[test]
    fn test_lex_comment() {
        let lexer = Lexer::new("// تعليق\nاذا");

        assert_eq!(
            Ok(vec![
                Token::IfKeyword {
                    position: Position::new(2, 1, 14)
                },
                Token::Eof {
                    position: Position::new(2, 4, 20)
                }
            ]),
            lexer.lex()
        )
    }

    #[test]
    fn test_comment_prefix_does_not_shift_tail_kinds() {
        let plain = Lexer::new("ارجع 1؛").lex().unwrap();
        let prefixed = Lexer::new("// أ\n\nارجع 1؛").lex().unwrap();

        let kinds = |tokens: &[Token]| {
            tokens
                .iter()
                .map(|token| std::mem::discriminant(token))
                .collect::<Vec<_>>()
        };

        assert_eq!(kinds(&plain), kinds(&prefixed));
    }

    #[test]
    fn test_lex_single_eof() {
        let tokens = Lexer::new("دالة رئيسية() { ارجع 42؛ }").lex().unwrap();

        let eofs = tokens
            .iter()
            .filter(|token| matches!(token, Token::Eof { .. }))
            .count();

        assert_eq!(1, eofs);
        assert!(matches!(tokens.last(), Some(Token::Eof { .. })));
    }

    #[test]
    fn test_lex_unexpected_character() {
        let lexer = Lexer::new("متغير @");

        assert_eq!(
            Err(LexError::UnexpectedCharacter {
                scalar: '@',
                position: Position::new(1, 7, 11)
            }),
            lexer.lex()
        );
    }

    #[test]
    fn test_lex_bare_bang() {
        let lexer = Lexer::new("!");

        assert_eq!(
            Err(LexError::UnexpectedCharacter {
                scalar: '!',
                position: Position::new(1, 1, 0)
            }),
            lexer.lex()
        );
    }

    #[test]
    fn test_lex_number_too_large() {
        let lexer = Lexer::new("9223372036854775808");

        assert!(matches!(
            lexer.lex(),
            Err(LexError::NumberTooLarge { .. })
        ));
    }

    #[test]
    fn test_lex_max_number() {
        let tokens = Lexer::new("9223372036854775807").lex().unwrap();

        assert!(matches!(
            tokens[0],
            Token::Num {
                value: i64::MAX,
                ..
            }
        ));
    }
}
