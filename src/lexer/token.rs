use std::fmt::Display;

use serde::Serialize;

/// Location of a token or AST node in the source text. `line` and `col` are
/// 1-based and count Unicode scalar values; `offset` is the 0-based byte
/// offset of the first scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, col: usize, offset: usize) -> Self {
        Self { line, col, offset }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}:{}", self.line, self.col))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    VarKeyword { position: Position },
    IfKeyword { position: Position },
    ElseKeyword { position: Position },
    WhileKeyword { position: Position },
    FnKeyword { position: Position },
    ReturnKeyword { position: Position },
    PrintKeyword { position: Position },
    Id { value: String, position: Position },
    Num { value: i64, position: Position },
    LParen { position: Position },
    RParen { position: Position },
    LBrace { position: Position },
    RBrace { position: Position },
    Comma { position: Position },
    Semicolon { position: Position },
    Assign { position: Position },
    Plus { position: Position },
    Minus { position: Position },
    Times { position: Position },
    Slash { position: Position },
    Equal { position: Position },
    NotEqual { position: Position },
    LessThan { position: Position },
    GreaterThan { position: Position },
    LessEqual { position: Position },
    GreaterEqual { position: Position },
    Eof { position: Position },
}

/// The payload-free counterpart of [Token]. Used as the value type of the
/// keyword table and for `expect`-style matching in the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    VarKeyword,
    IfKeyword,
    ElseKeyword,
    WhileKeyword,
    FnKeyword,
    ReturnKeyword,
    PrintKeyword,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Assign,
    Plus,
    Minus,
    Times,
    Slash,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
}

impl Terminal {
    pub fn to_token(self, position: Position) -> Token {
        match self {
            Terminal::VarKeyword => Token::VarKeyword { position },
            Terminal::IfKeyword => Token::IfKeyword { position },
            Terminal::ElseKeyword => Token::ElseKeyword { position },
            Terminal::WhileKeyword => Token::WhileKeyword { position },
            Terminal::FnKeyword => Token::FnKeyword { position },
            Terminal::ReturnKeyword => Token::ReturnKeyword { position },
            Terminal::PrintKeyword => Token::PrintKeyword { position },
            Terminal::LParen => Token::LParen { position },
            Terminal::RParen => Token::RParen { position },
            Terminal::LBrace => Token::LBrace { position },
            Terminal::RBrace => Token::RBrace { position },
            Terminal::Comma => Token::Comma { position },
            Terminal::Semicolon => Token::Semicolon { position },
            Terminal::Assign => Token::Assign { position },
            Terminal::Plus => Token::Plus { position },
            Terminal::Minus => Token::Minus { position },
            Terminal::Times => Token::Times { position },
            Terminal::Slash => Token::Slash { position },
            Terminal::Equal => Token::Equal { position },
            Terminal::NotEqual => Token::NotEqual { position },
            Terminal::LessThan => Token::LessThan { position },
            Terminal::GreaterThan => Token::GreaterThan { position },
            Terminal::LessEqual => Token::LessEqual { position },
            Terminal::GreaterEqual => Token::GreaterEqual { position },
        }
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Terminal::VarKeyword => "متغير",
            Terminal::IfKeyword => "اذا",
            Terminal::ElseKeyword => "والا",
            Terminal::WhileKeyword => "بينما",
            Terminal::FnKeyword => "دالة",
            Terminal::ReturnKeyword => "ارجع",
            Terminal::PrintKeyword => "اطبع",
            Terminal::LParen => "(",
            Terminal::RParen => ")",
            Terminal::LBrace => "{",
            Terminal::RBrace => "}",
            Terminal::Comma => "،",
            Terminal::Semicolon => "؛",
            Terminal::Assign => "=",
            Terminal::Plus => "+",
            Terminal::Minus => "-",
            Terminal::Times => "*",
            Terminal::Slash => "/",
            Terminal::Equal => "==",
            Terminal::NotEqual => "!=",
            Terminal::LessThan => "<",
            Terminal::GreaterThan => ">",
            Terminal::LessEqual => "<=",
            Terminal::GreaterEqual => ">=",
        })
    }
}

impl Token {
    pub fn position(&self) -> Position {
        match self {
            Token::VarKeyword { position } => *position,
            Token::IfKeyword { position } => *position,
            Token::ElseKeyword { position } => *position,
            Token::WhileKeyword { position } => *position,
            Token::FnKeyword { position } => *position,
            Token::ReturnKeyword { position } => *position,
            Token::PrintKeyword { position } => *position,
            Token::Id { position, .. } => *position,
            Token::Num { position, .. } => *position,
            Token::LParen { position } => *position,
            Token::RParen { position } => *position,
            Token::LBrace { position } => *position,
            Token::RBrace { position } => *position,
            Token::Comma { position } => *position,
            Token::Semicolon { position } => *position,
            Token::Assign { position } => *position,
            Token::Plus { position } => *position,
            Token::Minus { position } => *position,
            Token::Times { position } => *position,
            Token::Slash { position } => *position,
            Token::Equal { position } => *position,
            Token::NotEqual { position } => *position,
            Token::LessThan { position } => *position,
            Token::GreaterThan { position } => *position,
            Token::LessEqual { position } => *position,
            Token::GreaterEqual { position } => *position,
            Token::Eof { position } => *position,
        }
    }

    /// The terminal this token stands for, if it is one.
    pub fn terminal(&self) -> Option<Terminal> {
        match self {
            Token::VarKeyword { .. } => Some(Terminal::VarKeyword),
            Token::IfKeyword { .. } => Some(Terminal::IfKeyword),
            Token::ElseKeyword { .. } => Some(Terminal::ElseKeyword),
            Token::WhileKeyword { .. } => Some(Terminal::WhileKeyword),
            Token::FnKeyword { .. } => Some(Terminal::FnKeyword),
            Token::ReturnKeyword { .. } => Some(Terminal::ReturnKeyword),
            Token::PrintKeyword { .. } => Some(Terminal::PrintKeyword),
            Token::LParen { .. } => Some(Terminal::LParen),
            Token::RParen { .. } => Some(Terminal::RParen),
            Token::LBrace { .. } => Some(Terminal::LBrace),
            Token::RBrace { .. } => Some(Terminal::RBrace),
            Token::Comma { .. } => Some(Terminal::Comma),
            Token::Semicolon { .. } => Some(Terminal::Semicolon),
            Token::Assign { .. } => Some(Terminal::Assign),
            Token::Plus { .. } => Some(Terminal::Plus),
            Token::Minus { .. } => Some(Terminal::Minus),
            Token::Times { .. } => Some(Terminal::Times),
            Token::Slash { .. } => Some(Terminal::Slash),
            Token::Equal { .. } => Some(Terminal::Equal),
            Token::NotEqual { .. } => Some(Terminal::NotEqual),
            Token::LessThan { .. } => Some(Terminal::LessThan),
            Token::GreaterThan { .. } => Some(Terminal::GreaterThan),
            Token::LessEqual { .. } => Some(Terminal::LessEqual),
            Token::GreaterEqual { .. } => Some(Terminal::GreaterEqual),
            Token::Id { .. } | Token::Num { .. } | Token::Eof { .. } => None,
        }
    }

    pub fn is(&self, terminal: Terminal) -> bool {
        self.terminal() == Some(terminal)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Id { value, .. } => f.write_fmt(format_args!("identifier '{value}'")),
            Token::Num { value, .. } => f.write_fmt(format_args!("number '{value}'")),
            Token::Eof { .. } => f.write_str("end of input"),
            other => match other.terminal() {
                Some(terminal) => f.write_fmt(format_args!("'{terminal}'")),
                None => unreachable!(),
            },
        }
    }
}
