pub mod asm;
pub mod ast;
pub mod checker;
pub mod compiler;
pub mod lexer;
pub mod parser;

use std::{error::Error, fmt::Display};

use checker::SemanticError;
use compiler::InternalError;
use lexer::LexError;
use parser::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Semantic(SemanticError),
    Internal(InternalError),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex(error) => f.write_fmt(format_args!("lex error: {error}")),
            CompileError::Parse(error) => f.write_fmt(format_args!("parse error: {error}")),
            CompileError::Semantic(error) => f.write_fmt(format_args!("semantic error: {error}")),
            CompileError::Internal(error) => f.write_fmt(format_args!("internal error: {error}")),
        }
    }
}

impl Error for CompileError {}

impl From<LexError> for CompileError {
    fn from(value: LexError) -> Self {
        CompileError::Lex(value)
    }
}

impl From<ParseError> for CompileError {
    fn from(value: ParseError) -> Self {
        CompileError::Parse(value)
    }
}

impl From<SemanticError> for CompileError {
    fn from(value: SemanticError) -> Self {
        CompileError::Semantic(value)
    }
}

impl From<InternalError> for CompileError {
    fn from(value: InternalError) -> Self {
        CompileError::Internal(value)
    }
}

/// Run the whole pipeline on one source text and hand back the assembly text.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = lexer::Lexer::new(source).lex()?;
    let program = parser::Parser::new(tokens).parse()?;
    checker::check_program(&program)?;

    Ok(compiler::Compiler::new().compile(&program)?)
}
