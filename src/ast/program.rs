use serde::Serialize;

use super::{Block, Ident};
use crate::lexer::Position;

/// Name of the function every program starts in.
pub const ENTRY_FUNCTION: &str = "رئيسية";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FnDef {
    pub ident: Ident,
    pub params: Vec<Ident>,
    pub block: Block,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    pub functions: Vec<FnDef>,
}
