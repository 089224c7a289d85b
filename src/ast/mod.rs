mod expression;
mod program;
mod statement;

pub use expression::*;
pub use program::*;
pub use statement::*;
