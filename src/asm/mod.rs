//! Text model for the emitted GNU-assembler (AT&T syntax) output. Two-operand
//! instructions carry their operands in AT&T order, source before
//! destination.

mod reg;

use std::fmt::Display;

pub use self::reg::*;

pub const EXIT_SYSCALL: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(Reg),
    Immediate(i64),
    /// A stack slot addressed relative to a base register.
    Memory(i64, Reg),
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Register(reg) => reg.fmt(f),
            Operand::Immediate(value) => f.write_fmt(format_args!("${value}")),
            Operand::Memory(offset, base) => f.write_fmt(format_args!("{offset}({base})")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl Display for Cond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Cond::Equal => "e",
            Cond::NotEqual => "ne",
            Cond::Less => "l",
            Cond::Greater => "g",
            Cond::LessEqual => "le",
            Cond::GreaterEqual => "ge",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Comment(String),
    Label(String),
    Directive(String),
    Mov(Operand, Operand),
    Add(Operand, Operand),
    Sub(Operand, Operand),
    Imul(Operand, Operand),
    Cqto,
    Idiv(Operand),
    Neg(Operand),
    Cmp(Operand, Operand),
    Set(Cond, Reg),
    Movzbq(Reg, Reg),
    Push(Reg),
    Pop(Reg),
    Je(String),
    Jmp(String),
    Call(String),
    Ret,
    Syscall,
    /// Raw assembly text, emitted as-is. Reserved for the prewritten runtime
    /// helper; everything the generator produces itself goes through the
    /// typed variants above.
    Literal(String),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Instruction::Comment(comment) => format!("\t# {comment}"),
            Instruction::Label(label) => format!("\n{label}:"),
            Instruction::Directive(directive) => directive.to_owned(),
            Instruction::Mov(source, target) => format!("\tmovq\t{source}, {target}"),
            Instruction::Add(source, target) => format!("\taddq\t{source}, {target}"),
            Instruction::Sub(source, target) => format!("\tsubq\t{source}, {target}"),
            Instruction::Imul(source, target) => format!("\timulq\t{source}, {target}"),
            Instruction::Cqto => "\tcqto".to_string(),
            Instruction::Idiv(source) => format!("\tidivq\t{source}"),
            Instruction::Neg(target) => format!("\tnegq\t{target}"),
            Instruction::Cmp(source, target) => format!("\tcmpq\t{source}, {target}"),
            Instruction::Set(cond, target) => format!("\tset{cond}\t{target}"),
            Instruction::Movzbq(source, target) => format!("\tmovzbq\t{source}, {target}"),
            Instruction::Push(source) => format!("\tpushq\t{source}"),
            Instruction::Pop(target) => format!("\tpopq\t{target}"),
            Instruction::Je(target) => format!("\tje\t{target}"),
            Instruction::Jmp(target) => format!("\tjmp\t{target}"),
            Instruction::Call(target) => format!("\tcall\t{target}"),
            Instruction::Ret => "\tret".to_string(),
            Instruction::Syscall => "\tsyscall".to_string(),
            Instruction::Literal(string) => string.to_owned(),
        };
        f.write_str(&value)
    }
}
