//! Code generator for Dhad programs.
//!
//! Lowers a semantically validated AST into a single GNU-assembler text
//! buffer. Run the checker beforehand; an identifier that fails to resolve
//! here is a bug in the compiler, not in the input program.
//!
//! Every expression leaves its value in %rax. Frames reserve a multiple of 16
//! bytes and expression temporaries are pushed and popped in pairs, keeping
//! %rsp congruent at call sites.

mod runtime;
mod scope;

use std::{error::Error, fmt::Display};

use Instruction::*;
use Operand::*;
use Reg::*;

use crate::{
    asm::{argument_register, Cond, Instruction, Operand, Reg, EXIT_SYSCALL},
    ast::{BinaryOp, Block, Expression, FnDef, Ident, Program, Statement, ENTRY_FUNCTION},
};

use self::{runtime::PRINT_INT, scope::Scope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalError(pub String);

impl Display for InternalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Error for InternalError {}

/// Turn a source-level function name into a symbol the assembler accepts:
/// every scalar outside `[A-Za-z0-9_]` becomes `_u<hex>`.
pub fn mangle(name: &str) -> String {
    let mut mangled = String::from("fn_");

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            mangled.push(c);
        } else {
            mangled.push_str(&format!("_u{:x}", c as u32));
        }
    }

    mangled
}

pub struct Compiler {
    instructions: Vec<Instruction>,
    scope: Scope,
    labels: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            instructions: vec![],
            scope: Scope::new(),
            labels: 0,
        }
    }

    /// Lower a validated program into assembly text: entry stub first, then
    /// the runtime helper, then one routine per function in source order.
    pub fn compile(mut self, program: &Program) -> Result<String, InternalError> {
        let mut module = vec![
            Directive(".text".to_owned()),
            Directive(".globl _start".to_owned()),
            Label("_start".to_owned()),
            Call(mangle(ENTRY_FUNCTION)),
            Mov(Register(Rax), Register(Rdi)),
            Mov(Immediate(EXIT_SYSCALL), Register(Rax)),
            Syscall,
            Literal(PRINT_INT.to_owned()),
        ];

        for function in &program.functions {
            module.append(&mut self.compile_fn_def(function)?);
        }

        let mut output = String::new();
        for instruction in &module {
            output.push_str(&instruction.to_string());
            output.push('\n');
        }

        Ok(output)
    }

    fn next_label(&mut self) -> String {
        let label = format!(".L{}", self.labels);
        self.labels += 1;
        label
    }

    fn resolve(&self, ident: &Ident) -> Result<i64, InternalError> {
        self.scope.resolve(&ident.value).ok_or_else(|| {
            InternalError(format!(
                "variable '{}' vanished from scope at {}",
                ident.value, ident.position
            ))
        })
    }

    fn compile_fn_def(&mut self, function: &FnDef) -> Result<Vec<Instruction>, InternalError> {
        self.scope = Scope::new();
        self.instructions = vec![];

        for (index, param) in function.params.iter().enumerate() {
            let Some(source) = argument_register(index) else {
                return Err(InternalError(format!(
                    "no argument register for parameter {index} of '{}'",
                    function.ident.value
                )));
            };

            let offset = self.scope.declare(&param.value);
            self.instructions
                .push(Comment(format!("{} = {source}", param.value)));
            self.instructions.push(Mov(Register(source), Memory(offset, Rbp)));
        }

        self.compile_block(&function.block)?;

        // control fell off the end, return 0
        self.instructions.push(Mov(Immediate(0), Register(Rax)));
        self.push_epilogue();

        // the frame is known only now, so the prologue is prepended last
        let frame_size = self.scope.frame_size();
        let mut instructions = vec![
            Label(mangle(&function.ident.value)),
            Push(Rbp),
            Mov(Register(Rsp), Register(Rbp)),
            Sub(Immediate(frame_size), Register(Rsp)),
        ];
        instructions.append(&mut self.instructions);

        Ok(instructions)
    }

    fn push_epilogue(&mut self) {
        self.instructions.push(Mov(Register(Rbp), Register(Rsp)));
        self.instructions.push(Pop(Rbp));
        self.instructions.push(Ret);
    }

    fn compile_block(&mut self, block: &Block) -> Result<(), InternalError> {
        self.scope.enter();

        for statement in &block.statements {
            self.compile_statement(statement)?;
        }

        self.scope.exit();

        Ok(())
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), InternalError> {
        match statement {
            Statement::VarDecl(decl) => {
                self.compile_expression(&decl.value)?;

                let offset = self.scope.declare(&decl.ident.value);
                self.instructions
                    .push(Comment(format!("{} = {}", decl.ident.value, decl.value)));
                self.instructions.push(Mov(Register(Rax), Memory(offset, Rbp)));

                Ok(())
            }
            Statement::Assignment(assignment) => {
                self.compile_expression(&assignment.value)?;

                let offset = self.resolve(&assignment.ident)?;
                self.instructions.push(Comment(format!(
                    "{} = {}",
                    assignment.ident.value, assignment.value
                )));
                self.instructions.push(Mov(Register(Rax), Memory(offset, Rbp)));

                Ok(())
            }
            Statement::If(if_statement) => {
                self.compile_expression(&if_statement.condition)?;

                let else_label = self.next_label();
                let end_label = self.next_label();

                self.instructions.push(Cmp(Immediate(0), Register(Rax)));
                self.instructions.push(Je(else_label.clone()));

                self.compile_block(&if_statement.then_block)?;
                self.instructions.push(Jmp(end_label.clone()));

                self.instructions.push(Label(else_label));
                if let Some(else_block) = &if_statement.else_block {
                    self.compile_block(else_block)?;
                }
                self.instructions.push(Label(end_label));

                Ok(())
            }
            Statement::While(while_loop) => {
                let head_label = self.next_label();
                let end_label = self.next_label();

                self.instructions.push(Label(head_label.clone()));
                self.compile_expression(&while_loop.condition)?;
                self.instructions.push(Cmp(Immediate(0), Register(Rax)));
                self.instructions.push(Je(end_label.clone()));

                self.compile_block(&while_loop.block)?;
                self.instructions.push(Jmp(head_label));
                self.instructions.push(Label(end_label));

                Ok(())
            }
            Statement::Return(return_statement) => {
                match &return_statement.value {
                    Some(value) => self.compile_expression(value)?,
                    None => self.instructions.push(Mov(Immediate(0), Register(Rax))),
                }
                self.push_epilogue();

                Ok(())
            }
            Statement::Print(print) => {
                self.compile_expression(&print.value)?;

                self.instructions.push(Mov(Register(Rax), Register(Rdi)));
                self.instructions.push(Call("print_int".to_owned()));

                Ok(())
            }
            Statement::Expression(expression) => self.compile_expression(expression),
        }
    }

    fn compile_expression(&mut self, expression: &Expression) -> Result<(), InternalError> {
        match expression {
            Expression::Integer(integer) => {
                self.instructions
                    .push(Mov(Immediate(integer.value), Register(Rax)));

                Ok(())
            }
            Expression::Ident(ident) => {
                let offset = self.resolve(ident)?;
                self.instructions.push(Mov(Memory(offset, Rbp), Register(Rax)));

                Ok(())
            }
            Expression::Negation(negation) => {
                self.compile_expression(&negation.inner)?;
                self.instructions.push(Neg(Register(Rax)));

                Ok(())
            }
            Expression::Binary(binary) => {
                self.compile_expression(&binary.lhs)?;
                self.instructions.push(Push(Rax));

                self.compile_expression(&binary.rhs)?;
                self.instructions.push(Mov(Register(Rax), Register(Rcx)));
                self.instructions.push(Pop(Rax));

                match binary.op {
                    BinaryOp::Plus => self.instructions.push(Add(Register(Rcx), Register(Rax))),
                    BinaryOp::Minus => self.instructions.push(Sub(Register(Rcx), Register(Rax))),
                    BinaryOp::Times => self.instructions.push(Imul(Register(Rcx), Register(Rax))),
                    BinaryOp::DividedBy => {
                        self.instructions.push(Cqto);
                        self.instructions.push(Idiv(Register(Rcx)));
                    }
                    BinaryOp::Equal => self.compile_comparison(Cond::Equal),
                    BinaryOp::NotEqual => self.compile_comparison(Cond::NotEqual),
                    BinaryOp::LessThan => self.compile_comparison(Cond::Less),
                    BinaryOp::GreaterThan => self.compile_comparison(Cond::Greater),
                    BinaryOp::LessEqual => self.compile_comparison(Cond::LessEqual),
                    BinaryOp::GreaterEqual => self.compile_comparison(Cond::GreaterEqual),
                }

                Ok(())
            }
            Expression::Call(call) => {
                self.instructions
                    .push(Comment(format!("call {}", call.ident.value)));

                for arg in &call.args {
                    self.compile_expression(arg)?;
                    self.instructions.push(Push(Rax));
                }

                for index in (0..call.args.len()).rev() {
                    let Some(target) = argument_register(index) else {
                        return Err(InternalError(format!(
                            "no argument register for argument {index} of '{}'",
                            call.ident.value
                        )));
                    };
                    self.instructions.push(Pop(target));
                }

                self.instructions.push(Call(mangle(&call.ident.value)));

                Ok(())
            }
        }
    }

    /// The comparison result is materialized as 0 or 1 in %rax.
    fn compile_comparison(&mut self, cond: Cond) {
        self.instructions.push(Cmp(Register(Rcx), Register(Rax)));
        self.instructions.push(Set(cond, Al));
        self.instructions.push(Movzbq(Al, Rax));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{checker::check_program, lexer::Lexer, parser::Parser};

    fn compile_source(input: &str) -> String {
        let tokens = Lexer::new(input).lex().expect("lexing failed");
        let program = Parser::new(tokens).parse().expect("parsing failed");
        check_program(&program).expect("semantic analysis failed");
        Compiler::new().compile(&program).expect("codegen failed")
    }

    #[test]
    fn test_mangle() {
        assert_eq!("fn_main_1", mangle("main_1"));
        assert_eq!("fn__u631_u626_u64a_u633_u64a_u629", mangle("رئيسية"));
    }

    #[test]
    fn test_entry_stub() {
        let output = compile_source("دالة رئيسية() { ارجع 42؛ }");

        assert!(output.starts_with(".text\n.globl _start\n"));
        assert!(output.contains("\tcall\tfn__u631_u626_u64a_u633_u64a_u629"));
        assert!(output.contains("\tmovq\t%rax, %rdi"));
        assert!(output.contains("\tmovq\t$60, %rax"));
        assert!(output.contains("print_int:"));
    }

    #[test]
    fn test_literal_return() {
        let output = compile_source("دالة رئيسية() { ارجع 42؛ }");

        assert!(output.contains("\tmovq\t$42, %rax"));
        assert!(output.contains("\tmovq\t%rbp, %rsp\n\tpopq\t%rbp\n\tret"));
    }

    #[test]
    fn test_binary_operator_lowering() {
        let output = compile_source("دالة رئيسية() { ارجع 15 + 7 * 2؛ }");

        assert!(output.contains("\tpushq\t%rax"));
        assert!(output.contains("\tmovq\t%rax, %rcx\n\tpopq\t%rax"));
        assert!(output.contains("\timulq\t%rcx, %rax"));
        assert!(output.contains("\taddq\t%rcx, %rax"));
    }

    #[test]
    fn test_division_lowering() {
        let output = compile_source("دالة رئيسية() { ارجع 7 / 2؛ }");

        assert!(output.contains("\tcqto\n\tidivq\t%rcx"));
    }

    #[test]
    fn test_comparison_lowering() {
        let output = compile_source("دالة رئيسية() { ارجع 1 <= 2؛ }");

        assert!(output.contains("\tcmpq\t%rcx, %rax\n\tsetle\t%al\n\tmovzbq\t%al, %rax"));
    }

    #[test]
    fn test_if_labels_are_fresh_and_defined() {
        let output = compile_source(
            "دالة رئيسية() { اذا (1) { اطبع(1)؛ } والا { اطبع(2)؛ } اذا (0) { اطبع(3)؛ } ارجع 0؛ }",
        );

        for label in [".L0", ".L1", ".L2", ".L3"] {
            let definitions = output.matches(&format!("\n{label}:\n")).count();
            assert_eq!(1, definitions, "{label} defined once");
        }
        assert!(output.contains("\tje\t.L0"));
        assert!(output.contains("\tjmp\t.L1"));
    }

    #[test]
    fn test_while_lowering() {
        let output = compile_source(
            "دالة رئيسية() { متغير ن = 0؛ بينما (ن < 3) { ن = ن + 1؛ } ارجع ن؛ }",
        );

        assert!(output.contains("\n.L0:\n"));
        assert!(output.contains("\tje\t.L1"));
        assert!(output.contains("\tjmp\t.L0"));
    }

    #[test]
    fn test_parameters_spill_to_distinct_slots() {
        let output = compile_source(
            "دالة جمع(ا، ب) { ارجع ا + ب؛ } دالة رئيسية() { ارجع جمع(1، 2)؛ }",
        );

        assert!(output.contains("\tmovq\t%rdi, -8(%rbp)"));
        assert!(output.contains("\tmovq\t%rsi, -16(%rbp)"));
    }

    #[test]
    fn test_call_arguments_popped_in_reverse() {
        let output = compile_source(
            "دالة جمع(ا، ب) { ارجع ا + ب؛ } دالة رئيسية() { ارجع جمع(1، 2)؛ }",
        );

        let second = output.find("\tpopq\t%rsi").expect("popq %rsi emitted");
        let first = output.find("\tpopq\t%rdi").expect("popq %rdi emitted");
        assert!(second < first, "last argument is popped first");
    }

    #[test]
    fn test_frame_is_aligned() {
        let output = compile_source(
            "دالة رئيسية() { متغير ا = 1؛ متغير ب = 2؛ متغير ج = 3؛ ارجع ج؛ }",
        );

        assert!(output.contains("\tsubq\t$32, %rsp"));
    }

    #[test]
    fn test_print_calls_runtime_helper() {
        let output = compile_source("دالة رئيسية() { اطبع(29)؛ ارجع 0؛ }");

        assert!(output.contains("\tmovq\t%rax, %rdi\n\tcall\tprint_int"));
    }

    #[test]
    fn test_labels_reset_between_compilations() {
        let source = "دالة رئيسية() { اذا (1) { اطبع(1)؛ } ارجع 0؛ }";

        assert_eq!(compile_source(source), compile_source(source));
    }
}
