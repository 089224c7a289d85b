//! # Dhadc
//!
//! This binary is the compiler of Dhad. It chains lexer, parser, semantic
//! checker, and code generator into a single application and writes the
//! resulting assembly next to the source file (or wherever `-o` points).

mod cli;

use cli::Cli;

use std::fs;

use dhad::{checker, compiler::Compiler, lexer::Lexer, parser::Parser, CompileError};
use log::{error, info};

fn main() {
    let args = Cli::init();

    simple_logger::init_with_level(args.verbosity.into()).unwrap();

    if let Err(message) = run(&args) {
        error!("{message}");
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> Result<(), String> {
    let source = fs::read_to_string(&args.file)
        .map_err(|err| format!("could not read '{}': {err}", args.file.display()))?;

    info!("compiling '{}'...", args.file.display());

    let tokens = Lexer::new(&source)
        .lex()
        .map_err(|err| CompileError::from(err).to_string())?;

    let program = Parser::new(tokens)
        .parse()
        .map_err(|err| CompileError::from(err).to_string())?;

    if args.dump_ast {
        let dump = serde_json::to_string_pretty(&program)
            .map_err(|err| format!("could not serialize the AST: {err}"))?;
        println!("{dump}");
    }

    checker::check_program(&program).map_err(|err| CompileError::from(err).to_string())?;

    let assembly = Compiler::new()
        .compile(&program)
        .map_err(|err| CompileError::from(err).to_string())?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_extension("s"));

    fs::write(&output, assembly)
        .map_err(|err| format!("could not write '{}': {err}", output.display()))?;

    info!("wrote '{}'", output.display());

    Ok(())
}
