use std::env;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{bail, Result};

use tinylang::interpreter::Interpreter;
use tinylang::{imports, lexer, parser};

fn main() {
    if let Err(error) = run() {
        eprintln!("tinylang: {error:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "sample.tl".to_string());
    if args.next().is_some() {
        bail!("Only one source file is supported");
    }

    let source = imports::load_program(Path::new(&path))?;
    let tokens = lexer::tokenize(&source)?;
    let program = parser::parse_tokens(tokens)?;

    let interpreter = Interpreter::new();
    let output = interpreter.run_with_input(&program, io::stdin().lock())?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
