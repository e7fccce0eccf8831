//! Tree-walking evaluation of parsed programs.
//!
//! [`Interpreter`] executes top-level statements in three passes (class
//! registration, default object instantiation, everything else in source
//! order) and collects `print` output, one value per line.

use std::io::{self, BufRead};

use crate::ast::Program;

mod array;
mod env;
mod error;
mod object;
mod runtime;
mod value;

pub use error::RuntimeError;

use runtime::InterpreterRuntime;

pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Runs a program with standard input backing `input()`.
    pub fn run(&self, program: &Program) -> Result<String, RuntimeError> {
        self.run_with_input(program, io::stdin().lock())
    }

    /// Runs a program against an arbitrary input source and returns the
    /// joined `print` lines.
    pub fn run_with_input<R: BufRead>(
        &self,
        program: &Program,
        mut input: R,
    ) -> Result<String, RuntimeError> {
        let mut runtime = InterpreterRuntime::new(&mut input);
        runtime.run(program)?;
        Ok(runtime.output.join("\n"))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
