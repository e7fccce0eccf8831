use thiserror::Error;

use crate::ast::{BinaryOperator, UnaryOperator};

/// Fatal evaluation errors. Nothing here is caught or retried; the driver
/// reports the message once and exits nonzero.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String },
    #[error("Undefined array '{name}'")]
    UndefinedArray { name: String },
    #[error("Undefined object '{name}'")]
    UndefinedObject { name: String },
    #[error("Unknown class '{name}'")]
    UnknownClass { name: String },
    #[error("Class '{class}' inherits from unknown base class '{base}'")]
    UnknownBaseClass { class: String, base: String },
    #[error("Class '{name}' is already defined")]
    DuplicateClass { name: String },
    #[error("Class '{class}' has no field '{field}'")]
    UnknownField { class: String, field: String },
    #[error("Class '{class}' has no method '{method}'")]
    UnknownMethod { class: String, method: String },
    #[error("Function '{name}' expected {expected} arguments, got {found}")]
    FunctionArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Method '{method}' expected {expected} arguments, got {found}")]
    MethodArityMismatch {
        method: String,
        expected: usize,
        found: usize,
    },
    #[error("Operator '{op}' is not supported for {left} and {right}")]
    UnsupportedBinary {
        op: BinaryOperator,
        left: &'static str,
        right: &'static str,
    },
    #[error("Operator '{op}' is not supported for {operand}")]
    UnsupportedUnary {
        op: UnaryOperator,
        operand: &'static str,
    },
    #[error("Value of type {type_name} has no numeric form")]
    NonNumeric { type_name: &'static str },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Array index must be non-negative, got {index}")]
    NegativeIndex { index: i32 },
    #[error("Array index out of bounds: index {index}, len {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Array size must be non-negative, got {size}")]
    InvalidArraySize { size: i32 },
    #[error("Array literal must not be empty")]
    EmptyArrayLiteral,
    #[error("Array literal is only allowed as an initializer")]
    ArrayLiteralOutsideInitializer,
    #[error("String array element expected, got {got}")]
    StringElementExpected { got: &'static str },
    #[error("Object array element '{name}' can only be used through a member or method")]
    ObjectArrayElementAsValue { name: String },
    #[error("Return outside of function")]
    ReturnOutsideFunction,
    #[error("Failed to read input: {message}")]
    InputFailed { message: String },
    #[error("Input is not numeric: '{input}'")]
    InvalidInput { input: String },
    #[error("Cannot read file '{path}': {message}")]
    FileRead { path: String, message: String },
    #[error("File '{path}' does not start with an integer")]
    NoNumericData { path: String },
}
