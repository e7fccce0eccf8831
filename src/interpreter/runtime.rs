use std::collections::HashMap;
use std::fs;
use std::io::BufRead;
use std::rc::Rc;

use crate::ast::{
    ArraySize, AssignTarget, BinaryOperator, Expression, FunctionDecl, Program, Receiver,
    Statement,
};

use super::array::PrimArray;
use super::env::Scopes;
use super::error::RuntimeError;
use super::object::{ClassTable, Object};
use super::value::{self, Value};

/// Control-flow marker for statement execution.
pub(super) enum ExecResult {
    Continue,
    Return(Value),
}

/// A method receiver after name/index resolution.
enum ReceiverRef {
    Object(String),
    Element { array: String, index: usize },
}

/// Executor holding the whole interpreter state: global definition tables,
/// the scope stack, the array and object tables, and collected output.
pub(super) struct InterpreterRuntime<'a> {
    functions: HashMap<String, Rc<FunctionDecl>>,
    classes: ClassTable,
    scopes: Scopes,
    arrays: HashMap<String, PrimArray>,
    objects: HashMap<String, Object>,
    object_arrays: HashMap<String, Vec<Object>>,
    input: &'a mut dyn BufRead,
    pub(super) output: Vec<String>,
}

impl<'a> InterpreterRuntime<'a> {
    pub(super) fn new(input: &'a mut dyn BufRead) -> Self {
        Self {
            functions: HashMap::new(),
            classes: ClassTable::default(),
            scopes: Scopes::new(),
            arrays: HashMap::new(),
            objects: HashMap::new(),
            object_arrays: HashMap::new(),
            input,
            output: Vec::new(),
        }
    }

    /// Top-level execution in three passes: register every class, create
    /// every default object, then run the remaining statements in order.
    /// Functions register as pass three first encounters them, so a call
    /// textually before its definition fails.
    pub(super) fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for statement in &program.statements {
            if let Statement::ClassDef(decl) = statement {
                self.classes.define(decl)?;
            }
        }
        for statement in &program.statements {
            if let Statement::ObjectDecl {
                class,
                name,
                args: None,
            } = statement
            {
                self.instantiate_object(class, name, None)?;
            }
        }
        for statement in &program.statements {
            match statement {
                Statement::ClassDef(_) | Statement::ObjectDecl { args: None, .. } => {}
                _ => {
                    if let ExecResult::Return(_) = self.exec_statement(statement)? {
                        return Err(RuntimeError::ReturnOutsideFunction);
                    }
                }
            }
        }
        Ok(())
    }

    fn exec_block(&mut self, body: &[Statement]) -> Result<ExecResult, RuntimeError> {
        for statement in body {
            match self.exec_statement(statement)? {
                ExecResult::Continue => {}
                ExecResult::Return(value) => return Ok(ExecResult::Return(value)),
            }
        }
        Ok(ExecResult::Continue)
    }

    fn exec_statement(&mut self, statement: &Statement) -> Result<ExecResult, RuntimeError> {
        match statement {
            Statement::VarDecl { ty, name, init } => {
                match init {
                    // `int x = { ... };` allocates an array, the element
                    // domain inferred from the first element.
                    Some(Expression::ArrayLiteral(elements)) => {
                        let values = self.eval_all(elements)?;
                        let array = PrimArray::from_values(values)?;
                        self.arrays.insert(name.clone(), array);
                    }
                    Some(expr) => {
                        let value = self.eval_expression(expr)?;
                        self.scopes.write(name, value);
                    }
                    None => self.scopes.write(name, Value::default_for(*ty)),
                }
                Ok(ExecResult::Continue)
            }
            Statement::ArrayDecl { ty, name, size } => {
                let array = match size {
                    ArraySize::Fixed(expr) => {
                        let len = self.eval_expression(expr)?.as_int()?;
                        if len < 0 {
                            return Err(RuntimeError::InvalidArraySize { size: len });
                        }
                        PrimArray::zeroed(*ty, len as usize)
                    }
                    ArraySize::Empty => PrimArray::zeroed(*ty, 0),
                    ArraySize::Init(elements) if elements.is_empty() => {
                        PrimArray::zeroed(*ty, 0)
                    }
                    ArraySize::Init(elements) => {
                        PrimArray::from_values(self.eval_all(elements)?)?
                    }
                };
                self.arrays.insert(name.clone(), array);
                Ok(ExecResult::Continue)
            }
            Statement::ObjectDecl { class, name, args } => {
                self.instantiate_object(class, name, args.as_deref())?;
                Ok(ExecResult::Continue)
            }
            Statement::ObjectArrayDecl { class, name, size } => {
                let len = self.eval_expression(size)?.as_int()?;
                if len < 0 {
                    return Err(RuntimeError::InvalidArraySize { size: len });
                }
                let template = self.classes.instantiate(class)?;
                self.object_arrays
                    .insert(name.clone(), vec![template; len as usize]);
                Ok(ExecResult::Continue)
            }
            Statement::Assign { target, value } => {
                self.exec_assign(target, value)?;
                Ok(ExecResult::Continue)
            }
            Statement::Print(expr) => {
                let value = self.eval_expression(expr)?;
                self.output.push(value.to_output());
                Ok(ExecResult::Continue)
            }
            Statement::FunctionDef(decl) => {
                // First definition wins.
                self.functions
                    .entry(decl.name.clone())
                    .or_insert_with(|| Rc::new(decl.clone()));
                Ok(ExecResult::Continue)
            }
            Statement::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Value::Int(0),
                };
                Ok(ExecResult::Return(value))
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                let body = if self.eval_expression(condition)?.is_truthy()? {
                    then_body
                } else {
                    else_body
                };
                self.exec_block(body)
            }
            Statement::While { condition, body } => {
                loop {
                    if !self.eval_expression(condition)?.is_truthy()? {
                        break;
                    }
                    if let ExecResult::Return(value) = self.exec_block(body)? {
                        return Ok(ExecResult::Return(value));
                    }
                }
                Ok(ExecResult::Continue)
            }
            Statement::For {
                init,
                condition,
                step,
                body,
            } => {
                if let Some(init) = init {
                    if let ExecResult::Return(value) = self.exec_statement(init)? {
                        return Ok(ExecResult::Return(value));
                    }
                }
                loop {
                    if let Some(condition) = condition {
                        if !self.eval_expression(condition)?.is_truthy()? {
                            break;
                        }
                    }
                    if let ExecResult::Return(value) = self.exec_block(body)? {
                        return Ok(ExecResult::Return(value));
                    }
                    if let Some(step) = step {
                        if let ExecResult::Return(value) = self.exec_statement(step)? {
                            return Ok(ExecResult::Return(value));
                        }
                    }
                }
                Ok(ExecResult::Continue)
            }
            Statement::ClassDef(decl) => {
                // Top-level classes register in pass one; this arm only runs
                // for definitions nested in a body.
                self.classes.define(decl)?;
                Ok(ExecResult::Continue)
            }
            Statement::Expr(expr) => {
                self.eval_expression(expr)?;
                Ok(ExecResult::Continue)
            }
        }
    }

    fn exec_assign(&mut self, target: &AssignTarget, value: &Expression) -> Result<(), RuntimeError> {
        match target {
            AssignTarget::Name(name) => {
                let value = self.eval_expression(value)?;
                self.scopes.write(name, value);
                Ok(())
            }
            AssignTarget::Element { array, index } => {
                let index = self.eval_expression(index)?.as_int()?;
                let value = self.eval_expression(value)?;
                match self.arrays.get_mut(array) {
                    Some(slot) => slot.set(index, value),
                    None if self.object_arrays.contains_key(array) => {
                        Err(RuntimeError::ObjectArrayElementAsValue {
                            name: array.clone(),
                        })
                    }
                    None => Err(RuntimeError::UndefinedArray {
                        name: array.clone(),
                    }),
                }
            }
            AssignTarget::Field { base, index, field } => {
                let value = self.eval_expression(value)?;
                let object = match index {
                    None => {
                        self.objects
                            .get_mut(base)
                            .ok_or_else(|| RuntimeError::UndefinedObject { name: base.clone() })?
                    }
                    Some(index) => {
                        let elements = self.object_arrays.get_mut(base).ok_or_else(|| {
                            RuntimeError::UndefinedArray { name: base.clone() }
                        })?;
                        let len = elements.len();
                        elements
                            .get_mut(*index)
                            .ok_or(RuntimeError::IndexOutOfBounds { index: *index, len })?
                    }
                };
                match object.fields.get_mut(field) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(RuntimeError::UnknownField {
                        class: object.class.clone(),
                        field: field.clone(),
                    }),
                }
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expression]) -> Result<Vec<Value>, RuntimeError> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            values.push(self.eval_expression(expr)?);
        }
        Ok(values)
    }

    fn eval_expression(&mut self, expr: &Expression) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Integer(value) => Ok(Value::Int(*value)),
            Expression::Float(value) => Ok(Value::Float(*value)),
            Expression::Char(value) => Ok(Value::Char(*value)),
            Expression::Boolean(value) => Ok(Value::Int(*value as i32)),
            Expression::Str(value) => Ok(Value::Str(value.clone())),
            Expression::Variable(name) => {
                self.scopes
                    .read(name)
                    .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })
            }
            Expression::Unary { op, operand } => {
                let operand = self.eval_expression(operand)?;
                value::apply_unary(*op, &operand)
            }
            Expression::Binary { op, left, right } => match op {
                // Short circuit: the right operand only runs when the left
                // has not already decided the result.
                BinaryOperator::And => {
                    if self.eval_expression(left)?.as_int()? == 0 {
                        return Ok(Value::Int(0));
                    }
                    let right = self.eval_expression(right)?.as_int()?;
                    Ok(Value::Int((right != 0) as i32))
                }
                BinaryOperator::Or => {
                    if self.eval_expression(left)?.as_int()? != 0 {
                        return Ok(Value::Int(1));
                    }
                    let right = self.eval_expression(right)?.as_int()?;
                    Ok(Value::Int((right != 0) as i32))
                }
                _ => {
                    let left = self.eval_expression(left)?;
                    let right = self.eval_expression(right)?;
                    value::apply_binary(*op, &left, &right)
                }
            },
            Expression::Call { name, args } => self.call_function(name, args),
            Expression::Index { array, index } => {
                let index = self.eval_expression(index)?.as_int()?;
                match self.arrays.get(array) {
                    Some(slot) => slot.get(index),
                    None if self.object_arrays.contains_key(array) => {
                        Err(RuntimeError::ObjectArrayElementAsValue {
                            name: array.clone(),
                        })
                    }
                    None => Err(RuntimeError::UndefinedArray {
                        name: array.clone(),
                    }),
                }
            }
            Expression::ArrayLiteral(_) => Err(RuntimeError::ArrayLiteralOutsideInitializer),
            Expression::Member { receiver, field } => {
                let receiver = self.resolve_receiver(receiver)?;
                let object = self.receiver_object(&receiver)?;
                object
                    .fields
                    .get(field)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownField {
                        class: object.class.clone(),
                        field: field.clone(),
                    })
            }
            Expression::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.resolve_receiver(receiver)?;
                self.call_method(&receiver, method, args)
            }
            Expression::Input => self.read_input(),
            Expression::Read(path) => self.read_file_number(path),
        }
    }

    fn call_function(&mut self, name: &str, args: &[Expression]) -> Result<Value, RuntimeError> {
        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
            })?;
        if args.len() != function.params.len() {
            return Err(RuntimeError::FunctionArityMismatch {
                name: name.to_string(),
                expected: function.params.len(),
                found: args.len(),
            });
        }
        let arg_values = self.eval_all(args)?;

        self.scopes.push();
        for (param, value) in function.params.iter().zip(arg_values) {
            self.scopes.bind(param, value);
        }
        let flow = self.exec_block(&function.body);
        self.scopes.pop();

        Ok(match flow? {
            ExecResult::Return(value) => value,
            ExecResult::Continue => Value::Int(0),
        })
    }

    /// Instantiates `class` into the object table under `name`; argument
    /// parentheses run the `init` constructor after default initialization.
    fn instantiate_object(
        &mut self,
        class: &str,
        name: &str,
        args: Option<&[Expression]>,
    ) -> Result<(), RuntimeError> {
        let object = self.classes.instantiate(class)?;
        self.objects.insert(name.to_string(), object);
        if let Some(args) = args {
            self.call_method(&ReceiverRef::Object(name.to_string()), "init", args)?;
        }
        Ok(())
    }

    fn resolve_receiver(&mut self, receiver: &Receiver) -> Result<ReceiverRef, RuntimeError> {
        match receiver {
            Receiver::Name(name) => {
                if self.objects.contains_key(name) {
                    Ok(ReceiverRef::Object(name.clone()))
                } else {
                    Err(RuntimeError::UndefinedObject { name: name.clone() })
                }
            }
            Receiver::Element { array, index } => {
                let index = self.eval_expression(index)?.as_int()?;
                if index < 0 {
                    return Err(RuntimeError::NegativeIndex { index });
                }
                let index = index as usize;
                let elements =
                    self.object_arrays
                        .get(array)
                        .ok_or_else(|| RuntimeError::UndefinedArray {
                            name: array.clone(),
                        })?;
                if index >= elements.len() {
                    return Err(RuntimeError::IndexOutOfBounds {
                        index,
                        len: elements.len(),
                    });
                }
                Ok(ReceiverRef::Element {
                    array: array.clone(),
                    index,
                })
            }
        }
    }

    fn receiver_object(&self, receiver: &ReceiverRef) -> Result<&Object, RuntimeError> {
        match receiver {
            ReceiverRef::Object(name) => self
                .objects
                .get(name)
                .ok_or_else(|| RuntimeError::UndefinedObject { name: name.clone() }),
            ReceiverRef::Element { array, index } => {
                let elements =
                    self.object_arrays
                        .get(array)
                        .ok_or_else(|| RuntimeError::UndefinedArray {
                            name: array.clone(),
                        })?;
                let len = elements.len();
                elements
                    .get(*index)
                    .ok_or(RuntimeError::IndexOutOfBounds { index: *index, len })
            }
        }
    }

    fn receiver_object_mut(&mut self, receiver: &ReceiverRef) -> Result<&mut Object, RuntimeError> {
        match receiver {
            ReceiverRef::Object(name) => self
                .objects
                .get_mut(name)
                .ok_or_else(|| RuntimeError::UndefinedObject { name: name.clone() }),
            ReceiverRef::Element { array, index } => {
                let elements = self.object_arrays.get_mut(array).ok_or_else(|| {
                    RuntimeError::UndefinedArray {
                        name: array.clone(),
                    }
                })?;
                let len = elements.len();
                elements
                    .get_mut(*index)
                    .ok_or(RuntimeError::IndexOutOfBounds { index: *index, len })
            }
        }
    }

    /// Runs a method resolved up the receiver's inheritance chain. The
    /// receiver's fields are mirrored into the fresh scope frames for the
    /// duration of the body, then written back, which is what gives method
    /// bodies unqualified access to field names.
    fn call_method(
        &mut self,
        receiver: &ReceiverRef,
        method: &str,
        args: &[Expression],
    ) -> Result<Value, RuntimeError> {
        let (class_name, fields) = {
            let object = self.receiver_object(receiver)?;
            (object.class.clone(), object.fields.clone())
        };
        let decl = self
            .classes
            .resolve_method(&class_name, method)?
            .ok_or_else(|| RuntimeError::UnknownMethod {
                class: class_name.clone(),
                method: method.to_string(),
            })?;
        if args.len() != decl.params.len() {
            return Err(RuntimeError::MethodArityMismatch {
                method: method.to_string(),
                expected: decl.params.len(),
                found: args.len(),
            });
        }
        let arg_values = self.eval_all(args)?;

        self.scopes.push();
        for (name, value) in &fields {
            self.scopes.bind(name, value.clone());
        }
        for (param, value) in decl.params.iter().zip(arg_values) {
            self.scopes.bind(param, value);
        }
        let flow = self.exec_block(&decl.body);

        let mut updates = Vec::new();
        if flow.is_ok() {
            for name in fields.keys() {
                if let Some(value) = self.scopes.read_top(name) {
                    updates.push((name.clone(), value));
                }
            }
        }
        self.scopes.pop();
        let flow = flow?;

        let object = self.receiver_object_mut(receiver)?;
        for (name, value) in updates {
            object.fields.insert(name, value);
        }

        Ok(match flow {
            ExecResult::Return(value) => value,
            ExecResult::Continue => Value::Int(0),
        })
    }

    /// `input()`: one trimmed line from the input source, parsed as an
    /// integer with a float fallback.
    fn read_input(&mut self) -> Result<Value, RuntimeError> {
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|error| RuntimeError::InputFailed {
                message: error.to_string(),
            })?;
        let text = line.trim();
        if let Ok(value) = text.parse::<i32>() {
            return Ok(Value::Int(value));
        }
        if let Ok(value) = text.parse::<f64>() {
            return Ok(Value::Float(value));
        }
        Err(RuntimeError::InvalidInput {
            input: text.to_string(),
        })
    }

    /// `read("path")`: the first whitespace-separated integer in the file.
    fn read_file_number(&mut self, path: &str) -> Result<Value, RuntimeError> {
        let contents = fs::read_to_string(path).map_err(|error| RuntimeError::FileRead {
            path: path.to_string(),
            message: error.to_string(),
        })?;
        let token = contents
            .split_whitespace()
            .next()
            .ok_or_else(|| RuntimeError::NoNumericData {
                path: path.to_string(),
            })?;
        token
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| RuntimeError::NoNumericData {
                path: path.to_string(),
            })
    }
}
