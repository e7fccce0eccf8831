use crate::ast::{BinaryOperator, PrimType, UnaryOperator};

use super::error::RuntimeError;

/// Runtime value. Booleans are carried as integer 0/1; objects live in the
/// global tables and never appear as first-class values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Int(i32),
    Float(f64),
    Char(u8),
    Str(String),
}

impl Value {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
        }
    }

    /// Integer projection: conditions, logical operators and index
    /// expressions all funnel through this.
    pub(crate) fn as_int(&self) -> Result<i32, RuntimeError> {
        match self {
            Value::Int(value) => Ok(*value),
            Value::Float(value) => Ok(*value as i32),
            Value::Char(value) => Ok(i32::from(*value)),
            Value::Str(_) => Err(RuntimeError::NonNumeric {
                type_name: self.type_name(),
            }),
        }
    }

    pub(crate) fn as_float(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Int(value) => Ok(f64::from(*value)),
            Value::Float(value) => Ok(*value),
            Value::Char(value) => Ok(f64::from(*value)),
            Value::Str(_) => Err(RuntimeError::NonNumeric {
                type_name: self.type_name(),
            }),
        }
    }

    pub(crate) fn is_truthy(&self) -> Result<bool, RuntimeError> {
        Ok(self.as_int()? != 0)
    }

    pub(crate) fn to_output(&self) -> String {
        match self {
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Char(value) => char::from(*value).to_string(),
            Value::Str(value) => value.clone(),
        }
    }

    pub(crate) fn default_for(ty: PrimType) -> Value {
        match ty {
            PrimType::Int | PrimType::Bool => Value::Int(0),
            PrimType::Float => Value::Float(0.0),
            PrimType::Char => Value::Char(0),
            PrimType::Str => Value::Str(String::new()),
        }
    }
}

/// Applies a binary operator to two already-evaluated operands. `&&` and
/// `||` normally short-circuit before reaching this; when both sides were
/// evaluated anyway the integer-projection form used here agrees.
pub(crate) fn apply_binary(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    // `+` with a string on either side concatenates the textual forms.
    if op == BinaryOperator::Add
        && (matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)))
    {
        return Ok(Value::Str(left.to_output() + &right.to_output()));
    }

    let unsupported = || RuntimeError::UnsupportedBinary {
        op,
        left: left.type_name(),
        right: right.type_name(),
    };
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        return Err(unsupported());
    }

    if matches!(left, Value::Float(_)) || matches!(right, Value::Float(_)) {
        let l = left.as_float()?;
        let r = right.as_float()?;
        return Ok(match op {
            BinaryOperator::Add => Value::Float(l + r),
            BinaryOperator::Sub => Value::Float(l - r),
            BinaryOperator::Mul => Value::Float(l * r),
            BinaryOperator::Div => {
                if r == 0.0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Value::Float(l / r)
            }
            BinaryOperator::Equal => Value::Int((l == r) as i32),
            BinaryOperator::NotEqual => Value::Int((l != r) as i32),
            BinaryOperator::Less => Value::Int((l < r) as i32),
            BinaryOperator::Greater => Value::Int((l > r) as i32),
            BinaryOperator::And => Value::Int((l != 0.0 && r != 0.0) as i32),
            BinaryOperator::Or => Value::Int((l != 0.0 || r != 0.0) as i32),
        });
    }

    if let (Value::Char(l), Value::Char(r)) = (left, right) {
        return match op {
            BinaryOperator::Equal => Ok(Value::Int((l == r) as i32)),
            BinaryOperator::NotEqual => Ok(Value::Int((l != r) as i32)),
            _ => Err(unsupported()),
        };
    }

    // Remaining pairings are integral; a lone char promotes to its code.
    let l = left.as_int()?;
    let r = right.as_int()?;
    Ok(match op {
        BinaryOperator::Add => Value::Int(l + r),
        BinaryOperator::Sub => Value::Int(l - r),
        BinaryOperator::Mul => Value::Int(l * r),
        BinaryOperator::Div => {
            if r == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Int(l / r)
        }
        BinaryOperator::Equal => Value::Int((l == r) as i32),
        BinaryOperator::NotEqual => Value::Int((l != r) as i32),
        BinaryOperator::Less => Value::Int((l < r) as i32),
        BinaryOperator::Greater => Value::Int((l > r) as i32),
        BinaryOperator::And => Value::Int((l != 0 && r != 0) as i32),
        BinaryOperator::Or => Value::Int((l != 0 || r != 0) as i32),
    })
}

pub(crate) fn apply_unary(op: UnaryOperator, value: &Value) -> Result<Value, RuntimeError> {
    match op {
        UnaryOperator::Not => {
            if matches!(value, Value::Str(_)) {
                return Err(RuntimeError::UnsupportedUnary {
                    op,
                    operand: value.type_name(),
                });
            }
            Ok(Value::Int((value.as_int()? == 0) as i32))
        }
        UnaryOperator::Neg => match value {
            Value::Int(v) => Ok(Value::Int(-v)),
            Value::Float(v) => Ok(Value::Float(-v)),
            Value::Char(v) => Ok(Value::Int(-i32::from(*v))),
            Value::Str(_) => Err(RuntimeError::UnsupportedUnary {
                op,
                operand: value.type_name(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_stays_integral() {
        let result = apply_binary(BinaryOperator::Div, &Value::Int(7), &Value::Int(2));
        assert_eq!(result, Ok(Value::Int(3)));
    }

    #[test]
    fn float_operand_promotes_the_result() {
        let result = apply_binary(BinaryOperator::Add, &Value::Int(1), &Value::Float(2.5));
        assert_eq!(result, Ok(Value::Float(3.5)));
        let result = apply_binary(BinaryOperator::Mul, &Value::Float(2.0), &Value::Char(b'a'));
        assert_eq!(result, Ok(Value::Float(2.0 * 97.0)));
    }

    #[test]
    fn comparisons_yield_integer_flags() {
        assert_eq!(
            apply_binary(BinaryOperator::Less, &Value::Int(1), &Value::Int(2)),
            Ok(Value::Int(1))
        );
        assert_eq!(
            apply_binary(BinaryOperator::Greater, &Value::Float(1.0), &Value::Int(2)),
            Ok(Value::Int(0))
        );
    }

    #[test]
    fn char_pair_supports_only_equality() {
        assert_eq!(
            apply_binary(BinaryOperator::Equal, &Value::Char(b'a'), &Value::Char(b'a')),
            Ok(Value::Int(1))
        );
        assert_eq!(
            apply_binary(BinaryOperator::Less, &Value::Char(b'a'), &Value::Char(b'b')),
            Err(RuntimeError::UnsupportedBinary {
                op: BinaryOperator::Less,
                left: "char",
                right: "char",
            })
        );
    }

    #[test]
    fn lone_char_promotes_to_its_code() {
        assert_eq!(
            apply_binary(BinaryOperator::Add, &Value::Char(b'a'), &Value::Int(1)),
            Ok(Value::Int(98))
        );
    }

    #[test]
    fn string_concatenation_stringifies_either_side() {
        assert_eq!(
            apply_binary(
                BinaryOperator::Add,
                &Value::Str("x=".to_string()),
                &Value::Int(5)
            ),
            Ok(Value::Str("x=5".to_string()))
        );
        assert_eq!(
            apply_binary(
                BinaryOperator::Add,
                &Value::Int(5),
                &Value::Str("!".to_string())
            ),
            Ok(Value::Str("5!".to_string()))
        );
    }

    #[test]
    fn string_rejects_other_operators() {
        let err = apply_binary(
            BinaryOperator::Sub,
            &Value::Str("a".to_string()),
            &Value::Int(1),
        )
        .expect_err("expected unsupported operator");
        assert_eq!(
            err,
            RuntimeError::UnsupportedBinary {
                op: BinaryOperator::Sub,
                left: "string",
                right: "int",
            }
        );
    }

    #[test]
    fn division_by_zero_is_fatal() {
        assert_eq!(
            apply_binary(BinaryOperator::Div, &Value::Int(1), &Value::Int(0)),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(
            apply_binary(BinaryOperator::Div, &Value::Float(1.0), &Value::Float(0.0)),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn not_projects_to_integer() {
        assert_eq!(
            apply_unary(UnaryOperator::Not, &Value::Int(0)),
            Ok(Value::Int(1))
        );
        assert_eq!(
            apply_unary(UnaryOperator::Not, &Value::Float(2.5)),
            Ok(Value::Int(0))
        );
    }

    #[test]
    fn negation_is_numeric() {
        assert_eq!(
            apply_unary(UnaryOperator::Neg, &Value::Int(3)),
            Ok(Value::Int(-3))
        );
        assert_eq!(
            apply_unary(UnaryOperator::Neg, &Value::Float(1.5)),
            Ok(Value::Float(-1.5))
        );
        assert_eq!(
            apply_unary(UnaryOperator::Neg, &Value::Char(b'a')),
            Ok(Value::Int(-97))
        );
    }

    #[test]
    fn float_output_uses_default_formatting() {
        assert_eq!(Value::Float(3.0).to_output(), "3");
        assert_eq!(Value::Float(2.5).to_output(), "2.5");
    }
}
