use crate::ast::PrimType;

use super::error::RuntimeError;
use super::value::Value;

/// A primitive array. The element domain is fixed at allocation; reads from
/// the bool domain surface as integer 0/1 like every other boolean.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PrimArray {
    Int(Vec<i32>),
    Float(Vec<f64>),
    Char(Vec<u8>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl PrimArray {
    pub(crate) fn zeroed(ty: PrimType, len: usize) -> Self {
        match ty {
            PrimType::Int => PrimArray::Int(vec![0; len]),
            PrimType::Float => PrimArray::Float(vec![0.0; len]),
            PrimType::Char => PrimArray::Char(vec![0; len]),
            PrimType::Bool => PrimArray::Bool(vec![false; len]),
            PrimType::Str => PrimArray::Str(vec![String::new(); len]),
        }
    }

    /// Builds an array from literal elements; the first element's tag picks
    /// the domain and later elements coerce to it.
    pub(crate) fn from_values(values: Vec<Value>) -> Result<Self, RuntimeError> {
        let first = values.first().ok_or(RuntimeError::EmptyArrayLiteral)?;
        match first {
            Value::Int(_) => {
                let mut elements = Vec::with_capacity(values.len());
                for value in &values {
                    elements.push(value.as_int()?);
                }
                Ok(PrimArray::Int(elements))
            }
            Value::Float(_) => {
                let mut elements = Vec::with_capacity(values.len());
                for value in &values {
                    elements.push(value.as_float()?);
                }
                Ok(PrimArray::Float(elements))
            }
            Value::Char(_) => {
                let mut elements = Vec::with_capacity(values.len());
                for value in &values {
                    elements.push(value.as_int()? as u8);
                }
                Ok(PrimArray::Char(elements))
            }
            Value::Str(_) => {
                let mut elements = Vec::with_capacity(values.len());
                for value in values {
                    match value {
                        Value::Str(text) => elements.push(text),
                        other => {
                            return Err(RuntimeError::StringElementExpected {
                                got: other.type_name(),
                            });
                        }
                    }
                }
                Ok(PrimArray::Str(elements))
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            PrimArray::Int(v) => v.len(),
            PrimArray::Float(v) => v.len(),
            PrimArray::Char(v) => v.len(),
            PrimArray::Bool(v) => v.len(),
            PrimArray::Str(v) => v.len(),
        }
    }

    fn check_index(&self, index: i32) -> Result<usize, RuntimeError> {
        if index < 0 {
            return Err(RuntimeError::NegativeIndex { index });
        }
        let index = index as usize;
        if index >= self.len() {
            return Err(RuntimeError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        Ok(index)
    }

    pub(crate) fn get(&self, index: i32) -> Result<Value, RuntimeError> {
        let index = self.check_index(index)?;
        Ok(match self {
            PrimArray::Int(v) => Value::Int(v[index]),
            PrimArray::Float(v) => Value::Float(v[index]),
            PrimArray::Char(v) => Value::Char(v[index]),
            PrimArray::Bool(v) => Value::Int(v[index] as i32),
            PrimArray::Str(v) => Value::Str(v[index].clone()),
        })
    }

    pub(crate) fn set(&mut self, index: i32, value: Value) -> Result<(), RuntimeError> {
        let index = self.check_index(index)?;
        match self {
            PrimArray::Int(v) => v[index] = value.as_int()?,
            PrimArray::Float(v) => v[index] = value.as_float()?,
            PrimArray::Char(v) => v[index] = value.as_int()? as u8,
            PrimArray::Bool(v) => v[index] = value.as_int()? != 0,
            PrimArray::Str(v) => match value {
                Value::Str(text) => v[index] = text,
                other => {
                    return Err(RuntimeError::StringElementExpected {
                        got: other.type_name(),
                    });
                }
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_allocation_zero_initializes() {
        let array = PrimArray::zeroed(PrimType::Int, 3);
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(2), Ok(Value::Int(0)));
        let array = PrimArray::zeroed(PrimType::Str, 2);
        assert_eq!(array.get(0), Ok(Value::Str(String::new())));
    }

    #[test]
    fn literal_infers_domain_from_first_element() {
        let array = PrimArray::from_values(vec![Value::Float(1.5), Value::Int(2)])
            .expect("build array");
        assert_eq!(array.get(1), Ok(Value::Float(2.0)));
    }

    #[test]
    fn write_then_read_round_trips_until_next_write() {
        let mut array = PrimArray::zeroed(PrimType::Int, 2);
        array.set(1, Value::Int(42)).expect("set");
        assert_eq!(array.get(1), Ok(Value::Int(42)));
        array.set(1, Value::Int(7)).expect("set");
        assert_eq!(array.get(1), Ok(Value::Int(7)));
    }

    #[test]
    fn bool_domain_reads_as_integer_flags() {
        let mut array = PrimArray::zeroed(PrimType::Bool, 2);
        array.set(0, Value::Int(5)).expect("set");
        assert_eq!(array.get(0), Ok(Value::Int(1)));
        assert_eq!(array.get(1), Ok(Value::Int(0)));
    }

    #[test]
    fn rejects_negative_and_out_of_range_indices() {
        let array = PrimArray::zeroed(PrimType::Int, 2);
        assert_eq!(array.get(-1), Err(RuntimeError::NegativeIndex { index: -1 }));
        assert_eq!(
            array.get(2),
            Err(RuntimeError::IndexOutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn string_array_rejects_numeric_elements() {
        let err = PrimArray::from_values(vec![Value::Str("a".to_string()), Value::Int(1)])
            .expect_err("expected element type mismatch");
        assert_eq!(err, RuntimeError::StringElementExpected { got: "int" });
    }

    #[test]
    fn empty_literal_is_rejected() {
        assert_eq!(
            PrimArray::from_values(Vec::new()),
            Err(RuntimeError::EmptyArrayLiteral)
        );
    }
}
