use std::collections::HashMap;

use super::value::Value;

/// One scope's name bindings, one map per primitive domain.
#[derive(Debug, Default)]
struct Frame {
    ints: HashMap<String, i32>,
    floats: HashMap<String, f64>,
    chars: HashMap<String, u8>,
    strings: HashMap<String, String>,
}

/// Stack of scope frames. The bottom frame is the global scope and is never
/// popped; function and method calls push one frame and pop it on return.
///
/// Lookup and write semantics are load-bearing:
/// - reads probe the int domain through every frame (innermost first), then
///   float, then char, then string — the first domain holding the name wins
///   even over a more deeply scoped hit in a later domain;
/// - int writes always land in the innermost frame;
/// - float/char/string writes mutate the innermost frame already holding the
///   name and only create a binding in the current frame when none does.
#[derive(Debug)]
pub(crate) struct Scopes {
    frames: Vec<Frame>,
}

impl Scopes {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    pub(crate) fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    pub(crate) fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub(crate) fn read(&self, name: &str) -> Option<Value> {
        for frame in self.frames.iter().rev() {
            if let Some(&value) = frame.ints.get(name) {
                return Some(Value::Int(value));
            }
        }
        for frame in self.frames.iter().rev() {
            if let Some(&value) = frame.floats.get(name) {
                return Some(Value::Float(value));
            }
        }
        for frame in self.frames.iter().rev() {
            if let Some(&value) = frame.chars.get(name) {
                return Some(Value::Char(value));
            }
        }
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.strings.get(name) {
                return Some(Value::Str(value.clone()));
            }
        }
        None
    }

    pub(crate) fn write(&mut self, name: &str, value: Value) {
        match value {
            Value::Int(v) => {
                self.top().ints.insert(name.to_string(), v);
            }
            Value::Float(v) => {
                for frame in self.frames.iter_mut().rev() {
                    if let Some(slot) = frame.floats.get_mut(name) {
                        *slot = v;
                        return;
                    }
                }
                self.top().floats.insert(name.to_string(), v);
            }
            Value::Char(v) => {
                for frame in self.frames.iter_mut().rev() {
                    if let Some(slot) = frame.chars.get_mut(name) {
                        *slot = v;
                        return;
                    }
                }
                self.top().chars.insert(name.to_string(), v);
            }
            Value::Str(v) => {
                for frame in self.frames.iter_mut().rev() {
                    if let Some(slot) = frame.strings.get_mut(name) {
                        *slot = v;
                        return;
                    }
                }
                self.top().strings.insert(name.to_string(), v);
            }
        }
    }

    /// Inserts directly into the innermost frame, bypassing write-through.
    /// Parameter binding and field mirroring use this.
    pub(crate) fn bind(&mut self, name: &str, value: Value) {
        let top = self.top();
        match value {
            Value::Int(v) => {
                top.ints.insert(name.to_string(), v);
            }
            Value::Float(v) => {
                top.floats.insert(name.to_string(), v);
            }
            Value::Char(v) => {
                top.chars.insert(name.to_string(), v);
            }
            Value::Str(v) => {
                top.strings.insert(name.to_string(), v);
            }
        }
    }

    /// Probes only the innermost frame, in domain order. Method write-back
    /// collects field values through this.
    pub(crate) fn read_top(&self, name: &str) -> Option<Value> {
        let frame = self.frames.last()?;
        if let Some(&value) = frame.ints.get(name) {
            return Some(Value::Int(value));
        }
        if let Some(&value) = frame.floats.get(name) {
            return Some(Value::Float(value));
        }
        if let Some(&value) = frame.chars.get(name) {
            return Some(Value::Char(value));
        }
        frame.strings.get(name).map(|value| Value::Str(value.clone()))
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}
