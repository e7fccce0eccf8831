use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{ClassDecl, FunctionDecl, PrimType};

use super::error::RuntimeError;
use super::value::Value;

/// A registered class: declaration data with methods keyed for dispatch.
#[derive(Debug)]
pub(crate) struct Class {
    pub(crate) name: String,
    pub(crate) base: Option<String>,
    pub(crate) fields: Vec<(PrimType, String)>,
    pub(crate) methods: HashMap<String, Rc<FunctionDecl>>,
}

/// An instance. Instances live in the interpreter's global object tables and
/// are addressed by variable name (or array name + index), never as values.
#[derive(Debug, Clone)]
pub(crate) struct Object {
    pub(crate) class: String,
    pub(crate) fields: HashMap<String, Value>,
}

#[derive(Debug, Default)]
pub(crate) struct ClassTable {
    classes: HashMap<String, Rc<Class>>,
}

impl ClassTable {
    /// Registers a class. A name registers exactly once; re-registration is
    /// fatal.
    pub(crate) fn define(&mut self, decl: &ClassDecl) -> Result<(), RuntimeError> {
        let methods = decl
            .methods
            .iter()
            .map(|method| (method.name.clone(), Rc::new(method.clone())))
            .collect();
        let class = Class {
            name: decl.name.clone(),
            base: decl.base.clone(),
            fields: decl.fields.clone(),
            methods,
        };
        match self.classes.entry(decl.name.clone()) {
            Entry::Occupied(_) => Err(RuntimeError::DuplicateClass {
                name: decl.name.clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(Rc::new(class));
                Ok(())
            }
        }
    }

    fn get(&self, name: &str) -> Result<&Rc<Class>, RuntimeError> {
        self.classes
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownClass {
                name: name.to_string(),
            })
    }

    fn base_of<'c>(&'c self, class: &Class) -> Result<Option<&'c Rc<Class>>, RuntimeError> {
        match &class.base {
            None => Ok(None),
            Some(base) => self
                .classes
                .get(base)
                .map(Some)
                .ok_or_else(|| RuntimeError::UnknownBaseClass {
                    class: class.name.clone(),
                    base: base.clone(),
                }),
        }
    }

    /// Effective fields of a class: bases flattened first, a child field of
    /// the same name overriding in place.
    pub(crate) fn merged_fields(
        &self,
        class_name: &str,
    ) -> Result<Vec<(PrimType, String)>, RuntimeError> {
        let class = self.get(class_name)?;
        self.merged_fields_of(class)
    }

    fn merged_fields_of(&self, class: &Class) -> Result<Vec<(PrimType, String)>, RuntimeError> {
        let mut fields = match self.base_of(class)? {
            Some(base) => self.merged_fields_of(base)?,
            None => Vec::new(),
        };
        for (ty, name) in &class.fields {
            match fields.iter_mut().find(|(_, existing)| existing == name) {
                Some(slot) => *slot = (*ty, name.clone()),
                None => fields.push((*ty, name.clone())),
            }
        }
        Ok(fields)
    }

    /// Walks the inheritance chain, nearest definition winning.
    pub(crate) fn resolve_method(
        &self,
        class_name: &str,
        method: &str,
    ) -> Result<Option<Rc<FunctionDecl>>, RuntimeError> {
        let mut current = self.get(class_name)?;
        loop {
            if let Some(decl) = current.methods.get(method) {
                return Ok(Some(decl.clone()));
            }
            match self.base_of(current)? {
                Some(base) => current = base,
                None => return Ok(None),
            }
        }
    }

    /// A fresh instance with every merged field default-initialized.
    pub(crate) fn instantiate(&self, class_name: &str) -> Result<Object, RuntimeError> {
        let fields = self
            .merged_fields(class_name)?
            .into_iter()
            .map(|(ty, name)| (name, Value::default_for(ty)))
            .collect();
        Ok(Object {
            class: class_name.to_string(),
            fields,
        })
    }
}
