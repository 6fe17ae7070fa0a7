// Runtime environment: a global frame plus a strict stack of call frames.

use std::collections::HashMap;
use std::fmt;

use cinder_ast::ast::Declaration;
use cinder_ast::value::Value;
use cinder_type::types::Type;

/// One variable binding. A freshly declared variable is `Undefined` with
/// its declared type until the first assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Defined(Value),
    Undefined(Type),
}

impl Slot {
    pub fn ty(&self) -> Type {
        match self {
            Slot::Defined(v) => v.ty(),
            Slot::Undefined(ty) => *ty,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Defined(v) => write!(f, "{v}"),
            Slot::Undefined(_) => f.write_str("undef"),
        }
    }
}

/// The mutable program state. A function body sees its own frame and the
/// globals, never another function's frame; frames are pushed on call entry
/// and popped on return.
#[derive(Debug, Clone, Default)]
pub struct State {
    globals: HashMap<String, Slot>,
    frames: Vec<HashMap<String, Slot>>,
}

impl State {
    pub fn from_globals(decls: &[Declaration]) -> State {
        State {
            globals: decls
                .iter()
                .map(|d| (d.name.clone(), Slot::Undefined(d.ty)))
                .collect(),
            frames: Vec::new(),
        }
    }

    pub fn push_frame(&mut self, frame: HashMap<String, Slot>) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub fn read(&self, name: &str) -> Option<&Slot> {
        self.frames
            .last()
            .and_then(|f| f.get(name))
            .or_else(|| self.globals.get(name))
    }

    pub fn write(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            if let Some(slot) = frame.get_mut(name) {
                *slot = Slot::Defined(value);
                return;
            }
        }
        match self.globals.get_mut(name) {
            Some(slot) => *slot = Slot::Defined(value),
            // checked programs only assign declared names
            None => panic!("assignment to unbound variable {name}"),
        }
    }

    pub fn global(&self, name: &str) -> Option<&Slot> {
        self.globals.get(name)
    }

    /// Global bindings sorted by name, for display and JSON output.
    pub fn bindings(&self) -> Vec<(&str, &Slot)> {
        let mut out: Vec<(&str, &Slot)> = self
            .globals
            .iter()
            .map(|(name, slot)| (name.as_str(), slot))
            .collect();
        out.sort_by_key(|(name, _)| *name);
        out
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, slot) in self.bindings() {
            writeln!(f, "{name} = {slot}")?;
        }
        Ok(())
    }
}
