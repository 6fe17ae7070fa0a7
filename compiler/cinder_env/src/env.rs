// Static environments: variable scopes and the program-wide function table.

use std::collections::HashMap;

use cinder_ast::ast::{Declaration, Program};
use cinder_type::types::{FunctionSig, Type};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("duplicate declaration: {name}")]
    DuplicateDeclaration { name: String },
}

/// A flat mapping from variable name to declared type.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    symbols: HashMap<String, Type>,
}

impl TypeEnv {
    pub fn new() -> Self {
        TypeEnv {
            symbols: HashMap::new(),
        }
    }

    /// Builds the mapping for one declaration set. A repeated name within
    /// the set is rejected regardless of declaration order.
    pub fn from_declarations<'a, I>(decls: I) -> Result<Self, EnvError>
    where
        I: IntoIterator<Item = &'a Declaration>,
    {
        let mut env = TypeEnv::new();
        for d in decls {
            env.declare(&d.name, d.ty)?;
        }
        Ok(env)
    }

    pub fn declare(&mut self, name: &str, ty: Type) -> Result<(), EnvError> {
        if self.symbols.contains_key(name) {
            return Err(EnvError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        self.symbols.insert(name.to_string(), ty);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Type> {
        self.symbols.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Layers `inner` over `self`; inner bindings shadow. Used to combine a
    /// function's params and locals with the globals.
    pub fn overlay(&self, inner: &TypeEnv) -> TypeEnv {
        let mut symbols = self.symbols.clone();
        for (name, ty) in &inner.symbols {
            symbols.insert(name.clone(), *ty);
        }
        TypeEnv { symbols }
    }
}

/// Function name to signature, collected once per program and visible from
/// every function body, which is what makes self and mutual recursion
/// resolvable at call sites.
#[derive(Debug, Clone, Default)]
pub struct FunctionEnv {
    signatures: HashMap<String, FunctionSig>,
}

impl FunctionEnv {
    /// Collects every function signature. A function name may collide
    /// neither with another function nor with a global variable.
    pub fn from_program<O>(program: &Program<O>) -> Result<Self, EnvError> {
        let mut env = FunctionEnv::default();
        for f in &program.functions {
            let taken = env.signatures.contains_key(&f.name)
                || program.globals.iter().any(|g| g.name == f.name);
            if taken {
                return Err(EnvError::DuplicateDeclaration {
                    name: f.name.clone(),
                });
            }
            env.signatures.insert(
                f.name.clone(),
                FunctionSig {
                    params: f.params.iter().map(|p| p.ty).collect(),
                    ret: f.ty,
                },
            );
        }
        Ok(env)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSig> {
        self.signatures.get(name)
    }
}
