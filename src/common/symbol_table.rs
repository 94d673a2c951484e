//! Two-level symbol tables: one for the class being compiled
//! (statics and fields), one for the subroutine being compiled
//! (arguments and locals).
//!
//! The parser fills the tables while it encounters declarations;
//! code generation only reads them (subroutine scope shadows class scope).

use std::collections::HashMap;

use crate::{
    common::ast::{ClassVariableKind, JackIdentifier, JackType},
    error::{Error, SymbolErrorKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SymbolKind {
    Static,
    Field,
    Argument,
    Local,
}

impl From<ClassVariableKind> for SymbolKind {
    fn from(kind: ClassVariableKind) -> Self {
        match kind {
            ClassVariableKind::Static => Self::Static,
            ClassVariableKind::Field => Self::Field,
        }
    }
}

/// Storage kinds that live in subroutine scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineVariableKind {
    Argument,
    Local,
}

impl From<SubroutineVariableKind> for SymbolKind {
    fn from(kind: SubroutineVariableKind) -> Self {
        match kind {
            SubroutineVariableKind::Argument => Self::Argument,
            SubroutineVariableKind::Local => Self::Local,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JackSymbol {
    pub name: String,
    pub r#type: JackType,
    pub kind: SymbolKind,
    pub index: usize,
}

// region: Scope

/// A single scope; symbol names are unique within it and
/// indices are dense per kind, in declaration order.
#[derive(Debug, Default)]
struct Scope {
    symbols: HashMap<String, JackSymbol>,
    declaration_order: Vec<String>,
    indices: KindIndices,
}

impl Scope {
    fn define(
        &mut self,
        name: &JackIdentifier,
        r#type: JackType,
        kind: SymbolKind,
    ) -> Result<&JackSymbol, Error> {
        if self.symbols.contains_key(&name.0) {
            return Err(Error::Symbol {
                kind: SymbolErrorKind::Redefinition,
                name: name.0.clone(),
                span: name.1.clone(),
            });
        }

        Ok(self.insert(&name.0, r#type, kind))
    }

    /// Add a symbol whose name is known to be free in this scope.
    fn insert(&mut self, name: &str, r#type: JackType, kind: SymbolKind) -> &JackSymbol {
        let symbol = JackSymbol {
            name: name.to_owned(),
            r#type,
            kind,
            index: self.indices.add_symbol(kind),
        };

        self.declaration_order.push(name.to_owned());
        self.symbols.entry(name.to_owned()).or_insert(symbol)
    }

    fn get(&self, name: &str) -> Option<&JackSymbol> {
        self.symbols.get(name)
    }

    fn count(&self, kind: SymbolKind) -> usize {
        self.indices.count(kind)
    }

    fn iter(&self) -> impl Iterator<Item = &JackSymbol> {
        self.declaration_order
            .iter()
            .filter_map(|name| self.symbols.get(name))
    }
}

#[derive(Debug, Default)]
struct KindIndices {
    indices: HashMap<SymbolKind, usize>,
}

impl KindIndices {
    /// Gets the next free index of a kind and reserves it.
    fn add_symbol(&mut self, kind: SymbolKind) -> usize {
        let next = self.indices.entry(kind).or_default();
        let index = *next;
        *next += 1;
        index
    }

    fn count(&self, kind: SymbolKind) -> usize {
        self.indices.get(&kind).copied().unwrap_or_default()
    }
}

// endregion

// region: Class & subroutine tables

/// Statics and fields of one class.
#[derive(Debug, Default)]
pub struct ClassSymbolTable {
    scope: Scope,
}

impl ClassSymbolTable {
    pub fn define(
        &mut self,
        name: &JackIdentifier,
        r#type: JackType,
        kind: ClassVariableKind,
    ) -> Result<&JackSymbol, Error> {
        self.scope.define(name, r#type, kind.into())
    }

    pub fn get(&self, name: &str) -> Option<&JackSymbol> {
        self.scope.get(name)
    }

    /// Size of an instance of the class, in words.
    pub fn field_count(&self) -> usize {
        self.scope.count(SymbolKind::Field)
    }

    pub fn static_count(&self) -> usize {
        self.scope.count(SymbolKind::Static)
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &JackSymbol> {
        self.scope.iter()
    }
}

/// Arguments and locals of one subroutine.
#[derive(Debug, Default)]
pub struct SubroutineSymbolTable {
    scope: Scope,
}

impl SubroutineSymbolTable {
    pub fn define(
        &mut self,
        name: &JackIdentifier,
        r#type: JackType,
        kind: SubroutineVariableKind,
    ) -> Result<&JackSymbol, Error> {
        self.scope.define(name, r#type, kind.into())
    }

    pub fn get(&self, name: &str) -> Option<&JackSymbol> {
        self.scope.get(name)
    }

    pub fn argument_count(&self) -> usize {
        self.scope.count(SymbolKind::Argument)
    }

    pub fn local_count(&self) -> usize {
        self.scope.count(SymbolKind::Local)
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &JackSymbol> {
        self.scope.iter()
    }
}

// endregion

// region: SymbolTables

/// Both scopes, as seen while parsing one class.
#[derive(Debug, Default)]
pub struct SymbolTables {
    pub class: ClassSymbolTable,
    pub subroutine: SubroutineSymbolTable,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_class_symbol(
        &mut self,
        name: &JackIdentifier,
        r#type: JackType,
        kind: ClassVariableKind,
    ) -> Result<&JackSymbol, Error> {
        self.class.define(name, r#type, kind)
    }

    pub fn define_subroutine_symbol(
        &mut self,
        name: &JackIdentifier,
        r#type: JackType,
        kind: SubroutineVariableKind,
    ) -> Result<&JackSymbol, Error> {
        self.subroutine.define(name, r#type, kind)
    }

    /// Start a fresh subroutine scope.
    ///
    /// Methods receive the implicit `this` (of the enclosing class type)
    /// as argument 0.
    pub fn reset_subroutine(&mut self, enclosing_class: &str, is_method: bool) {
        self.subroutine = SubroutineSymbolTable::default();

        if is_method {
            self.subroutine.scope.insert(
                "this",
                JackType::Class(enclosing_class.to_owned()),
                SymbolKind::Argument,
            );
        }
    }

    /// Hand over the finished subroutine scope, leaving an empty one behind.
    pub fn take_subroutine(&mut self) -> SubroutineSymbolTable {
        std::mem::take(&mut self.subroutine)
    }

    pub fn lookup(&self, name: &str) -> Option<&JackSymbol> {
        lookup(&self.class, &self.subroutine, name)
    }
}

/// Subroutine scope shadows class scope.
pub fn lookup<'a>(
    class: &'a ClassSymbolTable,
    subroutine: &'a SubroutineSymbolTable,
    name: &str,
) -> Option<&'a JackSymbol> {
    subroutine.get(name).or_else(|| class.get(name))
}

// endregion
