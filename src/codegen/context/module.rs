use crate::{
    common::{
        ast::JackIdentifier,
        symbol_table::{self, ClassSymbolTable, JackSymbol, SubroutineSymbolTable},
    },
    error::{Error, SymbolErrorKind},
    vm,
};

// region: Context

/// Context information regarding the class being compiled.
#[derive(Debug)]
pub struct Context {
    pub class_name: String,
    pub class_symbols: ClassSymbolTable,
    /// Symbols of the subroutine currently being compiled.
    pub subroutine_symbols: SubroutineSymbolTable,
    pub output: vm::VMModule,
}

impl Context {
    pub fn new(class_name: String, class_symbols: ClassSymbolTable) -> Self {
        Self {
            class_name,
            class_symbols,
            subroutine_symbols: SubroutineSymbolTable::default(),
            output: vm::VMModule::new(),
        }
    }

    /// Make `symbols` the active subroutine scope.
    pub fn enter_subroutine(&mut self, symbols: SubroutineSymbolTable) {
        self.subroutine_symbols = symbols;
    }

    pub fn lookup(&self, name: &str) -> Option<&JackSymbol> {
        symbol_table::lookup(&self.class_symbols, &self.subroutine_symbols, name)
    }

    /// Like [`Context::lookup`], for places where only a variable is allowed.
    pub fn resolve(&self, identifier: &JackIdentifier) -> Result<&JackSymbol, Error> {
        self.lookup(&identifier.0).ok_or_else(|| Error::Symbol {
            kind: SymbolErrorKind::Undeclared,
            name: identifier.0.clone(),
            span: identifier.1.clone(),
        })
    }

    /// Fully qualified VM name of a subroutine of this class.
    pub fn function_name(&self, subroutine_name: &str) -> String {
        format!("{}.{subroutine_name}", self.class_name)
    }
}

// endregion

#[cfg(test)]
mod tests {
    use crate::common::{
        ast::{ClassVariableKind, JackType},
        symbol_table::{SubroutineVariableKind, SymbolKind},
    };

    use super::*;

    #[test]
    fn test_lookup_through_both_scopes() {
        let mut class_symbols = ClassSymbolTable::default();
        assert!(class_symbols
            .define(
                &JackIdentifier::internal("count"),
                JackType::Int,
                ClassVariableKind::Static
            )
            .is_ok());

        let mut context = Context::new(String::from("Counter"), class_symbols);

        let mut subroutine_symbols = SubroutineSymbolTable::default();
        assert!(subroutine_symbols
            .define(
                &JackIdentifier::internal("step"),
                JackType::Int,
                SubroutineVariableKind::Argument
            )
            .is_ok());
        context.enter_subroutine(subroutine_symbols);

        assert!(context
            .lookup("count")
            .is_some_and(|symbol| symbol.kind == SymbolKind::Static));
        assert!(context
            .lookup("step")
            .is_some_and(|symbol| symbol.kind == SymbolKind::Argument));
        assert_eq!(context.function_name("increment"), "Counter.increment");

        assert!(context
            .resolve(&JackIdentifier::internal("missing"))
            .is_err_and(|err| matches!(
                err,
                Error::Symbol {
                    kind: SymbolErrorKind::Undeclared,
                    ..
                }
            )));
    }
}
