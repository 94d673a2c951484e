use crate::{
    codegen::{context::ModuleContext, error::FallableInstructions},
    common::{
        ast,
        symbol_table::{JackSymbol, SymbolKind},
    },
    error::Error,
    vm,
};

/// Where a variable lives in VM memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableContext {
    pub segment: vm::Segment,
    pub index: usize,
}

impl VariableContext {
    /// Helper function for performing a `push`
    /// action with the variable's segment and index.
    pub const fn push(self) -> vm::VMInstruction {
        vm::push(self.segment, self.index)
    }

    /// Helper function for performing a `pop`
    /// action with the variable's segment and index.
    pub const fn pop(self) -> vm::VMInstruction {
        vm::pop(self.segment, self.index)
    }
}

impl From<&JackSymbol> for VariableContext {
    fn from(symbol: &JackSymbol) -> Self {
        Self {
            segment: symbol.kind.into(),
            index: symbol.index,
        }
    }
}

impl From<SymbolKind> for vm::Segment {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Static => Self::Static,
            SymbolKind::Field => Self::This,
            SymbolKind::Argument => Self::Argument,
            SymbolKind::Local => Self::Local,
        }
    }
}

/// Find a declared variable; undeclared names are an error.
pub fn resolve(
    variable: &ast::JackIdentifier,
    module_context: &ModuleContext,
) -> Result<VariableContext, Error> {
    module_context.resolve(variable).map(VariableContext::from)
}

/// Push the value of a variable.
pub fn construct(
    variable: &ast::JackIdentifier,
    module_context: &ModuleContext,
) -> FallableInstructions {
    Ok(vec![resolve(variable, module_context)?.push()])
}

#[cfg(test)]
mod tests {
    use crate::{
        codegen::test_helpers,
        error::SymbolErrorKind,
    };

    use super::*;

    #[test]
    fn test_segment_per_kind() {
        let output = test_helpers::compile_method_body(
            "static int s; field int f;",
            "int a",
            "var int l;",
            "let l = s + f + a;",
        );

        let expected = [
            "push static 0",
            "push this 0",
            "add",
            "push argument 1",
            "add",
            "pop local 0",
        ]
        .join("\n");

        assert_eq!(output, expected);
    }

    #[test]
    fn test_undeclared_variable() {
        let result = test_helpers::compile("class C { function int f() { return x; } }");

        assert!(result.is_err_and(|err| matches!(
            err,
            Error::Symbol {
                kind: SymbolErrorKind::Undeclared,
                ref name,
                ..
            } if name == "x"
        )));
    }
}
