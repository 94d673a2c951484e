//! Logic for converting a parsed `Jack` class (_AST_)
//! to Hack VM instructions.

use context::{ModuleContext, ProgramContext};

use crate::{
    common::{ast, symbol_table::JackSymbol},
    error::Error,
    fileio::output::OutputFile,
};

mod common;
pub mod context;
pub mod error;
mod statements;
mod subroutines;

pub fn construct_class(
    class: ast::JackClass,
    program_context: &mut ProgramContext,
) -> Result<OutputFile, Error> {
    if program_context.debug {
        log_symbols(&class.name.0, class.symbols.iter());
    }

    let mut module_context = ModuleContext::new(class.name.0, class.symbols);

    subroutines::construct(class.subroutines, &mut module_context, program_context)?;
    log::debug!(
        "`{}`: {} instructions",
        module_context.class_name,
        module_context.output.instruction_count()
    );

    Ok(OutputFile::new(
        module_context.class_name,
        module_context.output.compile(),
    ))
}

fn log_symbols<'a>(owner: &str, symbols: impl Iterator<Item = &'a JackSymbol>) {
    log::debug!("symbols of `{owner}`:");

    for symbol in symbols {
        log::debug!(
            "  {} {} {} {}",
            symbol.kind,
            symbol.index,
            symbol.r#type,
            symbol.name
        );
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use crate::{error::Error, parser};

    use super::{construct_class, ProgramContext};

    /// Compile a whole class with a fresh program context.
    pub fn compile(source: &str) -> Result<String, Error> {
        let class = parser::parse_source(source)?;

        construct_class(class, &mut ProgramContext::new()).map(|file| file.content().to_owned())
    }

    /// Compile `statements` as the body of `method void m(parameters)` in class `C`,
    /// returning only the instructions generated for the statements.
    pub fn compile_method_body(
        class_variables: &str,
        parameters: &str,
        locals: &str,
        statements: &str,
    ) -> String {
        let source = format!(
            "class C {{ {class_variables} method void m({parameters}) {{ {locals} {statements} return; }} }}"
        );

        let output = compile(&source).expect("should compile");
        let lines: Vec<&str> = output.lines().collect();

        // skip the declaration & prologue, and the trailing `return;`
        lines[3..lines.len() - 2].join("\n")
    }
}
