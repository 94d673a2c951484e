use crate::{
    codegen::{
        context::{ModuleContext, ProgramContext},
        error::{FallableAction, FallableInstructions},
        statements,
    },
    common::ast,
    vm,
};

pub fn construct(
    subroutines: Vec<ast::JackSubroutine>,
    module_context: &mut ModuleContext,
    program_context: &mut ProgramContext,
) -> FallableAction {
    for subroutine in subroutines {
        let instructions = construct_subroutine(subroutine, module_context, program_context)?;
        module_context.output.add_block(instructions.into());
    }

    Ok(())
}

fn construct_subroutine(
    subroutine: ast::JackSubroutine,
    module_context: &mut ModuleContext,
    program_context: &mut ProgramContext,
) -> FallableInstructions {
    let function_name = module_context.function_name(&subroutine.name.0);

    if program_context.debug {
        super::log_symbols(&function_name, subroutine.symbols.iter());
    }

    module_context.enter_subroutine(subroutine.symbols);

    Ok([
        vec![vm::function(
            function_name,
            subroutine.body.local_count(),
        )],
        construct_prologue(subroutine.kind, module_context),
        statements::construct(
            &subroutine.body.statements,
            module_context,
            program_context,
        )?,
    ]
    .concat())
}

/// Set up `this` before the body runs.
fn construct_prologue(
    kind: ast::SubroutineKind,
    module_context: &ModuleContext,
) -> Vec<vm::VMInstruction> {
    match kind {
        // allocate the object
        ast::SubroutineKind::Constructor => vec![
            vm::push(
                vm::Segment::Constant,
                module_context.class_symbols.field_count(),
            ),
            vm::call("Memory.alloc", 1),
            vm::pop(vm::Segment::Pointer, 0),
        ],
        // the object is passed as the (implicit) first argument
        ast::SubroutineKind::Method => vec![
            vm::push(vm::Segment::Argument, 0),
            vm::pop(vm::Segment::Pointer, 0),
        ],
        ast::SubroutineKind::Function => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::test_helpers::compile;

    #[test]
    fn test_void_function() {
        let output = compile("class C { function void main() { return; } }");

        let expected = ["function C.main 0", "push constant 0", "return", ""].join("\n");

        assert!(output.is_ok_and(|output| output == expected));
    }

    #[test]
    fn test_constructor_allocates_fields() {
        let source = "
            class Point {
                field int x, y;
                static int count;

                constructor Point new(int ax, int ay) {
                    let x = ax;
                    let y = ay;
                    return this;
                }
            }
        ";

        let expected = [
            "function Point.new 0",
            "push constant 2",
            "call Memory.alloc 1",
            "pop pointer 0",
            "push argument 0",
            "pop this 0",
            "push argument 1",
            "pop this 1",
            "push pointer 0",
            "return",
            "",
        ]
        .join("\n");

        assert!(compile(source).is_ok_and(|output| output == expected));
    }

    #[test]
    fn test_method_binds_this() {
        let source = "
            class Point {
                field int x;

                method int getX() {
                    var int a, b;
                    var boolean c;
                    return x;
                }
            }
        ";

        let expected = [
            "function Point.getX 3",
            "push argument 0",
            "pop pointer 0",
            "push this 0",
            "return",
            "",
        ]
        .join("\n");

        assert!(compile(source).is_ok_and(|output| output == expected));
    }

    #[test]
    fn test_subroutines_in_declaration_order() {
        let source = "
            class Main {
                function void a() { return; }
                method void b() { return; }
                function void c() { return; }
            }
        ";

        let functions: Vec<String> = compile(source)
            .expect("should compile")
            .lines()
            .filter(|line| line.starts_with("function"))
            .map(String::from)
            .collect();

        assert_eq!(
            functions,
            ["function Main.a 0", "function Main.b 0", "function Main.c 0"]
        );
    }
}
