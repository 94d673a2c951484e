use crate::{
    codegen::{
        common::{expression, function_call, variable},
        context::{program::LabelKind, ModuleContext, ProgramContext},
        error::FallableInstructions,
    },
    common::ast,
    vm,
};

pub fn construct(
    statements: &[ast::JackStatement],
    module_context: &ModuleContext,
    program_context: &mut ProgramContext,
) -> FallableInstructions {
    let mut instructions = Vec::new();

    for statement in statements {
        instructions.extend(construct_statement(
            statement,
            module_context,
            program_context,
        )?);
    }

    Ok(instructions)
}

fn construct_statement(
    statement: &ast::JackStatement,
    module_context: &ModuleContext,
    program_context: &mut ProgramContext,
) -> FallableInstructions {
    match statement {
        ast::JackStatement::Let(statement) => construct_let(statement, module_context),
        ast::JackStatement::If(statement) => {
            construct_if(statement, module_context, program_context)
        }
        ast::JackStatement::While(statement) => {
            construct_while(statement, module_context, program_context)
        }
        ast::JackStatement::Do(call) => Ok([
            function_call::construct(call, module_context)?,
            // discard the return value
            vec![vm::pop(vm::Segment::Temp, 0)],
        ]
        .concat()),
        ast::JackStatement::Return(value) => construct_return(value.as_ref(), module_context),
    }
}

fn construct_let(statement: &ast::JackLet, module_context: &ModuleContext) -> FallableInstructions {
    let target = variable::resolve(&statement.target, module_context)?;
    let value = expression::construct(&statement.value, module_context)?;

    let Some(index) = &statement.index else {
        return Ok([value, vec![target.pop()]].concat());
    };

    // the address is computed first, but `that` can only be set after
    // the value is evaluated (the value may use `that` itself)
    Ok([
        vec![target.push()],
        expression::construct(index, module_context)?,
        vec![vm::command(vm::VMCommand::Add)],
        value,
        vec![
            vm::pop(vm::Segment::Temp, 0),
            vm::pop(vm::Segment::Pointer, 1),
            vm::push(vm::Segment::Temp, 0),
            vm::pop(vm::Segment::That, 0),
        ],
    ]
    .concat())
}

fn construct_if(
    statement: &ast::JackIf,
    module_context: &ModuleContext,
    program_context: &mut ProgramContext,
) -> FallableInstructions {
    let id = program_context.label_ids.next_id();
    let else_label = LabelKind::IfElse.with_id(id);
    let end_label = LabelKind::IfEnd.with_id(id);

    // nested statements take their ids in source order
    let then_branch = construct(&statement.then_branch, module_context, program_context)?;
    let else_branch = match &statement.else_branch {
        Some(statements) => construct(statements, module_context, program_context)?,
        None => Vec::new(),
    };

    Ok([
        expression::construct(&statement.condition, module_context)?,
        vec![
            vm::command(vm::VMCommand::Not),
            vm::label(vm::LabelAction::IfGoto, else_label.clone()),
        ],
        then_branch,
        vec![
            vm::label(vm::LabelAction::Goto, end_label.clone()),
            vm::label(vm::LabelAction::Label, else_label),
        ],
        else_branch,
        vec![vm::label(vm::LabelAction::Label, end_label)],
    ]
    .concat())
}

fn construct_while(
    statement: &ast::JackWhile,
    module_context: &ModuleContext,
    program_context: &mut ProgramContext,
) -> FallableInstructions {
    let id = program_context.label_ids.next_id();
    let start_label = LabelKind::WhileStart.with_id(id);
    let end_label = LabelKind::WhileEnd.with_id(id);

    Ok([
        vec![vm::label(vm::LabelAction::Label, start_label.clone())],
        expression::construct(&statement.condition, module_context)?,
        vec![
            vm::command(vm::VMCommand::Not),
            vm::label(vm::LabelAction::IfGoto, end_label.clone()),
        ],
        construct(&statement.body, module_context, program_context)?,
        vec![
            vm::label(vm::LabelAction::Goto, start_label),
            vm::label(vm::LabelAction::Label, end_label),
        ],
    ]
    .concat())
}

fn construct_return(
    value: Option<&ast::JackExpression>,
    module_context: &ModuleContext,
) -> FallableInstructions {
    let value = match value {
        Some(expression) => expression::construct(expression, module_context)?,
        // void subroutines still return something
        None => vec![vm::push(vm::Segment::Constant, 0)],
    };

    Ok([value, vec![vm::vm_return()]].concat())
}
