use crate::{
    codegen::{context::ModuleContext, error::FallableInstructions},
    common::ast,
    vm,
};

use super::{function_call, literal, variable};

/// Terms are evaluated strictly left to right; operators
/// have no precedence (`2 + 3 * 4` is `(2 + 3) * 4`).
pub fn construct(
    expression: &ast::JackExpression,
    module_context: &ModuleContext,
) -> FallableInstructions {
    let mut instructions = construct_term(&expression.first, module_context)?;

    for (operator, term) in &expression.rest {
        instructions.extend(construct_term(term, module_context)?);
        instructions.push(construct_binary_operator(*operator));
    }

    Ok(instructions)
}

/// Evaluate every expression in order, leaving the values on the stack.
pub fn construct_all(
    expressions: &[ast::JackExpression],
    module_context: &ModuleContext,
) -> FallableInstructions {
    expressions
        .iter()
        .map(|expression| construct(expression, module_context))
        .collect::<Result<Vec<_>, _>>()
        .map(|instructions| instructions.concat())
}

fn construct_term(term: &ast::JackTerm, module_context: &ModuleContext) -> FallableInstructions {
    match term {
        ast::JackTerm::IntegerConstant(i) => Ok(literal::construct_integer(*i)),
        ast::JackTerm::StringConstant(s) => Ok(literal::construct_string(s)),
        ast::JackTerm::KeywordConstant(keyword) => Ok(literal::construct_keyword(*keyword)),
        ast::JackTerm::Variable(name) => variable::construct(name, module_context),
        ast::JackTerm::ArrayAccess(array, index) => {
            construct_array_access(array, index, module_context)
        }
        ast::JackTerm::SubroutineCall(call) => function_call::construct(call, module_context),
        ast::JackTerm::Parenthesized(inner) => construct(inner, module_context),
        ast::JackTerm::Unary(operator, operand) => Ok([
            construct_term(operand, module_context)?,
            vec![construct_unary_operator(*operator)],
        ]
        .concat()),
    }
}

/// `a[i]`: point `that` at `a + i` and read `that 0`.
fn construct_array_access(
    array: &ast::JackIdentifier,
    index: &ast::JackExpression,
    module_context: &ModuleContext,
) -> FallableInstructions {
    let array = variable::resolve(array, module_context)?;

    Ok([
        vec![array.push()],
        construct(index, module_context)?,
        vec![
            vm::command(vm::VMCommand::Add),
            vm::pop(vm::Segment::Pointer, 1),
            vm::push(vm::Segment::That, 0),
        ],
    ]
    .concat())
}

fn construct_binary_operator(operator: ast::BinaryOperator) -> vm::VMInstruction {
    match operator {
        ast::BinaryOperator::Add => vm::command(vm::VMCommand::Add),
        ast::BinaryOperator::Subtract => vm::command(vm::VMCommand::Sub),
        ast::BinaryOperator::Multiply => vm::call("Math.multiply", 2),
        ast::BinaryOperator::Divide => vm::call("Math.divide", 2),
        ast::BinaryOperator::And => vm::command(vm::VMCommand::And),
        ast::BinaryOperator::Or => vm::command(vm::VMCommand::Or),
        ast::BinaryOperator::LessThan => vm::command(vm::VMCommand::Lt),
        ast::BinaryOperator::GreaterThan => vm::command(vm::VMCommand::Gt),
        ast::BinaryOperator::Equal => vm::command(vm::VMCommand::Eq),
    }
}

const fn construct_unary_operator(operator: ast::UnaryOperator) -> vm::VMInstruction {
    match operator {
        ast::UnaryOperator::Negate => vm::command(vm::VMCommand::Neg),
        ast::UnaryOperator::Not => vm::command(vm::VMCommand::Not),
    }
}
