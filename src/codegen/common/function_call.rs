//! Subroutine calls. The callee is never resolved at compile time;
//! the call shape alone decides how it is invoked:
//!
//! - `f(..)`: method of the current object,
//! - `var.f(..)`: method of the object stored in `var`,
//! - `Class.f(..)`: function or constructor of `Class`.

use crate::{
    codegen::{context::ModuleContext, error::FallableInstructions},
    common::ast,
    error::{Error, SymbolErrorKind},
    vm,
};

use super::{expression, variable::VariableContext};

pub fn construct(
    call: &ast::JackSubroutineCall,
    module_context: &ModuleContext,
) -> FallableInstructions {
    let arguments = expression::construct_all(&call.arguments, module_context)?;
    let argument_count = call.arguments.len();
    let subroutine_name = &call.name.0;

    let Some(receiver) = &call.receiver else {
        return Ok([
            vec![vm::push(vm::Segment::Pointer, 0)],
            arguments,
            vec![vm::call(
                module_context.function_name(subroutine_name),
                argument_count + 1,
            )],
        ]
        .concat());
    };

    let Some(symbol) = module_context.lookup(&receiver.0) else {
        // not a variable, so it has to be a class name
        return Ok([
            arguments,
            vec![vm::call(
                format!("{}.{subroutine_name}", receiver.0),
                argument_count,
            )],
        ]
        .concat());
    };

    let Some(class_name) = symbol.r#type.class_name() else {
        return Err(Error::Symbol {
            kind: SymbolErrorKind::PrimitiveReceiver,
            name: receiver.0.clone(),
            span: receiver.1.clone(),
        });
    };

    Ok([
        vec![VariableContext::from(symbol).push()],
        arguments,
        vec![vm::call(
            format!("{class_name}.{subroutine_name}"),
            argument_count + 1,
        )],
    ]
    .concat())
}
