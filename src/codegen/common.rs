//! Code generation shared by every statement kind
//! (expressions, terms and subroutine calls).

pub mod expression;
pub mod function_call;
pub mod literal;
pub mod variable;
