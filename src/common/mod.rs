//! Common data & logic shared across the compiler
//! (e.g. AST, symbol tables).
pub mod ast;
pub mod symbol_table;
