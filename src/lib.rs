//! A toolchain for the Jack language and the Hack platform:
//! Jack -> VM compiler, VM -> assembly translator and assembler.

pub mod assembler;
pub mod codegen;
pub mod common;
pub mod driver;
pub mod error;
pub mod fileio;
pub mod parser;
pub mod vm;
pub mod vmtranslator;

/// Log to stderr; `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
