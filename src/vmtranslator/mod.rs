//! VM translator: turns Hack VM code into Hack assembly.
//!
//! All the translation units of a program are translated into a single
//! assembly program, optionally preceded by startup code.

mod parser;
pub mod writer;

use crate::vm::{self, Segment};

pub use writer::CodeWriter;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{file}.vm:{line}: {kind}")]
pub struct Error {
    /// Stem of the `.vm` file the error is in.
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    pub kind: ErrorKind,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error(transparent)]
    Parse(#[from] vm::ParseError),
    #[error("cannot pop into the constant segment")]
    PopConstant,
    #[error("index {index} out of range for segment `{segment}`")]
    IndexOutOfRange { segment: Segment, index: usize },
    #[error("value {0} does not fit in an address instruction")]
    ValueOutOfRange(usize),
}

/// Code run before any translated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// No startup code at all.
    None,
    /// `SP = 256`, then `call Sys.init 0`.
    Bootstrap,
    /// Fixed segment bases for testing single files without `Sys.init`.
    Bare,
}

/// One `.vm` file: its stem (used to name statics) and content.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    pub name: String,
    pub source: String,
}

impl TranslationUnit {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Bootstrap only when the program has a `Sys` class to start.
pub fn default_startup(units: &[TranslationUnit]) -> Startup {
    if units.iter().any(|unit| unit.name == "Sys") {
        Startup::Bootstrap
    } else {
        Startup::None
    }
}

/// Translate a whole program into assembly text.
pub fn translate(units: &[TranslationUnit], startup: Startup) -> Result<String, Error> {
    let mut writer = CodeWriter::new();

    match startup {
        Startup::None => {}
        Startup::Bootstrap => writer.write_bootstrap(),
        Startup::Bare => writer.write_bare_startup(),
    }

    for unit in units {
        log::debug!("translating `{}`", unit.name);

        writer.set_file_name(&unit.name);
        for (line, instruction) in parser::parse(&unit.name, &unit.source)? {
            writer
                .write(&instruction)
                .map_err(|kind| Error {
                    file: unit.name.clone(),
                    line,
                    kind,
                })?;
        }
    }

    Ok(writer.render())
}
