//! The per-unit compilation pipeline:
//! strip comments -> tokenize -> parse -> generate VM code.
//!
//! Every unit of an input is compiled before anything is written,
//! so a failing unit leaves no `.vm` files behind.

use std::path::{Path, PathBuf};

use crate::{
    codegen::{self, context::ProgramContext},
    error::Error,
    fileio::{
        input::{self, SourceFile},
        output::{self, OutputFile},
    },
    parser::{self, xml},
};

pub const SOURCE_EXTENSION: &str = "jack";
pub const OUTPUT_EXTENSION: &str = "vm";

/// Suffix of the token dump file name (`MainT.xml`).
const TOKENS_SUFFIX: &str = "T";

/// An error, along with the unit it occurred in.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct CompileFailure {
    pub path: PathBuf,
    /// Source text, when it could be read.
    pub content: Option<String>,
    pub error: Error,
}

impl CompileFailure {
    fn new(path: &Path, content: Option<&str>, error: Error) -> Self {
        Self {
            path: path.to_owned(),
            content: content.map(str::to_owned),
            error,
        }
    }
}

/// Generated files of one compiled unit, not yet written.
#[derive(Debug)]
pub struct CompiledUnit {
    pub directory: PathBuf,
    pub vm: OutputFile,
    /// Token dump, generated in debug mode only.
    pub tokens: Option<OutputFile>,
}

/// Compile a single class.
pub fn compile_source(
    name: &str,
    source: &str,
    program_context: &mut ProgramContext,
) -> Result<(OutputFile, Option<OutputFile>), Error> {
    let tokens = parser::tokenize_source(source)?;
    log::debug!("`{name}`: {} tokens", tokens.len());

    let tokens_xml = program_context.debug.then(|| {
        OutputFile::new(
            format!("{name}{TOKENS_SUFFIX}"),
            xml::tokens_to_xml(&tokens),
        )
    });

    let class = parser::parse_tokens(tokens)?;
    if class.name.0 != name {
        log::warn!("class `{}` is declared in `{name}`", class.name);
    }

    let vm = codegen::construct_class(class, program_context)?;

    Ok((
        OutputFile::new(name.to_owned(), vm.content().to_owned()),
        tokens_xml,
    ))
}

pub fn compile_file(
    source_file: &SourceFile,
    program_context: &mut ProgramContext,
) -> Result<CompiledUnit, CompileFailure> {
    let (vm, tokens) = compile_source(&source_file.stem(), source_file.content(), program_context)
        .map_err(|error| {
            CompileFailure::new(source_file.path(), Some(source_file.content()), error)
        })?;

    Ok(CompiledUnit {
        directory: source_file
            .path()
            .parent()
            .map(Path::to_owned)
            .unwrap_or_default(),
        vm,
        tokens,
    })
}

/// Compile a `.jack` file, or every `.jack` file of a directory,
/// writing each `.vm` file next to its source.
pub fn compile(
    path: &Path,
    program_context: &mut ProgramContext,
) -> Result<Vec<PathBuf>, CompileFailure> {
    let sources = input::discover(path, SOURCE_EXTENSION)
        .map_err(|error| CompileFailure::new(path, None, error))?;

    let mut units = Vec::with_capacity(sources.len());
    for source_path in &sources {
        let source_file = SourceFile::load(source_path)
            .map_err(|error| CompileFailure::new(source_path, None, error))?;

        log::debug!("compiling `{}`", source_path.display());
        units.push(compile_file(&source_file, program_context)?);
    }

    let mut written = Vec::with_capacity(units.len());
    for unit in &units {
        let write = |file: &OutputFile, extension: &str| {
            output::generate(&unit.directory, file, extension)
                .map_err(|error| CompileFailure::new(&unit.directory, None, error))
        };

        written.push(write(&unit.vm, OUTPUT_EXTENSION)?);

        if let Some(tokens) = &unit.tokens {
            write(tokens, "xml")?;
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{assembler, vmtranslator};

    const MAIN: &str = r#"
        /** Prints the sum of the first few numbers. */
        class Main {
            function void main() {
                var int i, sum;
                let i = 0;
                let sum = 0;
                while (i < 5) {
                    let sum = sum + i;
                    let i = i + 1;
                }
                do Output.printString("sum: ");
                do Output.printInt(sum);
                return;
            }
        }
    "#;

    const COUNTER: &str = "
        class Counter {
            field int value;

            constructor Counter new() { let value = 0; return this; }
            method void increment() { let value = value + 1; return; }
            method int get() { return value; }
        }
    ";

    fn write_sources(dir: &Path, sources: &[(&str, &str)]) {
        for (name, source) in sources {
            fs::write(dir.join(name), source).expect("should write source");
        }
    }

    #[test]
    fn test_compile_directory() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        write_sources(
            dir.path(),
            &[
                ("Main.jack", MAIN),
                ("Counter.jack", COUNTER),
                ("OldIgnore.jack", "not even jack"),
            ],
        );

        let written = compile(dir.path(), &mut ProgramContext::new()).expect("should compile");

        assert_eq!(
            written,
            [dir.path().join("Counter.vm"), dir.path().join("Main.vm")]
        );
        assert!(!dir.path().join("OldIgnore.vm").exists());
        assert!(!dir.path().join("MainT.xml").exists());

        let main = fs::read_to_string(dir.path().join("Main.vm")).expect("should read");
        assert!(main.starts_with("function Main.main 2\n"));
        assert!(main.ends_with("push constant 0\nreturn\n"));
    }

    #[test]
    fn test_nothing_written_on_failure() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        write_sources(
            dir.path(),
            &[
                ("A.jack", "class A { function void f() { return; } }"),
                ("B.jack", "class B { function int f() { return 1 } }"),
            ],
        );

        let failure = compile(dir.path(), &mut ProgramContext::new())
            .expect_err("should not compile");

        assert_eq!(failure.path, dir.path().join("B.jack"));
        assert!(failure.content.is_some());
        assert!(matches!(failure.error, Error::Syntax { .. }));
        assert_eq!(
            failure.to_string(),
            "SyntaxError: expected ';', found symbol `}`"
        );
        assert!(!dir.path().join("A.vm").exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().expect("should create temp dir");

        let failure = compile(&dir.path().join("Nope.jack"), &mut ProgramContext::new())
            .expect_err("should not compile");

        assert!(matches!(failure.error, Error::Io { .. }));
        assert!(failure.to_string().starts_with("IOError: "));
    }

    #[test]
    fn test_debug_mode_only_adds_files() {
        let plain_dir = tempfile::tempdir().expect("should create temp dir");
        let debug_dir = tempfile::tempdir().expect("should create temp dir");
        write_sources(plain_dir.path(), &[("Main.jack", MAIN)]);
        write_sources(debug_dir.path(), &[("Main.jack", MAIN)]);

        compile(plain_dir.path(), &mut ProgramContext::new()).expect("should compile");
        compile(
            debug_dir.path(),
            &mut ProgramContext::new().with_debug(true),
        )
        .expect("should compile");

        let read = |path: PathBuf| fs::read_to_string(path).expect("should read");

        assert_eq!(
            read(plain_dir.path().join("Main.vm")),
            read(debug_dir.path().join("Main.vm"))
        );

        let tokens = read(debug_dir.path().join("MainT.xml"));
        assert!(tokens.starts_with("<tokens>\n<keyword> class </keyword>\n"));
        assert!(tokens.contains("<stringConstant> sum:  </stringConstant>"));
        assert!(tokens.contains("<symbol> &lt; </symbol>"));
    }

    #[test]
    fn test_reset_reproduces_output() {
        let mut program_context = ProgramContext::new();

        let (first, _) =
            compile_source("Main", MAIN, &mut program_context).expect("should compile");
        let (second, _) =
            compile_source("Main", MAIN, &mut program_context).expect("should compile");
        program_context.label_ids.reset();
        let (third, _) =
            compile_source("Main", MAIN, &mut program_context).expect("should compile");

        assert!(first.content().contains("WHILE_START_ID_1"));
        assert!(second.content().contains("WHILE_START_ID_2"));
        assert_eq!(first.content(), third.content());
    }

    #[test]
    fn test_jack_to_binary() {
        let sys = "
            class Sys {
                function void init() {
                    var Counter counter;
                    let counter = Counter.new();
                    do counter.increment();
                    do Main.main();
                    do Sys.halt();
                    return;
                }
                function void halt() { while (true) { } return; }
            }
        ";

        let mut program_context = ProgramContext::new();
        let units: Vec<_> = [("Main", MAIN), ("Counter", COUNTER), ("Sys", sys)]
            .into_iter()
            .map(|(name, source)| {
                let (vm, _) =
                    compile_source(name, source, &mut program_context).expect("should compile");
                vmtranslator::TranslationUnit::new(name, vm.content())
            })
            .collect();

        let asm = vmtranslator::translate(&units, vmtranslator::default_startup(&units))
            .expect("should translate");
        let hack = assembler::assemble(&asm).expect("should assemble");

        let rom_instructions = asm.lines().filter(|line| !line.starts_with('(')).count();
        assert_eq!(hack.lines().count(), rom_instructions);
        assert!(hack
            .lines()
            .all(|word| word.len() == 16 && word.chars().all(|c| c == '0' || c == '1')));
    }
}
