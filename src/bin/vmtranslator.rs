use std::{env, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use jackc::{
    fileio::{
        input::{self, SourceFile},
        output::{self, OutputFile},
    },
    vmtranslator::{self, Startup, TranslationUnit},
};

const USAGE: &str = "usage: vmtranslator <file.vm | directory> [--bare]";

#[derive(Debug)]
struct Config {
    path: PathBuf,
    bare: bool,
}

impl Config {
    fn parse(args: Vec<String>) -> Result<Self> {
        let mut path = None;
        let mut bare = false;

        for arg in args.into_iter().skip(1) {
            match arg.as_str() {
                "--bare" => bare = true,
                flag if flag.starts_with("--") => return Err(anyhow!("unknown option `{flag}`")),
                _ if path.is_some() => return Err(anyhow!("more than one input path")),
                _ => path = Some(PathBuf::from(&arg)),
            }
        }

        let path = path.ok_or_else(|| anyhow!("no input path\n{USAGE}"))?;
        if !path.is_dir() && !input::has_extension(&path, "vm") {
            return Err(anyhow!(
                "input must be a `.vm` file or a directory (provided: {})\n{USAGE}",
                path.display()
            ));
        }

        Ok(Self { path, bare })
    }

    /// `<dir>/<dir>.asm` for directories, `<stem>.asm` beside a single file.
    fn output_location(&self) -> (PathBuf, String) {
        if self.path.is_dir() {
            (self.path.clone(), input::file_stem(&self.path))
        } else {
            (
                self.path.parent().map(PathBuf::from).unwrap_or_default(),
                input::file_stem(&self.path),
            )
        }
    }
}

fn main() -> Result<()> {
    let config = Config::parse(env::args().collect())?;
    jackc::init_logging("warn");

    let units = input::discover(&config.path, "vm")?
        .iter()
        .map(|path| {
            SourceFile::load(path).map(|file| TranslationUnit::new(file.stem(), file.content()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let startup = if config.bare {
        Startup::Bare
    } else {
        vmtranslator::default_startup(&units)
    };

    let assembly = vmtranslator::translate(&units, startup)
        .with_context(|| format!("translating {}", config.path.display()))?;

    let (directory, name) = config.output_location();
    output::generate(&directory, &OutputFile::new(name, assembly), "asm")?;

    Ok(())
}
