use std::{env, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use jackc::{
    assembler,
    fileio::{
        input::{self, SourceFile},
        output::{self, OutputFile},
    },
};

#[derive(Debug)]
struct Config {
    path: PathBuf,
}

impl Config {
    fn parse(args: Vec<String>) -> Result<Self> {
        if args.len() != 2 {
            return Err(anyhow!("usage: hackasm <file.asm>"));
        }

        let path = PathBuf::from(&args[1]);
        if !input::has_extension(&path, "asm") {
            return Err(anyhow!(
                "file must be an asm file (provided: {})",
                path.display()
            ));
        }

        Ok(Self { path })
    }
}

fn main() -> Result<()> {
    let config = Config::parse(env::args().collect())?;
    jackc::init_logging("warn");

    let source = SourceFile::load(&config.path)?;
    let binary = assembler::assemble(source.content())
        .with_context(|| format!("assembling {}", config.path.display()))?;

    let directory = config.path.parent().map(PathBuf::from).unwrap_or_default();
    output::generate(&directory, &OutputFile::new(source.stem(), binary), "hack")?;

    Ok(())
}
