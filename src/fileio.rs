//! Code regarding file input (finding and reading source files)
//! and output (writing generated files) actions.
//!
//! ## Input
//! Every tool accepts either a single file or a directory. For a directory,
//! all the files with the expected extension directly inside it are used,
//! in name order. Files whose name contains `Ignore` are skipped.
//!
//! ## Output
//! Generated files are written alongside the inputs, keeping the
//! input's file stem (`Main.jack` -> `Main.vm`).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::Error;

/// Files with this marker in their name are never picked up from a directory.
const IGNORE_MARKER: &str = "Ignore";

pub mod input {
    use super::{fs, io, Error, Path, PathBuf, IGNORE_MARKER};

    #[derive(Debug)]
    pub struct SourceFile {
        path: PathBuf,
        content: String,
    }

    impl SourceFile {
        pub fn load(path: &Path) -> Result<Self, Error> {
            let content = fs::read_to_string(path).map_err(|source| Error::io(path, source))?;

            Ok(Self {
                path: path.to_owned(),
                content,
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        pub fn content(&self) -> &str {
            &self.content
        }

        /// File name without the extension (for Jack sources, the class name).
        pub fn stem(&self) -> String {
            file_stem(&self.path)
        }
    }

    pub fn file_stem(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn has_extension(path: &Path, extension: &str) -> bool {
        path.extension().is_some_and(|ext| ext == extension)
    }

    /// Find the input files at `path`: the file itself, or the
    /// matching files of a directory (sorted by name).
    pub fn discover(path: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
        if !path.is_dir() {
            if !path.is_file() {
                return Err(Error::io(
                    path,
                    io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
                ));
            }

            if !has_extension(path, extension) {
                return Err(Error::io(
                    path,
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("expected a `.{extension}` file"),
                    ),
                ));
            }

            return Ok(vec![path.to_owned()]);
        }

        let mut files = Vec::new();
        let entries = fs::read_dir(path).map_err(|source| Error::io(path, source))?;

        for entry in entries {
            let file_path = entry.map_err(|source| Error::io(path, source))?.path();

            if !file_path.is_file() || !has_extension(&file_path, extension) {
                continue;
            }

            if file_stem(&file_path).contains(IGNORE_MARKER) {
                log::warn!("skipping `{}`", file_path.display());
                continue;
            }

            files.push(file_path);
        }

        if files.is_empty() {
            return Err(Error::io(
                path,
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no `.{extension}` files in directory"),
                ),
            ));
        }

        files.sort();
        Ok(files)
    }
}

pub mod output {
    use super::{fs, Error, Path, PathBuf};

    #[derive(Debug)]
    pub struct OutputFile {
        name: String,
        content: String,
    }

    impl OutputFile {
        pub const fn new(name: String, content: String) -> Self {
            Self { name, content }
        }

        pub fn name(&self) -> &str {
            &self.name
        }

        pub fn content(&self) -> &str {
            &self.content
        }
    }

    /// Write `<dir>/<name>.<extension>`, returning its path.
    pub fn generate(
        dir: &Path,
        output_file: &OutputFile,
        extension: &str,
    ) -> Result<PathBuf, Error> {
        let file_path = dir.join(&output_file.name).with_extension(extension);

        fs::write(&file_path, &output_file.content)
            .map_err(|source| Error::io(&file_path, source))?;

        log::info!("wrote `{}`", file_path.display());
        Ok(file_path)
    }
}
