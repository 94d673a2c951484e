use std::{env, path::PathBuf, process::ExitCode};

use anyhow::{anyhow, Result};
use jackc::{codegen::context::ProgramContext, driver, fileio::input};

const USAGE: &str = "usage: jackc <file.jack | directory> [--debug]";

#[derive(Debug)]
struct Config {
    path: PathBuf,
    debug: bool,
}

impl Config {
    fn parse(args: Vec<String>) -> Result<Self> {
        let mut path = None;
        let mut debug = false;

        for arg in args.into_iter().skip(1) {
            match arg.as_str() {
                "--debug" => debug = true,
                flag if flag.starts_with("--") => return Err(anyhow!("unknown option `{flag}`")),
                _ if path.is_some() => return Err(anyhow!("more than one input path")),
                _ => path = Some(PathBuf::from(&arg)),
            }
        }

        let path = path.ok_or_else(|| anyhow!("no input path"))?;
        if !path.is_dir() && !input::has_extension(&path, driver::SOURCE_EXTENSION) {
            return Err(anyhow!(
                "input must be a `.jack` file or a directory (provided: {})",
                path.display()
            ));
        }

        Ok(Self { path, debug })
    }
}

fn main() -> ExitCode {
    let config = match Config::parse(env::args().collect()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    jackc::init_logging(if config.debug { "debug" } else { "warn" });

    let mut program_context = ProgramContext::new().with_debug(config.debug);

    match driver::compile(&config.path, &mut program_context) {
        Ok(written) => {
            log::info!("compiled {} file(s)", written.len());
            ExitCode::SUCCESS
        }
        Err(failure) => {
            error_report::display(&failure);
            ExitCode::FAILURE
        }
    }
}

mod error_report {
    use std::ops::Range;

    use ariadne::{Label, Report, ReportKind, Source};
    use jackc::driver::CompileFailure;

    /// Point into the source when the error has a location,
    /// otherwise print the single diagnostic line.
    pub fn display(failure: &CompileFailure) {
        let (Some(span), Some(content)) = (failure.error.span(), &failure.content) else {
            eprintln!("{}", failure.error);
            return;
        };

        let span = char_span(content, span);
        let file_path = failure.path.to_string_lossy();
        let file_path = file_path.as_ref();

        let report = Report::build(ReportKind::Error, file_path, span.start)
            .with_message(&failure.error)
            .with_label(Label::new((file_path, span)).with_message(failure.error.label()))
            .finish()
            .eprint((file_path, Source::from(content)));

        if report.is_err() {
            eprintln!("{}", failure.error);
        }
    }

    /// Reports index characters, compiler spans index bytes.
    pub fn char_span(content: &str, span: Range<usize>) -> Range<usize> {
        let to_char = |byte: usize| {
            content
                .get(..byte)
                .map_or_else(|| content.chars().count(), |prefix| prefix.chars().count())
        };

        to_char(span.start)..to_char(span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::error_report::char_span;

    #[test]
    fn test_char_span_after_multibyte_text() {
        let content = "// über ✓\nlet x$ = 1;";
        let start = content.find("x$").expect("should contain `x$`");

        let span = char_span(content, start..start + 2);

        assert_eq!(span, 14..16);
        assert_eq!(
            content.chars().skip(span.start).take(2).collect::<String>(),
            "x$"
        );
    }

    #[test]
    fn test_char_span_of_ascii_is_unchanged() {
        assert_eq!(char_span("class Main {}", 6..10), 6..10);
    }
}
