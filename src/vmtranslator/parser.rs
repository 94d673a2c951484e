use crate::vm::VMInstruction;

use super::{Error, ErrorKind};

/// Instructions of one `.vm` file, alongside their line numbers.
///
/// `//` comments and blank lines are skipped.
pub fn parse(file_name: &str, source: &str) -> Result<Vec<(usize, VMInstruction)>, Error> {
    let mut instructions = Vec::new();

    for (i, line) in source.lines().enumerate() {
        let code = line.split("//").next().unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }

        let instruction = code.parse::<VMInstruction>().map_err(|error| Error {
            file: file_name.to_owned(),
            line: i + 1,
            kind: ErrorKind::Parse(error),
        })?;

        instructions.push((i + 1, instruction));
    }

    Ok(instructions)
}
