//! Hack assembler: translates assembly text into binary machine code,
//! one 16-character line of `0`/`1` per instruction.
//!
//! The first pass binds every label to the ROM address of the
//! instruction following it; the second pass encodes the instructions,
//! allocating RAM for variables as they are encountered.

pub mod code;
pub mod instruction;
pub mod symbols;

pub use instruction::{Address, Dest, Instruction, MAX_ADDRESS_VALUE};
use symbols::SymbolTable;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct Error {
    /// 1-based line number in the assembly source.
    pub line: usize,
    pub kind: ErrorKind,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("invalid computation `{0}`")]
    InvalidComp(String),
    #[error("invalid destination `{0}`")]
    InvalidDest(String),
    #[error("invalid jump `{0}`")]
    InvalidJump(String),
    #[error("constant `{0}` out of range (0..=32767)")]
    ConstantOutOfRange(String),
    #[error("duplicate label `{0}`")]
    DuplicateLabel(String),
    #[error("malformed label `{0}`")]
    MalformedLabel(String),
    #[error("malformed symbol `{0}`")]
    MalformedSymbol(String),
    #[error("program does not fit in ROM")]
    ProgramTooLarge,
}

/// Instructions of a source, alongside their line numbers.
pub fn parse(source: &str) -> Result<Vec<(usize, Instruction)>, Error> {
    let mut instructions = Vec::new();

    for (i, line) in source.lines().enumerate() {
        let instruction = Instruction::parse(line).map_err(|kind| Error { line: i + 1, kind })?;

        if let Some(instruction) = instruction {
            instructions.push((i + 1, instruction));
        }
    }

    Ok(instructions)
}

/// Assemble a whole program into `.hack` text.
pub fn assemble(source: &str) -> Result<String, Error> {
    let instructions = parse(source)?;
    let mut symbols = SymbolTable::new();

    // first pass: labels
    let mut rom_address: u16 = 0;
    for (line, instruction) in &instructions {
        // every ROM address must be loadable by an A-instruction
        if rom_address > MAX_ADDRESS_VALUE {
            return Err(Error {
                line: *line,
                kind: ErrorKind::ProgramTooLarge,
            });
        }

        match instruction {
            Instruction::Label(label) => {
                if !symbols.bind_label(label, rom_address) {
                    return Err(Error {
                        line: *line,
                        kind: ErrorKind::DuplicateLabel(label.clone()),
                    });
                }
            }
            _ => rom_address += 1,
        }
    }

    // second pass: encoding
    let mut output = String::new();
    for (line, instruction) in &instructions {
        let address = match instruction {
            Instruction::Address(Address::Value(value)) => Some(*value),
            Instruction::Address(Address::Symbol(symbol)) => Some(symbols.resolve(symbol)),
            _ => None,
        };

        if let Some(word) = code::encode(instruction, address) {
            output.push_str(&format!("{word:016b}\n"));
        } else if let Instruction::Compute { comp, .. } = instruction {
            return Err(Error {
                line: *line,
                kind: ErrorKind::InvalidComp((*comp).to_owned()),
            });
        }
    }

    log::debug!("assembled {rom_address} instructions");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUM: &str = "
        // Adds 1+...+100.
            @i     // i refers to some mem. location.
            M=1    // i=1
            @sum   // sum refers to some mem. location.
            M=0    // sum=0
        (LOOP)
            @i
            D=M    // D=i
            @100
            D=D-A  // D=i-100
            @END
            D;JGT  // If (i-100)>0 goto END
            @i
            D=M    // D=i
            @sum
            M=D+M  // sum=sum+i
            @i
            M=M+1  // i=i+1
            @LOOP
            0;JMP  // Goto LOOP
        (END)
            @END
            0;JMP  // Infinite loop
    ";

    #[test]
    fn test_assemble_program() {
        let expected = [
            "0000000000010000",
            "1110111111001000",
            "0000000000010001",
            "1110101010001000",
            "0000000000010000",
            "1111110000010000",
            "0000000001100100",
            "1110010011010000",
            "0000000000010010",
            "1110001100000001",
            "0000000000010000",
            "1111110000010000",
            "0000000000010001",
            "1111000010001000",
            "0000000000010000",
            "1111110111001000",
            "0000000000000100",
            "1110101010000111",
            "0000000000010010",
            "1110101010000111",
            "",
        ]
        .join("\n");

        assert_eq!(assemble(SUM), Ok(expected));
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        assert_eq!(
            assemble("@1\n\nD=D*2\n"),
            Err(Error {
                line: 3,
                kind: ErrorKind::InvalidComp("D*2".to_owned()),
            })
        );
        assert_eq!(
            assemble("(A1)\n@0\n(A1)\n"),
            Err(Error {
                line: 3,
                kind: ErrorKind::DuplicateLabel("A1".to_owned()),
            })
        );
    }

    #[test]
    fn test_error_message() {
        let error = assemble("@99999").expect_err("should not assemble");

        assert_eq!(
            error.to_string(),
            "line 1: constant `99999` out of range (0..=32767)"
        );
    }

    #[test]
    fn test_rom_limit() {
        let fill = |count: usize| "D=0\n".repeat(count);

        let full = format!("@LAST\n{}(LAST)\n0;JMP\n", fill(32766));
        let output = assemble(&full).expect("should assemble");
        assert_eq!(output.lines().next(), Some("0111111111111111"));
        assert_eq!(output.lines().count(), 32768);

        let over = format!("@FAR\n0;JMP\n{}(FAR)\n", fill(32767));
        assert_eq!(
            assemble(&over),
            Err(Error {
                line: 32769,
                kind: ErrorKind::ProgramTooLarge,
            })
        );

        assert!(assemble(&fill(32769)).is_err_and(|err| err.kind == ErrorKind::ProgramTooLarge));
    }

    #[test]
    fn test_labels_do_not_take_rom() {
        let output = assemble("(START)\n@START\n(NEXT)\n@NEXT\n").expect("should assemble");

        assert_eq!(output, "0000000000000000\n0000000000000001\n");
    }
}
