//! Typed model of Hack VM code.
//!
//! Shared by the compiler (which renders instructions to `.vm` text)
//! and the VM translator (which parses `.vm` text back into instructions).

use std::str::FromStr;

// region: VMModule

/// All the instructions generated for one class (one `.vm` file).
#[derive(Debug, Default)]
pub struct VMModule {
    blocks: Vec<VMInstructionBlock>,
}

impl VMModule {
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn add_block(&mut self, block: VMInstructionBlock) {
        self.blocks.push(block);
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|block| block.instructions.len()).sum()
    }

    /// Render as `.vm` text: one instruction per line, every line LF-terminated.
    pub fn compile(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for VMModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for instruction in self.blocks.iter().flat_map(|block| &block.instructions) {
            writeln!(f, "{instruction}")?;
        }

        Ok(())
    }
}

// endregion

// region: VMInstructionBlock

#[derive(Debug, Default)]
pub struct VMInstructionBlock {
    instructions: Vec<VMInstruction>,
}

impl VMInstructionBlock {
    pub fn compile(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for VMInstructionBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.instructions
                .iter()
                .map(|instruction| format!("{instruction}"))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

impl From<Vec<VMInstruction>> for VMInstructionBlock {
    fn from(instructions: Vec<VMInstruction>) -> Self {
        Self { instructions }
    }
}

// endregion

// region: VMInstruction

// region: VMInstruction utility functions

/// Utility function for the `push` VM instruction.
pub const fn push(segment: Segment, i: usize) -> VMInstruction {
    VMInstruction::Push(segment, i)
}

/// Utility function for the `pop` VM instruction.
pub const fn pop(segment: Segment, i: usize) -> VMInstruction {
    VMInstruction::Pop(segment, i)
}

/// Utility function for the arithmetic/logic VM instructions.
pub const fn command(command: VMCommand) -> VMInstruction {
    VMInstruction::Command(command)
}

/// Utility function for the `return` VM instruction.
pub const fn vm_return() -> VMInstruction {
    VMInstruction::Command(VMCommand::Return)
}

/// Utility function for the `label`, `goto` and `if-goto` VM instructions.
pub fn label<S: Into<String>>(label_action: LabelAction, label: S) -> VMInstruction {
    VMInstruction::Label(label_action, label.into())
}

/// Utility function for the `function` VM instruction.
pub fn function<S: Into<String>>(function_name: S, variable_count: usize) -> VMInstruction {
    VMInstruction::Function(function_name.into(), variable_count)
}

/// Utility function for the `call` VM instruction.
pub fn call<S: Into<String>>(function_name: S, argument_count: usize) -> VMInstruction {
    VMInstruction::Call(function_name.into(), argument_count)
}

// endregion

type Index = usize;
type Label = String;
type Count = usize;
type FunctionName = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VMInstruction {
    Push(Segment, Index),
    Pop(Segment, Index),
    Command(VMCommand),
    Label(LabelAction, Label),
    Function(FunctionName, Count),
    Call(FunctionName, Count),
}

impl VMInstruction {
    fn as_instruction(&self) -> String {
        match self {
            Self::Push(segment, i) => format!("push {segment} {i}"),
            Self::Pop(segment, i) => format!("pop {segment} {i}"),
            Self::Command(command) => command.to_string(),
            Self::Label(label_action, label) => format!("{label_action} {label}"),
            Self::Function(function_name, variable_count) => {
                format!("function {function_name} {variable_count}")
            }
            Self::Call(function_name, argument_count) => {
                format!("call {function_name} {argument_count}")
            }
        }
    }
}

impl std::fmt::Display for VMInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_instruction())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("unknown segment `{0}`")]
    UnknownSegment(String),
    #[error("`{0}` is not a valid index or count")]
    MalformedNumber(String),
    #[error("`{command}` expects {expected} operand(s), found {found}")]
    OperandCount {
        command: String,
        expected: usize,
        found: usize,
    },
}

/// Parses a single line of VM code, with comments
/// and surrounding whitespace already removed.
impl FromStr for VMInstruction {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, operands)) = parts.split_first() else {
            return Err(ParseError::UnknownCommand(String::new()));
        };

        let expect_operands = |expected: usize| {
            if operands.len() == expected {
                Ok(())
            } else {
                Err(ParseError::OperandCount {
                    command: name.to_owned(),
                    expected,
                    found: operands.len(),
                })
            }
        };

        if let Ok(command) = VMCommand::from_str(name) {
            expect_operands(0)?;
            return Ok(Self::Command(command));
        }

        if let Ok(label_action) = LabelAction::from_str(name) {
            expect_operands(1)?;
            return Ok(Self::Label(label_action, operands[0].to_owned()));
        }

        match name {
            "push" | "pop" => {
                expect_operands(2)?;
                let segment = Segment::from_str(operands[0])
                    .map_err(|_| ParseError::UnknownSegment(operands[0].to_owned()))?;
                let index = parse_number(operands[1])?;

                Ok(if name == "push" {
                    Self::Push(segment, index)
                } else {
                    Self::Pop(segment, index)
                })
            }
            "function" | "call" => {
                expect_operands(2)?;
                let function_name = operands[0].to_owned();
                let count = parse_number(operands[1])?;

                Ok(if name == "function" {
                    Self::Function(function_name, count)
                } else {
                    Self::Call(function_name, count)
                })
            }
            _ => Err(ParseError::UnknownCommand(name.to_owned())),
        }
    }
}

fn parse_number(text: &str) -> Result<usize, ParseError> {
    text.parse()
        .map_err(|_| ParseError::MalformedNumber(text.to_owned()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum VMCommand {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum LabelAction {
    Label,
    Goto,
    IfGoto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Segment {
    Local,
    Argument,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
}

// endregion
