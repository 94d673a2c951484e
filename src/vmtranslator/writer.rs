//! Assembly emission for every VM instruction.
//!
//! Stack layout: `SP` points at the next free slot, so the top of the
//! stack is at `RAM[SP - 1]`. `R13` and `R14` are scratch registers.

use crate::{
    assembler::{Address, Dest, Instruction},
    vm::{LabelAction, Segment, VMCommand, VMInstruction},
};

use super::ErrorKind;

const TEMP_BASE: usize = 5;
const TEMP_SIZE: usize = 8;

/// Saved caller frame: return address plus these four pointers.
const SAVED_POINTERS: [&str; 4] = ["LCL", "ARG", "THIS", "THAT"];

/// Words a call pushes before the callee runs.
const FRAME_SIZE: u16 = 5;

/// Segment bases used by [`CodeWriter::write_bare_startup`].
const BARE_BASES: [(&str, u16); 5] = [
    ("SP", 256),
    ("LCL", 300),
    ("ARG", 400),
    ("THIS", 3000),
    ("THAT", 3010),
];

// region: instruction helpers

fn at(symbol: impl Into<String>) -> Instruction {
    Instruction::Address(Address::Symbol(symbol.into()))
}

fn at_value(value: usize) -> Result<Instruction, ErrorKind> {
    u16::try_from(value)
        .ok()
        .filter(|value| *value <= crate::assembler::instruction::MAX_ADDRESS_VALUE)
        .map(|value| Instruction::Address(Address::Value(value)))
        .ok_or(ErrorKind::ValueOutOfRange(value))
}

const fn compute(dest: Dest, comp: &'static str) -> Instruction {
    Instruction::Compute {
        dest,
        comp,
        jump: None,
    }
}

const fn jump(comp: &'static str, jump: &'static str) -> Instruction {
    Instruction::Compute {
        dest: Dest {
            a: false,
            d: false,
            m: false,
        },
        comp,
        jump: Some(jump),
    }
}

fn label(name: impl Into<String>) -> Instruction {
    Instruction::Label(name.into())
}

// endregion

#[derive(Debug, Default)]
pub struct CodeWriter {
    output: Vec<Instruction>,
    file_name: String,
    /// Function whose body is being translated; scopes labels.
    current_function: Option<String>,
    comparisons: usize,
    calls: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start translating a new file; names its statics `<file_name>.i`.
    pub fn set_file_name(&mut self, file_name: &str) {
        file_name.clone_into(&mut self.file_name);
        self.current_function = None;
    }

    #[cfg(test)]
    fn instructions(&self) -> &[Instruction] {
        &self.output
    }

    /// Assembly text, one instruction per line.
    pub fn render(&self) -> String {
        self.output
            .iter()
            .map(|instruction| format!("{instruction}\n"))
            .collect()
    }

    /// `SP = 256`, then `call Sys.init 0`.
    pub fn write_bootstrap(&mut self) {
        self.emit([
            Instruction::Address(Address::Value(256)),
            compute(Dest::D, "A"),
            at("SP"),
            compute(Dest::M, "D"),
        ]);

        self.write_call("Sys.init", Instruction::Address(Address::Value(FRAME_SIZE)));
    }

    pub fn write_bare_startup(&mut self) {
        for (pointer, base) in BARE_BASES {
            self.emit([
                Instruction::Address(Address::Value(base)),
                compute(Dest::D, "A"),
                at(pointer),
                compute(Dest::M, "D"),
            ]);
        }
    }

    pub fn write(&mut self, instruction: &VMInstruction) -> Result<(), ErrorKind> {
        match instruction {
            VMInstruction::Push(segment, index) => self.write_push(*segment, *index),
            VMInstruction::Pop(segment, index) => self.write_pop(*segment, *index),
            VMInstruction::Command(command) => {
                self.write_command(*command);
                Ok(())
            }
            VMInstruction::Label(action, name) => {
                self.write_label(*action, name);
                Ok(())
            }
            VMInstruction::Function(name, local_count) => {
                self.write_function(name, *local_count);
                Ok(())
            }
            VMInstruction::Call(name, argument_count) => {
                // ARG = SP - 5 - argument_count
                let frame_offset = at_value(argument_count + usize::from(FRAME_SIZE))?;
                self.write_call(name, frame_offset);
                Ok(())
            }
        }
    }

    fn emit(&mut self, instructions: impl IntoIterator<Item = Instruction>) {
        self.output.extend(instructions);
    }

    // region: stack

    /// `RAM[SP] = D; SP++`
    fn push_d(&mut self) {
        self.emit([
            at("SP"),
            compute(Dest::A, "M"),
            compute(Dest::M, "D"),
            at("SP"),
            compute(Dest::M, "M+1"),
        ]);
    }

    /// `SP--; D = RAM[SP]`
    fn pop_d(&mut self) {
        self.emit([at("SP"), compute(Dest::AM, "M-1"), compute(Dest::D, "M")]);
    }

    /// Point `A` at the top of the stack, without popping.
    fn top(&mut self) {
        self.emit([at("SP"), compute(Dest::A, "M-1")]);
    }

    // endregion

    // region: memory access

    /// Symbol of a fixed-address segment slot (`static`, `temp`, `pointer`).
    fn fixed_address(&self, segment: Segment, index: usize) -> Result<String, ErrorKind> {
        let out_of_range = || ErrorKind::IndexOutOfRange { segment, index };

        match segment {
            Segment::Static => Ok(format!("{}.{index}", self.file_name)),
            Segment::Temp if index < TEMP_SIZE => Ok(format!("R{}", TEMP_BASE + index)),
            Segment::Pointer => match index {
                0 => Ok(String::from("THIS")),
                1 => Ok(String::from("THAT")),
                _ => Err(out_of_range()),
            },
            _ => Err(out_of_range()),
        }
    }

    /// Base pointer of a segment addressed relative to it.
    const fn base_pointer(segment: Segment) -> Option<&'static str> {
        match segment {
            Segment::Local => Some("LCL"),
            Segment::Argument => Some("ARG"),
            Segment::This => Some("THIS"),
            Segment::That => Some("THAT"),
            Segment::Constant | Segment::Static | Segment::Temp | Segment::Pointer => None,
        }
    }

    fn write_push(&mut self, segment: Segment, index: usize) -> Result<(), ErrorKind> {
        if segment == Segment::Constant {
            self.emit([at_value(index)?, compute(Dest::D, "A")]);
        } else if let Some(base) = Self::base_pointer(segment) {
            self.emit([
                at_value(index)?,
                compute(Dest::D, "A"),
                at(base),
                compute(Dest::A, "D+M"),
                compute(Dest::D, "M"),
            ]);
        } else {
            let address = self.fixed_address(segment, index)?;
            self.emit([at(address), compute(Dest::D, "M")]);
        }

        self.push_d();
        Ok(())
    }

    fn write_pop(&mut self, segment: Segment, index: usize) -> Result<(), ErrorKind> {
        if segment == Segment::Constant {
            return Err(ErrorKind::PopConstant);
        }

        if let Some(base) = Self::base_pointer(segment) {
            // R13 = base + index
            self.emit([
                at(base),
                compute(Dest::D, "M"),
                at_value(index)?,
                compute(Dest::D, "D+A"),
                at("R13"),
                compute(Dest::M, "D"),
            ]);
            self.pop_d();
            self.emit([at("R13"), compute(Dest::A, "M"), compute(Dest::M, "D")]);
        } else {
            let address = self.fixed_address(segment, index)?;
            self.pop_d();
            self.emit([at(address), compute(Dest::M, "D")]);
        }

        Ok(())
    }

    // endregion

    // region: arithmetic

    fn write_command(&mut self, command: VMCommand) {
        match command {
            VMCommand::Add => self.write_binary("D+M"),
            VMCommand::Sub => self.write_binary("M-D"),
            VMCommand::And => self.write_binary("D&M"),
            VMCommand::Or => self.write_binary("D|M"),
            VMCommand::Neg => self.write_unary("-M"),
            VMCommand::Not => self.write_unary("!M"),
            VMCommand::Eq => self.write_comparison("JEQ"),
            VMCommand::Gt => self.write_comparison("JGT"),
            VMCommand::Lt => self.write_comparison("JLT"),
            VMCommand::Return => self.write_return(),
        }
    }

    /// `x op y`, with `y` in `D` and `x` in `M`; the result replaces `x`.
    fn write_binary(&mut self, comp: &'static str) {
        self.pop_d();
        self.top();
        self.emit([compute(Dest::M, comp)]);
    }

    fn write_unary(&mut self, comp: &'static str) {
        self.top();
        self.emit([compute(Dest::M, comp)]);
    }

    /// Replace `x` with -1 (true) and reset it to 0 unless `x - y` satisfies `condition`.
    fn write_comparison(&mut self, condition: &'static str) {
        self.comparisons += 1;
        let done = format!("$cmp.{}", self.comparisons);

        self.pop_d();
        self.top();
        self.emit([
            compute(Dest::D, "M-D"),
            compute(Dest::M, "-1"),
            at(done.clone()),
            jump("D", condition),
        ]);
        self.top();
        self.emit([compute(Dest::M, "0"), label(done)]);
    }

    // endregion

    // region: program flow

    fn scoped_label(&self, name: &str) -> String {
        let scope = self.current_function.as_deref().unwrap_or(&self.file_name);
        format!("{scope}${name}")
    }

    fn write_label(&mut self, action: LabelAction, name: &str) {
        let target = self.scoped_label(name);

        match action {
            LabelAction::Label => self.emit([label(target)]),
            LabelAction::Goto => self.emit([at(target), jump("0", "JMP")]),
            LabelAction::IfGoto => {
                self.pop_d();
                self.emit([at(target), jump("D", "JNE")]);
            }
        }
    }

    // endregion

    // region: functions

    fn write_function(&mut self, name: &str, local_count: usize) {
        self.current_function = Some(name.to_owned());
        self.emit([label(name)]);

        for _ in 0..local_count {
            self.emit([at("SP"), compute(Dest::A, "M"), compute(Dest::M, "0")]);
            self.emit([at("SP"), compute(Dest::M, "M+1")]);
        }
    }

    /// `frame_offset` loads the distance from `SP` back to the callee's `ARG`.
    fn write_call(&mut self, name: &str, frame_offset: Instruction) {
        self.calls += 1;
        let caller = self.current_function.as_deref().unwrap_or("Bootstrap");
        let return_label = format!("{caller}$ret.{}", self.calls);

        self.emit([at(return_label.clone()), compute(Dest::D, "A")]);
        self.push_d();

        for pointer in SAVED_POINTERS {
            self.emit([at(pointer), compute(Dest::D, "M")]);
            self.push_d();
        }

        self.emit([
            at("SP"),
            compute(Dest::D, "M"),
            frame_offset,
            compute(Dest::D, "D-A"),
            at("ARG"),
            compute(Dest::M, "D"),
            // LCL = SP
            at("SP"),
            compute(Dest::D, "M"),
            at("LCL"),
            compute(Dest::M, "D"),
            at(name),
            jump("0", "JMP"),
            label(return_label),
        ]);
    }

    fn write_return(&mut self) {
        self.emit([
            // R13 = frame
            at("LCL"),
            compute(Dest::D, "M"),
            at("R13"),
            compute(Dest::M, "D"),
            // R14 = return address, RAM[frame - 5]
            Instruction::Address(Address::Value(FRAME_SIZE)),
            compute(Dest::A, "D-A"),
            compute(Dest::D, "M"),
            at("R14"),
            compute(Dest::M, "D"),
        ]);

        // RAM[ARG] = return value; SP = ARG + 1
        self.pop_d();
        self.emit([
            at("ARG"),
            compute(Dest::A, "M"),
            compute(Dest::M, "D"),
            at("ARG"),
            compute(Dest::D, "M+1"),
            at("SP"),
            compute(Dest::M, "D"),
        ]);

        // restore the caller's pointers, last saved first
        for pointer in SAVED_POINTERS.iter().rev() {
            self.emit([
                at("R13"),
                compute(Dest::AM, "M-1"),
                compute(Dest::D, "M"),
                at(*pointer),
                compute(Dest::M, "D"),
            ]);
        }

        self.emit([at("R14"), compute(Dest::A, "M"), jump("0", "JMP")]);
    }

    // endregion
}
