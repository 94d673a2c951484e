//! Binary encoding of Hack instructions.

use phf::phf_map;

use super::instruction::{Dest, Instruction};

/// `a c1 c2 c3 c4 c5 c6` bits of every computation the ALU supports.
static COMP: phf::Map<&'static str, u16> = phf_map! {
    "0" => 0b0_101010,
    "1" => 0b0_111111,
    "-1" => 0b0_111010,
    "D" => 0b0_001100,
    "A" => 0b0_110000,
    "!D" => 0b0_001101,
    "!A" => 0b0_110001,
    "-D" => 0b0_001111,
    "-A" => 0b0_110011,
    "D+1" => 0b0_011111,
    "A+1" => 0b0_110111,
    "D-1" => 0b0_001110,
    "A-1" => 0b0_110010,
    "D+A" => 0b0_000010,
    "D-A" => 0b0_010011,
    "A-D" => 0b0_000111,
    "D&A" => 0b0_000000,
    "D|A" => 0b0_010101,
    "M" => 0b1_110000,
    "!M" => 0b1_110001,
    "-M" => 0b1_110011,
    "M+1" => 0b1_110111,
    "M-1" => 0b1_110010,
    "D+M" => 0b1_000010,
    "D-M" => 0b1_010011,
    "M-D" => 0b1_000111,
    "D&M" => 0b1_000000,
    "D|M" => 0b1_010101,
};

static JUMP: phf::Map<&'static str, u16> = phf_map! {
    "JGT" => 0b001,
    "JEQ" => 0b010,
    "JGE" => 0b011,
    "JLT" => 0b100,
    "JNE" => 0b101,
    "JLE" => 0b110,
    "JMP" => 0b111,
};

const C_INSTRUCTION_PREFIX: u16 = 0b111 << 13;

/// The table's own copy of a `comp` mnemonic, if it is a valid one.
pub fn comp_mnemonic(comp: &str) -> Option<&'static str> {
    COMP.get_key(comp).copied()
}

pub fn jump_mnemonic(jump: &str) -> Option<&'static str> {
    JUMP.get_key(jump).copied()
}

fn dest_bits(dest: Dest) -> u16 {
    u16::from(dest.a) << 2 | u16::from(dest.d) << 1 | u16::from(dest.m)
}

/// Encode a computation; `None` for mnemonics missing from the tables.
pub fn encode_compute(dest: Dest, comp: &str, jump: Option<&str>) -> Option<u16> {
    let comp_bits = *COMP.get(comp)?;
    let jump_bits = match jump {
        Some(jump) => *JUMP.get(jump)?,
        None => 0,
    };

    Some(C_INSTRUCTION_PREFIX | comp_bits << 6 | dest_bits(dest) << 3 | jump_bits)
}

/// Encode an instruction whose address (if any) is already resolved.
pub fn encode(instruction: &Instruction, address: Option<u16>) -> Option<u16> {
    match instruction {
        Instruction::Address(_) => address,
        Instruction::Compute { dest, comp, jump } => encode_compute(*dest, comp, *jump),
        Instruction::Label(_) => None,
    }
}
