//! Typed Hack assembly instructions, and parsing of single source lines.

use super::{code, ErrorKind};

/// Largest value an A-instruction can load.
pub const MAX_ADDRESS_VALUE: u16 = 0x7fff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Value(u16),
    Symbol(String),
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Symbol(symbol) => write!(f, "{symbol}"),
        }
    }
}

/// Registers a computation stores its result in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dest {
    pub a: bool,
    pub d: bool,
    pub m: bool,
}

impl Dest {
    pub const A: Self = Self {
        a: true,
        d: false,
        m: false,
    };
    pub const D: Self = Self {
        a: false,
        d: true,
        m: false,
    };
    pub const M: Self = Self {
        a: false,
        d: false,
        m: true,
    };
    pub const AM: Self = Self {
        a: true,
        d: false,
        m: true,
    };

    pub const fn is_empty(self) -> bool {
        !(self.a || self.d || self.m)
    }

    /// Letters `A`, `D` and `M` in any order, each at most once.
    fn parse(text: &str) -> Result<Self, ErrorKind> {
        let mut dest = Self::default();

        for c in text.chars() {
            let register = match c {
                'A' => &mut dest.a,
                'D' => &mut dest.d,
                'M' => &mut dest.m,
                _ => return Err(ErrorKind::InvalidDest(text.to_owned())),
            };

            if *register {
                return Err(ErrorKind::InvalidDest(text.to_owned()));
            }
            *register = true;
        }

        if dest.is_empty() {
            return Err(ErrorKind::InvalidDest(text.to_owned()));
        }

        Ok(dest)
    }
}

impl std::fmt::Display for Dest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (set, letter) in [(self.a, 'A'), (self.m, 'M'), (self.d, 'D')] {
            if set {
                write!(f, "{letter}")?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `@value`
    Address(Address),
    /// `dest=comp;jump`
    Compute {
        dest: Dest,
        comp: &'static str,
        jump: Option<&'static str>,
    },
    /// `(LABEL)`, a pseudo-instruction naming the next ROM address.
    Label(String),
}

impl Instruction {
    /// Parse one line; comments and blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ErrorKind> {
        let code = line.split("//").next().unwrap_or_default();
        let code: String = code.chars().filter(|c| !c.is_whitespace()).collect();

        if code.is_empty() {
            return Ok(None);
        }

        if let Some(address) = code.strip_prefix('@') {
            return parse_address(address).map(|address| Some(Self::Address(address)));
        }

        if let Some(label) = code.strip_prefix('(') {
            let label = label
                .strip_suffix(')')
                .ok_or_else(|| ErrorKind::MalformedLabel(code.clone()))?;

            if !is_symbol(label) {
                return Err(ErrorKind::MalformedLabel(code.clone()));
            }

            return Ok(Some(Self::Label(label.to_owned())));
        }

        parse_compute(&code).map(Some)
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(address) => write!(f, "@{address}"),
            Self::Compute { dest, comp, jump } => {
                if !dest.is_empty() {
                    write!(f, "{dest}=")?;
                }
                write!(f, "{comp}")?;
                if let Some(jump) = jump {
                    write!(f, ";{jump}")?;
                }
                Ok(())
            }
            Self::Label(label) => write!(f, "({label})"),
        }
    }
}

fn parse_address(text: &str) -> Result<Address, ErrorKind> {
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        if !text.chars().all(|c| c.is_ascii_digit()) {
            return Err(ErrorKind::MalformedSymbol(text.to_owned()));
        }

        return match text.parse::<u16>() {
            Ok(value) if value <= MAX_ADDRESS_VALUE => Ok(Address::Value(value)),
            _ => Err(ErrorKind::ConstantOutOfRange(text.to_owned())),
        };
    }

    if is_symbol(text) {
        Ok(Address::Symbol(text.to_owned()))
    } else {
        Err(ErrorKind::MalformedSymbol(text.to_owned()))
    }
}

fn parse_compute(code: &str) -> Result<Instruction, ErrorKind> {
    let (computation, jump) = match code.split_once(';') {
        Some((computation, jump)) => {
            let jump = code::jump_mnemonic(jump)
                .ok_or_else(|| ErrorKind::InvalidJump(jump.to_owned()))?;
            (computation, Some(jump))
        }
        None => (code, None),
    };

    let (dest, comp) = match computation.split_once('=') {
        Some((dest, comp)) => (Dest::parse(dest)?, comp),
        None => (Dest::default(), computation),
    };

    let comp = code::comp_mnemonic(comp).ok_or_else(|| ErrorKind::InvalidComp(comp.to_owned()))?;

    Ok(Instruction::Compute { dest, comp, jump })
}

/// Letters, digits, `_`, `.`, `$` and `:`, not starting with a digit.
fn is_symbol(text: &str) -> bool {
    let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':');

    !text.is_empty()
        && !text.starts_with(|c: char| c.is_ascii_digit())
        && text.chars().all(valid)
}
