use std::collections::HashMap;

/// RAM address of the first variable.
const VARIABLE_BASE: u16 = 16;

/// Symbol to address bindings: predefined symbols, labels (ROM addresses)
/// and variables (RAM addresses, handed out in order of first use).
#[derive(Debug)]
pub struct SymbolTable {
    symbols: HashMap<String, u16>,
    next_variable: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        let registers = (0..=15).map(|i| (format!("R{i}"), i));
        let named = [
            ("SP", 0),
            ("LCL", 1),
            ("ARG", 2),
            ("THIS", 3),
            ("THAT", 4),
            ("SCREEN", 16384),
            ("KBD", 24576),
        ]
        .map(|(name, address)| (name.to_owned(), address));

        Self {
            symbols: registers.chain(named).collect(),
            next_variable: VARIABLE_BASE,
        }
    }

    /// Bind a label; `false` if the name is already taken.
    pub fn bind_label(&mut self, label: &str, address: u16) -> bool {
        if self.symbols.contains_key(label) {
            return false;
        }

        self.symbols.insert(label.to_owned(), address);
        true
    }

    /// Address of a symbol, allocating a new variable for unknown ones.
    pub fn resolve(&mut self, symbol: &str) -> u16 {
        if let Some(&address) = self.symbols.get(symbol) {
            return address;
        }

        let address = self.next_variable;
        self.next_variable += 1;
        self.symbols.insert(symbol.to_owned(), address);
        address
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
