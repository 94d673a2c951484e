// region: Context

/// Context information shared by every class compiled in one run
/// (label id generation, debug mode).
#[derive(Debug, Default)]
pub struct Context {
    pub label_ids: LabelIdGenerator,
    /// Log symbol tables while compiling.
    pub debug: bool,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }
}

// endregion

// region: Labels

/// Source of fresh label ids (`ID_1`, `ID_2`, ...), monotonically
/// increasing for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct LabelIdGenerator {
    last: usize,
}

impl LabelIdGenerator {
    pub fn next_id(&mut self) -> LabelId {
        self.last += 1;
        LabelId(self.last)
    }

    /// Start counting from `ID_1` again.
    pub fn reset(&mut self) {
        self.last = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelId(usize);

impl std::fmt::Display for LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID_{}", self.0)
    }
}

/// Role of a label within the control flow of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelKind {
    WhileStart,
    WhileEnd,
    IfElse,
    IfEnd,
}

impl LabelKind {
    pub fn with_id(self, id: LabelId) -> String {
        format!("{self}_{id}")
    }
}

// endregion

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_ids() {
        let mut context = Context::new();

        let first = context.label_ids.next_id();
        let second = context.label_ids.next_id();

        assert_eq!(first.to_string(), "ID_1");
        assert_eq!(LabelKind::WhileStart.with_id(first), "WHILE_START_ID_1");
        assert_eq!(LabelKind::IfElse.with_id(second), "IF_ELSE_ID_2");
        assert_eq!(LabelKind::IfEnd.with_id(second), "IF_END_ID_2");

        context.label_ids.reset();
        assert_eq!(
            LabelKind::WhileEnd.with_id(context.label_ids.next_id()),
            "WHILE_END_ID_1"
        );
    }
}
