use crate::{common::ast, vm};

pub fn construct_integer(i: u16) -> Vec<vm::VMInstruction> {
    vec![vm::push(vm::Segment::Constant, i.into())]
}

/// Build a `String` object of the literal's length, then append
/// its characters one by one (`appendChar` returns the string,
/// so the object stays on the stack between calls).
pub fn construct_string(s: &str) -> Vec<vm::VMInstruction> {
    let string_init = vec![
        vm::push(vm::Segment::Constant, s.chars().count()),
        vm::call("String.new", 1),
    ];

    let string_population = s
        .chars()
        .flat_map(|c| {
            vec![
                vm::push(vm::Segment::Constant, to_ascii(c)),
                vm::call("String.appendChar", 2),
            ]
        })
        .collect();

    [string_init, string_population].concat()
}

pub fn construct_keyword(keyword: ast::KeywordConstant) -> Vec<vm::VMInstruction> {
    match keyword {
        ast::KeywordConstant::True => vec![
            vm::push(vm::Segment::Constant, 0),
            vm::command(vm::VMCommand::Not),
        ],
        ast::KeywordConstant::False | ast::KeywordConstant::Null => {
            vec![vm::push(vm::Segment::Constant, 0)]
        }
        ast::KeywordConstant::This => vec![vm::push(vm::Segment::Pointer, 0)],
    }
}

fn to_ascii(c: char) -> usize {
    c as usize
}

#[cfg(test)]
mod tests {
    use crate::vm;

    #[test]
    fn test_integer_construction() {
        let expected = "push constant 32767";

        assert_eq!(
            vm::VMInstructionBlock::from(super::construct_integer(32767)).compile(),
            expected
        );
    }

    #[test]
    fn test_string_construction() {
        let s = String::from("fin");

        let expected = [
            "push constant 3",
            "call String.new 1",
            "push constant 102",
            "call String.appendChar 2",
            "push constant 105",
            "call String.appendChar 2",
            "push constant 110",
            "call String.appendChar 2",
        ]
        .join("\n");

        assert_eq!(
            vm::VMInstructionBlock::from(super::construct_string(&s)).compile(),
            expected
        );
    }

    #[test]
    fn test_empty_string_construction() {
        let expected = ["push constant 0", "call String.new 1"].join("\n");

        assert_eq!(
            vm::VMInstructionBlock::from(super::construct_string("")).compile(),
            expected
        );
    }

    #[test]
    fn test_keyword_construction() {
        use crate::common::ast::KeywordConstant;

        let cases = [
            (KeywordConstant::True, ["push constant 0", "not"].join("\n")),
            (KeywordConstant::False, String::from("push constant 0")),
            (KeywordConstant::Null, String::from("push constant 0")),
            (KeywordConstant::This, String::from("push pointer 0")),
        ];

        for (keyword, expected) in cases {
            assert_eq!(
                vm::VMInstructionBlock::from(super::construct_keyword(keyword)).compile(),
                expected
            );
        }
    }
}
