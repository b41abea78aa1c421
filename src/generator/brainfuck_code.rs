use std::fmt::{Display, Formatter};

/// A single node of generated Brainfuck code.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Instruction {
    /// A move to the right by the specified amount.
    ///
    /// If the amount is negative, the move is to the left. If the amount is zero, this is a no-op.
    Right(isize),
    /// An incrementation by the specified amount.
    ///
    /// If the amount is negative, this is a decrementation.
    Add(isize),
    /// A read.
    Read,
    /// A write.
    Write,
    /// A loop with the specified body.
    Loop(BrainfuckCode),
}

impl Instruction {
    /// Returns the loop that decrements the current cell until it reaches zero (`[-]`).
    pub fn reset() -> Self {
        Self::Loop(Self::Add(-1).into())
    }

    fn compile(&self) -> String {
        match self {
            &Self::Right(amount) if amount >= 0 => {
                ">".repeat(amount as usize)
            }
            &Self::Right(amount) => {
                "<".repeat(amount.unsigned_abs())
            }
            &Self::Add(amount) if amount >= 0 => {
                "+".repeat(amount as usize)
            }
            &Self::Add(amount) => {
                "-".repeat(amount.unsigned_abs())
            }
            Self::Read => {
                ",".to_owned()
            }
            Self::Write => {
                ".".to_owned()
            }
            Self::Loop(body) => {
                format!("[{}]", body.serialize())
            }
        }
    }

    fn compile_with_indent(&self, depth: usize) -> String {
        match self {
            Self::Loop(body) => {
                if body.instructions.len() <= 1 {
                    format!("[{}]", body.serialize_with_indent(depth))
                } else {
                    let indent = "  ".repeat(depth);
                    format!("[\n{indent}  {}\n{indent}]", body.serialize_with_indent(depth + 1))
                }
            }
            other => other.compile(),
        }
    }

    /// Returns the number of primitive symbols this instruction serializes to.
    fn symbol_count(&self) -> usize {
        match self {
            Self::Right(amount) | Self::Add(amount) => amount.unsigned_abs(),
            Self::Read | Self::Write => 1,
            Self::Loop(body) => body.symbol_count() + 2,
        }
    }
}


/// A sequence of Brainfuck instructions.
///
/// Two adjacent moves in the same direction (or two adjacent additions with the same sign) are
/// merged into a single instruction. Since moves in opposite directions are never merged, the
/// serialized text is exactly the concatenation of every pushed instruction.
#[derive(Clone, Eq, PartialEq, Default, Debug)]
pub struct BrainfuckCode {
    instructions: Vec<Instruction>,
}

impl BrainfuckCode {
    /// Creates new, empty, Brainfuck code.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a Brainfuck instruction, merging it with the last one when the text is unchanged.
    pub fn push(&mut self, instruction: Instruction) {
        match (instruction, self.instructions.last_mut()) {
            (Instruction::Right(0) | Instruction::Add(0), _) => {}
            (Instruction::Right(additional_amount), Some(Instruction::Right(amount)))
                if additional_amount.signum() == amount.signum() => {
                *amount += additional_amount
            }
            (Instruction::Add(additional_amount), Some(Instruction::Add(amount)))
                if additional_amount.signum() == amount.signum() => {
                *amount += additional_amount
            }
            (instruction, _) => {
                self.instructions.push(instruction)
            }
        }
    }

    /// Pushes the instructions of another code in order.
    pub fn extend(&mut self, code: Self) {
        let mut instructions = code.instructions.into_iter();
        // Only the first instruction may merge with what precedes it
        if let Some(instruction) = instructions.next() {
            self.push(instruction)
        }
        self.instructions.extend(instructions);
    }

    /// Returns the top-level instructions of this code.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the number of primitive symbols (brackets included) in the serialized code.
    pub fn symbol_count(&self) -> usize {
        self.instructions.iter()
            .map(Instruction::symbol_count)
            .sum()
    }

    /// Returns the canonical, whitespace-free, text of this code.
    pub fn serialize(&self) -> String {
        self.instructions.iter()
            .map(Instruction::compile)
            .collect()
    }

    /// Returns the text of this code with multi-instruction loop bodies on indented lines.
    pub fn serialize_with_indent(&self, depth: usize) -> String {
        let mut code = String::new();
        for instruction in &self.instructions {
            code.push_str(&instruction.compile_with_indent(depth))
        }
        code
    }
}

impl From<Instruction> for BrainfuckCode {
    fn from(instruction: Instruction) -> Self {
        let mut code = Self::new();
        code.push(instruction);
        code
    }
}

impl Display for BrainfuckCode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.serialize_with_indent(0))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_serializes_to_decrement_loop() {
        assert_eq!(BrainfuckCode::from(Instruction::reset()).serialize(), "[-]");
    }

    #[test]
    fn same_direction_moves_are_merged() {
        let mut code = BrainfuckCode::new();
        code.push(Instruction::Right(2));
        code.push(Instruction::Right(1));
        code.push(Instruction::Add(1));
        code.push(Instruction::Add(1));
        assert_eq!(code.instructions(), &[Instruction::Right(3), Instruction::Add(2)]);
        assert_eq!(code.serialize(), ">>>++");
    }

    #[test]
    fn opposite_moves_are_kept_verbatim() {
        let mut code = BrainfuckCode::new();
        code.push(Instruction::Right(2));
        code.push(Instruction::Right(-2));
        code.push(Instruction::Add(1));
        code.push(Instruction::Add(-1));
        assert_eq!(code.serialize(), ">><<+-");
        assert_eq!(code.symbol_count(), 6);
    }

    #[test]
    fn empty_instructions_are_dropped() {
        let mut code = BrainfuckCode::new();
        code.push(Instruction::Right(0));
        code.push(Instruction::Add(0));
        assert!(code.is_empty());
    }

    #[test]
    fn nested_loops_serialize_with_brackets() {
        let mut body = BrainfuckCode::new();
        body.push(Instruction::Add(-1));
        body.push(Instruction::Right(1));
        body.push(Instruction::reset());
        body.push(Instruction::Right(-1));
        let code = BrainfuckCode::from(Instruction::Loop(body));
        assert_eq!(code.serialize(), "[->[-]<]");
        assert_eq!(code.symbol_count(), 8);
    }

    #[test]
    fn pretty_form_only_adds_whitespace() {
        let mut body = BrainfuckCode::new();
        body.push(Instruction::Add(-1));
        body.push(Instruction::Right(1));
        body.push(Instruction::Write);
        body.push(Instruction::Right(-1));
        let mut code = BrainfuckCode::from(Instruction::Read);
        code.push(Instruction::Loop(body));
        let pretty = code.to_string();
        assert_eq!(pretty, ",[\n  ->.<\n]");
        let stripped: String = pretty.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(stripped, code.serialize());
    }
}
