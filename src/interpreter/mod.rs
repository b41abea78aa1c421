//! A reference interpreter for Brainfuck code over non-negative integer cells.
//!
//! Unlike most Brainfuck implementations, cells do not wrap around: decrementing a zero cell,
//! moving left of the first cell, or reading past the end of the input are all fatal
//! [errors](ExecutionError). Characters other than the eight Brainfuck instructions are ignored.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::exceptions::{ExecutionError, ExecutionResult};

pub use self::tape::{CellValue, Tape, TapeFault};

mod tape;

/// Options of a [`StateMachine`].
#[derive(Copy, Clone, Default, Debug)]
pub struct InterpreterConfig {
    /// The maximum number of steps to run before giving up. There is no limit by default.
    pub step_limit: Option<u64>,
}

impl InterpreterConfig {
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }
}


/// Executes a program one instruction at a time.
///
/// Loops jump to their matching bracket by scanning the program, counting nested brackets on the
/// way.
#[derive(Debug)]
pub struct StateMachine {
    program: Vec<u8>,
    inputs: VecDeque<CellValue>,
    tape: Tape,
    program_counter: usize,
    outputs: Vec<CellValue>,
    steps: u64,
    config: InterpreterConfig,
}

impl StateMachine {
    /// Creates a machine that runs `program`, reading its input from `inputs`.
    pub fn new(program: &str, inputs: impl IntoIterator<Item=CellValue>) -> Self {
        Self::with_config(program, inputs, InterpreterConfig::default())
    }

    pub fn with_config(program: &str, inputs: impl IntoIterator<Item=CellValue>, config: InterpreterConfig) -> Self {
        Self {
            program: program.as_bytes().to_vec(),
            inputs: inputs.into_iter().collect(),
            tape: Tape::new(),
            program_counter: 0,
            outputs: Vec::new(),
            steps: 0,
            config,
        }
    }

    /// Tests if the whole program has been executed.
    pub fn is_halted(&self) -> bool {
        self.program_counter == self.program.len()
    }

    /// Executes the instruction under the program counter. Does nothing once the machine is
    /// halted.
    pub fn step(&mut self) -> ExecutionResult<()> {
        let position = self.program_counter;
        let Some(&instruction) = self.program.get(position) else {
            return Ok(());
        };
        let to_error = |fault: TapeFault, cell: usize| match fault {
            TapeFault::LeftOfOrigin => ExecutionError::LeftOfOrigin { position },
            TapeFault::DecrementOfZero => ExecutionError::DecrementOfZero { position, cell },
            TapeFault::Overflow => ExecutionError::CellOverflow { position, cell },
        };
        let cell = self.tape.pointer();
        match instruction {
            b'+' => self.tape.increment().map_err(|fault| to_error(fault, cell))?,
            b'-' => self.tape.decrement().map_err(|fault| to_error(fault, cell))?,
            b'>' => self.tape.right(),
            b'<' => self.tape.left().map_err(|fault| to_error(fault, cell))?,
            b',' => {
                let value = self.inputs.pop_front()
                    .ok_or(ExecutionError::InputExhausted { position })?;
                self.tape.set(value)
            }
            b'.' => self.outputs.push(self.tape.get()),
            b'[' if self.tape.is_zero() => self.goto_bracket(true)?,
            b']' if !self.tape.is_zero() => self.goto_bracket(false)?,
            _ => {}
        }
        self.program_counter += 1;
        self.steps += 1;
        Ok(())
    }

    /// Runs the program to completion and returns its output.
    pub fn run(mut self) -> ExecutionResult<Vec<CellValue>> {
        match self.run_to_halt() {
            Ok(()) => {
                debug!(steps = self.steps, outputs = self.outputs.len(), "program halted");
                Ok(self.outputs)
            }
            Err(error) => {
                warn!(%error, steps = self.steps, "program aborted");
                Err(error)
            }
        }
    }

    /// Runs the program to completion, keeping the machine available for inspection.
    pub fn run_to_halt(&mut self) -> ExecutionResult<()> {
        while !self.is_halted() {
            if let Some(limit) = self.config.step_limit {
                if self.steps >= limit {
                    return Err(ExecutionError::StepLimitExceeded { limit });
                }
            }
            self.step()?;
        }
        Ok(())
    }

    /// Returns the tape of this machine.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Returns the values written so far.
    pub fn outputs(&self) -> &[CellValue] {
        &self.outputs
    }

    /// Returns the number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Moves the program counter to the bracket matching the one under it.
    fn goto_bracket(&mut self, forward: bool) -> ExecutionResult<()> {
        let origin = self.program_counter;
        let (my_bracket, target_bracket) = if forward { (b'[', b']') } else { (b']', b'[') };
        let mut depth = 0usize;
        let mut index = origin;
        loop {
            match self.program.get(index) {
                Some(&instruction) if instruction == my_bracket => depth += 1,
                Some(&instruction) if instruction == target_bracket => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => {}
                None => return Err(ExecutionError::UnmatchedBracket { position: origin }),
            }
            index = if forward {
                index + 1
            } else {
                index.checked_sub(1)
                    .ok_or(ExecutionError::UnmatchedBracket { position: origin })?
            };
        }
        self.program_counter = index;
        Ok(())
    }
}


/// Runs a program to completion with some input and returns its output.
pub fn interpret(program: &str, inputs: impl IntoIterator<Item=CellValue>) -> ExecutionResult<Vec<CellValue>> {
    StateMachine::new(program, inputs).run()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_inputs() {
        assert_eq!(interpret(",.>,.", [4, 2]), Ok(vec![4, 2]));
    }

    #[test]
    fn skips_loop_on_zero() {
        assert_eq!(interpret("[+[+]+].", []), Ok(vec![0]));
    }

    #[test]
    fn repeats_loop_until_zero() {
        // Moves 3 units from the first cell to the second one
        assert_eq!(interpret(",[->+<]>.<.", [3]), Ok(vec![3, 0]));
    }

    #[test]
    fn handles_nested_loops() {
        // 2 * 3
        assert_eq!(interpret(",>,<[->[->+>+<<]>>[-<<+>>]<<<]>>.", [2, 3]), Ok(vec![6]));
    }

    #[test]
    fn ignores_other_characters() {
        assert_eq!(interpret("read: ,\n  [ - > + < ]\nwrite: > .", [5]), Ok(vec![5]));
    }

    #[test]
    fn decrement_of_zero_is_fatal() {
        assert_eq!(interpret(">+-.-", []), Err(ExecutionError::DecrementOfZero { position: 4, cell: 1 }));
    }

    #[test]
    fn left_of_origin_is_fatal() {
        assert_eq!(interpret("><<", []), Err(ExecutionError::LeftOfOrigin { position: 2 }));
    }

    #[test]
    fn exhausted_input_is_fatal() {
        assert_eq!(interpret(",>,", [1]), Err(ExecutionError::InputExhausted { position: 2 }));
    }

    #[test]
    fn unmatched_brackets_are_fatal() {
        assert_eq!(interpret("[", []), Err(ExecutionError::UnmatchedBracket { position: 0 }));
        assert_eq!(interpret("+]", []), Err(ExecutionError::UnmatchedBracket { position: 1 }));
    }

    #[test]
    fn step_limit_stops_infinite_loops() {
        let config = InterpreterConfig::default().with_step_limit(100);
        let result = StateMachine::with_config("+[]", [], config).run();
        assert_eq!(result, Err(ExecutionError::StepLimitExceeded { limit: 100 }));
    }

    #[test]
    fn machine_can_be_inspected_after_halting() {
        let mut machine = StateMachine::new(",>++>+++<", [7]);
        machine.run_to_halt().unwrap();
        assert!(machine.is_halted());
        assert_eq!(machine.tape().values(), &[7, 2, 3]);
        assert_eq!(machine.tape().pointer(), 1);
        assert_eq!(machine.steps(), 9);
        assert!(machine.outputs().is_empty());
    }

    #[test]
    fn stepping_a_halted_machine_does_nothing() {
        let mut machine = StateMachine::new("+.", []);
        machine.run_to_halt().unwrap();
        assert_eq!(machine.step(), Ok(()));
        assert_eq!(machine.steps(), 2);
        assert_eq!(machine.outputs(), &[1]);
    }
}
