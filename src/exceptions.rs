use thiserror::Error;

/// A broken invariant detected while interpreting Brainfuck code.
///
/// Each variant identifies the primitive that failed and where it is in the program. All of them
/// are fatal: the interpreter stops at the first one and produces no output.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ExecutionError {
    #[error("decrement of zero cell {cell} at instruction {position}")]
    DecrementOfZero { position: usize, cell: usize },
    #[error("move left of the tape origin at instruction {position}")]
    LeftOfOrigin { position: usize },
    #[error("read with no input left at instruction {position}")]
    InputExhausted { position: usize },
    #[error("unmatched bracket at instruction {position}")]
    UnmatchedBracket { position: usize },
    #[error("overflow of cell {cell} at instruction {position}")]
    CellOverflow { position: usize, cell: usize },
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;
