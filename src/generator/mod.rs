//! Generation of Brainfuck code.
//!
//! A [`Generator`] builds code over slots handed out by its [`TapeStack`](tape_stack::TapeStack).
//! The [`operations`] module composes the primitives of the generator into arithmetic, boolean
//! and comparison operations, most easily written with the [`generate!`](crate::generate) macro.

pub use self::segment::Generator;
pub use self::tape_stack::Slot;

pub mod brainfuck_code;
pub mod operations;
mod segment;
pub mod tape_stack;
