//! Lowering of arithmetic, boolean and control-flow operations onto Brainfuck.
//!
//! Values live in tape cells handed out by a stack-disciplined allocator. Operations are
//! composed from the five Brainfuck primitives and the loop brackets, and are checked by running
//! them on a [reference interpreter](interpreter) whose cells hold non-negative integers.
//!
//! ```
//! use brainstack::generator::{operations, Generator};
//! use brainstack::interpreter::interpret;
//!
//! let mut generator = Generator::new();
//! let quotient = generator.allocate();
//! let remainder = generator.allocate();
//! let dividend = generator.allocate();
//! let divisor = generator.allocate();
//! generator.generate_read(dividend);
//! generator.generate_read(divisor);
//! operations::divide(&mut generator, quotient, remainder, dividend, divisor);
//! generator.generate_write(quotient);
//! generator.generate_write(remainder);
//!
//! assert_eq!(interpret(&generator.serialize(), [10, 3]), Ok(vec![3, 1]));
//! ```

#![warn(missing_debug_implementations)]

pub mod exceptions;
pub mod generator;
pub mod interpreter;
