//! Arithmetic, boolean and comparison operations on slots.
//!
//! Every operation appends its code to a [`Generator`]. Operations that take a `result` slot
//! compute their result without modifying their operands: they work on temporary copies, which
//! also makes it safe for `result` to be one of the operands. Temporaries are allocated with
//! `ALLOC` and are reset before the operation returns, so a slot allocated afterwards starts at
//! zero.
//!
//! Boolean results are always exactly 0 or 1, while boolean operands can be any value, non-zero
//! meaning true.

use crate::generate;
use crate::generator::segment::Generator;
use crate::generator::tape_stack::Slot;

/// Resets a cell to 0.
pub fn clear(generator: &mut Generator, slot: Slot) {
    generator.generate_reset(slot)
}

/// Adds the value of `summand` to `accumulator`, resetting `summand`.
pub fn accumulate(generator: &mut Generator, accumulator: Slot, summand: Slot) {
    generator.generate_move(summand, accumulator)
}

/// Copies the value of `source` into `destination`.
///
/// `source` is emptied into both `destination` and a temporary, and then restored from the
/// temporary.
pub fn copy(generator: &mut Generator, destination: Slot, source: Slot) {
    if destination == source {
        return;
    }
    generate! {
        (generator)
        ALLOC tmp;
        RESET {destination, tmp};
        WHILE source [
            DECR source;
            INCR destination;
            INCR tmp;
        ];
        MOVE tmp source;
    }
}

/// Computes `left + right` into `result`.
pub fn plus(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    generate! {
        (generator)
        ALLOC lhs @left;
        ALLOC rhs @right;
        RESET result;
        MOVE lhs result;
        MOVE rhs result;
    }
}

/// Computes `left - right` into `result`.
///
/// `left` must be greater than or equal to `right`: there is no underflow check, and the
/// generated code decrements a zero cell otherwise.
pub fn minus(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    generate! {
        (generator)
        ALLOC lhs @left;
        ALLOC rhs @right;
        RESET result;
        MOVE lhs result;
        SUB rhs result;
    }
}

/// Computes `left * right` into `result`.
///
/// The copy of `right` is added to `result` once per unit of `left`, so the generated code runs
/// in `O(left * right)` steps.
pub fn multiply(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    generate! {
        (generator)
        ALLOC lhs @left;
        ALLOC rhs @right;
        RESET result;
        LOOP lhs [
            ALLOC term @rhs;
            MOVE term result;
        ];
        RESET rhs;
    }
}

/// Computes `!condition` into `result`: 1 if `condition` is zero, 0 otherwise.
pub fn logical_not(generator: &mut Generator, result: Slot, condition: Slot) {
    generate! {
        (generator)
        ALLOC tmp @condition;
        SET result 1;
        IF tmp [
            DECR result;
        ];
    }
}

/// Computes `left && right` into `result`.
pub fn logical_and(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    generate! {
        (generator)
        ALLOC lhs @left;
        ALLOC rhs @right;
        RESET result;
        IF lhs [
            IF rhs [
                INCR result;
            ];
        ];
        RESET rhs;
    }
}

/// Computes `left || right` into `result`.
///
/// The copy of `right` is reset when `left` holds, so `result` is incremented at most once.
pub fn logical_or(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    generate! {
        (generator)
        ALLOC lhs @left;
        ALLOC rhs @right;
        RESET result;
        IF lhs [
            INCR result;
            RESET rhs;
        ];
        IF rhs [
            INCR result;
        ];
    }
}

/// Decrements both `left` and `right` until one of them is zero.
///
/// Unlike the other operations, this one modifies its arguments in place: afterwards, one of them
/// is zero and the other one holds the absolute difference of their initial values.
pub fn subtract_smaller(generator: &mut Generator, left: Slot, right: Slot) {
    generate! {
        (generator)
        ALLOC both;
        CALL logical_and(both, left, right);
        WHILE both [
            DECR left;
            DECR right;
            CALL logical_and(both, left, right);
        ];
    }
}

/// Computes `left < right` into `result`.
pub fn less_than(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    // After subtracting, `left` is strictly smaller iff its copy is zero and the copy of `right`
    // is not. Both copies are zero for equal operands.
    generate! {
        (generator)
        ALLOC lhs @left;
        ALLOC rhs @right;
        CALL subtract_smaller(lhs, rhs);
        ALLOC lhs_exhausted;
        CALL logical_not(lhs_exhausted, lhs);
        CALL logical_and(result, lhs_exhausted, rhs);
        RESET {lhs_exhausted, rhs, lhs};
    }
}

/// Computes `left <= right` into `result`.
pub fn less_or_equal(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    generate! {
        (generator)
        ALLOC lhs @left;
        ALLOC rhs @right;
        CALL subtract_smaller(lhs, rhs);
        CALL logical_not(result, lhs);
        RESET {rhs, lhs};
    }
}

/// Computes `left > right` into `result`.
pub fn greater_than(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    less_than(generator, result, right, left)
}

/// Computes `left >= right` into `result`.
pub fn greater_or_equal(generator: &mut Generator, result: Slot, left: Slot, right: Slot) {
    less_or_equal(generator, result, right, left)
}

/// Computes the quotient and the remainder of the division of `dividend` by `divisor`.
///
/// The divisor is subtracted from a copy of the dividend as long as it fits, counting the
/// subtractions in `quotient`.
///
/// `divisor` must not be zero: the generated code never terminates otherwise.
pub fn divide(generator: &mut Generator, quotient: Slot, remainder: Slot, dividend: Slot, divisor: Slot) {
    generate! {
        (generator)
        ALLOC rest @dividend;
        ALLOC step @divisor;
        RESET quotient;
        ALLOC fits;
        CALL greater_or_equal(fits, rest, step);
        WHILE fits [
            CALL minus(rest, rest, step);
            INCR quotient;
            CALL greater_or_equal(fits, rest, step);
        ];
        RESET {step, remainder};
        MOVE rest remainder;
    }
}
