//! This module contains the allocator of tape cells.
//!
//! Every value handled by generated code lives in a single cell of the tape. A [`Slot`] is a
//! handle to such a cell: it does not contain any data, it only remembers where the cell is.
//!
//! Slots are handed out by a [`TapeStack`] with a strict stack discipline: the `n`th live slot
//! is always stored at index `n`, and only the most recently allocated slot may be released. This
//! keeps the live cells packed at the start of the tape, which keeps pointer movements short.
//!
//! The `TapeStack` also tracks where the pointer of the machine will be once the code generated
//! so far has run. [`TapeStack::seek`] is the only way to produce movement instructions, so this
//! tracked position stays exactly in sync with the position an interpreter would compute.

use tracing::trace;

use crate::generator::brainfuck_code::{BrainfuckCode, Instruction};

/// A handle to a single cell of the tape.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Slot {
    index: usize,
}

impl Slot {
    /// Returns the index of the cell on the tape.
    pub fn index(self) -> usize {
        self.index
    }
}


/// Assigns cells to slots by stack discipline and tracks the position of the pointer.
#[derive(Default, Debug)]
pub struct TapeStack {
    /// The live slots, the most recently allocated last.
    live: Vec<Slot>,
    /// The index the pointer sits at after the code emitted so far.
    cursor: usize,
}

impl TapeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next unused cell.
    ///
    /// No code is emitted: a fresh cell is either untouched or was left by a released slot, which
    /// its owner must reset before releasing it, so the cell is zero.
    pub fn allocate(&mut self) -> Slot {
        let slot = Slot { index: self.live.len() };
        self.live.push(slot);
        trace!(index = slot.index, "allocated slot");
        slot
    }

    /// Releases a slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not the most recently allocated live slot.
    pub fn release(&mut self, slot: Slot) {
        assert_eq!(
            self.live.last(), Some(&slot),
            "slots must be released in reverse order of allocation",
        );
        self.live.pop();
        trace!(index = slot.index, "released slot");
    }

    /// Returns the shortest code moving the pointer from its current position to `slot`, and
    /// records the new position.
    pub fn seek(&mut self, slot: Slot) -> BrainfuckCode {
        let distance = slot.index as isize - self.cursor as isize;
        self.cursor = slot.index;
        Instruction::Right(distance).into()
    }

    /// Returns the index the pointer sits at after the code emitted so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of live slots.
    pub fn depth(&self) -> usize {
        self.live.len()
    }
}
