/// The value of a tape cell.
pub type CellValue = u64;

/// A failure of a tape primitive.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TapeFault {
    LeftOfOrigin,
    DecrementOfZero,
    Overflow,
}

/// A tape of non-negative integers, infinitely expandable to the right.
///
/// Cells are materialized lazily when the pointer moves past the last one, and the last cell is
/// dropped when the pointer leaves it to the left while it holds zero.
#[derive(Debug)]
pub struct Tape {
    values: Vec<CellValue>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self {
            values: vec![0],
            pointer: 0,
        }
    }
}

impl Tape {
    /// Creates a new tape containing zeroed cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the pointer to the right.
    pub fn right(&mut self) {
        self.pointer += 1;
        if self.pointer == self.values.len() {
            self.values.push(0)
        }
    }

    /// Moves the pointer to the left.
    pub fn left(&mut self) -> Result<(), TapeFault> {
        if self.pointer == 0 {
            return Err(TapeFault::LeftOfOrigin);
        }
        if self.pointer == self.values.len() - 1 && self.is_zero() {
            self.values.pop();
        }
        self.pointer -= 1;
        Ok(())
    }

    /// Increments the value of the current cell.
    pub fn increment(&mut self) -> Result<(), TapeFault> {
        let cell = &mut self.values[self.pointer];
        *cell = cell.checked_add(1).ok_or(TapeFault::Overflow)?;
        Ok(())
    }

    /// Decrements the value of the current cell.
    pub fn decrement(&mut self) -> Result<(), TapeFault> {
        let cell = &mut self.values[self.pointer];
        *cell = cell.checked_sub(1).ok_or(TapeFault::DecrementOfZero)?;
        Ok(())
    }

    /// Returns the value of the current cell.
    pub fn get(&self) -> CellValue {
        self.values[self.pointer]
    }

    /// Overwrites the value of the current cell.
    pub fn set(&mut self, value: CellValue) {
        self.values[self.pointer] = value
    }

    pub fn is_zero(&self) -> bool {
        self.get() == 0
    }

    /// Returns the index of the current cell.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Returns the value of any cell. Cells that were never materialized hold zero.
    pub fn value_at(&self, index: usize) -> CellValue {
        self.values.get(index).copied().unwrap_or(0)
    }

    /// Returns the materialized cells.
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_lazily_to_the_right() {
        let mut tape = Tape::new();
        assert_eq!(tape.values(), &[0]);
        tape.right();
        tape.right();
        assert_eq!(tape.values(), &[0, 0, 0]);
        assert_eq!(tape.pointer(), 2);
    }

    #[test]
    fn drops_trailing_zero_cell_when_leaving_it() {
        let mut tape = Tape::new();
        tape.right();
        tape.left().unwrap();
        assert_eq!(tape.values(), &[0]);
    }

    #[test]
    fn keeps_trailing_non_zero_cell() {
        let mut tape = Tape::new();
        tape.right();
        tape.increment().unwrap();
        tape.left().unwrap();
        assert_eq!(tape.values(), &[0, 1]);
        assert_eq!(tape.value_at(1), 1);
        assert_eq!(tape.value_at(7), 0);
    }

    #[test]
    fn left_of_origin_is_a_fault() {
        let mut tape = Tape::new();
        assert_eq!(tape.left(), Err(TapeFault::LeftOfOrigin));
    }

    #[test]
    fn decrement_of_zero_is_a_fault() {
        let mut tape = Tape::new();
        tape.increment().unwrap();
        tape.decrement().unwrap();
        assert_eq!(tape.decrement(), Err(TapeFault::DecrementOfZero));
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn increment_overflow_is_a_fault() {
        let mut tape = Tape::new();
        tape.set(CellValue::MAX);
        assert_eq!(tape.increment(), Err(TapeFault::Overflow));
    }
}
