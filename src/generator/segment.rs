use std::mem;

use tracing::{debug, trace};

use crate::generator::brainfuck_code::{BrainfuckCode, Instruction};
use crate::generator::tape_stack::{Slot, TapeStack};

/// A generator is used to build Brainfuck code over the cells of a [`TapeStack`].
///
/// Every method that touches a cell first moves the pointer to it through
/// [`TapeStack::seek`], so the position tracked by the tape stack always matches the position
/// the generated code would leave the pointer at.
///
/// # [`generate!`] macro
///
/// Most methods on a `Generator` have an assembly-like equivalent that can be used in the
/// [`generate!`] macro. When such an equivalent exists, it is mentioned in the method's
/// documentation, under "GASM" (for "`generate!`-assembly").
#[derive(Default, Debug)]
pub struct Generator {
    tape: TapeStack,
    code: BrainfuckCode,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a child generator (that shares the tape stack with this generator), calls `f` on
    /// it, and returns the resulting code as a detached fragment instead of appending it to this
    /// generator.
    ///
    /// The pointer position is threaded through: the fragment must be placed right after the code
    /// generated so far, and any code generated afterwards must be placed after the fragment.
    pub fn generate_child(&mut self, f: impl FnOnce(&mut Self)) -> BrainfuckCode {
        let tape = mem::take(&mut self.tape);
        let mut child_generator = Self { tape, code: BrainfuckCode::new() };
        f(&mut child_generator);
        mem::swap(&mut self.tape, &mut child_generator.tape);
        child_generator.code
    }

    /// Appends a fragment previously returned by [`Self::generate_child`].
    pub fn append(&mut self, fragment: BrainfuckCode) {
        self.code.extend(fragment)
    }

    /// Allocates a slot owned by the caller, who must [release](Self::release) it.
    pub fn allocate(&mut self) -> Slot {
        self.tape.allocate()
    }

    /// Releases a slot allocated with [`Self::allocate`].
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not the most recently allocated live slot.
    pub fn release(&mut self, slot: Slot) {
        self.tape.release(slot)
    }

    /// Allocates a temporary slot, calls `f` with it, and releases it once `f` returns.
    ///
    /// The temporary holds zero when `f` is called, provided the slots released before were left at
    /// zero. The code generated by `f` must reset it before returning.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `ALLOC`. It is
    /// followed by the identifier of a new variable to store the slot in. The slot is released
    /// after the remaining instructions of the enclosing block.
    ///
    /// ## Example
    ///
    /// The following example allocates a temporary `tmp`, sets its value to 67, and writes it.
    ///
    /// ```gasm
    /// ALLOC tmp;
    /// SET tmp 67;
    /// WRITE tmp;
    /// ```
    pub fn with_temporary<R>(&mut self, f: impl FnOnce(&mut Self, Slot) -> R) -> R {
        let slot = self.tape.allocate();
        trace!(index = slot.index(), depth = self.tape.depth(), "entering temporary scope");
        let result = f(self, slot);
        self.tape.release(slot);
        result
    }

    /// Moves the pointer to a slot.
    fn seek(&mut self, slot: Slot) {
        let movement = self.tape.seek(slot);
        self.code.extend(movement)
    }

    /// Adds commands that decrement a cell.
    ///
    /// The cell must not be zero when the code runs.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `DECR`. It is
    /// followed by the cell to decrement.
    pub fn generate_decrement(&mut self, slot: Slot) {
        self.seek(slot);
        self.code.push(Instruction::Add(-1))
    }

    /// Adds commands that increment a cell.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `INCR`. It is followed
    /// by the cell to increment.
    pub fn generate_increment(&mut self, slot: Slot) {
        self.seek(slot);
        self.code.push(Instruction::Add(1))
    }

    /// Adds commands that reset the value of a cell to 0.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `RESET`. It is
    /// followed by the cell to reset. Alternatively, you can specify multiple comma-separated cells
    /// to reset by surrounding them by braces.
    ///
    /// ## Example
    ///
    /// The following example resets the values of `x`, `y` and `z`.
    ///
    /// ```gasm
    /// RESET {x, y, z};
    /// ```
    pub fn generate_reset(&mut self, slot: Slot) {
        self.seek(slot);
        self.code.push(Instruction::reset())
    }

    /// Adds commands that set the value of a cell.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not fit in an `isize`.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `SET`. It is followed
    /// by the cell to set, and the new value.
    pub fn generate_set(&mut self, slot: Slot, value: usize) {
        let amount = isize::try_from(value).expect("set value does not fit in an isize");
        self.generate_reset(slot);
        self.code.push(Instruction::Add(amount))
    }

    /// Adds commands that read a value and store it into a cell.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `READ`. It is followed
    /// by the cell to read the value into.
    pub fn generate_read(&mut self, destination: Slot) {
        self.seek(destination);
        self.code.push(Instruction::Read)
    }

    /// Adds commands that write the value of a cell.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `WRITE`. It is
    /// followed by the cell to write the value of.
    pub fn generate_write(&mut self, source: Slot) {
        self.seek(source);
        self.code.push(Instruction::Write)
    }

    /// Adds commands that create a balanced loop.
    ///
    /// A balanced loop is characterized by its *origin* and its *body*.
    ///
    /// # Origin
    ///
    /// The origin of a balanced loop is the cell that is pointed to at the beginning and the end of
    /// each iteration of the loop. This means the loop executes until the origin is null, and does
    /// not execute at all if the origin is null to begin with.
    ///
    /// # Body
    ///
    /// The `body` argument is a function that accepts a reference to a mutable generator and
    /// constructs the body of the loop using it. It is called exactly once. The pointer is moved
    /// back to the origin at the end of the body, so the position after the loop is the origin
    /// whatever the number of iterations.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `WHILE`. It is
    /// followed by the origin, and the body of the loop, as GASM instructions wrapped in square
    /// brackets.
    ///
    /// In case the origin of the loop is decremented each iteration, you can use the `LOOP`
    /// instruction instead of adding a manual `DECR` within the body of the loop. The decrement
    /// will happen at the end of the loop.
    ///
    /// ## Examples
    ///
    /// The following example adds the value of `x` to `y` using a `WHILE` instruction.
    ///
    /// ```gasm
    /// WHILE x [
    ///     DECR x;
    ///     INCR y;
    /// ];
    /// ```
    ///
    /// The following example adds the value of `x` to `y` using a `LOOP` instruction.
    ///
    /// ```gasm
    /// LOOP x [
    ///     INCR y;
    ///     // `x` is decremented here
    /// ];
    /// ```
    pub fn generate_loop(&mut self, origin: Slot, body: impl FnOnce(&mut Self)) {
        self.seek(origin);
        let body = self.generate_child(|generator| {
            body(generator);
            generator.seek(origin)
        });
        self.code.push(Instruction::Loop(body))
    }

    /// Adds commands that execute a body once if, and only if, a condition is non-zero.
    ///
    /// Note that the value of the condition is always zero after the branch, whether or not the
    /// body was executed.
    ///
    /// # GASM
    ///
    /// This methods has the corresponding [`generate!`]-assembly instruction `IF`. It is followed
    /// by the condition, and the body of the branch, as gasm instructions wrapped in square
    /// brackets.
    ///
    /// ## Example
    ///
    /// The following example writes the value of `x` if it is non-zero.
    ///
    /// ```gasm
    /// IF x [
    ///     WRITE x;
    /// ];
    /// ```
    pub fn generate_branch(&mut self, condition: Slot, body: impl FnOnce(&mut Self)) {
        self.generate_loop(condition, |generator| {
            body(generator);
            generator.generate_reset(condition)
        });
    }

    /// Adds the value of a source cell to a destination cell, resetting the source.
    ///
    /// # GASM
    ///
    /// This method has the corresponding [`generate!`]-assembly instruction `MOVE`. It is followed
    /// by the cell containing the value to move and the cell to move it to.
    pub fn generate_move(&mut self, source: Slot, destination: Slot) {
        assert_ne!(source, destination);
        self.generate_loop(source, |generator| {
            generator.generate_decrement(source);
            generator.generate_increment(destination)
        });
    }

    /// Subtracts the value of a source cell from a destination cell, resetting the source.
    ///
    /// The destination must hold at least the value of the source when the code runs.
    ///
    /// # GASM
    ///
    /// This method has the corresponding [`generate!`]-assembly instruction `SUB`. It is followed
    /// by the cell containing the value to subtract and the cell to subtract it from.
    pub fn generate_move_subtract(&mut self, source: Slot, destination: Slot) {
        assert_ne!(source, destination);
        self.generate_loop(source, |generator| {
            generator.generate_decrement(source);
            generator.generate_decrement(destination)
        });
    }

    /// Returns the index the pointer sits at after the code generated so far.
    pub fn cursor(&self) -> usize {
        self.tape.cursor()
    }

    /// Returns the number of live slots.
    pub fn depth(&self) -> usize {
        self.tape.depth()
    }

    /// Returns the code generated so far.
    pub fn code(&self) -> &BrainfuckCode {
        &self.code
    }

    /// Returns the canonical text of the code generated so far.
    pub fn serialize(&self) -> String {
        self.code.serialize()
    }

    /// Consumes this generator and returns the generated code.
    pub fn finish(self) -> BrainfuckCode {
        debug!(
            symbols = self.code.symbol_count(),
            live_slots = self.tape.depth(),
            "finished generating code"
        );
        self.code
    }
}


/// An assembly-like syntax for generating code.
///
/// The first token, in parentheses, is the identifier of a `&mut Generator`. Loop and branch
/// bodies rebind the same identifier to the child generator, so Rust code within bodies (`let`
/// bindings and `CALL`s) can keep using it.
///
/// # Commands
///
/// Each command consists of a command name, followed by its arguments, and a semicolon.
///
/// ## `ALLOC`
///
/// Allocates a temporary slot. See [`Generator::with_temporary`].
///
/// The only argument is the identifier of a Rust variable to declare, that will hold the slot. The
/// slot is released after the remaining commands of the enclosing block, so temporaries are always
/// released in reverse order of allocation.
///
/// You can also specify an initial value as an additional argument: either a Rust expression that
/// evaluates to a `usize`, or a cell to copy the value from, prefixed with a `@`.
///
/// ### Examples
///
/// ```gasm
/// ALLOC tmp 67;
/// WRITE tmp;
/// ```
///
/// The following example allocates a temporary `tmp` holding a copy of the value of `x`.
///
/// ```gasm
/// ALLOC tmp @x;
/// ```
///
/// ## `DECR`
///
/// Decrements a cell. See [`Generator::generate_decrement`].
///
/// ## `INCR`
///
/// Increments a cell. See [`Generator::generate_increment`].
///
/// ## `SET`
///
/// Sets the value of a cell. See [`Generator::generate_set`].
///
/// The arguments are the cell to set, and the value. The value can be either a Rust expression that
/// evaluates to a `usize`, or a cell to copy the value of, prefixed with a `@`.
///
/// ## `RESET`
///
/// Resets the value of a cell. See [`Generator::generate_reset`].
///
/// The only argument is the cell to reset. Alternatively, you can specify multiple comma-separated
/// cells to reset by surrounding them by braces.
///
/// ## `WHILE`
///
/// Loops while a cell (the origin) is non-zero. See [`Generator::generate_loop`].
///
/// ## `LOOP`
///
/// Loops as many times as the value of a cell (the origin), decrementing it at the end of each
/// iteration. See [`Generator::generate_loop`].
///
/// ## `IF`
///
/// Executes instructions iff a cell's value is non-zero. See [`Generator::generate_branch`].
///
/// Note that this instruction has the side effect of resetting the value of the condition cell.
/// To prevent this behavior, prefix the cell with a `@`: the branch then runs on a temporary copy.
///
/// ### Example
///
/// ```gasm
/// IF @x [
///     WRITE x;
/// ];
/// // `x` still has the same value
/// ```
///
/// ## `READ`
///
/// Reads a value into a cell. See [`Generator::generate_read`].
///
/// ## `WRITE`
///
/// Writes the value of a cell. See [`Generator::generate_write`].
///
/// ## `MOVE`
///
/// Adds the value of a cell to another cell and resets the first one. See
/// [`Generator::generate_move`].
///
/// ## `SUB`
///
/// Subtracts the value of a cell from another cell and resets the first one. See
/// [`Generator::generate_move_subtract`].
///
/// ## `COPY`
///
/// Copies the value of a cell into another cell, leaving the first one unchanged. See
/// [`copy`](crate::generator::operations::copy).
///
/// The arguments are the cell to copy the value of, and the cell to copy the value into.
///
/// ## `CALL`
///
/// Calls a function taking the generator as its first argument, such as the functions of
/// [`operations`](crate::generator::operations).
///
/// ### Example
///
/// ```gasm
/// CALL plus(sum, x, y);
/// ```
///
/// # Meta commands
///
/// ## `let` bindings
///
/// You can declare a new Rust variable, and execute arbitrary Rust code during the generation
/// process, by using a `let` binding.
#[macro_export]
macro_rules! generate {
    { ($generator:ident) } => {};

    // Let binding
    {
        ($generator:ident)
        let $pattern:pat = $value:expr;
        $( $t:tt )*
    } => {
        let $pattern = $value;
        $crate::generate! { ($generator) $( $t )* }
    };

    // Allocate
    {
        ($generator:ident)
        ALLOC $name:ident;
        $( $t:tt )*
    } => {{
        $generator.with_temporary(|$generator, $name| {
            $crate::generate! { ($generator) $( $t )* }
        });
    }};

    // Allocate with initial value from cell
    {
        ($generator:ident)
        ALLOC $name:ident @$source:ident;
        $( $t:tt )*
    } => {{
        $generator.with_temporary(|$generator, $name| {
            $crate::generator::operations::copy($generator, $name, $source);
            $crate::generate! { ($generator) $( $t )* }
        });
    }};

    // Allocate with initial value
    {
        ($generator:ident)
        ALLOC $name:ident $value:expr;
        $( $t:tt )*
    } => {{
        // Evaluate before to prevent declaring `$name`.
        let value = $value;
        $generator.with_temporary(|$generator, $name| {
            $generator.generate_set($name, value);
            $crate::generate! { ($generator) $( $t )* }
        });
    }};

    // Decrement
    {
        ($generator:ident)
        DECR $cell:ident;
        $( $t:tt )*
    } => {{
        $generator.generate_decrement($cell);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Increment
    {
        ($generator:ident)
        INCR $cell:ident;
        $( $t:tt )*
    } => {{
        $generator.generate_increment($cell);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Set from cell
    {
        ($generator:ident)
        SET $cell:ident @$source:ident;
        $( $t:tt )*
    } => {{
        $crate::generator::operations::copy($generator, $cell, $source);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Set
    {
        ($generator:ident)
        SET $cell:ident $value:expr;
        $( $t:tt )*
    } => {{
        $generator.generate_set($cell, $value);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Reset
    {
        ($generator:ident)
        RESET $cell:ident;
        $( $t:tt )*
    } => {{
        $generator.generate_reset($cell);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Reset multiple
    {
        ($generator:ident)
        RESET { $( $cell:ident ),+ };
        $( $t:tt )*
    } => {{
        $(
            $generator.generate_reset($cell);
        )+
        $crate::generate! { ($generator) $( $t )* }
    }};

    // While loop
    {
        ($generator:ident)
        WHILE $origin:ident [
            $( $body:tt )*
        ];
        $( $t:tt )*
    } => {{
        $generator.generate_loop($origin, |$generator| {
            $crate::generate! { ($generator) $( $body )* }
        });
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Loop
    {
        ($generator:ident)
        LOOP $origin:ident [
            $( $body:tt )*
        ];
        $( $t:tt )*
    } => {{
        $generator.generate_loop($origin, |$generator| {
            $crate::generate! { ($generator) $( $body )* }
            $generator.generate_decrement($origin)
        });
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Non-destructive conditional branch
    {
        ($generator:ident)
        IF @$condition:ident [
            $( $body:tt )*
        ];
        $( $t:tt )*
    } => {{
        $generator.with_temporary(|$generator, condition| {
            $crate::generator::operations::copy($generator, condition, $condition);
            $generator.generate_branch(condition, |$generator| {
                $crate::generate! { ($generator) $( $body )* }
            });
        });
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Conditional branch
    {
        ($generator:ident)
        IF $condition:ident [
            $( $body:tt )*
        ];
        $( $t:tt )*
    } => {{
        $generator.generate_branch($condition, |$generator| {
            $crate::generate! { ($generator) $( $body )* }
        });
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Read
    {
        ($generator:ident)
        READ $destination:ident;
        $( $t:tt )*
    } => {{
        $generator.generate_read($destination);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Write
    {
        ($generator:ident)
        WRITE $source:ident;
        $( $t:tt )*
    } => {{
        $generator.generate_write($source);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Move
    {
        ($generator:ident)
        MOVE $source:ident $destination:ident;
        $( $t:tt )*
    } => {{
        $generator.generate_move($source, $destination);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Subtracting move
    {
        ($generator:ident)
        SUB $source:ident $destination:ident;
        $( $t:tt )*
    } => {{
        $generator.generate_move_subtract($source, $destination);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Copy
    {
        ($generator:ident)
        COPY $source:ident $destination:ident;
        $( $t:tt )*
    } => {{
        $crate::generator::operations::copy($generator, $destination, $source);
        $crate::generate! { ($generator) $( $t )* }
    }};

    // Call
    {
        ($generator:ident)
        CALL $function:ident ( $( $argument:expr ),* $(,)? );
        $( $t:tt )*
    } => {{
        $function($generator, $( $argument ),*);
        $crate::generate! { ($generator) $( $t )* }
    }};
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_body_returns_to_origin() {
        let mut generator = Generator::new();
        let x = generator.allocate();
        let y = generator.allocate();
        generator.generate_move(x, y);
        assert_eq!(generator.serialize(), "[->+<]");
        assert_eq!(generator.cursor(), x.index());
    }

    #[test]
    fn branch_resets_condition() {
        let mut generator = Generator::new();
        let x = generator.allocate();
        let y = generator.allocate();
        generator.generate_branch(y, |generator| generator.generate_increment(x));
        assert_eq!(generator.serialize(), ">[<+>[-]]");
        assert_eq!(generator.cursor(), y.index());
    }

    #[test]
    fn set_is_reset_then_increments() {
        let mut generator = Generator::new();
        let x = generator.allocate();
        generator.generate_set(x, 3);
        assert_eq!(generator.finish().serialize(), "[-]+++");
    }

    #[test]
    #[should_panic(expected = "does not fit in an isize")]
    fn set_rejects_values_beyond_isize() {
        let mut generator = Generator::new();
        let x = generator.allocate();
        generator.generate_set(x, usize::MAX);
    }

    #[test]
    fn temporaries_are_released_after_scope() {
        let mut generator = Generator::new();
        let x = generator.allocate();
        let index = generator.with_temporary(|generator, tmp| {
            assert_eq!(generator.depth(), 2);
            generator.generate_increment(tmp);
            tmp.index()
        });
        assert_eq!(index, 1);
        assert_eq!(generator.depth(), 1);
        generator.release(x);
        assert_eq!(generator.depth(), 0);
    }

    #[test]
    fn fragments_thread_the_cursor() {
        let mut generator = Generator::new();
        let x = generator.allocate();
        let y = generator.allocate();
        let fragment = generator.generate_child(|generator| generator.generate_write(y));
        assert_eq!(fragment.serialize(), ">.");
        assert!(generator.code().is_empty());
        generator.append(fragment);
        generator.generate_read(x);
        assert_eq!(generator.serialize(), ">.<,");
    }

    #[test]
    fn macro_releases_temporaries_in_reverse_order() {
        let mut machine = Generator::new();
        let generator = &mut machine;
        let x = generator.allocate();
        generate! {
            (generator)
            ALLOC a 2;
            ALLOC b;
            RESET b;
            LOOP a [
                INCR b;
            ];
            MOVE b x;
        }
        assert_eq!(generator.depth(), 1);
        assert_eq!(generator.serialize(), ">[-]++>[-]<[>+<-]>[-<<+>>]");
    }

    #[test]
    #[should_panic(expected = "reverse order of allocation")]
    fn leaking_a_slot_from_a_temporary_scope_panics() {
        let mut generator = Generator::new();
        generator.with_temporary(|generator, _| {
            generator.allocate();
        });
    }
}
