//! Benchmarks for generated operations.
//!
//! Measures:
//! - Code generation of the composite operations
//! - Interpretation of `multiply` and `divide`, whose running time grows with their operands

use brainstack::generator::{operations, Generator, Slot};
use brainstack::interpreter::interpret;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

type BinaryOperation = fn(&mut Generator, Slot, Slot, Slot);

fn binary_program(operation: BinaryOperation) -> String {
    let mut generator = Generator::new();
    let result = generator.allocate();
    let left = generator.allocate();
    let right = generator.allocate();
    generator.generate_read(left);
    generator.generate_read(right);
    operation(&mut generator, result, left, right);
    generator.generate_write(result);
    generator.serialize()
}

fn divide_program() -> String {
    let mut generator = Generator::new();
    let quotient = generator.allocate();
    let remainder = generator.allocate();
    let dividend = generator.allocate();
    let divisor = generator.allocate();
    generator.generate_read(dividend);
    generator.generate_read(divisor);
    operations::divide(&mut generator, quotient, remainder, dividend, divisor);
    generator.generate_write(quotient);
    generator.generate_write(remainder);
    generator.serialize()
}

// =============================================================================
// Generation
// =============================================================================

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    let cases: [(&str, BinaryOperation); 4] = [
        ("plus", operations::plus),
        ("multiply", operations::multiply),
        ("less_than", operations::less_than),
        ("logical_or", operations::logical_or),
    ];
    for (name, operation) in cases {
        group.bench_function(name, |b| {
            b.iter(|| black_box(binary_program(black_box(operation))));
        });
    }

    group.bench_function("divide", |b| {
        b.iter(|| black_box(divide_program()));
    });

    group.finish();
}

// =============================================================================
// Interpretation
// =============================================================================

fn bench_interpretation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpretation");

    let multiply = binary_program(operations::multiply);
    for size in [4u64, 16, 64] {
        group.bench_with_input(BenchmarkId::new("multiply", size), &size, |b, &size| {
            b.iter(|| interpret(black_box(&multiply), [size, size]));
        });
    }

    let divide = divide_program();
    for dividend in [10u64, 50, 200] {
        group.bench_with_input(BenchmarkId::new("divide", dividend), &dividend, |b, &dividend| {
            b.iter(|| interpret(black_box(&divide), [dividend, 7]));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation, bench_interpretation);
criterion_main!(benches);
