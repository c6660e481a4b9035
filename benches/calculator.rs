use benefits::{
    calculator::{
        benefits::{calculate_benefits, CostParameters},
        currency::CurrencyFormat,
    },
    model::employee::{Dependent, Employee, Relationship},
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn employee_with_dependents(count: usize) -> Employee {
    let dependents = (0..count)
        .map(|index| {
            let first_name = if index % 2 == 0 { "Amy" } else { "Bob" };

            Dependent::new(
                first_name.to_string(),
                "Bench".to_string(),
                Relationship::Child,
            )
        })
        .collect();

    Employee::new("Alice".to_string(), "Bench".to_string(), dependents)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let parameters = CostParameters::default();

    let small = employee_with_dependents(3);
    let large = employee_with_dependents(1000);

    c.bench_function("calculate 3 dependents", |b| {
        b.iter(|| calculate_benefits(black_box(&small), black_box(&parameters)))
    });

    c.bench_function("calculate 1000 dependents", |b| {
        b.iter(|| calculate_benefits(black_box(&large), black_box(&parameters)))
    });

    let format = CurrencyFormat::default();

    c.bench_function("format currency", |b| {
        b.iter(|| format.format(black_box(1_234_567.891)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
